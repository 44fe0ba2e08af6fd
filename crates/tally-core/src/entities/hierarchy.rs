//! Role tables and the per-actor hierarchy state derived from them

use std::collections::HashMap;

use super::{GuildMember, GuildRole};
use crate::value_objects::{Permissions, Snowflake};

/// All roles of one guild, indexed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleTable {
    guild_id: Snowflake,
    roles: HashMap<Snowflake, GuildRole>,
}

impl RoleTable {
    pub fn new(guild_id: Snowflake, roles: impl IntoIterator<Item = GuildRole>) -> Self {
        Self {
            guild_id,
            roles: roles.into_iter().map(|role| (role.id, role)).collect(),
        }
    }

    #[inline]
    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    pub fn get(&self, role_id: Snowflake) -> Option<&GuildRole> {
        self.roles.get(&role_id)
    }

    /// The @everyone role, when known
    pub fn everyone(&self) -> Option<&GuildRole> {
        self.roles.get(&self.guild_id)
    }

    /// True when every id, plus the @everyone role, is present
    pub fn covers(&self, role_ids: &[Snowflake]) -> bool {
        self.roles.contains_key(&self.guild_id)
            && role_ids.iter().all(|id| self.roles.contains_key(id))
    }

    pub fn roles(&self) -> impl Iterator<Item = &GuildRole> {
        self.roles.values()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Effective permissions and top role position of one actor
///
/// Computed fresh for every resolution; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleHierarchyState {
    /// Union of role permissions, with the administrator short-circuit applied
    pub permissions: Permissions,
    /// Position of the actor's highest role (the @everyone position if none)
    pub highest_position: i32,
}

impl RoleHierarchyState {
    /// Derive the state of a member from a role table. The @everyone role
    /// always contributes; ids missing from the table are skipped.
    pub fn for_member(member: &GuildMember, table: &RoleTable) -> Self {
        Self::from_role_ids(&member.role_ids, table)
    }

    pub fn from_role_ids(role_ids: &[Snowflake], table: &RoleTable) -> Self {
        let everyone = table.everyone();
        let held = role_ids
            .iter()
            .filter(|id| **id != table.guild_id())
            .filter_map(|id| table.get(*id));

        let mut permissions = everyone.map(|r| r.permissions).unwrap_or_default();
        let mut highest_position = everyone.map_or(0, |r| r.position);
        for role in held {
            permissions |= role.permissions;
            highest_position = highest_position.max(role.position);
        }

        Self {
            permissions: permissions.effective(),
            highest_position,
        }
    }
}
