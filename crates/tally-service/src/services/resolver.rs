//! Role hierarchy resolution
//!
//! A pure decision function: no I/O, fed with a role table that the caller
//! obtained through [`RoleLookup`](crate::lookup::RoleLookup).

use std::fmt;

use tally_core::{GuildRole, Permissions, RoleHierarchyState, RoleTable, Snowflake};

/// On whose behalf a role change is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acting {
    /// A human configuring role toggles; needs Manage Roles and hierarchy
    Manager { is_owner: bool },
    /// A member toggling a role on themselves; only the toggle's threshold
    SelfService,
    /// The bot applying the change
    Bot,
}

/// Input of [`resolve`]
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    pub table: &'a RoleTable,
    /// Roles held by the actor (the @everyone role is implied)
    pub actor_roles: &'a [Snowflake],
    pub target: &'a GuildRole,
    pub acting: Acting,
    /// Extra permissions a human actor must hold (empty = none)
    pub threshold: Permissions,
}

/// Why a role change was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    EveryoneRole,
    ManagedRole,
    MissingManageRoles,
    AboveActor,
    BotMissingManageRoles,
    AboveBot,
    MissingThreshold,
    NotSelfAssignable,
    BotUnverified,
}

impl DenialReason {
    /// User-facing refusal text
    pub fn message(self) -> &'static str {
        match self {
            Self::EveryoneRole => "You can't toggle the @everyone role.",
            Self::ManagedRole => "You can't toggle managed roles.",
            Self::MissingManageRoles => "You need the Manage Roles permission.",
            Self::AboveActor => "You can only manage roles below your highest role.",
            Self::BotMissingManageRoles => "Bot is missing the Manage Roles permission.",
            Self::AboveBot => "Bot cannot manage that role (role is above the bot).",
            Self::MissingThreshold => "You don't have permission to toggle that role.",
            Self::NotSelfAssignable => "That role is not self-assignable.",
            Self::BotUnverified => "Bot permissions could not be verified yet.",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Allowed,
    Denied(DenialReason),
}

impl Resolution {
    #[inline]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn denial(self) -> Option<DenialReason> {
        match self {
            Self::Allowed => None,
            Self::Denied(reason) => Some(reason),
        }
    }
}

/// Decide whether the actor may add or remove `target` on a member
pub fn resolve(request: &ResolveRequest<'_>) -> Resolution {
    let target = request.target;

    if target.is_everyone(request.table.guild_id()) {
        return Resolution::Denied(DenialReason::EveryoneRole);
    }
    if target.managed {
        return Resolution::Denied(DenialReason::ManagedRole);
    }

    let state = RoleHierarchyState::from_role_ids(request.actor_roles, request.table);

    match request.acting {
        Acting::Manager { is_owner } => {
            if !state.permissions.has(Permissions::MANAGE_ROLES) {
                return Resolution::Denied(DenialReason::MissingManageRoles);
            }
            let administrator = state.permissions.has(Permissions::ADMINISTRATOR);
            if !is_owner && !administrator && target.position >= state.highest_position {
                return Resolution::Denied(DenialReason::AboveActor);
            }
        }
        Acting::SelfService => {}
        Acting::Bot => {
            if !state.permissions.has(Permissions::MANAGE_ROLES) {
                return Resolution::Denied(DenialReason::BotMissingManageRoles);
            }
            if target.position >= state.highest_position {
                return Resolution::Denied(DenialReason::AboveBot);
            }
            return Resolution::Allowed;
        }
    }

    if !state.permissions.satisfies(request.threshold) {
        return Resolution::Denied(DenialReason::MissingThreshold);
    }
    Resolution::Allowed
}
