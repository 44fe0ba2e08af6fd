//! Read-through composition of snapshot and remote guild state

use std::sync::Arc;

use tracing::{debug, instrument};

use tally_core::{GuildMember, GuildStateRepository, GuildStateSnapshot, RoleTable, Snowflake};

use crate::services::{ServiceError, ServiceResult};

/// A member fetched for a permission decision, with a role table that
/// covers the member's roles and every extra role asked for
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub member: GuildMember,
    pub table: RoleTable,
}

/// Snapshot first, remote on a miss. Remote results warm the snapshot.
///
/// A failed lookup is an error, never a silent "no".
#[derive(Clone)]
pub struct RoleLookup {
    snapshot: Arc<dyn GuildStateSnapshot>,
    remote: Arc<dyn GuildStateRepository>,
}

impl RoleLookup {
    pub fn new(snapshot: Arc<dyn GuildStateSnapshot>, remote: Arc<dyn GuildStateRepository>) -> Self {
        Self { snapshot, remote }
    }

    /// Look up a member
    #[instrument(skip(self))]
    pub async fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<GuildMember> {
        if let Some(member) = self
            .snapshot
            .member(guild_id, user_id)
            .await
            .map_err(ServiceError::lookup)?
        {
            return Ok(member);
        }
        self.fetch_member(guild_id, user_id).await
    }

    /// Fetch a member from the platform, skipping the snapshot, and store it
    async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<GuildMember> {
        let member = self
            .remote
            .member(guild_id, user_id)
            .await
            .map_err(ServiceError::lookup)?
            .ok_or_else(|| ServiceError::not_found("Member", user_id.to_string()))?;

        debug!(guild_id = %guild_id, user_id = %user_id, "Member fetched remotely");
        self.snapshot.store_member(guild_id, member.clone());
        Ok(member)
    }

    /// Role table of a guild that knows every id in `referenced`.
    ///
    /// When the snapshot misses any referenced role, or the @everyone role,
    /// the full table is fetched again and replaces the snapshot's.
    #[instrument(skip(self))]
    pub async fn role_table(&self, guild_id: Snowflake, referenced: &[Snowflake]) -> ServiceResult<RoleTable> {
        if let Some(roles) = self.snapshot.roles(guild_id).await.map_err(ServiceError::lookup)? {
            let table = RoleTable::new(guild_id, roles);
            if table.covers(referenced) {
                return Ok(table);
            }
        }

        let roles = self
            .remote
            .roles(guild_id)
            .await
            .map_err(ServiceError::lookup)?
            .ok_or_else(|| ServiceError::not_found("Guild", guild_id.to_string()))?;

        debug!(guild_id = %guild_id, roles = roles.len(), "Role table fetched remotely");
        self.snapshot.store_roles(guild_id, roles.clone());
        Ok(RoleTable::new(guild_id, roles))
    }

    /// Owner of a guild
    #[instrument(skip(self))]
    pub async fn guild_owner(&self, guild_id: Snowflake) -> ServiceResult<Snowflake> {
        if let Some(guild) = self.snapshot.guild(guild_id).await.map_err(ServiceError::lookup)? {
            return Ok(guild.owner_id);
        }

        let guild = self
            .remote
            .guild(guild_id)
            .await
            .map_err(ServiceError::lookup)?
            .ok_or_else(|| ServiceError::not_found("Guild", guild_id.to_string()))?;

        self.snapshot.store_guild(guild);
        Ok(guild.owner_id)
    }

    /// State of a human about to be authorized
    ///
    /// The member is always fetched remotely so revoked roles are seen at
    /// once; the role table is read through the snapshot.
    #[instrument(skip(self, extra_roles))]
    pub async fn actor(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        extra_roles: &[Snowflake],
    ) -> ServiceResult<ActorContext> {
        let member = self.fetch_member(guild_id, user_id).await?;
        let mut referenced = member.role_ids.clone();
        referenced.extend_from_slice(extra_roles);
        let table = self.role_table(guild_id, &referenced).await?;
        Ok(ActorContext { member, table })
    }

    /// Whether a user is a bot account
    pub async fn is_bot(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<bool> {
        Ok(self.member(guild_id, user_id).await?.bot)
    }

    /// Forget a cached member so the next lookup sees fresh roles
    pub fn evict_member(&self, guild_id: Snowflake, user_id: Snowflake) {
        self.snapshot.evict_member(guild_id, user_id);
    }
}

impl std::fmt::Debug for RoleLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleLookup").finish_non_exhaustive()
    }
}
