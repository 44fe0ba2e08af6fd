//! Guild state fetched from the platform

use std::sync::Arc;

use async_trait::async_trait;

use tally_core::{
    DomainError, GuildInfo, GuildMember, GuildRole, GuildStateRepository, Platform, PlatformError,
    RepoResult, Snowflake,
};

/// Adapts a [`Platform`] client to the guild state lookup contract
#[derive(Clone)]
pub struct RemoteGuildState {
    platform: Arc<dyn Platform>,
}

impl RemoteGuildState {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

/// `NotFound` becomes `None`; every other failure is an error
fn absent_on_not_found<T>(result: Result<T, PlatformError>) -> RepoResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(DomainError::PlatformError(e.to_string())),
    }
}

#[async_trait]
impl GuildStateRepository for RemoteGuildState {
    async fn roles(&self, guild_id: Snowflake) -> RepoResult<Option<Vec<GuildRole>>> {
        absent_on_not_found(self.platform.get_roles(guild_id).await)
    }

    async fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<GuildMember>> {
        absent_on_not_found(self.platform.get_member(guild_id, user_id).await)
    }

    async fn guild(&self, guild_id: Snowflake) -> RepoResult<Option<GuildInfo>> {
        absent_on_not_found(self.platform.get_guild(guild_id).await)
    }
}

impl std::fmt::Debug for RemoteGuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteGuildState").finish_non_exhaustive()
    }
}
