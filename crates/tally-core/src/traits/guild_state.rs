//! Guild state lookups used by role resolution
//!
//! Two implementations exist: an in-memory snapshot and a remote fetch
//! through the [`Platform`](super::Platform). A read-through policy in the
//! service layer composes them. `Ok(None)` means "not known here", which is
//! distinct from a failed lookup.

use async_trait::async_trait;

use crate::entities::{GuildInfo, GuildMember, GuildRole};
use crate::value_objects::Snowflake;

use super::RepoResult;

#[async_trait]
pub trait GuildStateRepository: Send + Sync {
    /// Every role of the guild
    async fn roles(&self, guild_id: Snowflake) -> RepoResult<Option<Vec<GuildRole>>>;

    async fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<GuildMember>>;

    async fn guild(&self, guild_id: Snowflake) -> RepoResult<Option<GuildInfo>>;
}

/// A guild state source that can also be written, i.e. a cache
pub trait GuildStateSnapshot: GuildStateRepository {
    /// Replace the whole role table of a guild
    fn store_roles(&self, guild_id: Snowflake, roles: Vec<GuildRole>);

    fn store_member(&self, guild_id: Snowflake, member: GuildMember);

    fn store_guild(&self, guild: GuildInfo);

    /// Forget a member, e.g. after its roles changed
    fn evict_member(&self, guild_id: Snowflake, user_id: Snowflake);
}
