//! Repository traits (ports) - the persistent store contract
//!
//! One trait per collection. The domain layer defines what it needs; the
//! store crate provides a Postgres and an in-memory implementation.
//! Every call is atomic on its own; callers add no locking.

use async_trait::async_trait;

use crate::entities::{
    LeaderboardEntry, ReactionRecord, ReactionTrack, RoleToggle, StaticMessage, StaticMessageKind,
};
use crate::error::DomainError;
use crate::value_objects::{EmojiKey, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Track Repository
// ============================================================================

#[async_trait]
pub trait ReactionTrackRepository: Send + Sync {
    /// Find the track for an emoji in a guild
    async fn find(&self, guild_id: Snowflake, emoji_key: &EmojiKey) -> RepoResult<Option<ReactionTrack>>;

    /// List all tracks of a guild
    async fn list_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<ReactionTrack>>;

    /// Insert a track, or replace title and description of an existing one.
    /// Returns `true` when a new row was created.
    async fn upsert(&self, track: &ReactionTrack) -> RepoResult<bool>;

    /// Delete a track. Returns whether a row was removed.
    async fn delete(&self, guild_id: Snowflake, emoji_key: &EmojiKey) -> RepoResult<bool>;
}

// ============================================================================
// Reaction Record Repository
// ============================================================================

#[async_trait]
pub trait ReactionRecordRepository: Send + Sync {
    /// Find the record for (guild, message, emoji)
    async fn find(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<Option<ReactionRecord>>;

    /// All records of a message, any emoji
    async fn find_by_message(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<Vec<ReactionRecord>>;

    async fn create(&self, record: &ReactionRecord) -> RepoResult<()>;

    /// Persist the count of an existing record
    async fn save(&self, record: &ReactionRecord) -> RepoResult<()>;

    /// Delete one record. Returns whether a row was removed.
    async fn delete(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<bool>;
}

// ============================================================================
// Leaderboard Repository
// ============================================================================

#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    async fn find(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<Option<LeaderboardEntry>>;

    /// All entries for one emoji in a guild, unordered
    async fn list_by_emoji(
        &self,
        guild_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<Vec<LeaderboardEntry>>;

    /// Insert or replace the entry's count
    async fn upsert(&self, entry: &LeaderboardEntry) -> RepoResult<()>;

    async fn delete(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<bool>;
}

// ============================================================================
// Role Toggle Repository
// ============================================================================

#[async_trait]
pub trait RoleToggleRepository: Send + Sync {
    async fn find(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<Option<RoleToggle>>;

    async fn list_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<RoleToggle>>;

    /// Insert, or replace permissions and description of an existing
    /// toggle. Returns `true` when a new row was created.
    async fn upsert(&self, toggle: &RoleToggle) -> RepoResult<bool>;

    async fn delete(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Static Message Repository
// ============================================================================

#[async_trait]
pub trait StaticMessageRepository: Send + Sync {
    async fn find(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<Option<StaticMessage>>;

    async fn list_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<StaticMessage>>;

    /// Instant-cadence messages of one kind in a guild
    async fn list_instant(
        &self,
        guild_id: Snowflake,
        kind: StaticMessageKind,
    ) -> RepoResult<Vec<StaticMessage>>;

    /// `StaticMessageExists` when the message is already registered
    async fn create(&self, message: &StaticMessage) -> RepoResult<()>;

    async fn delete(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<bool>;
}
