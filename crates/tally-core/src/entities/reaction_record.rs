//! Reaction record - per-message ledger of qualifying reactions
//!
//! There is at most one record per (guild, message, emoji key). The record
//! is owned by the author of the message; that is the user who earns the
//! leaderboard credit.

use chrono::{DateTime, Utc};

use crate::value_objects::{EmojiKey, Snowflake};

/// Reaction record entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRecord {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    /// Message author credited with the reactions
    pub owner_id: Snowflake,
    pub emoji_key: EmojiKey,
    pub count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReactionRecord {
    /// Create the record for a first qualifying reaction (count 1)
    pub fn first(
        guild_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
        owner_id: Snowflake,
        emoji_key: EmojiKey,
    ) -> Self {
        let now = Utc::now();
        Self {
            guild_id,
            channel_id,
            message_id,
            owner_id,
            emoji_key,
            count: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
        self.updated_at = Utc::now();
    }

    /// Decrement, clamping at zero
    pub fn decrement(&mut self) {
        self.count = (self.count - 1).max(0);
        self.updated_at = Utc::now();
    }

    /// A record with no remaining reactions must be deleted
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.count <= 0
    }
}
