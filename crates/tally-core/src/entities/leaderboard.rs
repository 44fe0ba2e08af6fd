//! Leaderboard entry - per-user aggregate of reaction record deltas

use std::cmp::Reverse;

use crate::value_objects::{EmojiKey, Snowflake};

/// Leaderboard entry keyed by (guild, user, emoji key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji_key: EmojiKey,
    pub count: i64,
}

impl LeaderboardEntry {
    pub fn new(guild_id: Snowflake, user_id: Snowflake, emoji_key: EmojiKey, count: i64) -> Self {
        Self {
            guild_id,
            user_id,
            emoji_key,
            count,
        }
    }
}

/// Sort entries by count descending, then user id ascending, and keep the
/// first `top`.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>, top: usize) -> Vec<LeaderboardEntry> {
    entries.retain(|entry| entry.count > 0);
    entries.sort_by_key(|entry| (Reverse(entry.count), entry.user_id));
    entries.truncate(top);
    entries
}
