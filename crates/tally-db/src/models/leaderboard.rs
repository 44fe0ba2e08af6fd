//! Leaderboard database model

use sqlx::FromRow;

/// Database model for reaction_leaderboard table
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardModel {
    pub guild_id: i64,
    pub user_id: i64,
    pub emoji_key: String,
    pub count: i64,
}
