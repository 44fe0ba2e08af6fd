//! Reaction record database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reaction_records table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionRecordModel {
    pub guild_id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub owner_id: i64,
    pub emoji_key: String,
    pub count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
