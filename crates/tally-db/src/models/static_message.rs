//! Static message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for static_messages table
#[derive(Debug, Clone, FromRow)]
pub struct StaticMessageModel {
    pub guild_id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub kind: String,
    pub config: String,
    pub cadence: String,
    pub created_at: DateTime<Utc>,
}
