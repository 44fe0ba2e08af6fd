//! Reaction track database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reaction_tracks table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionTrackModel {
    pub guild_id: i64,
    pub emoji_key: String,
    pub emoji_id: Option<i64>,
    pub emoji_name: String,
    pub animated: bool,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
