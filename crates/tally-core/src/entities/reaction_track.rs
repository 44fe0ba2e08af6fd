//! Reaction track - a guild's opt-in to measure one emoji

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{EmojiKey, EmojiParseError, EmojiRef, Snowflake};

/// Reaction track entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionTrack {
    pub guild_id: Snowflake,
    pub emoji_key: EmojiKey,
    /// Emoji as entered when the track was created, kept for display
    pub emoji: EmojiRef,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReactionTrack {
    /// Create a new track. Fails when the emoji has no usable key.
    pub fn new(
        guild_id: Snowflake,
        emoji: EmojiRef,
        title: String,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        let emoji_key = emoji.key().ok_or(EmojiParseError::Empty)?;
        Ok(Self {
            guild_id,
            emoji_key,
            emoji,
            title,
            description: description.filter(|d| !d.trim().is_empty()),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_creation() {
        let track = ReactionTrack::new(
            Snowflake::new(1),
            EmojiRef::custom(Snowflake::new(55), "star"),
            "Stars".to_string(),
            Some("  ".to_string()),
        )
        .unwrap();
        assert_eq!(track.emoji_key, EmojiKey::Custom(Snowflake::new(55)));
        assert!(track.description.is_none());
    }

    #[test]
    fn test_track_requires_emoji() {
        let result = ReactionTrack::new(
            Snowflake::new(1),
            EmojiRef::default(),
            "Nothing".to_string(),
            None,
        );
        assert!(matches!(result, Err(DomainError::InvalidEmoji(_))));
    }
}
