//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{EmojiParseError, Snowflake, SnowflakeParseError};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Role not found: {0}")]
    RoleNotFound(Snowflake),

    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Emoji not found: {0}")]
    EmojiNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid identifier: {0}")]
    InvalidSnowflake(#[from] SnowflakeParseError),

    #[error("Invalid emoji: {0}")]
    InvalidEmoji(#[from] EmojiParseError),

    #[error("Invalid static message config: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Static message already registered: {0}")]
    StaticMessageExists(Snowflake),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Store is not configured: {0}")]
    StoreNotConfigured(&'static str),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Platform error: {0}")]
    PlatformError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::EmojiNotFound(_) => "UNKNOWN_EMOJI",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidSnowflake(_) => "INVALID_SNOWFLAKE",
            Self::InvalidEmoji(_) => "INVALID_EMOJI",
            Self::InvalidConfig(_) => "INVALID_CONFIG",

            // Conflict
            Self::StaticMessageExists(_) => "STATIC_MESSAGE_EXISTS",

            // Infrastructure
            Self::StoreNotConfigured(_) => "STORE_NOT_CONFIGURED",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::PlatformError(_) => "PLATFORM_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GuildNotFound(_)
                | Self::RoleNotFound(_)
                | Self::MemberNotFound(_)
                | Self::MessageNotFound(_)
                | Self::EmojiNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidSnowflake(_)
                | Self::InvalidEmoji(_)
                | Self::InvalidConfig(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StaticMessageExists(_))
    }

    /// Check if this is a missing-collaborator error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::StoreNotConfigured(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::RoleNotFound(Snowflake::new(1));
        assert_eq!(err.code(), "UNKNOWN_ROLE");

        let err = DomainError::DatabaseError("connection reset".to_string());
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_categories() {
        assert!(DomainError::EmojiNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::from(SnowflakeParseError::InvalidFormat).is_validation());
        assert!(DomainError::StaticMessageExists(Snowflake::new(1)).is_conflict());
        assert!(DomainError::StoreNotConfigured("static messages").is_configuration());
        assert!(!DomainError::DatabaseError(String::new()).is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::MemberNotFound(Snowflake::new(123));
        assert_eq!(err.to_string(), "Member not found: 123");

        let err = DomainError::from(EmojiParseError::Malformed);
        assert_eq!(
            err.to_string(),
            "Invalid emoji: emoji is not a valid custom emoji or unicode emoji"
        );
    }
}
