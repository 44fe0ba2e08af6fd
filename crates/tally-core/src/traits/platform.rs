//! Platform collaborator - outbound REST operations against the chat platform

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::{GuildInfo, GuildMember, GuildRole};
use crate::events::MessageBody;
use crate::value_objects::{ProfileImage, Snowflake};

/// Errors reported by a platform client
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Non-success status from a host other than the platform API
    #[error("Status {0}")]
    Status(u16),
}

impl PlatformError {
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Raw bytes downloaded from an image URL
#[derive(Debug, Clone, Default)]
pub struct FetchedImage {
    pub data: Vec<u8>,
    /// `Content-Type` the host served, if any
    pub content_type: Option<String>,
}

/// Changes to the bot's own user profile; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub avatar: Option<ProfileImage>,
    pub banner: Option<ProfileImage>,
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Post a message and return its id
    async fn create_message(&self, channel_id: Snowflake, body: &MessageBody) -> PlatformResult<Snowflake>;

    /// Replace the content of a posted message
    async fn edit_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        body: &MessageBody,
    ) -> PlatformResult<()>;

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<()>;

    /// Author of a message
    async fn message_author(&self, channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<Snowflake>;

    /// Full role list of a guild
    async fn get_roles(&self, guild_id: Snowflake) -> PlatformResult<Vec<GuildRole>>;

    async fn get_member(&self, guild_id: Snowflake, user_id: Snowflake) -> PlatformResult<GuildMember>;

    async fn get_guild(&self, guild_id: Snowflake) -> PlatformResult<GuildInfo>;

    /// Existence check for a guild custom emoji; `NotFound` when absent
    async fn get_emoji(&self, guild_id: Snowflake, emoji_id: Snowflake) -> PlatformResult<()>;

    async fn add_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()>;

    async fn remove_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()>;

    /// Download an image, e.g. a command attachment. No credentials are sent.
    async fn fetch_image(&self, url: &str) -> PlatformResult<FetchedImage>;

    async fn update_current_user(&self, update: &ProfileUpdate) -> PlatformResult<()>;

    /// Replace the application's "about me" text
    async fn update_application_description(&self, description: &str) -> PlatformResult<()>;
}
