//! Request DTOs for commands
//!
//! Options arrive as a flat string map. Presence of required options is
//! checked by the router; the limits below are checked with `validator`.

use std::collections::HashMap;

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use tally_core::Snowflake;

// ============================================================================
// Invocation
// ============================================================================

/// A slash-command interaction as delivered by the ingress
#[derive(Debug, Clone, Deserialize)]
pub struct CommandInvocation {
    /// Absent for direct-message invocations
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    /// Command path such as `/reaction/leaderboard/create`
    pub command: String,
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl CommandInvocation {
    pub fn new(guild_id: Option<Snowflake>, user_id: Snowflake, command: impl Into<String>) -> Self {
        Self {
            guild_id,
            channel_id: Snowflake::ZERO,
            user_id,
            command: command.into(),
            options: HashMap::new(),
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// A trimmed, non-blank option value
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    pub fn owned_option(&self, name: &str) -> Option<String> {
        self.option(name).map(str::to_string)
    }
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// Track an emoji (`/reaction/add`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TrackReactionRequest {
    pub emoji: String,

    #[validate(length(max = 100, message = "Title must be at most 100 characters."))]
    pub title: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters."))]
    pub description: Option<String>,
}

/// Bind a leaderboard message (`/reaction/leaderboard/create`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLeaderboardRequest {
    pub channel_id: Snowflake,

    pub emoji: String,

    pub update: String,

    #[validate(range(min = 1, max = 25, message = "Top must be between 1 and 25."))]
    pub top: Option<u32>,

    #[validate(length(max = 100, message = "Title must be at most 100 characters."))]
    pub title: Option<String>,
}

/// Stop updating a static message (`/reaction/leaderboard/remove`,
/// `/role/message-remove`)
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveStaticMessageRequest {
    pub message_id: Snowflake,
}

// ============================================================================
// Role Requests
// ============================================================================

/// Add a role toggle (`/role/add`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleToggleRequest {
    pub role_id: Snowflake,

    #[validate(length(max = 200, message = "Description must be at most 200 characters."))]
    pub description: Option<String>,

    /// Decimal permission bits; blank means none
    pub permissions: Option<String>,
}

/// Bind a role list message (`/role/message-create`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleListRequest {
    pub channel_id: Snowflake,

    #[validate(length(max = 100, message = "Title must be at most 100 characters."))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters."))]
    pub description: Option<String>,
}

// ============================================================================
// Bot Profile Requests
// ============================================================================

/// Rename the bot (`/bot/name`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BotNameRequest {
    #[validate(length(min = 2, max = 32, message = "Name must be between 2 and 32 characters."))]
    pub name: String,
}

/// Replace the bot's about text (`/bot/about`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BotAboutRequest {
    #[validate(length(max = 400, message = "About text must be at most 400 characters."))]
    pub text: String,
}

/// Image source for `/bot/avatar` and `/bot/banner`: an uploaded
/// attachment or a URL, never both
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BotImageRequest {
    #[validate(url(message = "Image URL must be a valid http(s) URL."))]
    pub attachment_url: Option<String>,

    /// Content type the platform reported for the attachment
    pub attachment_content_type: Option<String>,

    #[validate(url(message = "Image URL must be a valid http(s) URL."))]
    pub url: Option<String>,
}

impl BotImageRequest {
    /// The single URL to download
    pub fn source(&self) -> Result<&str, &'static str> {
        match (self.attachment_url.as_deref(), self.url.as_deref()) {
            (Some(_), Some(_)) => Err("Provide either an attachment or a URL, not both."),
            (None, None) => Err("Provide an attachment or a URL."),
            (Some(url), None) | (None, Some(url)) => {
                if url.starts_with("https://") || url.starts_with("http://") {
                    Ok(url)
                } else {
                    Err("Image URL must start with http or https.")
                }
            }
        }
    }
}

/// First validation message, by field name order
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid command options.".to_string())
}
