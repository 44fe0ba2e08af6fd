//! Inbound platform events carried on the event channel of the bus
//!
//! Tags follow the platform's gateway dispatch names. An unknown tag fails
//! deserialization at the ingress instead of reaching a consumer.

use serde::{Deserialize, Serialize};

use crate::value_objects::{EmojiRef, Snowflake};

/// All inbound events the engine consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformEvent {
    #[serde(rename = "MESSAGE_REACTION_ADD")]
    ReactionAdded(ReactionAddedEvent),
    #[serde(rename = "MESSAGE_REACTION_REMOVE")]
    ReactionRemoved(ReactionRemovedEvent),
    #[serde(rename = "MESSAGE_REACTION_REMOVE_EMOJI")]
    ReactionRemovedForEmoji(ReactionRemovedForEmojiEvent),
    #[serde(rename = "MESSAGE_REACTION_REMOVE_ALL")]
    ReactionRemovedAll(MessageScope),
    #[serde(rename = "MESSAGE_DELETE")]
    MessageDeleted(MessageScope),
    #[serde(rename = "INTERACTION_CREATE")]
    InteractionReceived(InteractionReceivedEvent),
}

impl PlatformEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ReactionAdded(_) => "MESSAGE_REACTION_ADD",
            Self::ReactionRemoved(_) => "MESSAGE_REACTION_REMOVE",
            Self::ReactionRemovedForEmoji(_) => "MESSAGE_REACTION_REMOVE_EMOJI",
            Self::ReactionRemovedAll(_) => "MESSAGE_REACTION_REMOVE_ALL",
            Self::MessageDeleted(_) => "MESSAGE_DELETE",
            Self::InteractionReceived(_) => "INTERACTION_CREATE",
        }
    }

    /// Guild the event belongs to, if any
    pub fn guild_id(&self) -> Option<Snowflake> {
        match self {
            Self::ReactionAdded(e) => Some(e.guild_id),
            Self::ReactionRemoved(e) => Some(e.guild_id),
            Self::ReactionRemovedForEmoji(e) => Some(e.guild_id),
            Self::ReactionRemovedAll(e) | Self::MessageDeleted(e) => Some(e.guild_id),
            Self::InteractionReceived(e) => e.guild_id,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionAddedEvent {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    /// User who reacted
    pub user_id: Snowflake,
    /// Author of the reacted message; zero when not yet resolved
    #[serde(default)]
    pub author_id: Snowflake,
    pub emoji: EmojiRef,
    /// Reactions by bot accounts are dropped at the ingress
    #[serde(default)]
    pub user_is_bot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRemovedEvent {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: EmojiRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRemovedForEmojiEvent {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub emoji: EmojiRef,
}

/// Identifies one message; payload of remove-all and delete events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageScope {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionReceivedEvent {
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub user_id: Snowflake,
    /// Command path such as `/role/add`
    pub command: String,
}
