//! Static message - a posted message kept in sync with derived state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{EmojiKey, EmojiRef, Snowflake};

/// What a static message renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticMessageKind {
    /// Reaction leaderboard for one emoji
    Leaderboard,
    /// Roster of self-assignable roles
    RoleList,
}

impl StaticMessageKind {
    /// Stored name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leaderboard => "reaction_leaderboard",
            Self::RoleList => "role_toggles",
        }
    }
}

impl fmt::Display for StaticMessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaticMessageKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reaction_leaderboard" => Ok(Self::Leaderboard),
            "role_toggles" => Ok(Self::RoleList),
            other => Err(DomainError::ValidationError(format!(
                "unknown static message type '{other}'"
            ))),
        }
    }
}

/// How often a static message is re-rendered
///
/// Only `Instant` triggers rendering; the scheduled cadences are stored
/// but inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateCadence {
    #[default]
    Instant,
    Hourly,
    Daily,
}

impl UpdateCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instant => "instant",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }
}

impl fmt::Display for UpdateCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateCadence {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instant" => Ok(Self::Instant),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            _ => Err(DomainError::ValidationError(
                "Update must be instant, hourly, or daily.".to_string(),
            )),
        }
    }
}

/// Configuration of a leaderboard static message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub emoji_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl LeaderboardConfig {
    pub fn for_emoji(emoji: &EmojiRef) -> Self {
        Self {
            emoji_id: emoji.id.filter(|id| !id.is_zero()),
            emoji_name: emoji.name.trim().to_string(),
            top: None,
            title: None,
        }
    }

    /// The bound emoji
    pub fn emoji(&self) -> EmojiRef {
        EmojiRef {
            id: self.emoji_id,
            name: self.emoji_name.clone(),
            animated: false,
        }
    }

    /// Whether this leaderboard is bound to the given emoji key
    pub fn matches(&self, key: &EmojiKey) -> bool {
        self.emoji().key().as_ref() == Some(key)
    }
}

/// Configuration of a role list static message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleListConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Static message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMessage {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub kind: StaticMessageKind,
    /// Opaque JSON; decoded on demand by the typed accessors
    pub config: String,
    pub cadence: UpdateCadence,
    pub created_at: DateTime<Utc>,
}

impl StaticMessage {
    pub fn new(
        guild_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
        kind: StaticMessageKind,
        config: String,
        cadence: UpdateCadence,
    ) -> Self {
        Self {
            guild_id,
            channel_id,
            message_id,
            kind,
            config,
            cadence,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_instant(&self) -> bool {
        self.cadence == UpdateCadence::Instant
    }

    /// Decode the leaderboard config. A blank config decodes to the default.
    pub fn leaderboard_config(&self) -> Result<LeaderboardConfig, DomainError> {
        decode_config(&self.config)
    }

    /// Decode the role list config. A blank config decodes to the default.
    pub fn role_list_config(&self) -> Result<RoleListConfig, DomainError> {
        decode_config(&self.config)
    }
}

fn decode_config<T>(raw: &str) -> Result<T, DomainError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(raw).map_err(|e| DomainError::InvalidConfig(e.to_string()))
}
