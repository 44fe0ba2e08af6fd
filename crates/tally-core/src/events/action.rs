//! Outbound actions carried on the action channel of the bus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MessageBody;
use crate::value_objects::Snowflake;

/// All outbound effects the dispatcher performs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformAction {
    SendMessage(SendMessageAction),
    EditMessage(EditMessageAction),
    LogEvent(LogEventAction),
}

impl PlatformAction {
    /// Get the action type name
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::SendMessage(_) => "SEND_MESSAGE",
            Self::EditMessage(_) => "EDIT_MESSAGE",
            Self::LogEvent(_) => "LOG_EVENT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageAction {
    pub channel_id: Snowflake,
    pub body: MessageBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditMessageAction {
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub body: MessageBody,
}

/// Severity of a [`LogEventAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogField {
    pub name: String,
    pub value: String,
}

/// Structured log line requested by another component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEventAction {
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub category: String,
    #[serde(default)]
    pub level: LogLevel,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<LogField>,
    pub timestamp: DateTime<Utc>,
}

impl LogEventAction {
    pub fn new(category: impl Into<String>, level: LogLevel, title: impl Into<String>) -> Self {
        Self {
            guild_id: None,
            category: category.into(),
            level,
            title: title.into(),
            description: String::new(),
            fields: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_guild(mut self, guild_id: Snowflake) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(LogField {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}
