//! Message content and embeds exchanged with the platform

use serde::{Deserialize, Serialize};

/// Visual tone of an embed; selects its accent color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Info,
    Success,
    Decline,
    Question,
    Error,
    Warn,
    Debug,
    Neutral,
}

impl Tone {
    pub fn color(self) -> u32 {
        match self {
            Self::Info => 0x3B_82F6,
            Self::Success => 0x22_C55E,
            Self::Decline => 0xDC_2626,
            Self::Question => 0x06_B6D4,
            Self::Error => 0xEF_4444,
            Self::Warn => 0xF5_9E0B,
            Self::Debug => 0x6B_7280,
            Self::Neutral => 0x9C_A3AF,
        }
    }

    /// Title used when an embed has none of its own
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Decline => "Declined",
            Self::Question => "Question",
            Self::Error => "Error",
            Self::Warn => "Warning",
            Self::Debug => "Debug",
            Self::Neutral => "Notice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Embed {
    /// Themed embed; a blank title falls back to the tone's default
    pub fn toned(tone: Tone, title: &str, description: &str) -> Self {
        let title = title.trim();
        Self {
            title: if title.is_empty() {
                tone.default_title().to_string()
            } else {
                title.to_string()
            },
            description: description.trim().to_string(),
            color: Some(tone.color()),
            fields: Vec::new(),
            footer: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

/// Text content and embeds of one message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl MessageBody {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }

    /// Nothing to send
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(|c| c.trim().is_empty()) && self.embeds.is_empty()
    }
}
