//! Command replies
//!
//! Every command answers with one ephemeral embed-like reply.

use serde::Serialize;

use tally_core::{Embed, EmbedField, MessageBody, Tone};

/// Reply of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReply {
    pub tone: Tone,
    pub title: String,
    pub description: String,
    pub ephemeral: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl CommandReply {
    /// Reply titled by the tone's default title
    pub fn toned(tone: Tone, description: impl Into<String>) -> Self {
        Self::titled(tone, tone.default_title(), description)
    }

    pub fn titled(tone: Tone, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tone,
            title: title.into(),
            description: description.into(),
            ephemeral: true,
            fields: Vec::new(),
        }
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self::toned(Tone::Success, description)
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self::toned(Tone::Info, description)
    }

    pub fn warn(description: impl Into<String>) -> Self {
        Self::toned(Tone::Warn, description)
    }

    pub fn decline(description: impl Into<String>) -> Self {
        Self::toned(Tone::Decline, description)
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::toned(Tone::Error, description)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    /// Render as a message body
    pub fn to_body(&self) -> MessageBody {
        let mut embed = Embed::toned(self.tone, &self.title, &self.description);
        embed.fields = self.fields.clone();
        MessageBody::embed(embed)
    }
}
