//! Request and response shapes of the platform's HTTP API

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use tally_core::{Embed, GuildMember, MessageBody, ProfileImage, ProfileUpdate, Snowflake};

// ============================================================================
// Outbound
// ============================================================================

#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
    /// Always sent so an edit clears previous text
    pub content: &'a str,
    pub embeds: Vec<WireEmbed<'a>>,
}

#[derive(Debug, Serialize)]
pub struct WireEmbed<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    pub title: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<WireField<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<WireFooter<'a>>,
}

#[derive(Debug, Serialize)]
pub struct WireField<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct WireFooter<'a> {
    pub text: &'a str,
}

impl<'a> From<&'a MessageBody> for WireMessage<'a> {
    fn from(body: &'a MessageBody) -> Self {
        Self {
            content: body.content.as_deref().unwrap_or_default(),
            embeds: body.embeds.iter().map(WireEmbed::from).collect(),
        }
    }
}

impl<'a> From<&'a Embed> for WireEmbed<'a> {
    fn from(embed: &'a Embed) -> Self {
        Self {
            title: &embed.title,
            description: &embed.description,
            color: embed.color,
            fields: embed
                .fields
                .iter()
                .map(|f| WireField {
                    name: &f.name,
                    value: &f.value,
                    inline: f.inline,
                })
                .collect(),
            footer: embed.footer.as_deref().map(|text| WireFooter { text }),
        }
    }
}

/// `PATCH /users/@me`; images travel as data URIs
#[derive(Debug, Serialize)]
pub struct WireUserUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl<'a> From<&'a ProfileUpdate> for WireUserUpdate<'a> {
    fn from(update: &'a ProfileUpdate) -> Self {
        Self {
            username: update.username.as_deref(),
            avatar: update.avatar.as_ref().map(data_uri),
            banner: update.banner.as_ref().map(data_uri),
        }
    }
}

/// `PATCH /applications/@me`
#[derive(Debug, Serialize)]
pub struct WireApplicationUpdate<'a> {
    pub description: &'a str,
}

fn data_uri(image: &ProfileImage) -> String {
    format!("data:{};base64,{}", image.kind.mime(), STANDARD.encode(&image.data))
}

// ============================================================================
// Inbound
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct WireCreated {
    pub id: Snowflake,
}

#[derive(Debug, Deserialize)]
pub struct WireUser {
    pub id: Snowflake,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Deserialize)]
pub struct WireMessageAuthor {
    pub author: WireUser,
}

#[derive(Debug, Deserialize)]
pub struct WireMember {
    pub user: WireUser,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

impl From<WireMember> for GuildMember {
    fn from(member: WireMember) -> Self {
        let mut out = GuildMember::new(member.user.id, member.roles);
        out.bot = member.user.bot;
        out
    }
}

/// Body of a 429 response
#[derive(Debug, Deserialize)]
pub struct WireRateLimit {
    /// Seconds
    pub retry_after: f64,
}
