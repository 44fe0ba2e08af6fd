//! Static message service
//!
//! Posts a placeholder message, binds it as a leaderboard or role list, and
//! lets the synchronizer render the real content.

use tracing::{error, info, instrument, warn};

use tally_core::{
    Embed, LeaderboardConfig, LogEventAction, LogLevel, MessageBody, RoleListConfig, Snowflake,
    StaticMessage, StaticMessageKind, Tone, UpdateCadence,
};

use crate::dto::{CommandReply, CreateLeaderboardRequest, CreateRoleListRequest};

use super::context::ServiceContext;
use super::reaction_track::parse_emoji;
use super::render::ROLE_LIST_TITLE;
use super::synchronizer::StaticMessageSynchronizer;

/// User-facing wording per static message kind
struct KindText {
    placeholder_title: &'static str,
    placeholder: &'static str,
    noun: &'static str,
    list_title: &'static str,
    plural: &'static str,
}

fn text(kind: StaticMessageKind) -> KindText {
    match kind {
        StaticMessageKind::Leaderboard => KindText {
            placeholder_title: "Leaderboard",
            placeholder: "Setting up leaderboard...",
            noun: "leaderboard",
            list_title: "Leaderboard Messages",
            plural: "leaderboard messages",
        },
        StaticMessageKind::RoleList => KindText {
            placeholder_title: ROLE_LIST_TITLE,
            placeholder: "Setting up the role list...",
            noun: "role list",
            list_title: "Role List Messages",
            plural: "role list messages",
        },
    }
}

/// Static message service
pub struct StaticMessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StaticMessageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// `/reaction/leaderboard/create`
    #[instrument(skip(self, request))]
    pub async fn create_leaderboard(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        request: CreateLeaderboardRequest,
    ) -> CommandReply {
        let emoji = match parse_emoji(&request.emoji) {
            Ok(emoji) => emoji,
            Err(reply) => return reply,
        };
        let cadence = match request.update.trim().to_lowercase().parse::<UpdateCadence>() {
            Ok(cadence) => cadence,
            Err(_) => return CommandReply::warn("Update must be instant, hourly, or daily."),
        };

        let mut config = LeaderboardConfig::for_emoji(&emoji);
        config.top = request.top;
        config.title = request.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

        let config = match serde_json::to_string(&config) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "Failed to serialize leaderboard config");
                return CommandReply::error("Failed to serialize leaderboard config.");
            }
        };

        self.create(guild_id, user_id, request.channel_id, StaticMessageKind::Leaderboard, config, cadence)
            .await
    }

    /// `/role/message-create`
    #[instrument(skip(self, request))]
    pub async fn create_role_list(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        request: CreateRoleListRequest,
    ) -> CommandReply {
        let config = RoleListConfig {
            title: request.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            description: request.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        };
        let config = match serde_json::to_string(&config) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "Failed to serialize role list config");
                return CommandReply::error("Failed to serialize role list config.");
            }
        };

        self.create(
            guild_id,
            user_id,
            request.channel_id,
            StaticMessageKind::RoleList,
            config,
            UpdateCadence::Instant,
        )
        .await
    }

    async fn create(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        channel_id: Snowflake,
        kind: StaticMessageKind,
        config: String,
        cadence: UpdateCadence,
    ) -> CommandReply {
        let text = text(kind);
        let placeholder = MessageBody::embed(Embed::toned(Tone::Info, text.placeholder_title, text.placeholder));

        let message_id = match self.ctx.platform().create_message(channel_id, &placeholder).await {
            Ok(id) => id,
            Err(e) => {
                error!(channel_id = %channel_id, error = %e, "Failed to post placeholder message");
                return CommandReply::error(format!("Failed to create the {} message.", text.noun));
            }
        };

        let message = StaticMessage::new(guild_id, channel_id, message_id, kind, config, cadence);
        if let Err(e) = self.ctx.static_message_repo().create(&message).await {
            error!(message_id = %message_id, error = %e, "Failed to store static message");
            if let Err(e) = self.ctx.platform().delete_message(channel_id, message_id).await {
                warn!(message_id = %message_id, error = %e, "Failed to delete orphaned placeholder");
            }
            return CommandReply::error(format!("Failed to store the {} message.", text.noun));
        }

        info!(guild_id = %guild_id, message_id = %message_id, kind = %kind, cadence = %cadence, "Static message created");
        if let Err(e) = StaticMessageSynchronizer::new(self.ctx)
            .static_message_created(&message)
            .await
        {
            warn!(message_id = %message_id, error = %e, "Initial render failed");
        }
        self.ctx
            .audit(
                LogEventAction::new("static_message", LogLevel::Info, "Static message created")
                    .with_guild(guild_id)
                    .with_field("kind", kind.as_str())
                    .with_field("channel", channel_id.to_string())
                    .with_field("by", user_id.to_string()),
            )
            .await;

        CommandReply::success(format!("{} message created in <#{channel_id}>.", capitalize(text.noun)))
    }

    /// `/reaction/leaderboard/remove` and `/role/message-remove`
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        kind: StaticMessageKind,
        message_id: Snowflake,
    ) -> CommandReply {
        let text = text(kind);
        let repo = self.ctx.static_message_repo();

        let existing = match repo.find(guild_id, message_id).await {
            Ok(existing) => existing,
            Err(e) => {
                error!(message_id = %message_id, error = %e, "Failed to load static message");
                return CommandReply::error(format!("Failed to remove the {} message.", text.noun));
            }
        };
        if existing.is_none_or(|m| m.kind != kind) {
            return CommandReply::info("That message was not registered.");
        }

        match repo.delete(guild_id, message_id).await {
            Ok(true) => {
                info!(guild_id = %guild_id, message_id = %message_id, "Static message removed");
                self.ctx
                    .audit(
                        LogEventAction::new("static_message", LogLevel::Info, "Static message removed")
                            .with_guild(guild_id)
                            .with_field("kind", kind.as_str())
                            .with_field("message", message_id.to_string())
                            .with_field("by", user_id.to_string()),
                    )
                    .await;
                CommandReply::success(format!("{} message removed.", capitalize(text.noun)))
            }
            Ok(false) => CommandReply::info("That message was not registered."),
            Err(e) => {
                error!(message_id = %message_id, error = %e, "Failed to remove static message");
                CommandReply::error(format!("Failed to remove the {} message.", text.noun))
            }
        }
    }

    /// `/reaction/leaderboard/list` and `/role/message-list`
    #[instrument(skip(self))]
    pub async fn list(&self, guild_id: Snowflake, kind: StaticMessageKind) -> CommandReply {
        let text = text(kind);
        let messages = match self.ctx.static_message_repo().list_by_guild(guild_id).await {
            Ok(messages) => messages,
            Err(e) => {
                error!(guild_id = %guild_id, error = %e, "Failed to load static messages");
                return CommandReply::error(format!("Failed to load {}.", text.plural));
            }
        };

        let lines: Vec<String> = messages
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| match kind {
                StaticMessageKind::Leaderboard => {
                    let emoji = m
                        .leaderboard_config()
                        .map(|c| c.emoji().to_string())
                        .ok()
                        .filter(|e| !e.is_empty())
                        .unwrap_or_else(|| "emoji".to_string());
                    format!("{emoji} - <#{}> - {}", m.channel_id, m.cadence)
                }
                StaticMessageKind::RoleList => {
                    let title = m
                        .role_list_config()
                        .ok()
                        .and_then(|c| c.title)
                        .unwrap_or_else(|| ROLE_LIST_TITLE.to_string());
                    format!("<#{}> - {} - {title}", m.channel_id, m.message_id)
                }
            })
            .collect();

        if lines.is_empty() {
            return CommandReply::info(format!("No {} are configured.", text.plural));
        }
        CommandReply::titled(Tone::Info, text.list_title, lines.join("\n"))
    }
}

fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
