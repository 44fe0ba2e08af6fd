//! Command router
//!
//! Checks required options, builds the request DTO, validates it and
//! hands it to the owning service. Every path ends in a [`CommandReply`].

use std::sync::Arc;

use tracing::{debug, instrument, warn};
use validator::Validate;

use tally_core::{Snowflake, StaticMessageKind};

use crate::dto::requests::validation_message;
use crate::dto::{
    BotAboutRequest, BotImageRequest, BotNameRequest, CommandInvocation, CommandReply,
    CreateLeaderboardRequest, CreateRoleListRequest, RemoveStaticMessageRequest,
    RoleToggleRequest, TrackReactionRequest,
};
use crate::services::{
    BotProfileService, ProfileSlot, ReactionTrackService, RoleToggleService, ServiceContext,
    StaticMessageService,
};

use super::registry::{CommandKind, CommandRegistry};

/// Routes invocations to services
#[derive(Debug, Clone)]
pub struct CommandRouter {
    ctx: ServiceContext,
    registry: Arc<CommandRegistry>,
}

impl CommandRouter {
    pub fn new(ctx: ServiceContext, registry: Arc<CommandRegistry>) -> Self {
        Self { ctx, registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Answer one invocation
    #[instrument(skip(self, invocation), fields(command = %invocation.command, user_id = %invocation.user_id))]
    pub async fn dispatch(&self, invocation: CommandInvocation) -> CommandReply {
        let Some(guild_id) = invocation.guild_id.filter(|id| !id.is_zero()) else {
            return CommandReply::decline("This command can only be used in a server.");
        };
        let Some(kind) = self.registry.resolve(&invocation.command) else {
            warn!(command = %invocation.command, "Unknown subcommand");
            return CommandReply::warn("Unknown subcommand.");
        };
        debug!(guild_id = %guild_id, kind = ?kind, admin = kind.is_admin(), "Routing command");

        match self.route(kind, guild_id, &invocation).await {
            Ok(reply) | Err(reply) => reply,
        }
    }

    async fn route(
        &self,
        kind: CommandKind,
        guild_id: Snowflake,
        invocation: &CommandInvocation,
    ) -> Result<CommandReply, CommandReply> {
        let user_id = invocation.user_id;
        let ctx = &self.ctx;

        let reply = match kind {
            // === Reaction tracking ===
            CommandKind::ReactionAdd => {
                let request = validated(TrackReactionRequest {
                    emoji: required(invocation, "emoji", "Emoji is required.")?,
                    title: required(invocation, "title", "Title is required.")?,
                    description: invocation.owned_option("description"),
                })?;
                ReactionTrackService::new(ctx).add(guild_id, user_id, request).await
            }
            CommandKind::ReactionRemove => {
                let emoji = required(invocation, "emoji", "Emoji is required.")?;
                ReactionTrackService::new(ctx).remove(guild_id, user_id, &emoji).await
            }
            CommandKind::ReactionList => ReactionTrackService::new(ctx).list(guild_id).await,

            // === Leaderboards ===
            CommandKind::LeaderboardCreate => {
                let request = validated(CreateLeaderboardRequest {
                    channel_id: channel(invocation)?,
                    emoji: required(invocation, "emoji", "Emoji is required.")?,
                    update: required(invocation, "update", "Update cadence is required.")?,
                    top: top(invocation)?,
                    title: invocation.owned_option("title"),
                })?;
                StaticMessageService::new(ctx)
                    .create_leaderboard(guild_id, user_id, request)
                    .await
            }
            CommandKind::LeaderboardRemove => {
                let request = message_id(invocation)?;
                StaticMessageService::new(ctx)
                    .remove(guild_id, user_id, StaticMessageKind::Leaderboard, request.message_id)
                    .await
            }
            CommandKind::LeaderboardList => {
                StaticMessageService::new(ctx)
                    .list(guild_id, StaticMessageKind::Leaderboard)
                    .await
            }

            // === Role toggles ===
            CommandKind::RoleAdd => {
                let request = validated(RoleToggleRequest {
                    role_id: role(invocation)?,
                    description: invocation.owned_option("description"),
                    permissions: invocation.owned_option("permissions"),
                })?;
                RoleToggleService::new(ctx).add(guild_id, user_id, request).await
            }
            CommandKind::RoleRemove => {
                let role_id = role(invocation)?;
                RoleToggleService::new(ctx).remove(guild_id, user_id, role_id).await
            }
            CommandKind::RoleMessageCreate => {
                let request = validated(CreateRoleListRequest {
                    channel_id: channel(invocation)?,
                    title: invocation.owned_option("title"),
                    description: invocation.owned_option("description"),
                })?;
                StaticMessageService::new(ctx)
                    .create_role_list(guild_id, user_id, request)
                    .await
            }
            CommandKind::RoleMessageRemove => {
                let request = message_id(invocation)?;
                StaticMessageService::new(ctx)
                    .remove(guild_id, user_id, StaticMessageKind::RoleList, request.message_id)
                    .await
            }
            CommandKind::RoleMessageList => {
                StaticMessageService::new(ctx)
                    .list(guild_id, StaticMessageKind::RoleList)
                    .await
            }

            // === Members ===
            CommandKind::ToggleRole => {
                let role_id = match invocation.option("role") {
                    Some(_) => Some(role(invocation)?),
                    None => None,
                };
                RoleToggleService::new(ctx).toggle_self(guild_id, user_id, role_id).await
            }

            // === Bot profile ===
            CommandKind::BotName => {
                let request = validated(BotNameRequest {
                    name: required(invocation, "name", "Name is required.")?,
                })?;
                BotProfileService::new(ctx).rename(guild_id, user_id, request).await
            }
            CommandKind::BotAvatar => {
                let request = image(invocation)?;
                BotProfileService::new(ctx)
                    .set_image(guild_id, user_id, ProfileSlot::Avatar, request)
                    .await
            }
            CommandKind::BotBanner => {
                let request = image(invocation)?;
                BotProfileService::new(ctx)
                    .set_image(guild_id, user_id, ProfileSlot::Banner, request)
                    .await
            }
            CommandKind::BotAbout => {
                let request = validated(BotAboutRequest {
                    text: required(invocation, "text", "About text is required.")?,
                })?;
                BotProfileService::new(ctx).set_about(guild_id, user_id, request).await
            }
        };
        Ok(reply)
    }
}

// ============================================================================
// Option parsing
// ============================================================================

fn required(invocation: &CommandInvocation, name: &str, missing: &str) -> Result<String, CommandReply> {
    invocation
        .owned_option(name)
        .ok_or_else(|| CommandReply::warn(missing))
}

fn validated<T: Validate>(request: T) -> Result<T, CommandReply> {
    request
        .validate()
        .map_err(|errors| CommandReply::warn(validation_message(&errors)))?;
    Ok(request)
}

/// Parse an id that may be given as a mention (`<#1>`, `<@&1>`)
fn mention_id(raw: &str) -> Option<Snowflake> {
    let inner = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.trim_start_matches(['#', '@', '&']))
        .unwrap_or(raw);
    Snowflake::parse(inner).ok().filter(|id| !id.is_zero())
}

fn channel(invocation: &CommandInvocation) -> Result<Snowflake, CommandReply> {
    let raw = required(invocation, "channel", "Channel is required.")?;
    mention_id(&raw).ok_or_else(|| CommandReply::warn("Channel must be a channel ID."))
}

fn role(invocation: &CommandInvocation) -> Result<Snowflake, CommandReply> {
    let raw = required(invocation, "role", "Role is required.")?;
    mention_id(&raw).ok_or_else(|| CommandReply::warn("Role must be a role ID."))
}

fn message_id(invocation: &CommandInvocation) -> Result<RemoveStaticMessageRequest, CommandReply> {
    let raw = required(invocation, "message_id", "Message ID is required.")?;
    let message_id = Snowflake::parse(&raw)
        .ok()
        .filter(|id| !id.is_zero())
        .ok_or_else(|| CommandReply::warn("Message ID must be a number."))?;
    Ok(RemoveStaticMessageRequest { message_id })
}

fn top(invocation: &CommandInvocation) -> Result<Option<u32>, CommandReply> {
    invocation
        .option("top")
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| CommandReply::warn("Top must be between 1 and 25."))
        })
        .transpose()
}

fn image(invocation: &CommandInvocation) -> Result<BotImageRequest, CommandReply> {
    validated(BotImageRequest {
        attachment_url: invocation.owned_option("attachment"),
        attachment_content_type: invocation.owned_option("attachment_content_type"),
        url: invocation.owned_option("url"),
    })
}
