//! Reaction track service
//!
//! Administrator commands that choose which emojis a guild measures.

use tracing::{error, info, instrument, warn};

use tally_core::{EmojiParseError, EmojiRef, LogEventAction, LogLevel, ReactionTrack, Snowflake};

use crate::dto::{CommandReply, TrackReactionRequest};

use super::context::ServiceContext;

/// Reaction track service
pub struct ReactionTrackService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionTrackService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Track an emoji, or update the title of an already tracked one
    #[instrument(skip(self, request))]
    pub async fn add(&self, guild_id: Snowflake, user_id: Snowflake, request: TrackReactionRequest) -> CommandReply {
        let emoji = match parse_emoji(&request.emoji) {
            Ok(emoji) => emoji,
            Err(reply) => return reply,
        };
        if let Err(reply) = self.verify_custom_emoji(guild_id, &emoji).await {
            return reply;
        }

        let track = match ReactionTrack::new(guild_id, emoji, request.title.trim().to_string(), request.description) {
            Ok(track) => track,
            Err(e) => return CommandReply::warn(sentence(&e.to_string())),
        };

        let created = match self.ctx.track_repo().upsert(&track).await {
            Ok(created) => created,
            Err(e) => {
                error!(guild_id = %guild_id, error = %e, "Failed to save tracked reaction");
                return CommandReply::error("Failed to save tracked reaction.");
            }
        };

        let display = track.emoji.to_string();
        info!(guild_id = %guild_id, emoji = %track.emoji_key, created, "Reaction track saved");
        self.ctx
            .audit(
                LogEventAction::new("reaction", LogLevel::Info, "Reaction track saved")
                    .with_guild(guild_id)
                    .with_field("emoji", display.clone())
                    .with_field("by", user_id.to_string()),
            )
            .await;

        if created {
            CommandReply::success(format!("Tracking {display} for reactions."))
        } else {
            CommandReply::success(format!("Updated tracking for {display}."))
        }
    }

    /// Stop tracking an emoji. Existing records and leaderboard entries are
    /// kept.
    #[instrument(skip(self))]
    pub async fn remove(&self, guild_id: Snowflake, user_id: Snowflake, raw_emoji: &str) -> CommandReply {
        let emoji = match parse_emoji(raw_emoji) {
            Ok(emoji) => emoji,
            Err(reply) => return reply,
        };
        let Some(key) = emoji.key() else {
            return CommandReply::warn("Emoji is required.");
        };

        let display = emoji.to_string();
        match self.ctx.track_repo().delete(guild_id, &key).await {
            Ok(false) => CommandReply::info(format!("{display} was not being tracked.")),
            Ok(true) => {
                info!(guild_id = %guild_id, emoji = %key, "Reaction track removed");
                self.ctx
                    .audit(
                        LogEventAction::new("reaction", LogLevel::Info, "Reaction track removed")
                            .with_guild(guild_id)
                            .with_field("emoji", display.clone())
                            .with_field("by", user_id.to_string()),
                    )
                    .await;
                CommandReply::success(format!("Stopped tracking {display}."))
            }
            Err(e) => {
                error!(guild_id = %guild_id, error = %e, "Failed to remove tracked reaction");
                CommandReply::error("Failed to remove tracked reaction.")
            }
        }
    }

    /// List the tracked emojis of a guild
    #[instrument(skip(self))]
    pub async fn list(&self, guild_id: Snowflake) -> CommandReply {
        let tracks = match self.ctx.track_repo().list_by_guild(guild_id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                error!(guild_id = %guild_id, error = %e, "Failed to load tracked reactions");
                return CommandReply::error("Failed to load tracked reactions.");
            }
        };
        if tracks.is_empty() {
            return CommandReply::info("No reactions are being tracked.");
        }

        let lines: Vec<String> = tracks
            .iter()
            .map(|track| match track.description.as_deref() {
                Some(desc) => format!("{} - {} ({desc})", track.emoji, track.title),
                None => format!("{} - {}", track.emoji, track.title),
            })
            .collect();
        CommandReply::titled(tally_core::Tone::Info, "Tracked Reactions", lines.join("\n"))
    }

    /// A custom emoji must belong to the guild
    async fn verify_custom_emoji(&self, guild_id: Snowflake, emoji: &EmojiRef) -> Result<(), CommandReply> {
        let Some(emoji_id) = emoji.id.filter(|_| emoji.is_custom()) else {
            return Ok(());
        };
        match self.ctx.platform().get_emoji(guild_id, emoji_id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Err(CommandReply::decline("Custom emojis must belong to this server.")),
            Err(e) => {
                warn!(guild_id = %guild_id, emoji_id = %emoji_id, error = %e, "Emoji lookup failed");
                Err(CommandReply::warn(
                    "Couldn't verify that emoji. Make sure it belongs to this server or use a unicode emoji.",
                ))
            }
        }
    }
}

/// Parse emoji command input into a reference, or the reply to send back
pub(crate) fn parse_emoji(raw: &str) -> Result<EmojiRef, CommandReply> {
    EmojiRef::parse_input(raw).map_err(|e| match e {
        EmojiParseError::Empty => CommandReply::warn("Emoji is required."),
        other => CommandReply::warn(sentence(&other.to_string())),
    })
}

/// Capitalize an error message and end it with a period
pub(crate) fn sentence(message: &str) -> String {
    let mut chars = message.trim().chars();
    let mut out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => return String::new(),
    };
    if !out.ends_with('.') {
        out.push('.');
    }
    out
}
