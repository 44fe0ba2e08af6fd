//! Static message synchronizer
//!
//! Re-renders the live display messages bound to a changed aggregate and
//! queues one `EditMessage` per message. Only the instant cadence renders;
//! hourly and daily are stored but inert.

use tracing::{debug, instrument, warn};

use tally_core::{
    EditMessageAction, EmojiKey, LeaderboardConfig, MessageBody, PlatformAction, Snowflake,
    StaticMessage, StaticMessageKind,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::render;

/// Static message synchronizer
pub struct StaticMessageSynchronizer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StaticMessageSynchronizer<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A leaderboard aggregate for `emoji_key` changed. Returns the number
    /// of edits queued.
    #[instrument(skip(self))]
    pub async fn leaderboard_changed(&self, guild_id: Snowflake, emoji_key: &EmojiKey) -> ServiceResult<usize> {
        let messages = self
            .ctx
            .static_message_repo()
            .list_instant(guild_id, StaticMessageKind::Leaderboard)
            .await?;

        let mut queued = 0;
        for message in messages {
            let config = match message.leaderboard_config() {
                Ok(config) => config,
                Err(e) => {
                    warn!(message_id = %message.message_id, error = %e, "Skipping leaderboard with invalid config");
                    continue;
                }
            };
            if !config.matches(emoji_key) {
                continue;
            }
            let body = self.render_leaderboard(guild_id, &config).await?;
            self.queue_edit(&message, body).await?;
            queued += 1;
        }

        debug!(guild_id = %guild_id, emoji = %emoji_key, queued, "Leaderboards synchronized");
        Ok(queued)
    }

    /// The role toggle roster of a guild changed
    #[instrument(skip(self))]
    pub async fn role_list_changed(&self, guild_id: Snowflake) -> ServiceResult<usize> {
        let messages = self
            .ctx
            .static_message_repo()
            .list_instant(guild_id, StaticMessageKind::RoleList)
            .await?;
        if messages.is_empty() {
            return Ok(0);
        }

        let toggles = self.ctx.toggle_repo().list_by_guild(guild_id).await?;
        let mut queued = 0;
        for message in messages {
            let config = match message.role_list_config() {
                Ok(config) => config,
                Err(e) => {
                    warn!(message_id = %message.message_id, error = %e, "Skipping role list with invalid config");
                    continue;
                }
            };
            self.queue_edit(&message, render::role_list(&config, &toggles)).await?;
            queued += 1;
        }

        debug!(guild_id = %guild_id, queued, "Role lists synchronized");
        Ok(queued)
    }

    /// Render a freshly registered message. Returns whether an edit was
    /// queued.
    #[instrument(skip(self, message), fields(message_id = %message.message_id))]
    pub async fn static_message_created(&self, message: &StaticMessage) -> ServiceResult<bool> {
        if !message.is_instant() {
            return Ok(false);
        }

        let body = match message.kind {
            StaticMessageKind::Leaderboard => {
                let config = message.leaderboard_config()?;
                self.render_leaderboard(message.guild_id, &config).await?
            }
            StaticMessageKind::RoleList => {
                let config = message.role_list_config()?;
                let toggles = self.ctx.toggle_repo().list_by_guild(message.guild_id).await?;
                render::role_list(&config, &toggles)
            }
        };
        self.queue_edit(message, body).await?;
        Ok(true)
    }

    async fn render_leaderboard(&self, guild_id: Snowflake, config: &LeaderboardConfig) -> ServiceResult<MessageBody> {
        let (track, entries) = match config.emoji().key() {
            Some(key) => (
                self.ctx.track_repo().find(guild_id, &key).await?,
                self.ctx.leaderboard_repo().list_by_emoji(guild_id, &key).await?,
            ),
            None => (None, Vec::new()),
        };
        Ok(render::leaderboard(
            config,
            track.as_ref(),
            entries,
            self.ctx.leaderboard_top(),
        ))
    }

    async fn queue_edit(&self, message: &StaticMessage, body: MessageBody) -> ServiceResult<()> {
        self.ctx
            .bus()
            .publish_action(PlatformAction::EditMessage(EditMessageAction {
                channel_id: message.channel_id,
                message_id: message.message_id,
                body,
            }))
            .await?;
        Ok(())
    }
}
