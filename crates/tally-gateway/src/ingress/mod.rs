//! Event ingress
//!
//! Normalizes inbound platform events before they reach the bus: bot
//! reactions are dropped, a missing author is resolved, and dev mode
//! narrows everything to one guild.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use tally_common::{AppError, AppResult, DevConfig};
use tally_core::{Platform, PlatformEvent, ReactionAddedEvent, Snowflake};
use tally_service::{Bus, RoleLookup};

/// What happened to an accepted event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    Published,
    /// Reaction by a bot account
    DroppedBot,
}

/// Front door of the event channel
#[derive(Clone)]
pub struct EventIngress {
    bus: Bus,
    platform: Arc<dyn Platform>,
    lookup: RoleLookup,
    application_id: Snowflake,
    dev: DevConfig,
}

impl EventIngress {
    pub fn new(
        bus: Bus,
        platform: Arc<dyn Platform>,
        lookup: RoleLookup,
        application_id: Snowflake,
        dev: DevConfig,
    ) -> Self {
        Self {
            bus,
            platform,
            lookup,
            application_id,
            dev,
        }
    }

    /// Whether this instance serves `guild_id`
    pub fn serves(&self, guild_id: Option<Snowflake>) -> bool {
        match guild_id {
            Some(guild_id) => self.dev.allows(guild_id),
            None => !self.dev.enabled(),
        }
    }

    /// Normalize and publish one event
    ///
    /// # Errors
    /// `GuildNotServed` outside the dev guild, `ShuttingDown` once the bus
    /// has closed
    #[instrument(skip(self, event), fields(event_type = event.event_type()))]
    pub async fn accept(&self, event: PlatformEvent) -> AppResult<Accepted> {
        if !self.serves(event.guild_id()) {
            return Err(AppError::GuildNotServed);
        }

        let event = match event {
            PlatformEvent::ReactionAdded(added) => {
                if added.user_is_bot || added.user_id == self.application_id {
                    debug!(user_id = %added.user_id, "Dropping bot reaction");
                    return Ok(Accepted::DroppedBot);
                }
                PlatformEvent::ReactionAdded(self.with_author(added).await)
            }
            PlatformEvent::ReactionRemoved(removed) => {
                if self.is_bot(removed.guild_id, removed.user_id).await {
                    debug!(user_id = %removed.user_id, "Dropping bot reaction removal");
                    return Ok(Accepted::DroppedBot);
                }
                PlatformEvent::ReactionRemoved(removed)
            }
            other => other,
        };

        self.bus
            .publish_event(event)
            .await
            .map_err(|_| AppError::ShuttingDown)?;
        Ok(Accepted::Published)
    }

    /// Fill in the message author when the event did not carry one
    async fn with_author(&self, mut added: ReactionAddedEvent) -> ReactionAddedEvent {
        if !added.author_id.is_zero() {
            return added;
        }
        match self.platform.message_author(added.channel_id, added.message_id).await {
            Ok(author_id) => added.author_id = author_id,
            Err(e) => warn!(
                channel_id = %added.channel_id,
                message_id = %added.message_id,
                error = %e,
                "Message author unknown"
            ),
        }
        added
    }

    async fn is_bot(&self, guild_id: Snowflake, user_id: Snowflake) -> bool {
        if user_id == self.application_id {
            return true;
        }
        match self.lookup.is_bot(guild_id, user_id).await {
            Ok(bot) => bot,
            Err(e) => {
                warn!(guild_id = %guild_id, user_id = %user_id, error = %e, "Bot check failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for EventIngress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventIngress")
            .field("application_id", &self.application_id)
            .field("dev", &self.dev)
            .finish_non_exhaustive()
    }
}
