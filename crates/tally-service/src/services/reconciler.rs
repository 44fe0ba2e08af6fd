//! Reaction reconciler
//!
//! Single consumer of the event channel. Turns reaction events into
//! per-message records and per-user leaderboard deltas.
//!
//! Policy: one record per (guild, message, emoji key), owned by the message
//! author. Self-reactions never count, in either direction. Bulk removals
//! subtract each deleted record's full count from its owner's entry, not
//! one per record, so an entry always equals the sum of its owner's live
//! record counts.
//! Failures are logged and the event is dropped; nothing is retried.

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use tally_core::{
    EmojiKey, MessageScope, PlatformEvent, ReactionAddedEvent, ReactionRecord,
    ReactionRemovedEvent, ReactionRemovedForEmojiEvent, Snowflake,
};

use crate::bus::ShutdownSignal;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::leaderboard::LeaderboardService;

/// What handling one event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Event did not qualify
    Ignored,
    /// First qualifying reaction; record created
    Created,
    Incremented,
    Decremented,
    /// Last reaction removed; record deleted
    Removed,
    /// Bulk removal; number of records deleted
    Cleared(usize),
    /// Store or bus failure; event lost
    Dropped,
}

/// Reaction reconciler
pub struct ReactionReconciler {
    ctx: ServiceContext,
}

impl ReactionReconciler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Consume events until the channel closes or shutdown fires
    pub async fn run(self, mut events: mpsc::Receiver<PlatformEvent>, mut shutdown: ShutdownSignal) {
        info!("Reaction reconciler started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    info!("Reaction reconciler shutting down");
                    break;
                }

                event = events.recv() => {
                    match event {
                        Some(event) => {
                            self.handle(event).await;
                        }
                        None => {
                            info!("Event channel closed");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Apply one event, logging any failure
    pub async fn handle(&self, event: PlatformEvent) -> Outcome {
        let event_type = event.event_type();
        match self.apply(event).await {
            Ok(outcome) => {
                debug!(event_type, ?outcome, "Event reconciled");
                outcome
            }
            Err(e) => {
                error!(event_type, error = %e, "Failed to reconcile event, dropping it");
                Outcome::Dropped
            }
        }
    }

    async fn apply(&self, event: PlatformEvent) -> ServiceResult<Outcome> {
        match event {
            PlatformEvent::ReactionAdded(e) => self.reaction_added(&e).await,
            PlatformEvent::ReactionRemoved(e) => self.reaction_removed(&e).await,
            PlatformEvent::ReactionRemovedForEmoji(e) => self.reaction_removed_for_emoji(&e).await,
            PlatformEvent::ReactionRemovedAll(scope) | PlatformEvent::MessageDeleted(scope) => {
                self.message_cleared(scope).await
            }
            PlatformEvent::InteractionReceived(e) => {
                debug!(command = %e.command, "Interaction on the event bus ignored");
                Ok(Outcome::Ignored)
            }
        }
    }

    #[instrument(skip(self, e), fields(guild_id = %e.guild_id, message_id = %e.message_id))]
    async fn reaction_added(&self, e: &ReactionAddedEvent) -> ServiceResult<Outcome> {
        let Some(key) = e.emoji.key() else {
            return Ok(Outcome::Ignored);
        };
        if e.user_is_bot || !self.is_tracked(e.guild_id, &key).await? {
            return Ok(Outcome::Ignored);
        }
        if !e.author_id.is_zero() && e.author_id == e.user_id {
            return Ok(Outcome::Ignored);
        }

        let records = self.ctx.record_repo();
        let (owner, outcome) = match records.find(e.guild_id, e.message_id, &key).await? {
            Some(record) if record.owner_id == e.user_id => return Ok(Outcome::Ignored),
            Some(mut record) => {
                record.increment();
                records.save(&record).await?;
                (record.owner_id, Outcome::Incremented)
            }
            None if e.author_id.is_zero() => {
                debug!("Message author unknown, reaction not credited");
                return Ok(Outcome::Ignored);
            }
            None => {
                let record = ReactionRecord::first(e.guild_id, e.channel_id, e.message_id, e.author_id, key.clone());
                records.create(&record).await?;
                (e.author_id, Outcome::Created)
            }
        };

        LeaderboardService::new(&self.ctx)
            .apply_delta(e.guild_id, owner, &key, 1)
            .await?;
        Ok(outcome)
    }

    #[instrument(skip(self, e), fields(guild_id = %e.guild_id, message_id = %e.message_id))]
    async fn reaction_removed(&self, e: &ReactionRemovedEvent) -> ServiceResult<Outcome> {
        let Some(key) = e.emoji.key() else {
            return Ok(Outcome::Ignored);
        };

        let records = self.ctx.record_repo();
        let Some(mut record) = records.find(e.guild_id, e.message_id, &key).await? else {
            return Ok(Outcome::Ignored);
        };
        if record.owner_id == e.user_id {
            return Ok(Outcome::Ignored);
        }

        record.decrement();
        let outcome = if record.is_exhausted() {
            records.delete(e.guild_id, e.message_id, &key).await?;
            Outcome::Removed
        } else {
            records.save(&record).await?;
            Outcome::Decremented
        };

        LeaderboardService::new(&self.ctx)
            .apply_delta(e.guild_id, record.owner_id, &key, -1)
            .await?;
        Ok(outcome)
    }

    #[instrument(skip(self, e), fields(guild_id = %e.guild_id, message_id = %e.message_id))]
    async fn reaction_removed_for_emoji(&self, e: &ReactionRemovedForEmojiEvent) -> ServiceResult<Outcome> {
        let Some(key) = e.emoji.key() else {
            return Ok(Outcome::Ignored);
        };
        match self.ctx.record_repo().find(e.guild_id, e.message_id, &key).await? {
            Some(record) => {
                self.clear(record).await?;
                Ok(Outcome::Cleared(1))
            }
            None => Ok(Outcome::Cleared(0)),
        }
    }

    #[instrument(skip(self))]
    async fn message_cleared(&self, scope: MessageScope) -> ServiceResult<Outcome> {
        let records = self
            .ctx
            .record_repo()
            .find_by_message(scope.guild_id, scope.message_id)
            .await?;
        let cleared = records.len();
        for record in records {
            self.clear(record).await?;
        }
        Ok(Outcome::Cleared(cleared))
    }

    /// Delete a record and take its whole count back from the owner
    async fn clear(&self, record: ReactionRecord) -> ServiceResult<()> {
        let deleted = self
            .ctx
            .record_repo()
            .delete(record.guild_id, record.message_id, &record.emoji_key)
            .await?;
        if deleted {
            LeaderboardService::new(&self.ctx)
                .apply_delta(record.guild_id, record.owner_id, &record.emoji_key, -record.count)
                .await?;
        }
        Ok(())
    }

    async fn is_tracked(&self, guild_id: Snowflake, key: &EmojiKey) -> ServiceResult<bool> {
        Ok(self.ctx.track_repo().find(guild_id, key).await?.is_some())
    }
}
