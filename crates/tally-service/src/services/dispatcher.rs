//! Action dispatcher
//!
//! Single consumer of the action channel. Each action is performed once;
//! a failed platform call is logged with its target ids and dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use tally_core::{
    EditMessageAction, LogEventAction, LogLevel, Platform, PlatformAction, SendMessageAction,
};

use crate::bus::ShutdownSignal;

/// Result of dispatching one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Sent,
    Edited,
    Logged,
    /// Malformed action, not attempted
    Skipped,
    /// Platform call failed
    Failed,
}

/// Action dispatcher
pub struct ActionDispatcher {
    platform: Arc<dyn Platform>,
}

impl ActionDispatcher {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }

    /// Consume actions until the channel closes or shutdown fires
    pub async fn run(self, mut actions: mpsc::Receiver<PlatformAction>, mut shutdown: ShutdownSignal) {
        info!("Action dispatcher started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    info!("Action dispatcher shutting down");
                    break;
                }

                action = actions.recv() => {
                    match action {
                        Some(action) => {
                            self.handle(action).await;
                        }
                        None => {
                            info!("Action channel closed");
                            break;
                        }
                    }
                }
            }
        }
    }

    pub async fn handle(&self, action: PlatformAction) -> Dispatched {
        match action {
            PlatformAction::SendMessage(send) => self.send(send).await,
            PlatformAction::EditMessage(edit) => self.edit(edit).await,
            PlatformAction::LogEvent(log) => {
                emit(&log);
                Dispatched::Logged
            }
        }
    }

    async fn send(&self, action: SendMessageAction) -> Dispatched {
        if action.channel_id.is_zero() || action.body.is_empty() {
            warn!(channel_id = %action.channel_id, "Skipping send without channel or content");
            return Dispatched::Skipped;
        }

        match self.platform.create_message(action.channel_id, &action.body).await {
            Ok(message_id) => {
                debug!(channel_id = %action.channel_id, message_id = %message_id, "Message sent");
                Dispatched::Sent
            }
            Err(e) => {
                error!(channel_id = %action.channel_id, error = %e, "Failed to send message");
                Dispatched::Failed
            }
        }
    }

    async fn edit(&self, action: EditMessageAction) -> Dispatched {
        if action.channel_id.is_zero() || action.message_id.is_zero() {
            warn!(
                channel_id = %action.channel_id,
                message_id = %action.message_id,
                "Skipping edit without target"
            );
            return Dispatched::Skipped;
        }

        match self
            .platform
            .edit_message(action.channel_id, action.message_id, &action.body)
            .await
        {
            Ok(()) => {
                debug!(channel_id = %action.channel_id, message_id = %action.message_id, "Message edited");
                Dispatched::Edited
            }
            Err(e) => {
                error!(
                    channel_id = %action.channel_id,
                    message_id = %action.message_id,
                    error = %e,
                    "Failed to edit message"
                );
                Dispatched::Failed
            }
        }
    }
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher").finish_non_exhaustive()
    }
}

/// Write a log event as a tracing event at its declared level
fn emit(log: &LogEventAction) {
    let guild_id = log.guild_id.map(|id| id.to_string()).unwrap_or_default();
    let fields = log
        .fields
        .iter()
        .map(|field| format!("{}={}", field.name, field.value))
        .collect::<Vec<_>>()
        .join(" ");

    macro_rules! log_at {
        ($level:ident) => {
            tracing::$level!(
                target: "tally::audit",
                guild_id = %guild_id,
                category = %log.category,
                description = %log.description,
                fields = %fields,
                "{}",
                log.title
            )
        };
    }

    match log.level {
        LogLevel::Debug => log_at!(debug),
        LogLevel::Info => log_at!(info),
        LogLevel::Warn => log_at!(warn),
        LogLevel::Error => log_at!(error),
    }
}
