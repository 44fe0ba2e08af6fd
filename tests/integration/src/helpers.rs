//! Test helpers for integration tests
//!
//! Provides a recording platform, an engine harness that drives the bus
//! by hand, and a running variant with the real consumer tasks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::task::JoinHandle;

use tally_common::DevConfig;
use tally_core::{
    EditMessageAction, EmojiRef, FetchedImage, GuildInfo, GuildMember, GuildRole, LeaderboardEntry,
    LeaderboardRepository, MessageBody, Platform, PlatformAction, PlatformError, PlatformEvent,
    PlatformResult, ProfileUpdate, ReactionRecord, ReactionRecordRepository, Snowflake,
};
use tally_db::MemoryStore;
use tally_gateway::{create_app, AppState, EventIngress};
use tally_service::services::Outcome;
use tally_service::{
    ActionDispatcher, Bus, BusReceivers, CommandInvocation, CommandRegistry, CommandReply,
    CommandRouter, ReactionReconciler, RemoteGuildState, RoleLookup, ServiceContext,
    ServiceContextBuilder, Shutdown, SnapshotCache,
};

use crate::fixtures::{guild_members, guild_roles, AUTHOR, BOT, GUILD, MESSAGE, OTHER_MESSAGE, OWNER};

// ============================================================================
// Recording platform
// ============================================================================

/// A side effect performed against the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    CreateMessage(Snowflake, MessageBody),
    EditMessage(Snowflake, Snowflake, MessageBody),
    DeleteMessage(Snowflake, Snowflake),
    AddRole(Snowflake, Snowflake),
    RemoveRole(Snowflake, Snowflake),
    UpdateProfile(ProfileUpdate),
    UpdateDescription(String),
}

impl PlatformCall {
    pub fn is_role_update(&self) -> bool {
        matches!(self, Self::AddRole(..) | Self::RemoveRole(..))
    }
}

/// Platform double holding one guild and recording every write
#[derive(Debug)]
pub struct RecordingPlatform {
    roles: Mutex<Vec<GuildRole>>,
    members: Mutex<HashMap<Snowflake, GuildMember>>,
    authors: Mutex<HashMap<Snowflake, Snowflake>>,
    calls: Mutex<Vec<PlatformCall>>,
    next_message: AtomicI64,
}

impl RecordingPlatform {
    /// The fixture guild with [`AUTHOR`] owning both fixture messages
    pub fn new() -> Self {
        let members = guild_members().into_iter().map(|m| (m.user_id, m)).collect();
        let authors = [(MESSAGE, AUTHOR), (OTHER_MESSAGE, AUTHOR)].into_iter().collect();
        Self {
            roles: Mutex::new(guild_roles()),
            members: Mutex::new(members),
            authors: Mutex::new(authors),
            calls: Mutex::new(Vec::new()),
            next_message: AtomicI64::new(5000),
        }
    }

    /// Everything written so far
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.lock_calls().clone()
    }

    /// Message edits written so far
    pub fn edits(&self) -> Vec<(Snowflake, MessageBody)> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                PlatformCall::EditMessage(_, message_id, body) => Some((*message_id, body.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn member(&self, user_id: Snowflake) -> Option<GuildMember> {
        self.lock_members().get(&user_id).cloned()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<PlatformCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_members(&self) -> std::sync::MutexGuard<'_, HashMap<Snowflake, GuildMember>> {
        self.members.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: PlatformCall) {
        self.lock_calls().push(call);
    }
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn create_message(&self, channel_id: Snowflake, body: &MessageBody) -> PlatformResult<Snowflake> {
        self.record(PlatformCall::CreateMessage(channel_id, body.clone()));
        Ok(Snowflake::new(self.next_message.fetch_add(1, Ordering::SeqCst)))
    }

    async fn edit_message(&self, channel_id: Snowflake, message_id: Snowflake, body: &MessageBody) -> PlatformResult<()> {
        self.record(PlatformCall::EditMessage(channel_id, message_id, body.clone()));
        Ok(())
    }

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<()> {
        self.record(PlatformCall::DeleteMessage(channel_id, message_id));
        Ok(())
    }

    async fn message_author(&self, _channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<Snowflake> {
        self.authors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&message_id)
            .copied()
            .ok_or_else(|| PlatformError::NotFound(format!("message {message_id}")))
    }

    async fn get_roles(&self, _guild_id: Snowflake) -> PlatformResult<Vec<GuildRole>> {
        Ok(self.roles.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn get_member(&self, _guild_id: Snowflake, user_id: Snowflake) -> PlatformResult<GuildMember> {
        self.member(user_id)
            .ok_or_else(|| PlatformError::NotFound(format!("member {user_id}")))
    }

    async fn get_guild(&self, guild_id: Snowflake) -> PlatformResult<GuildInfo> {
        Ok(GuildInfo {
            id: guild_id,
            owner_id: OWNER,
        })
    }

    async fn get_emoji(&self, _guild_id: Snowflake, emoji_id: Snowflake) -> PlatformResult<()> {
        Err(PlatformError::NotFound(format!("emoji {emoji_id}")))
    }

    async fn add_member_role(&self, _guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        self.record(PlatformCall::AddRole(user_id, role_id));
        if let Some(member) = self.lock_members().get_mut(&user_id) {
            member.role_ids.push(role_id);
        }
        Ok(())
    }

    async fn remove_member_role(&self, _guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        self.record(PlatformCall::RemoveRole(user_id, role_id));
        if let Some(member) = self.lock_members().get_mut(&user_id) {
            member.role_ids.retain(|r| *r != role_id);
        }
        Ok(())
    }

    async fn fetch_image(&self, _url: &str) -> PlatformResult<FetchedImage> {
        Err(PlatformError::Status(404))
    }

    async fn update_current_user(&self, update: &ProfileUpdate) -> PlatformResult<()> {
        self.record(PlatformCall::UpdateProfile(update.clone()));
        Ok(())
    }

    async fn update_application_description(&self, description: &str) -> PlatformResult<()> {
        self.record(PlatformCall::UpdateDescription(description.to_string()));
        Ok(())
    }
}

// ============================================================================
// Engine harness
// ============================================================================

/// The engine over a fresh memory store, with the bus drained by hand
///
/// Events published onto the bus are applied only on [`Engine::settle`],
/// and actions stay queued until read, so a test sees exactly what each
/// step produced.
pub struct Engine {
    pub ctx: ServiceContext,
    pub store: Arc<MemoryStore>,
    pub platform: Arc<RecordingPlatform>,
    pub commands: CommandRouter,
    reconciler: ReactionReconciler,
    receivers: BusReceivers,
}

impl Engine {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let platform = Arc::new(RecordingPlatform::new());
        let (bus, receivers) = Bus::new(64);
        let lookup = RoleLookup::new(
            Arc::new(SnapshotCache::new()),
            Arc::new(RemoteGuildState::new(platform.clone())),
        );
        let ctx = ServiceContextBuilder::new()
            .store(store.clone())
            .platform(platform.clone())
            .role_lookup(lookup)
            .bus(bus)
            .application_id(BOT)
            .build()
            .unwrap_or_else(|e| panic!("engine context: {e}"));
        let commands = CommandRouter::new(ctx.clone(), Arc::new(CommandRegistry::standard()));

        Self {
            reconciler: ReactionReconciler::new(ctx.clone()),
            ctx,
            store,
            platform,
            commands,
            receivers,
        }
    }

    /// Run a command in the fixture guild
    pub async fn command(&self, user_id: Snowflake, path: &str, options: &[(&str, &str)]) -> CommandReply {
        let invocation = options
            .iter()
            .fold(CommandInvocation::new(Some(GUILD), user_id, path), |inv, (name, value)| {
                inv.with_option(*name, *value)
            });
        self.commands.dispatch(invocation).await
    }

    /// Publish an event as the gateway would
    pub async fn publish(&self, event: PlatformEvent) {
        if let Err(e) = self.ctx.bus().publish_event(event).await {
            panic!("bus closed: {e}");
        }
    }

    /// Apply every queued event, in publish order
    pub async fn settle(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.receivers.events.try_recv() {
            outcomes.push(self.reconciler.handle(event).await);
        }
        outcomes
    }

    /// Publish events and apply them
    pub async fn deliver(&mut self, events: impl IntoIterator<Item = PlatformEvent>) -> Vec<Outcome> {
        for event in events {
            self.publish(event).await;
        }
        self.settle().await
    }

    /// Take every queued action
    pub fn actions(&mut self) -> Vec<PlatformAction> {
        let mut actions = Vec::new();
        while let Ok(action) = self.receivers.actions.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Take queued actions, keeping only message edits
    pub fn edits(&mut self) -> Vec<EditMessageAction> {
        self.actions()
            .into_iter()
            .filter_map(|action| match action {
                PlatformAction::EditMessage(edit) => Some(edit),
                _ => None,
            })
            .collect()
    }

    pub async fn record(&self, message_id: Snowflake, emoji: &EmojiRef) -> Option<ReactionRecord> {
        let key = emoji.key()?;
        ReactionRecordRepository::find(self.store.as_ref(), GUILD, message_id, &key)
            .await
            .unwrap_or_else(|e| panic!("record lookup: {e}"))
    }

    pub async fn entry(&self, user_id: Snowflake, emoji: &EmojiRef) -> Option<LeaderboardEntry> {
        let key = emoji.key()?;
        LeaderboardRepository::find(self.store.as_ref(), GUILD, user_id, &key)
            .await
            .unwrap_or_else(|e| panic!("entry lookup: {e}"))
    }

    /// Gateway ingress feeding this engine's bus
    pub fn ingress(&self) -> EventIngress {
        EventIngress::new(
            self.ctx.bus().clone(),
            self.platform.clone(),
            self.ctx.role_lookup().clone(),
            BOT,
            DevConfig::default(),
        )
    }

    /// HTTP application in front of this engine
    pub fn app(&self) -> axum::Router {
        create_app(AppState::new(self.ingress(), self.commands.clone()))
    }

    /// Hand the bus to the real consumer tasks
    pub fn spawn(self) -> RunningEngine {
        let (shutdown, signal) = Shutdown::new();
        let reconciler = tokio::spawn(self.reconciler.run(self.receivers.events, signal.clone()));
        let dispatcher = tokio::spawn(
            ActionDispatcher::new(self.platform.clone()).run(self.receivers.actions, signal),
        );

        RunningEngine {
            ctx: self.ctx,
            store: self.store,
            platform: self.platform,
            commands: self.commands,
            shutdown,
            tasks: vec![reconciler, dispatcher],
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// The engine with its reconciler and dispatcher tasks running
pub struct RunningEngine {
    pub ctx: ServiceContext,
    pub store: Arc<MemoryStore>,
    pub platform: Arc<RecordingPlatform>,
    pub commands: CommandRouter,
    shutdown: Shutdown,
    tasks: Vec<JoinHandle<()>>,
}

impl RunningEngine {
    pub async fn publish(&self, event: PlatformEvent) -> Result<()> {
        self.ctx.bus().publish_event(event).await?;
        Ok(())
    }

    /// Poll the platform until `done` holds
    pub async fn wait_for<F>(&self, mut done: F) -> Result<()>
    where
        F: FnMut(&RecordingPlatform) -> bool,
    {
        for _ in 0..200 {
            if done(&self.platform) {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        bail!("condition not reached; platform calls: {:?}", self.platform.calls())
    }

    /// Signal shutdown and join both consumers
    pub async fn stop(self) -> Result<()> {
        self.shutdown.trigger();
        for task in self.tasks {
            tokio::time::timeout(Duration::from_secs(2), task).await??;
        }
        Ok(())
    }
}
