//! Shared fixtures for the engine's unit tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tally_core::{
    FetchedImage, GuildInfo, GuildMember, GuildRole, MessageBody, Permissions, Platform,
    PlatformAction, PlatformError, PlatformResult, ProfileUpdate, Snowflake,
};
use tally_db::MemoryStore;

use crate::bus::{Bus, BusReceivers};
use crate::lookup::{RemoteGuildState, RoleLookup, SnapshotCache};
use crate::services::{ServiceContext, ServiceContextBuilder};

pub const GUILD: Snowflake = Snowflake::new(1000);
pub const OWNER: Snowflake = Snowflake::new(1);
pub const BOT: Snowflake = Snowflake::new(2);
pub const ADMIN: Snowflake = Snowflake::new(3);
pub const MEMBER: Snowflake = Snowflake::new(4);
pub const CHANNEL: Snowflake = Snowflake::new(500);

pub const BOT_ROLE: Snowflake = Snowflake::new(10);
pub const MOD_ROLE: Snowflake = Snowflake::new(11);
pub const GAMER_ROLE: Snowflake = Snowflake::new(12);
pub const STAFF_ROLE: Snowflake = Snowflake::new(13);

/// Platform side effects seen by [`FakePlatform`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(Snowflake, MessageBody),
    Edit(Snowflake, Snowflake, MessageBody),
    Delete(Snowflake, Snowflake),
    AddRole(Snowflake, Snowflake),
    RemoveRole(Snowflake, Snowflake),
    UpdateProfile(ProfileUpdate),
    UpdateDescription(String),
}

/// In-process platform with a fixed guild
#[derive(Debug, Default)]
pub struct FakePlatform {
    pub roles: Mutex<Vec<GuildRole>>,
    pub members: Mutex<HashMap<Snowflake, GuildMember>>,
    pub emojis: Mutex<Vec<Snowflake>>,
    pub authors: Mutex<HashMap<Snowflake, Snowflake>>,
    pub calls: Mutex<Vec<Call>>,
    pub fail_create: AtomicBool,
    pub fail_emoji_lookup: AtomicBool,
    /// Members whose lookup fails with a transport error
    pub failing_members: Mutex<HashSet<Snowflake>>,
    pub fail_roles: AtomicBool,
    pub fail_guild: AtomicBool,
    /// Downloadable images by URL; any other URL answers 404
    pub images: Mutex<HashMap<String, FetchedImage>>,
    pub fail_profile: AtomicBool,
    next_message: AtomicI64,
}

impl FakePlatform {
    pub fn new() -> Self {
        let platform = Self::default();
        platform.next_message.store(9000, Ordering::SeqCst);
        *platform.roles.lock().unwrap() = vec![
            GuildRole::new(GUILD, "@everyone", 0, Permissions::SEND_MESSAGES),
            GuildRole::new(BOT_ROLE, "tally", 6, Permissions::MANAGE_ROLES),
            GuildRole::new(MOD_ROLE, "mod", 5, Permissions::MANAGE_ROLES | Permissions::MANAGE_GUILD),
            GuildRole::new(GAMER_ROLE, "gamer", 2, Permissions::empty()),
            GuildRole::new(STAFF_ROLE, "staff", 8, Permissions::empty()),
        ];
        {
            let mut members = platform.members.lock().unwrap();
            let mut bot = GuildMember::new(BOT, vec![BOT_ROLE]);
            bot.bot = true;
            members.insert(BOT, bot);
            members.insert(OWNER, GuildMember::new(OWNER, vec![]));
            members.insert(ADMIN, GuildMember::new(ADMIN, vec![MOD_ROLE]));
            members.insert(MEMBER, GuildMember::new(MEMBER, vec![]));
        }
        platform
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn create_message(&self, channel_id: Snowflake, body: &MessageBody) -> PlatformResult<Snowflake> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(PlatformError::Forbidden("missing access".into()));
        }
        self.record(Call::Create(channel_id, body.clone()));
        Ok(Snowflake::new(self.next_message.fetch_add(1, Ordering::SeqCst)))
    }

    async fn edit_message(&self, channel_id: Snowflake, message_id: Snowflake, body: &MessageBody) -> PlatformResult<()> {
        self.record(Call::Edit(channel_id, message_id, body.clone()));
        Ok(())
    }

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<()> {
        self.record(Call::Delete(channel_id, message_id));
        Ok(())
    }

    async fn message_author(&self, _channel_id: Snowflake, message_id: Snowflake) -> PlatformResult<Snowflake> {
        self.authors
            .lock()
            .unwrap()
            .get(&message_id)
            .copied()
            .ok_or_else(|| PlatformError::NotFound(format!("message {message_id}")))
    }

    async fn get_roles(&self, _guild_id: Snowflake) -> PlatformResult<Vec<GuildRole>> {
        if self.fail_roles.load(Ordering::SeqCst) {
            return Err(PlatformError::Request("connection reset".into()));
        }
        Ok(self.roles.lock().unwrap().clone())
    }

    async fn get_member(&self, _guild_id: Snowflake, user_id: Snowflake) -> PlatformResult<GuildMember> {
        if self.failing_members.lock().unwrap().contains(&user_id) {
            return Err(PlatformError::Request("connection reset".into()));
        }
        self.members
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("member {user_id}")))
    }

    async fn get_guild(&self, guild_id: Snowflake) -> PlatformResult<GuildInfo> {
        if self.fail_guild.load(Ordering::SeqCst) {
            return Err(PlatformError::Request("connection reset".into()));
        }
        Ok(GuildInfo {
            id: guild_id,
            owner_id: OWNER,
        })
    }

    async fn get_emoji(&self, _guild_id: Snowflake, emoji_id: Snowflake) -> PlatformResult<()> {
        if self.fail_emoji_lookup.load(Ordering::SeqCst) {
            return Err(PlatformError::Request("connection reset".into()));
        }
        if self.emojis.lock().unwrap().contains(&emoji_id) {
            Ok(())
        } else {
            Err(PlatformError::NotFound(format!("emoji {emoji_id}")))
        }
    }

    async fn add_member_role(&self, _guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        self.record(Call::AddRole(user_id, role_id));
        if let Some(member) = self.members.lock().unwrap().get_mut(&user_id) {
            member.role_ids.push(role_id);
        }
        Ok(())
    }

    async fn remove_member_role(&self, _guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> PlatformResult<()> {
        self.record(Call::RemoveRole(user_id, role_id));
        if let Some(member) = self.members.lock().unwrap().get_mut(&user_id) {
            member.role_ids.retain(|r| *r != role_id);
        }
        Ok(())
    }

    async fn fetch_image(&self, url: &str) -> PlatformResult<FetchedImage> {
        self.images.lock().unwrap().get(url).cloned().ok_or(PlatformError::Status(404))
    }

    async fn update_current_user(&self, update: &ProfileUpdate) -> PlatformResult<()> {
        if self.fail_profile.load(Ordering::SeqCst) {
            return Err(PlatformError::Request("connection reset".into()));
        }
        self.record(Call::UpdateProfile(update.clone()));
        Ok(())
    }

    async fn update_application_description(&self, description: &str) -> PlatformResult<()> {
        if self.fail_profile.load(Ordering::SeqCst) {
            return Err(PlatformError::Request("connection reset".into()));
        }
        self.record(Call::UpdateDescription(description.to_string()));
        Ok(())
    }
}

/// A context over a fresh memory store and [`FakePlatform`]
pub struct Harness {
    pub ctx: ServiceContext,
    pub store: Arc<MemoryStore>,
    pub platform: Arc<FakePlatform>,
    pub receivers: BusReceivers,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let platform = Arc::new(FakePlatform::new());
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
            .leaderboard_top(10)
            .build()
            .unwrap();
        Self {
            ctx,
            store,
            platform,
            receivers,
        }
    }

    /// Drain every action queued so far
    pub fn actions(&mut self) -> Vec<PlatformAction> {
        let mut actions = Vec::new();
        while let Ok(action) = self.receivers.actions.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Drain queued actions, keeping only message edits
    pub fn edits(&mut self) -> Vec<tally_core::EditMessageAction> {
        self.actions()
            .into_iter()
            .filter_map(|action| match action {
                PlatformAction::EditMessage(edit) => Some(edit),
                _ => None,
            })
            .collect()
    }
}
