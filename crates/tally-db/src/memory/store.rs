//! `MemoryStore` - one lock per collection

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use tally_core::{
    DomainError, EmojiKey, LeaderboardEntry, LeaderboardRepository, ReactionRecord,
    ReactionRecordRepository, ReactionTrack, ReactionTrackRepository, RepoResult, RoleToggle,
    RoleToggleRepository, Snowflake, StaticMessage, StaticMessageKind, StaticMessageRepository,
};

type TrackKey = (Snowflake, EmojiKey);
type RecordKey = (Snowflake, Snowflake, EmojiKey);
type EntryKey = (Snowflake, Snowflake, EmojiKey);
type PairKey = (Snowflake, Snowflake);

/// In-memory store implementing all repository traits
#[derive(Default)]
pub struct MemoryStore {
    tracks: RwLock<HashMap<TrackKey, ReactionTrack>>,
    records: RwLock<HashMap<RecordKey, ReactionRecord>>,
    leaderboard: RwLock<HashMap<EntryKey, LeaderboardEntry>>,
    toggles: RwLock<HashMap<PairKey, RoleToggle>>,
    static_messages: RwLock<HashMap<PairKey, StaticMessage>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a database error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("store rejected write".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Reaction tracks
// ============================================================================

#[async_trait]
impl ReactionTrackRepository for MemoryStore {
    async fn find(&self, guild_id: Snowflake, emoji_key: &EmojiKey) -> RepoResult<Option<ReactionTrack>> {
        Ok(self.tracks.read().get(&(guild_id, emoji_key.clone())).cloned())
    }

    async fn list_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<ReactionTrack>> {
        let mut tracks: Vec<ReactionTrack> = self
            .tracks
            .read()
            .values()
            .filter(|t| t.guild_id == guild_id)
            .cloned()
            .collect();
        tracks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.emoji_key.cmp(&b.emoji_key)));
        Ok(tracks)
    }

    async fn upsert(&self, track: &ReactionTrack) -> RepoResult<bool> {
        self.check_writable()?;
        let mut tracks = self.tracks.write();
        match tracks.get_mut(&(track.guild_id, track.emoji_key.clone())) {
            Some(existing) => {
                existing.emoji = track.emoji.clone();
                existing.title = track.title.clone();
                existing.description = track.description.clone();
                Ok(false)
            }
            None => {
                tracks.insert((track.guild_id, track.emoji_key.clone()), track.clone());
                Ok(true)
            }
        }
    }

    async fn delete(&self, guild_id: Snowflake, emoji_key: &EmojiKey) -> RepoResult<bool> {
        self.check_writable()?;
        Ok(self.tracks.write().remove(&(guild_id, emoji_key.clone())).is_some())
    }
}

// ============================================================================
// Reaction records
// ============================================================================

#[async_trait]
impl ReactionRecordRepository for MemoryStore {
    async fn find(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<Option<ReactionRecord>> {
        Ok(self
            .records
            .read()
            .get(&(guild_id, message_id, emoji_key.clone()))
            .cloned())
    }

    async fn find_by_message(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<Vec<ReactionRecord>> {
        let mut records: Vec<ReactionRecord> = self
            .records
            .read()
            .values()
            .filter(|r| r.guild_id == guild_id && r.message_id == message_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.emoji_key.cmp(&b.emoji_key));
        Ok(records)
    }

    async fn create(&self, record: &ReactionRecord) -> RepoResult<()> {
        self.check_writable()?;
        let key = (record.guild_id, record.message_id, record.emoji_key.clone());
        self.records.write().insert(key, record.clone());
        Ok(())
    }

    async fn save(&self, record: &ReactionRecord) -> RepoResult<()> {
        self.check_writable()?;
        let key = (record.guild_id, record.message_id, record.emoji_key.clone());
        if let Some(existing) = self.records.write().get_mut(&key) {
            existing.count = record.count;
            existing.updated_at = record.updated_at;
        }
        Ok(())
    }

    async fn delete(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<bool> {
        self.check_writable()?;
        Ok(self
            .records
            .write()
            .remove(&(guild_id, message_id, emoji_key.clone()))
            .is_some())
    }
}

// ============================================================================
// Leaderboard
// ============================================================================

#[async_trait]
impl LeaderboardRepository for MemoryStore {
    async fn find(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<Option<LeaderboardEntry>> {
        Ok(self
            .leaderboard
            .read()
            .get(&(guild_id, user_id, emoji_key.clone()))
            .cloned())
    }

    async fn list_by_emoji(
        &self,
        guild_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<Vec<LeaderboardEntry>> {
        Ok(self
            .leaderboard
            .read()
            .values()
            .filter(|e| e.guild_id == guild_id && &e.emoji_key == emoji_key)
            .cloned()
            .collect())
    }

    async fn upsert(&self, entry: &LeaderboardEntry) -> RepoResult<()> {
        self.check_writable()?;
        let key = (entry.guild_id, entry.user_id, entry.emoji_key.clone());
        self.leaderboard.write().insert(key, entry.clone());
        Ok(())
    }

    async fn delete(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<bool> {
        self.check_writable()?;
        Ok(self
            .leaderboard
            .write()
            .remove(&(guild_id, user_id, emoji_key.clone()))
            .is_some())
    }
}

// ============================================================================
// Role toggles
// ============================================================================

#[async_trait]
impl RoleToggleRepository for MemoryStore {
    async fn find(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<Option<RoleToggle>> {
        Ok(self.toggles.read().get(&(guild_id, role_id)).cloned())
    }

    async fn list_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<RoleToggle>> {
        let mut toggles: Vec<RoleToggle> = self
            .toggles
            .read()
            .values()
            .filter(|t| t.guild_id == guild_id)
            .cloned()
            .collect();
        toggles.sort_by_key(|t| t.role_id);
        Ok(toggles)
    }

    async fn upsert(&self, toggle: &RoleToggle) -> RepoResult<bool> {
        self.check_writable()?;
        let mut toggles = self.toggles.write();
        match toggles.get_mut(&(toggle.guild_id, toggle.role_id)) {
            Some(existing) => {
                existing.required_permissions = toggle.required_permissions;
                existing.description = toggle.description.clone();
                existing.updated_at = toggle.updated_at;
                Ok(false)
            }
            None => {
                toggles.insert((toggle.guild_id, toggle.role_id), toggle.clone());
                Ok(true)
            }
        }
    }

    async fn delete(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<bool> {
        self.check_writable()?;
        Ok(self.toggles.write().remove(&(guild_id, role_id)).is_some())
    }
}

// ============================================================================
// Static messages
// ============================================================================

#[async_trait]
impl StaticMessageRepository for MemoryStore {
    async fn find(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<Option<StaticMessage>> {
        Ok(self.static_messages.read().get(&(guild_id, message_id)).cloned())
    }

    async fn list_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<StaticMessage>> {
        let mut messages: Vec<StaticMessage> = self
            .static_messages
            .read()
            .values()
            .filter(|m| m.guild_id == guild_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.message_id.cmp(&b.message_id)));
        Ok(messages)
    }

    async fn list_instant(
        &self,
        guild_id: Snowflake,
        kind: StaticMessageKind,
    ) -> RepoResult<Vec<StaticMessage>> {
        let mut messages = StaticMessageRepository::list_by_guild(self, guild_id).await?;
        messages.retain(|m| m.kind == kind && m.is_instant());
        Ok(messages)
    }

    async fn create(&self, message: &StaticMessage) -> RepoResult<()> {
        self.check_writable()?;
        let mut messages = self.static_messages.write();
        let key = (message.guild_id, message.message_id);
        if messages.contains_key(&key) {
            return Err(DomainError::StaticMessageExists(message.message_id));
        }
        messages.insert(key, message.clone());
        Ok(())
    }

    async fn delete(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<bool> {
        self.check_writable()?;
        Ok(self.static_messages.write().remove(&(guild_id, message_id)).is_some())
    }
}
