//! In-memory guild state snapshot
//!
//! Entries expire after a TTL and read as a miss once stale. The member
//! map is bounded; storing into a full map first drops expired members,
//! then the oldest one.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use tally_core::{GuildInfo, GuildMember, GuildRole, GuildStateRepository, GuildStateSnapshot, RepoResult, Snowflake};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_MEMBERS: usize = 10_000;

#[derive(Debug, Clone)]
struct Stamped<T> {
    value: T,
    stored_at: Instant,
}

impl<T> Stamped<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Concurrent snapshot of roles, members, and guild owners
#[derive(Debug)]
pub struct SnapshotCache {
    roles: DashMap<Snowflake, Stamped<Vec<GuildRole>>>,
    members: DashMap<(Snowflake, Snowflake), Stamped<GuildMember>>,
    guilds: DashMap<Snowflake, Stamped<GuildInfo>>,
    ttl: Duration,
    max_members: usize,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_TTL, DEFAULT_MAX_MEMBERS)
    }

    pub fn with_limits(ttl: Duration, max_members: usize) -> Self {
        Self {
            roles: DashMap::new(),
            members: DashMap::new(),
            guilds: DashMap::new(),
            ttl,
            max_members: max_members.max(1),
        }
    }

    /// Number of cached members across all guilds, stale ones included
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    fn make_room(&self) {
        if self.member_count() < self.max_members {
            return;
        }
        self.members.retain(|_, member| member.is_fresh(self.ttl));
        if self.member_count() < self.max_members {
            return;
        }

        let oldest = self
            .members
            .iter()
            .min_by_key(|entry| entry.value().stored_at)
            .map(|entry| *entry.key());
        if let Some(key) = oldest {
            self.members.remove(&key);
            debug!(guild_id = %key.0, user_id = %key.1, "Member snapshot full, dropped oldest");
        }
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh value of a stamped entry; a stale entry is removed
fn fresh<K, T>(map: &DashMap<K, Stamped<T>>, key: &K, ttl: Duration) -> Option<T>
where
    K: Eq + std::hash::Hash,
    T: Clone,
{
    let value = map.get(key).map(|entry| {
        let entry = entry.value();
        entry.is_fresh(ttl).then(|| entry.value.clone())
    })?;
    if value.is_none() {
        map.remove_if(key, |_, entry| !entry.is_fresh(ttl));
    }
    value
}

#[async_trait]
impl GuildStateRepository for SnapshotCache {
    async fn roles(&self, guild_id: Snowflake) -> RepoResult<Option<Vec<GuildRole>>> {
        Ok(fresh(&self.roles, &guild_id, self.ttl))
    }

    async fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<GuildMember>> {
        Ok(fresh(&self.members, &(guild_id, user_id), self.ttl))
    }

    async fn guild(&self, guild_id: Snowflake) -> RepoResult<Option<GuildInfo>> {
        Ok(fresh(&self.guilds, &guild_id, self.ttl))
    }
}

impl GuildStateSnapshot for SnapshotCache {
    fn store_roles(&self, guild_id: Snowflake, roles: Vec<GuildRole>) {
        self.roles.insert(guild_id, Stamped::new(roles));
    }

    fn store_member(&self, guild_id: Snowflake, member: GuildMember) {
        let key = (guild_id, member.user_id);
        if !self.members.contains_key(&key) {
            self.make_room();
        }
        self.members.insert(key, Stamped::new(member));
    }

    fn store_guild(&self, guild: GuildInfo) {
        self.guilds.insert(guild.id, Stamped::new(guild));
    }

    fn evict_member(&self, guild_id: Snowflake, user_id: Snowflake) {
        self.members.remove(&(guild_id, user_id));
    }
}
