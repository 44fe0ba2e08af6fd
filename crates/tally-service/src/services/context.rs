//! Service context - dependency container for the engine
//!
//! Holds the repositories, the platform client, the role lookup and the
//! bus handle that every service borrows.

use std::sync::Arc;

use tracing::warn;

use tally_core::{
    DomainError, LeaderboardRepository, LogEventAction, Platform, PlatformAction,
    ReactionRecordRepository, ReactionTrackRepository, RoleToggleRepository, Snowflake,
    StaticMessageRepository,
};

use crate::bus::Bus;
use crate::lookup::RoleLookup;

use super::error::{ServiceError, ServiceResult};

/// Default number of leaderboard lines when a message config sets none
pub const DEFAULT_LEADERBOARD_TOP: u32 = 10;

/// Service context containing all dependencies
///
/// Cloning is cheap; every collaborator sits behind an `Arc` or is a
/// channel handle.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    track_repo: Arc<dyn ReactionTrackRepository>,
    record_repo: Arc<dyn ReactionRecordRepository>,
    leaderboard_repo: Arc<dyn LeaderboardRepository>,
    toggle_repo: Arc<dyn RoleToggleRepository>,
    static_message_repo: Arc<dyn StaticMessageRepository>,

    // Platform
    platform: Arc<dyn Platform>,
    role_lookup: RoleLookup,

    // Bus
    bus: Bus,

    // Settings
    application_id: Snowflake,
    leaderboard_top: u32,
}

impl ServiceContext {
    // === Repositories ===

    pub fn track_repo(&self) -> &dyn ReactionTrackRepository {
        self.track_repo.as_ref()
    }

    pub fn record_repo(&self) -> &dyn ReactionRecordRepository {
        self.record_repo.as_ref()
    }

    pub fn leaderboard_repo(&self) -> &dyn LeaderboardRepository {
        self.leaderboard_repo.as_ref()
    }

    pub fn toggle_repo(&self) -> &dyn RoleToggleRepository {
        self.toggle_repo.as_ref()
    }

    pub fn static_message_repo(&self) -> &dyn StaticMessageRepository {
        self.static_message_repo.as_ref()
    }

    // === Platform ===

    /// Get the platform client
    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    /// Get the cache-first role and member lookup
    pub fn role_lookup(&self) -> &RoleLookup {
        &self.role_lookup
    }

    // === Bus ===

    /// Get the publishing side of the bus
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Queue an audit log line for the dispatcher
    pub async fn audit(&self, log: LogEventAction) {
        if let Err(e) = self.bus.publish_action(PlatformAction::LogEvent(log)).await {
            warn!(error = %e, "Audit log dropped");
        }
    }

    // === Settings ===

    /// The bot's own user id
    pub fn application_id(&self) -> Snowflake {
        self.application_id
    }

    /// Leaderboard size used when a message config does not set one
    pub fn leaderboard_top(&self) -> u32 {
        self.leaderboard_top
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("platform", &"dyn Platform")
            .field("bus", &self.bus)
            .field("application_id", &self.application_id)
            .field("leaderboard_top", &self.leaderboard_top)
            .finish()
    }
}

/// Builder for creating a ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    track_repo: Option<Arc<dyn ReactionTrackRepository>>,
    record_repo: Option<Arc<dyn ReactionRecordRepository>>,
    leaderboard_repo: Option<Arc<dyn LeaderboardRepository>>,
    toggle_repo: Option<Arc<dyn RoleToggleRepository>>,
    static_message_repo: Option<Arc<dyn StaticMessageRepository>>,
    platform: Option<Arc<dyn Platform>>,
    role_lookup: Option<RoleLookup>,
    bus: Option<Bus>,
    application_id: Option<Snowflake>,
    leaderboard_top: Option<u32>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind all five repositories to one store
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: ReactionTrackRepository
            + ReactionRecordRepository
            + LeaderboardRepository
            + RoleToggleRepository
            + StaticMessageRepository
            + 'static,
    {
        self.track_repo(store.clone())
            .record_repo(store.clone())
            .leaderboard_repo(store.clone())
            .toggle_repo(store.clone())
            .static_message_repo(store)
    }

    pub fn track_repo(mut self, repo: Arc<dyn ReactionTrackRepository>) -> Self {
        self.track_repo = Some(repo);
        self
    }

    pub fn record_repo(mut self, repo: Arc<dyn ReactionRecordRepository>) -> Self {
        self.record_repo = Some(repo);
        self
    }

    pub fn leaderboard_repo(mut self, repo: Arc<dyn LeaderboardRepository>) -> Self {
        self.leaderboard_repo = Some(repo);
        self
    }

    pub fn toggle_repo(mut self, repo: Arc<dyn RoleToggleRepository>) -> Self {
        self.toggle_repo = Some(repo);
        self
    }

    pub fn static_message_repo(mut self, repo: Arc<dyn StaticMessageRepository>) -> Self {
        self.static_message_repo = Some(repo);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn role_lookup(mut self, lookup: RoleLookup) -> Self {
        self.role_lookup = Some(lookup);
        self
    }

    pub fn bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn application_id(mut self, id: Snowflake) -> Self {
        self.application_id = Some(id);
        self
    }

    pub fn leaderboard_top(mut self, top: u32) -> Self {
        self.leaderboard_top = Some(top);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Configuration` if any required dependency is
    /// missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let application_id = self
            .application_id
            .filter(|id| !id.is_zero())
            .ok_or_else(|| ServiceError::configuration("application id is required"))?;

        Ok(ServiceContext {
            track_repo: self.track_repo.ok_or_else(|| missing("reaction tracks"))?,
            record_repo: self.record_repo.ok_or_else(|| missing("reaction records"))?,
            leaderboard_repo: self.leaderboard_repo.ok_or_else(|| missing("reaction leaderboard"))?,
            toggle_repo: self.toggle_repo.ok_or_else(|| missing("role toggles"))?,
            static_message_repo: self.static_message_repo.ok_or_else(|| missing("static messages"))?,
            platform: self
                .platform
                .ok_or_else(|| ServiceError::configuration("platform is required"))?,
            role_lookup: self
                .role_lookup
                .ok_or_else(|| ServiceError::configuration("role lookup is required"))?,
            bus: self.bus.ok_or_else(|| ServiceError::configuration("bus is required"))?,
            application_id,
            leaderboard_top: self
                .leaderboard_top
                .filter(|top| *top > 0)
                .unwrap_or(DEFAULT_LEADERBOARD_TOP),
        })
    }
}

fn missing(collection: &'static str) -> ServiceError {
    DomainError::StoreNotConfigured(collection).into()
}
