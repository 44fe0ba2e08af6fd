//! Server setup and task wiring
//!
//! Builds the engine from configuration, spawns the bus consumers and
//! serves the HTTP ingress until ctrl-c.

mod error;
mod handlers;
mod state;

pub use error::{ApiError, ApiResult};
pub use handlers::{health_check, post_event, post_interaction, EventAck, HealthResponse};
pub use state::AppState;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use tally_common::{AppConfig, AppError, StoreBackend, StoreConfig};
use tally_core::Platform;
use tally_db::{
    create_pool, run_migrations, MemoryStore, PgLeaderboardRepository, PgReactionRecordRepository,
    PgReactionTrackRepository, PgRoleToggleRepository, PgStaticMessageRepository,
};
use tally_service::{
    ActionDispatcher, Bus, CommandRegistry, CommandRouter, ReactionReconciler, RemoteGuildState,
    RoleLookup, ServiceContextBuilder, Shutdown, SnapshotCache,
};

use crate::ingress::EventIngress;
use crate::rest::{RestConfig, RestPlatform};

/// Create the ingress router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", post(post_event))
        .route("/interactions", post(post_interaction))
}

/// Build the complete application
pub fn create_app(state: AppState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured store to the builder
async fn bind_store(builder: ServiceContextBuilder, store: &StoreConfig) -> Result<ServiceContextBuilder, AppError> {
    match store.backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory store; state is lost on restart");
            Ok(builder.store(Arc::new(MemoryStore::new())))
        }
        StoreBackend::Postgres => {
            let database = store
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres store".into()))?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&tally_db::DatabaseConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            Ok(builder
                .track_repo(Arc::new(PgReactionTrackRepository::new(pool.clone())))
                .record_repo(Arc::new(PgReactionRecordRepository::new(pool.clone())))
                .leaderboard_repo(Arc::new(PgLeaderboardRepository::new(pool.clone())))
                .toggle_repo(Arc::new(PgRoleToggleRepository::new(pool.clone())))
                .static_message_repo(Arc::new(PgStaticMessageRepository::new(pool))))
        }
    }
}

/// Resolve once ctrl-c is received
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Run the gateway with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let rest = RestPlatform::new(RestConfig::from(&config.discord))
        .map_err(|e| AppError::Config(format!("Failed to build platform client: {e}")))?;
    let platform: Arc<dyn Platform> = Arc::new(rest);

    let snapshot = SnapshotCache::with_limits(config.guild_cache.ttl(), config.guild_cache.max_members);
    let lookup = RoleLookup::new(Arc::new(snapshot), Arc::new(RemoteGuildState::new(platform.clone())));
    let (bus, receivers) = Bus::new(config.bus.capacity);

    let builder = ServiceContextBuilder::new()
        .platform(platform.clone())
        .role_lookup(lookup.clone())
        .bus(bus.clone())
        .application_id(config.discord.application_id)
        .leaderboard_top(config.leaderboard.top);
    let ctx = bind_store(builder, &config.store)
        .await?
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Bus consumers
    let (shutdown, signal) = Shutdown::new();
    let reconciler = tokio::spawn(ReactionReconciler::new(ctx.clone()).run(receivers.events, signal.clone()));
    let dispatcher = tokio::spawn(ActionDispatcher::new(platform.clone()).run(receivers.actions, signal));

    // HTTP ingress
    let ingress = EventIngress::new(bus, platform, lookup, config.discord.application_id, config.dev);
    let commands = CommandRouter::new(ctx, Arc::new(CommandRegistry::standard()));
    let app = create_app(AppState::new(ingress, commands));

    let addr = config.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;
    info!("Gateway listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(ctrl_c())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")));

    shutdown.trigger();
    let (reconciler, dispatcher) = tokio::join!(reconciler, dispatcher);
    for (name, joined) in [("reconciler", reconciler), ("dispatcher", dispatcher)] {
        if let Err(e) = joined {
            error!(task = name, error = %e, "Consumer task failed");
        }
    }
    info!("Gateway stopped");

    served
}
