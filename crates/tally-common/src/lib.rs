//! # tally-common
//!
//! Shared utilities including configuration, error handling, and telemetry.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, BusConfig, ConfigError, DatabaseConfig, DevConfig, DiscordConfig,
    Environment, GuildCacheConfig, LeaderboardDefaults, ServerConfig, StoreBackend, StoreConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{
    try_init_tracing, try_init_tracing_with_config, LogFormat, TracingConfig, TracingError,
};
