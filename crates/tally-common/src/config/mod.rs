//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BusConfig, ConfigError, DatabaseConfig, DevConfig, DiscordConfig,
    Environment, GuildCacheConfig, LeaderboardDefaults, ServerConfig, StoreBackend, StoreConfig,
};
