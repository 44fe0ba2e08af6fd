//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Only the platform credentials are mandatory; everything else
//! has a default.

use std::env;
use std::time::Duration;

use tally_core::Snowflake;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub discord: DiscordConfig,
    pub store: StoreConfig,
    pub bus: BusConfig,
    pub guild_cache: GuildCacheConfig,
    pub leaderboard: LeaderboardDefaults,
    pub dev: DevConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP ingress configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chat platform credentials and REST settings
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub token: String,
    /// Application id; equal to the bot's own user id
    pub application_id: Snowflake,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

/// Which store implementation backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Process-local store; state is lost on restart
    Memory,
}

/// Store selection
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Present when `backend` is Postgres
    pub database: Option<DatabaseConfig>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Bus sizing
#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    pub capacity: usize,
}

/// Guild state snapshot limits
///
/// Nothing pushes role or member changes into the snapshot, so entries
/// expire after `ttl_secs` and are fetched again.
#[derive(Debug, Clone, Copy)]
pub struct GuildCacheConfig {
    pub ttl_secs: u64,
    pub max_members: usize,
}

impl GuildCacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for GuildCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_guild_cache_ttl(),
            max_members: default_guild_cache_members(),
        }
    }
}

/// Rendering defaults for leaderboard messages
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardDefaults {
    pub top: u32,
}

/// Development mode: restrict the bot to a single guild
#[derive(Debug, Clone, Copy, Default)]
pub struct DevConfig {
    pub guild_id: Option<Snowflake>,
}

impl DevConfig {
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.guild_id.is_some()
    }

    /// Whether events from `guild_id` should be processed
    #[must_use]
    pub fn allows(&self, guild_id: Snowflake) -> bool {
        self.guild_id.is_none_or(|dev| dev == guild_id)
    }
}

// Default value functions
fn default_app_name() -> String {
    "tally".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_bus_capacity() -> usize {
    128
}

fn default_guild_cache_ttl() -> u64 {
    60
}

fn default_guild_cache_members() -> usize {
    10_000
}

fn default_leaderboard_top() -> u32 {
    10
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match get("TALLY_STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::InvalidValue("TALLY_STORE", other.to_string())),
        };

        let database = match backend {
            StoreBackend::Memory => None,
            StoreBackend::Postgres => Some(DatabaseConfig {
                url: get("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&get, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            }),
        };

        let application_id = get("DISCORD_APPLICATION_ID")
            .ok_or(ConfigError::MissingVar("DISCORD_APPLICATION_ID"))?;
        let application_id = Snowflake::parse(&application_id)
            .map_err(|e| ConfigError::InvalidValue("DISCORD_APPLICATION_ID", e.to_string()))?;

        let dev_guild = get("DEV_GUILD_ID")
            .map(|raw| {
                Snowflake::parse(&raw).map_err(|e| ConfigError::InvalidValue("DEV_GUILD_ID", e.to_string()))
            })
            .transpose()?;

        let capacity: usize = parse_or(&get, "BUS_CAPACITY", default_bus_capacity)?;

        Ok(Self {
            app: AppSettings {
                name: get("APP_NAME").unwrap_or_else(default_app_name),
                env: get("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: get("TALLY_HOST").unwrap_or_else(default_host),
                port: parse_or(&get, "TALLY_PORT", default_port)?,
            },
            discord: DiscordConfig {
                token: get("DISCORD_TOKEN").ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?,
                application_id,
                api_base: get("DISCORD_API_BASE")
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_api_base),
                request_timeout_secs: parse_or(&get, "DISCORD_REQUEST_TIMEOUT_SECS", default_request_timeout)?,
            },
            store: StoreConfig { backend, database },
            bus: BusConfig {
                capacity: if capacity == 0 { default_bus_capacity() } else { capacity },
            },
            guild_cache: GuildCacheConfig {
                ttl_secs: parse_or(&get, "GUILD_CACHE_TTL_SECS", default_guild_cache_ttl)?,
                max_members: parse_or(&get, "GUILD_CACHE_MAX_MEMBERS", default_guild_cache_members)?,
            },
            leaderboard: LeaderboardDefaults {
                top: parse_or(&get, "LEADERBOARD_TOP", default_leaderboard_top)?,
            },
            dev: DevConfig { guild_id: dev_guild },
        })
    }
}

fn parse_or<T, G, D>(get: &G, key: &'static str, default: D) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
    D: FnOnce() -> T,
{
    match get(key) {
        None => Ok(default()),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
