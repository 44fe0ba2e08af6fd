//! Tracing and logging setup
//!
//! `RUST_LOG` wins when set; otherwise the filter comes from the
//! environment profile. `LOG_FORMAT=json` switches to JSON lines.

use std::env;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Environment;

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" | "text" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter directives used when `RUST_LOG` is unset
    pub directives: String,
    pub format: LogFormat,
    /// Log span close events with their timings
    pub span_timings: bool,
    /// Include file and line numbers
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl TracingConfig {
    /// Profile for a deployment environment
    ///
    /// Development logs the engine crates at debug; every profile keeps
    /// the HTTP and SQL stacks at warn.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                directives: "info,tally_service=debug,tally_gateway=debug,sqlx=warn,hyper=warn".into(),
                format: LogFormat::Pretty,
                span_timings: true,
                file_line: true,
            },
            Environment::Staging | Environment::Production => Self {
                directives: "info,sqlx=warn,hyper=warn,reqwest=warn".into(),
                format: LogFormat::Json,
                span_timings: false,
                file_line: false,
            },
        }
    }

    /// Profile from `APP_ENV`, with `LOG_FORMAT` overriding the format
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .and_then(|raw| Environment::parse(&raw))
            .unwrap_or_default();
        let mut config = Self::for_environment(environment);
        if let Some(format) = lookup("LOG_FORMAT").and_then(|raw| LogFormat::parse(&raw)) {
            config.format = format;
        }
        config
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Try to initialize tracing from the process environment
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::from_env())
}

/// Try to initialize tracing with custom configuration
///
/// Returns `AlreadyInitialized` instead of panicking when a global
/// subscriber is already installed.
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.directives)
            .map_err(|e| TracingError::InvalidDirectives(e.to_string()))?,
    };
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_file(config.file_line)
                    .with_line_number(config.file_line)
                    .with_span_events(config.span_events()),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(config.file_line)
                    .with_line_number(config.file_line)
                    .with_span_events(config.span_events()),
            )
            .try_init(),
    };
    result.map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,

    #[error("Invalid log filter: {0}")]
    InvalidDirectives(String),
}
