//! Service layer error types
//!
//! One error type for every engine operation. A resolver denial is not an
//! error; it is returned as a `Resolution`.

use std::fmt;

use tally_common::AppError;
use tally_core::{DomainError, PlatformError};

use crate::bus::BusError;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Required collaborator missing; fatal to the operation
    Configuration(String),

    /// Store or platform read failed
    Lookup(String),

    /// Store write failed; the aggregate keeps its previous state
    Persistence(DomainError),

    /// Malformed caller input
    Validation(String),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Platform side effect failed
    Platform(PlatformError),

    /// Bus closed while publishing
    Bus(BusError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            Self::Lookup(msg) => write!(f, "Lookup failed: {msg}"),
            Self::Persistence(e) => write!(f, "Persistence failed: {e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Platform(e) => write!(f, "Platform error: {e}"),
            Self::Bus(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persistence(e) => Some(e),
            Self::Platform(e) => Some(e),
            Self::Bus(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Classify a failed read
    pub fn lookup(err: impl fmt::Display) -> Self {
        Self::Lookup(err.to_string())
    }

    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Bus(_) => 503,
            Self::Lookup(_) | Self::Platform(_) => 502,
            Self::Configuration(_) | Self::Persistence(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Lookup(_) => "LOOKUP_FAILED",
            Self::Persistence(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Platform(_) => "PLATFORM_ERROR",
            Self::Bus(_) => "BUS_CLOSED",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        if err.is_validation() {
            Self::Validation(err.to_string())
        } else if err.is_configuration() {
            Self::Configuration(err.to_string())
        } else {
            Self::Persistence(err)
        }
    }
}

impl From<PlatformError> for ServiceError {
    fn from(err: PlatformError) -> Self {
        Self::Platform(err)
    }
}

impl From<BusError> for ServiceError {
    fn from(err: BusError) -> Self {
        Self::Bus(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Configuration(msg) => AppError::Config(msg),
            ServiceError::Lookup(msg) => AppError::ExternalService(msg),
            ServiceError::Persistence(e) => AppError::Domain(e),
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::NotFound { resource, id } => AppError::NotFound(format!("{resource} {id}")),
            ServiceError::Platform(e) => AppError::ExternalService(e.to_string()),
            ServiceError::Bus(_) => AppError::ShuttingDown,
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
