//! Role toggle database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for role_toggles table
#[derive(Debug, Clone, FromRow)]
pub struct RoleToggleModel {
    pub guild_id: i64,
    pub role_id: i64,
    pub required_permissions: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
