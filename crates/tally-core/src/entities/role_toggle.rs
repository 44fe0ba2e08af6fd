//! Role toggle - a self-assignable role and its permission threshold

use chrono::{DateTime, Utc};

use crate::value_objects::{Permissions, Snowflake};

/// Role toggle entity, one per (guild, role)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleToggle {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
    /// Permissions a member needs to toggle the role (empty = anyone)
    pub required_permissions: Permissions,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoleToggle {
    pub fn new(
        guild_id: Snowflake,
        role_id: Snowflake,
        required_permissions: Permissions,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            guild_id,
            role_id,
            required_permissions,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }
}
