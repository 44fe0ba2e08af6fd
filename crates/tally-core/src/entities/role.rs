//! Guild role as reported by the platform

use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake};

/// Guild role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRole {
    pub id: Snowflake,
    #[serde(default)]
    pub name: String,
    /// Higher position = more authority
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permissions: Permissions,
    /// Managed by an integration; never assignable by hand
    #[serde(default)]
    pub managed: bool,
}

impl GuildRole {
    pub fn new(id: Snowflake, name: impl Into<String>, position: i32, permissions: Permissions) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            permissions,
            managed: false,
        }
    }

    /// The implicit @everyone role shares its id with the guild
    #[inline]
    pub fn is_everyone(&self, guild_id: Snowflake) -> bool {
        self.id == guild_id
    }

    /// Mention syntax
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.id)
    }
}
