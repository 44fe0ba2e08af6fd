//! Guild member as reported by the platform

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild member with the ids of the roles it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMember {
    pub user_id: Snowflake,
    #[serde(default)]
    pub role_ids: Vec<Snowflake>,
    #[serde(default)]
    pub bot: bool,
}

impl GuildMember {
    pub fn new(user_id: Snowflake, role_ids: Vec<Snowflake>) -> Self {
        Self {
            user_id,
            role_ids,
            bot: false,
        }
    }

    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }
}

/// Guild ownership info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildInfo {
    pub id: Snowflake,
    pub owner_id: Snowflake,
}
