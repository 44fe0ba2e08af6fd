//! Role toggle entity <-> model mapper

use tally_core::{DomainError, Permissions, RoleToggle, Snowflake};

use crate::models::RoleToggleModel;

impl TryFrom<RoleToggleModel> for RoleToggle {
    type Error = DomainError;

    fn try_from(model: RoleToggleModel) -> Result<Self, Self::Error> {
        Ok(RoleToggle {
            guild_id: Snowflake::new(model.guild_id),
            role_id: Snowflake::new(model.role_id),
            required_permissions: Permissions::from_i64(model.required_permissions),
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
