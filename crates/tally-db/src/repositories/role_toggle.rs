//! PostgreSQL implementation of RoleToggleRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::{RepoResult, RoleToggle, RoleToggleRepository, Snowflake};

use super::error::map_db_error;
use crate::mappers::convert_all;
use crate::models::RoleToggleModel;

/// PostgreSQL implementation of RoleToggleRepository
#[derive(Clone)]
pub struct PgRoleToggleRepository {
    pool: PgPool,
}

impl PgRoleToggleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleToggleRepository for PgRoleToggleRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<Option<RoleToggle>> {
        let result = sqlx::query_as::<_, RoleToggleModel>(
            r"
            SELECT guild_id, role_id, required_permissions, description, created_at, updated_at
            FROM role_toggles
            WHERE guild_id = $1 AND role_id = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(role_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(RoleToggle::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<RoleToggle>> {
        let results = sqlx::query_as::<_, RoleToggleModel>(
            r"
            SELECT guild_id, role_id, required_permissions, description, created_at, updated_at
            FROM role_toggles
            WHERE guild_id = $1
            ORDER BY role_id
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(results)
    }

    #[instrument(skip(self, toggle), fields(guild_id = %toggle.guild_id, role_id = %toggle.role_id))]
    async fn upsert(&self, toggle: &RoleToggle) -> RepoResult<bool> {
        // xmax is zero only for a freshly inserted tuple
        let created: bool = sqlx::query_scalar(
            r"
            INSERT INTO role_toggles
                (guild_id, role_id, required_permissions, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (guild_id, role_id)
            DO UPDATE SET
                required_permissions = EXCLUDED.required_permissions,
                description = EXCLUDED.description,
                updated_at = NOW()
            RETURNING (xmax = 0)
            ",
        )
        .bind(toggle.guild_id.into_inner())
        .bind(toggle.role_id.into_inner())
        .bind(toggle.required_permissions.to_i64())
        .bind(&toggle.description)
        .bind(toggle.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM role_toggles WHERE guild_id = $1 AND role_id = $2")
            .bind(guild_id.into_inner())
            .bind(role_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
