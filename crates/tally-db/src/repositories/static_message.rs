//! PostgreSQL implementation of StaticMessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::{
    DomainError, RepoResult, Snowflake, StaticMessage, StaticMessageKind, StaticMessageRepository,
    UpdateCadence,
};

use super::error::{map_db_error, map_unique_violation};
use crate::mappers::convert_all;
use crate::models::StaticMessageModel;

/// PostgreSQL implementation of StaticMessageRepository
#[derive(Clone)]
pub struct PgStaticMessageRepository {
    pool: PgPool,
}

impl PgStaticMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaticMessageRepository for PgStaticMessageRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<Option<StaticMessage>> {
        let result = sqlx::query_as::<_, StaticMessageModel>(
            r"
            SELECT guild_id, channel_id, message_id, kind, config, cadence, created_at
            FROM static_messages
            WHERE guild_id = $1 AND message_id = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(StaticMessage::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<StaticMessage>> {
        let results = sqlx::query_as::<_, StaticMessageModel>(
            r"
            SELECT guild_id, channel_id, message_id, kind, config, cadence, created_at
            FROM static_messages
            WHERE guild_id = $1
            ORDER BY created_at
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(results)
    }

    #[instrument(skip(self))]
    async fn list_instant(
        &self,
        guild_id: Snowflake,
        kind: StaticMessageKind,
    ) -> RepoResult<Vec<StaticMessage>> {
        let results = sqlx::query_as::<_, StaticMessageModel>(
            r"
            SELECT guild_id, channel_id, message_id, kind, config, cadence, created_at
            FROM static_messages
            WHERE guild_id = $1 AND kind = $2 AND cadence = $3
            ORDER BY created_at
            ",
        )
        .bind(guild_id.into_inner())
        .bind(kind.as_str())
        .bind(UpdateCadence::Instant.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(results)
    }

    #[instrument(skip(self, message), fields(guild_id = %message.guild_id, message_id = %message.message_id))]
    async fn create(&self, message: &StaticMessage) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO static_messages
                (guild_id, channel_id, message_id, kind, config, cadence, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(message.guild_id.into_inner())
        .bind(message.channel_id.into_inner())
        .bind(message.message_id.into_inner())
        .bind(message.kind.as_str())
        .bind(&message.config)
        .bind(message.cadence.as_str())
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::StaticMessageExists(message.message_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM static_messages WHERE guild_id = $1 AND message_id = $2")
            .bind(guild_id.into_inner())
            .bind(message_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
