//! PostgreSQL implementation of ReactionRecordRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::{EmojiKey, ReactionRecord, ReactionRecordRepository, RepoResult, Snowflake};

use super::error::map_db_error;
use crate::mappers::convert_all;
use crate::models::ReactionRecordModel;

/// PostgreSQL implementation of ReactionRecordRepository
#[derive(Clone)]
pub struct PgReactionRecordRepository {
    pool: PgPool,
}

impl PgReactionRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRecordRepository for PgReactionRecordRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<Option<ReactionRecord>> {
        let result = sqlx::query_as::<_, ReactionRecordModel>(
            r"
            SELECT guild_id, channel_id, message_id, owner_id, emoji_key, count, created_at, updated_at
            FROM reaction_records
            WHERE guild_id = $1 AND message_id = $2 AND emoji_key = $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .bind(emoji_key.storage_key())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_message(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<Vec<ReactionRecord>> {
        let results = sqlx::query_as::<_, ReactionRecordModel>(
            r"
            SELECT guild_id, channel_id, message_id, owner_id, emoji_key, count, created_at, updated_at
            FROM reaction_records
            WHERE guild_id = $1 AND message_id = $2
            ORDER BY created_at
            ",
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(results)
    }

    #[instrument(skip(self, record), fields(message_id = %record.message_id))]
    async fn create(&self, record: &ReactionRecord) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO reaction_records
                (guild_id, channel_id, message_id, owner_id, emoji_key, count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(record.guild_id.into_inner())
        .bind(record.channel_id.into_inner())
        .bind(record.message_id.into_inner())
        .bind(record.owner_id.into_inner())
        .bind(record.emoji_key.storage_key())
        .bind(record.count)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, record), fields(message_id = %record.message_id, count = record.count))]
    async fn save(&self, record: &ReactionRecord) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE reaction_records
            SET count = $4, updated_at = $5
            WHERE guild_id = $1 AND message_id = $2 AND emoji_key = $3
            ",
        )
        .bind(record.guild_id.into_inner())
        .bind(record.message_id.into_inner())
        .bind(record.emoji_key.storage_key())
        .bind(record.count)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM reaction_records WHERE guild_id = $1 AND message_id = $2 AND emoji_key = $3",
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .bind(emoji_key.storage_key())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
