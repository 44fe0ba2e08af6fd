//! PostgreSQL implementation of LeaderboardRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::{EmojiKey, LeaderboardEntry, LeaderboardRepository, RepoResult, Snowflake};

use super::error::map_db_error;
use crate::mappers::convert_all;
use crate::models::LeaderboardModel;

/// PostgreSQL implementation of LeaderboardRepository
#[derive(Clone)]
pub struct PgLeaderboardRepository {
    pool: PgPool,
}

impl PgLeaderboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaderboardRepository for PgLeaderboardRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<Option<LeaderboardEntry>> {
        let result = sqlx::query_as::<_, LeaderboardModel>(
            r"
            SELECT guild_id, user_id, emoji_key, count
            FROM reaction_leaderboard
            WHERE guild_id = $1 AND user_id = $2 AND emoji_key = $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .bind(emoji_key.storage_key())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(LeaderboardEntry::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_emoji(
        &self,
        guild_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<Vec<LeaderboardEntry>> {
        let results = sqlx::query_as::<_, LeaderboardModel>(
            r"
            SELECT guild_id, user_id, emoji_key, count
            FROM reaction_leaderboard
            WHERE guild_id = $1 AND emoji_key = $2
            ORDER BY count DESC, user_id ASC
            ",
        )
        .bind(guild_id.into_inner())
        .bind(emoji_key.storage_key())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(results)
    }

    #[instrument(skip(self, entry), fields(user_id = %entry.user_id, count = entry.count))]
    async fn upsert(&self, entry: &LeaderboardEntry) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO reaction_leaderboard (guild_id, user_id, emoji_key, count, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (guild_id, user_id, emoji_key)
            DO UPDATE SET count = EXCLUDED.count, updated_at = NOW()
            ",
        )
        .bind(entry.guild_id.into_inner())
        .bind(entry.user_id.into_inner())
        .bind(entry.emoji_key.storage_key())
        .bind(entry.count)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        emoji_key: &EmojiKey,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM reaction_leaderboard WHERE guild_id = $1 AND user_id = $2 AND emoji_key = $3",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .bind(emoji_key.storage_key())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
