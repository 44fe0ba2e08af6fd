//! PostgreSQL implementation of ReactionTrackRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::{EmojiKey, ReactionTrack, ReactionTrackRepository, RepoResult, Snowflake};

use super::error::map_db_error;
use crate::mappers::convert_all;
use crate::models::ReactionTrackModel;

/// PostgreSQL implementation of ReactionTrackRepository
#[derive(Clone)]
pub struct PgReactionTrackRepository {
    pool: PgPool,
}

impl PgReactionTrackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionTrackRepository for PgReactionTrackRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake, emoji_key: &EmojiKey) -> RepoResult<Option<ReactionTrack>> {
        let result = sqlx::query_as::<_, ReactionTrackModel>(
            r"
            SELECT guild_id, emoji_key, emoji_id, emoji_name, animated, title, description, created_at
            FROM reaction_tracks
            WHERE guild_id = $1 AND emoji_key = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(emoji_key.storage_key())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionTrack::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<ReactionTrack>> {
        let results = sqlx::query_as::<_, ReactionTrackModel>(
            r"
            SELECT guild_id, emoji_key, emoji_id, emoji_name, animated, title, description, created_at
            FROM reaction_tracks
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

    #[instrument(skip(self, track), fields(guild_id = %track.guild_id, emoji = %track.emoji_key))]
    async fn upsert(&self, track: &ReactionTrack) -> RepoResult<bool> {
        // xmax is zero only for a freshly inserted tuple
        let created: bool = sqlx::query_scalar(
            r"
            INSERT INTO reaction_tracks
                (guild_id, emoji_key, emoji_id, emoji_name, animated, title, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (guild_id, emoji_key)
            DO UPDATE SET
                emoji_name = EXCLUDED.emoji_name,
                animated = EXCLUDED.animated,
                title = EXCLUDED.title,
                description = EXCLUDED.description
            RETURNING (xmax = 0)
            ",
        )
        .bind(track.guild_id.into_inner())
        .bind(track.emoji_key.storage_key())
        .bind(track.emoji.id.map(Snowflake::into_inner))
        .bind(&track.emoji.name)
        .bind(track.emoji.animated)
        .bind(&track.title)
        .bind(&track.description)
        .bind(track.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake, emoji_key: &EmojiKey) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM reaction_tracks WHERE guild_id = $1 AND emoji_key = $2")
            .bind(guild_id.into_inner())
            .bind(emoji_key.storage_key())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
