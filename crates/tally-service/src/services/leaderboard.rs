//! Leaderboard aggregate maintenance

use tracing::{debug, instrument, warn};

use tally_core::{EmojiKey, LeaderboardEntry, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::synchronizer::StaticMessageSynchronizer;

/// Leaderboard service
pub struct LeaderboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add `delta` to the (guild, user, emoji) entry.
    ///
    /// An entry is only created by a positive delta and is deleted once its
    /// count drops to zero. Bound instant leaderboards are re-rendered after
    /// the write; a failed re-render is logged and does not fail the call.
    #[instrument(skip(self))]
    pub async fn apply_delta(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        emoji_key: &EmojiKey,
        delta: i64,
    ) -> ServiceResult<()> {
        if delta == 0 {
            return Ok(());
        }

        let repo = self.ctx.leaderboard_repo();
        match repo.find(guild_id, user_id, emoji_key).await? {
            Some(mut entry) => {
                entry.count = entry.count.saturating_add(delta);
                if entry.count <= 0 {
                    repo.delete(guild_id, user_id, emoji_key).await?;
                } else {
                    repo.upsert(&entry).await?;
                }
                debug!(user_id = %user_id, count = entry.count, "Leaderboard entry updated");
            }
            None if delta > 0 => {
                repo.upsert(&LeaderboardEntry::new(guild_id, user_id, emoji_key.clone(), delta))
                    .await?;
                debug!(user_id = %user_id, count = delta, "Leaderboard entry created");
            }
            None => {
                debug!(user_id = %user_id, "No leaderboard entry to decrement");
                return Ok(());
            }
        }

        if let Err(e) = StaticMessageSynchronizer::new(self.ctx)
            .leaderboard_changed(guild_id, emoji_key)
            .await
        {
            warn!(guild_id = %guild_id, emoji = %emoji_key, error = %e, "Failed to synchronize leaderboards");
        }
        Ok(())
    }
}
