//! Leaderboard entity <-> model mapper

use tally_core::{DomainError, LeaderboardEntry, Snowflake};

use super::decode_emoji_key;
use crate::models::LeaderboardModel;

impl TryFrom<LeaderboardModel> for LeaderboardEntry {
    type Error = DomainError;

    fn try_from(model: LeaderboardModel) -> Result<Self, Self::Error> {
        Ok(LeaderboardEntry {
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            emoji_key: decode_emoji_key(&model.emoji_key)?,
            count: model.count,
        })
    }
}
