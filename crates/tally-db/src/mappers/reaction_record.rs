//! Reaction record entity <-> model mapper

use tally_core::{DomainError, ReactionRecord, Snowflake};

use super::decode_emoji_key;
use crate::models::ReactionRecordModel;

impl TryFrom<ReactionRecordModel> for ReactionRecord {
    type Error = DomainError;

    fn try_from(model: ReactionRecordModel) -> Result<Self, Self::Error> {
        Ok(ReactionRecord {
            guild_id: Snowflake::new(model.guild_id),
            channel_id: Snowflake::new(model.channel_id),
            message_id: Snowflake::new(model.message_id),
            owner_id: Snowflake::new(model.owner_id),
            emoji_key: decode_emoji_key(&model.emoji_key)?,
            count: model.count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
