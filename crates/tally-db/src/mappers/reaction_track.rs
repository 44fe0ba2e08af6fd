//! Reaction track entity <-> model mapper

use tally_core::{DomainError, EmojiRef, ReactionTrack, Snowflake};

use super::decode_emoji_key;
use crate::models::ReactionTrackModel;

impl TryFrom<ReactionTrackModel> for ReactionTrack {
    type Error = DomainError;

    fn try_from(model: ReactionTrackModel) -> Result<Self, Self::Error> {
        Ok(ReactionTrack {
            guild_id: Snowflake::new(model.guild_id),
            emoji_key: decode_emoji_key(&model.emoji_key)?,
            emoji: EmojiRef {
                id: model.emoji_id.map(Snowflake::new),
                name: model.emoji_name,
                animated: model.animated,
            },
            title: model.title,
            description: model.description,
            created_at: model.created_at,
        })
    }
}
