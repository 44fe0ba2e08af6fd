//! Model to entity mappers
//!
//! Rows carry emoji keys and enum names as text, so conversion can fail on
//! corrupt data; mappers implement `TryFrom<Model>` and report such rows
//! as `DomainError::DatabaseError`.

mod leaderboard;
mod reaction_record;
mod reaction_track;
mod role_toggle;
mod static_message;

use tally_core::{DomainError, EmojiKey};

/// Decode a stored emoji key column
pub(crate) fn decode_emoji_key(raw: &str) -> Result<EmojiKey, DomainError> {
    EmojiKey::from_storage(raw)
        .ok_or_else(|| DomainError::DatabaseError(format!("corrupt emoji key '{raw}'")))
}

/// Convert a batch of rows, failing on the first corrupt one
pub(crate) fn convert_all<M, E>(models: Vec<M>) -> Result<Vec<E>, DomainError>
where
    E: TryFrom<M, Error = DomainError>,
{
    models.into_iter().map(E::try_from).collect()
}
