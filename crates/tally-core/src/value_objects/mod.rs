//! Value objects - immutable types that represent domain concepts

mod emoji;
mod image;
mod permissions;
mod snowflake;

pub use emoji::{EmojiKey, EmojiParseError, EmojiRef};
pub use image::{ImageKind, ProfileImage};
pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeParseError};
