//! Ports implemented by the infrastructure crates

mod guild_state;
mod platform;
mod repositories;

pub use guild_state::{GuildStateRepository, GuildStateSnapshot};
pub use platform::{FetchedImage, Platform, PlatformError, PlatformResult, ProfileUpdate};
pub use repositories::{
    LeaderboardRepository, ReactionRecordRepository, ReactionTrackRepository, RepoResult,
    RoleToggleRepository, StaticMessageRepository,
};
