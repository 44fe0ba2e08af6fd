//! Domain entities - core business objects

mod hierarchy;
mod leaderboard;
mod member;
mod reaction_record;
mod reaction_track;
mod role;
mod role_toggle;
mod static_message;

pub use hierarchy::{RoleHierarchyState, RoleTable};
pub use leaderboard::{rank_entries, LeaderboardEntry};
pub use member::{GuildInfo, GuildMember};
pub use reaction_record::ReactionRecord;
pub use reaction_track::ReactionTrack;
pub use role::GuildRole;
pub use role_toggle::RoleToggle;
pub use static_message::{
    LeaderboardConfig, RoleListConfig, StaticMessage, StaticMessageKind, UpdateCadence,
};
