//! Database models - SQLx-compatible structs for PostgreSQL tables

mod leaderboard;
mod reaction_record;
mod reaction_track;
mod role_toggle;
mod static_message;

pub use leaderboard::LeaderboardModel;
pub use reaction_record::ReactionRecordModel;
pub use reaction_track::ReactionTrackModel;
pub use role_toggle::RoleToggleModel;
pub use static_message::StaticMessageModel;
