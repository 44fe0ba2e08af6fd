//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in tally-core.
//! Each repository handles one collection.

mod error;
mod leaderboard;
mod reaction_record;
mod reaction_track;
mod role_toggle;
mod static_message;

pub use leaderboard::PgLeaderboardRepository;
pub use reaction_record::PgReactionRecordRepository;
pub use reaction_track::PgReactionTrackRepository;
pub use role_toggle::PgRoleToggleRepository;
pub use static_message::PgStaticMessageRepository;
