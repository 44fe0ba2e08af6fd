//! # tally-core
//!
//! Domain layer containing identifiers, entities, bus payloads, and the
//! store and platform traits. This crate has zero dependencies on
//! infrastructure (database, HTTP, runtime).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    rank_entries, GuildInfo, GuildMember, GuildRole, LeaderboardConfig, LeaderboardEntry,
    ReactionRecord, ReactionTrack, RoleHierarchyState, RoleListConfig, RoleTable, RoleToggle,
    StaticMessage, StaticMessageKind, UpdateCadence,
};
pub use error::DomainError;
pub use events::{
    EditMessageAction, Embed, EmbedField, InteractionReceivedEvent, LogEventAction, LogField,
    LogLevel, MessageBody, MessageScope, PlatformAction, PlatformEvent, ReactionAddedEvent,
    ReactionRemovedEvent, ReactionRemovedForEmojiEvent, SendMessageAction, Tone,
};
pub use traits::{
    FetchedImage, GuildStateRepository, GuildStateSnapshot, LeaderboardRepository, Platform,
    PlatformError, PlatformResult, ProfileUpdate, ReactionRecordRepository, ReactionTrackRepository, RepoResult,
    RoleToggleRepository, StaticMessageRepository,
};
pub use value_objects::{
    EmojiKey, EmojiParseError, EmojiRef, ImageKind, Permissions, ProfileImage, Snowflake,
    SnowflakeParseError,
};
