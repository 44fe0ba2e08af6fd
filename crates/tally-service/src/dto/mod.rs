//! Data transfer objects for command interactions
//!
//! - Request DTOs with validation for command options
//! - The reply every command returns

pub mod requests;
pub mod responses;

pub use requests::{
    BotAboutRequest, BotImageRequest, BotNameRequest, CommandInvocation, CreateLeaderboardRequest,
    CreateRoleListRequest, RemoveStaticMessageRequest, RoleToggleRequest, TrackReactionRequest,
};
pub use responses::CommandReply;
