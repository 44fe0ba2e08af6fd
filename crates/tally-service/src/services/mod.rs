//! Engine services
//!
//! Event consumers (reconciler, dispatcher), the static message
//! synchronizer, and the command-facing services that answer slash
//! commands, bot profile changes included.

pub mod bot_profile;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod leaderboard;
pub mod reaction_track;
pub mod reconciler;
pub mod render;
pub mod resolver;
pub mod role_toggle;
pub mod static_message;
pub mod synchronizer;

pub use bot_profile::{BotProfileService, ProfileSlot};
pub use context::{ServiceContext, ServiceContextBuilder, DEFAULT_LEADERBOARD_TOP};
pub use dispatcher::{ActionDispatcher, Dispatched};
pub use error::{ServiceError, ServiceResult};
pub use leaderboard::LeaderboardService;
pub use reaction_track::ReactionTrackService;
pub use reconciler::{Outcome, ReactionReconciler};
pub use resolver::{resolve, Acting, DenialReason, Resolution, ResolveRequest};
pub use role_toggle::RoleToggleService;
pub use static_message::StaticMessageService;
pub use synchronizer::StaticMessageSynchronizer;
