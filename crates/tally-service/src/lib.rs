//! # tally-service
//!
//! The engine: event and action bus, reaction reconciler, static message
//! synchronizer, role hierarchy resolver, action dispatcher and the
//! command services behind the slash-command surface.

pub mod bus;
pub mod commands;
pub mod dto;
pub mod lookup;
pub mod services;

#[cfg(test)]
mod testing;

pub use bus::{Bus, BusError, BusReceivers, Shutdown, ShutdownSignal};
pub use commands::{CommandKind, CommandRegistry, CommandRouter};
pub use dto::{CommandInvocation, CommandReply};
pub use lookup::{RemoteGuildState, RoleLookup, SnapshotCache};
pub use services::{
    ActionDispatcher, ReactionReconciler, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};
