//! Integration test utilities for tally
//!
//! Wires the engine end to end over the in-memory store and a recording
//! platform, so scenarios can drive it with commands and gateway events.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
