//! # tally-gateway
//!
//! Process edge of the bot: the REST client that performs platform
//! actions, the HTTP ingress that feeds platform events and command
//! interactions into the engine, and the task wiring around them.

pub mod ingress;
pub mod rest;
pub mod server;

#[cfg(test)]
mod test_support;

pub use ingress::{Accepted, EventIngress};
pub use rest::{RestConfig, RestPlatform};
pub use server::{create_app, run, AppState};
