//! In-memory store
//!
//! Process-local implementation of every repository trait, selected with
//! `TALLY_STORE=memory` and used by the test suites.

mod store;

pub use store::MemoryStore;
