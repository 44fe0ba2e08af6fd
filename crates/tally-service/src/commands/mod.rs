//! Slash-command surface
//!
//! The registry maps command paths to [`CommandKind`]; the router turns an
//! invocation into a validated request and calls the owning service.

mod registry;
mod router;

pub use registry::{CommandKind, CommandRegistry};
pub use router::CommandRouter;
