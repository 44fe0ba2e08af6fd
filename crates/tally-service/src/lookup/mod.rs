//! Guild state lookup used by role resolution
//!
//! [`SnapshotCache`] keeps what has been seen until it expires,
//! [`RemoteGuildState`] asks the platform, and [`RoleLookup`] composes the
//! two with a read-through policy.

mod read_through;
mod remote;
mod snapshot;

pub use read_through::{ActorContext, RoleLookup};
pub use remote::RemoteGuildState;
pub use snapshot::SnapshotCache;
