//! # tally-db
//!
//! Store layer implementing the repository traits of `tally-core`.
//!
//! ## Overview
//!
//! Two backends share the same contracts:
//!
//! - PostgreSQL via SQLx: connection pool, schema bootstrap, row models,
//!   model to entity mappers and one repository per collection
//! - [`MemoryStore`]: a process-local store for development and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{create_pool, run_migrations, DatabaseConfig, PgReactionTrackRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let tracks = PgReactionTrackRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgLeaderboardRepository, PgReactionRecordRepository, PgReactionTrackRepository,
    PgRoleToggleRepository, PgStaticMessageRepository,
};
