//! Rank resolution subsystem.
//!
//! # Data Flow
//! ```text
//! rank value (0-255)
//!     → service.rs (range check, resolve, update)
//!     → cache.rs (group roles, fetched once per process)
//!     → GroupsApi (list roles / update membership)
//! ```
//!
//! # Design Decisions
//! - Role list is loaded once and never refreshed; upstream role changes
//!   need a restart
//! - A failed role fetch is not cached
//! - No retries: every upstream failure surfaces to the caller

pub mod cache;
pub mod error;
pub mod service;

pub use cache::RoleCache;
pub use error::{RankingError, RankingResult};
pub use service::RankingService;
