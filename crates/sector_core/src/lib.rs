//! Sector Core
//!
//! Contains the broad-phase simulation primitives:
//! - Spatial hash grid over the X/Z ground plane
//! - World objects and the trait the grid reads them through
//! - Grid configuration and errors
//! - Deterministic time and math

pub mod config;
pub mod error;
pub mod grid;
pub mod math;
pub mod object;
pub mod time;

pub use glam;

pub use config::{ConfigError, GridConfig, QueryGuard};
pub use error::GridError;
pub use grid::{GridStats, SpatialHashGrid};
pub use math::{Aabb, Containment};
pub use object::{GridObject, ObjectId, WorldObject};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
