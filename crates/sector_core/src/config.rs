//! Grid configuration
//!
//! Cell size, bucket count and hash multipliers are fixed for the lifetime of
//! a grid. They are threaded in at construction instead of living in mutable
//! globals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size of one square cell on the X/Z plane, in world units.
pub const CELL_SIZE: f32 = 50.0;

/// Number of bucket slots in the hash table.
pub const NUM_BUCKETS: usize = 65536;

/// Largest accepted bucket count. The table is allocated up front.
pub const MAX_BUCKETS: usize = 1 << 24;

/// Multiplier applied to the cell X coordinate (11! + 1, prime).
pub const HASH_MULTIPLIER_X: i32 = 39_916_801;

/// Multiplier applied to the cell Z coordinate (12! - 1, prime).
pub const HASH_MULTIPLIER_Z: i32 = 479_001_599;

/// Which query box corners must be finite for a query to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryGuard {
    /// Only the minimum corner is checked. A non-finite maximum corner
    /// leaves no cells to sweep, so only moving objects can match.
    #[default]
    MinCorner,
    /// Both corners are checked; a non-finite maximum corner is a no-op too.
    BothCorners,
}

/// Construction parameters for [`SpatialHashGrid`](crate::grid::SpatialHashGrid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cell_size: f32,
    pub num_buckets: usize,
    pub hash_multipliers: (i32, i32),
    pub query_guard: QueryGuard,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            num_buckets: NUM_BUCKETS,
            hash_multipliers: (HASH_MULTIPLIER_X, HASH_MULTIPLIER_Z),
            query_guard: QueryGuard::MinCorner,
        }
    }
}

/// Errors reported by [`GridConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f32),

    #[error("bucket count must be in 1..={max}, got {count}")]
    InvalidBucketCount { count: usize, max: usize },

    #[error("hash multiplier {0} must be odd")]
    EvenHashMultiplier(i32),
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }

        if self.num_buckets == 0 || self.num_buckets > MAX_BUCKETS {
            return Err(ConfigError::InvalidBucketCount {
                count: self.num_buckets,
                max: MAX_BUCKETS,
            });
        }

        let (hx, hz) = self.hash_multipliers;
        for h in [hx, hz] {
            if h % 2 == 0 {
                return Err(ConfigError::EvenHashMultiplier(h));
            }
        }

        Ok(())
    }
}
