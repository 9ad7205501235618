use thiserror::Error;

/// Contract violations raised by
/// [`SpatialHashGrid::remove`](crate::grid::SpatialHashGrid::remove).
///
/// None of these leave the grid partially modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("moving object to remove not found")]
    MovingObjectNotFound,

    #[error("bucket {bucket} has no items in it")]
    EmptyBucket { bucket: usize },

    #[error("static object to remove not found in bucket {bucket}")]
    StaticObjectNotFound { bucket: usize },
}
