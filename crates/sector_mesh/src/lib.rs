//! Sector Mesh
//!
//! Procedural geometry produced once at content-build time. Nothing here
//! depends on the simulation crates.

pub mod icosphere;

pub use icosphere::{create_icosphere, SphereMesh, MAX_SUBDIVIDE_LEVEL};
