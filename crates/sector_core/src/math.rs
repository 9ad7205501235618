//! Deterministic math utilities
//!
//! Re-exports glam with the bounding box type used by the grid and a
//! deterministic random number generator for reproducible worlds.

pub use glam::*;

/// Relationship between two bounding boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// No overlap on at least one axis.
    Disjoint,
    /// Partial overlap, including touching faces.
    Intersects,
    /// The other box lies fully inside this one.
    Contains,
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Whether the minimum corner is a usable point (no NaN, no infinity).
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
    }

    /// Whether both corners are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Classify how `other` relates to this box.
    ///
    /// Touching faces count as an intersection, so only strictly separated
    /// boxes are reported as [`Containment::Disjoint`].
    pub fn contains(&self, other: &Aabb) -> Containment {
        if self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y
            || self.max.z < other.min.z
            || self.min.z > other.max.z
        {
            return Containment::Disjoint;
        }

        if self.min.cmple(other.min).all() && other.max.cmple(self.max).all() {
            Containment::Contains
        } else {
            Containment::Intersects
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.contains(other) != Containment::Disjoint
    }
}

/// Deterministic random number generator
///
/// Same seed, same world. Not suitable for anything security related.
pub struct DeterministicRng {
    seed: u64,
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, state: seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u32(&mut self) -> u32 {
        // 64-bit LCG (Knuth MMIX constants), high bits are the good ones
        const A: u64 = 6364136223846793005;
        const C: u64 = 1442695040888963407;

        self.state = A.wrapping_mul(self.state).wrapping_add(C);
        (self.state >> 32) as u32
    }

    /// Uniform sample in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        // 24 bits fit exactly in the f32 mantissa
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform sample in `[lo, hi)`.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}
