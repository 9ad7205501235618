//! World objects as seen by the grid
//!
//! The grid never owns or mutates objects. It reads four fields through
//! [`GridObject`] and keeps plain references, so identity is the address of
//! the object and never its contents.

use crate::math::{Aabb, Vec3};

/// Opaque caller-assigned object id (logging and debugging only)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of an object that can be placed in a
/// [`SpatialHashGrid`](crate::grid::SpatialHashGrid).
pub trait GridObject {
    /// Reference point used for hashing. Only X and Z are used.
    fn position(&self) -> Vec3;

    /// Extent tested against query boxes.
    fn bounding_box(&self) -> Aabb;

    fn linear_velocity(&self) -> Vec3;

    /// Pending update flag; forces the object into the moving list.
    fn needs_update(&self) -> bool;

    /// Moving objects skip hashing and are scanned linearly by every query.
    ///
    /// Evaluated on every call; nothing caches the result.
    fn is_moving(&self) -> bool {
        self.needs_update() || self.linear_velocity().length_squared() > 0.0
    }
}

/// Plain simulation object.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldObject {
    pub id: ObjectId,
    pub position: Vec3,
    pub bounding_box: Aabb,
    pub linear_velocity: Vec3,
    pub needs_update: bool,
}

impl WorldObject {
    /// Object at rest with a box centered on its position.
    pub fn new_static(id: ObjectId, position: Vec3, half_extents: Vec3) -> Self {
        Self {
            id,
            position,
            bounding_box: Aabb::from_center_half_extents(position, half_extents),
            linear_velocity: Vec3::ZERO,
            needs_update: false,
        }
    }

    /// Object with an explicit box that need not be centered on `position`.
    pub fn with_bounds(id: ObjectId, position: Vec3, bounding_box: Aabb) -> Self {
        Self {
            id,
            position,
            bounding_box,
            linear_velocity: Vec3::ZERO,
            needs_update: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_needs_update(mut self, needs_update: bool) -> Self {
        self.needs_update = needs_update;
        self
    }

    /// Advance position and box by one step of the current velocity.
    pub fn integrate(&mut self, dt: f32) {
        let offset = self.linear_velocity * dt;
        self.position += offset;
        self.bounding_box = self.bounding_box.translated(offset);
    }
}

impl GridObject for WorldObject {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    fn needs_update(&self) -> bool {
        self.needs_update
    }
}
