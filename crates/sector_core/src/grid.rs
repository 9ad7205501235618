//! Spatial hash grid for broad-phase queries on the X/Z ground plane.
//!
//! Static objects are hashed by the cell containing their position into a
//! fixed table of buckets. Objects that move (non-zero velocity or a pending
//! update) skip hashing and live in a flat list that every query scans.
//!
//! Buckets are a coarse pre-filter only: distinct cells may share a bucket,
//! and every candidate is confirmed with a bounding box test before it is
//! reported.

use crate::config::{ConfigError, GridConfig, QueryGuard};
use crate::error::GridError;
use crate::math::{Aabb, Vec3};
use crate::object::{GridObject, WorldObject};
use std::collections::HashSet;
use std::ptr;

/// Where an object lives inside the grid, derived from its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Moving,
    Static { bucket: usize },
}

/// Occupancy snapshot used to judge hash spread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridStats {
    pub static_objects: usize,
    pub moving_objects: usize,
    /// Buckets whose chain has been created at least once.
    pub allocated_buckets: usize,
    /// Buckets currently holding at least one object.
    pub occupied_buckets: usize,
    pub longest_chain: usize,
}

/// Broad-phase index over borrowed objects.
///
/// The grid holds plain references and never controls object lifetime.
/// Classification into static or moving is evaluated independently by
/// [`add`](Self::add) and [`remove`](Self::remove); if an object's motion
/// state changes in between, removal looks in the wrong place and fails.
pub struct SpatialHashGrid<'a, T: GridObject = WorldObject> {
    config: GridConfig,
    /// Chains are allocated lazily on first insert and kept across clears.
    buckets: Box<[Option<Vec<&'a T>>]>,
    moving: Vec<&'a T>,
    static_count: usize,
}

impl<'a, T: GridObject> SpatialHashGrid<'a, T> {
    /// Create a grid with the default cell size, bucket count and hash.
    pub fn new() -> Self {
        Self::build(GridConfig::default())
    }

    /// Create a grid with custom parameters.
    pub fn with_config(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: GridConfig) -> Self {
        tracing::debug!(
            cell_size = config.cell_size,
            num_buckets = config.num_buckets,
            "creating spatial hash grid"
        );
        let buckets = std::iter::repeat_with(|| None)
            .take(config.num_buckets)
            .collect();
        Self {
            config,
            buckets,
            moving: Vec::new(),
            static_count: 0,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of objects in the moving list.
    pub fn moving_count(&self) -> usize {
        self.moving.len()
    }

    /// Number of objects stored across all bucket chains.
    pub fn static_count(&self) -> usize {
        self.static_count
    }

    pub fn len(&self) -> usize {
        self.static_count + self.moving.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell index along one axis (floor division, so -0.5 lands in cell -1).
    pub fn cell_coord(&self, axis: f32) -> i32 {
        // `as` saturates out-of-range values and maps NaN to 0
        (axis / self.config.cell_size).floor() as i32
    }

    /// Bucket for a cell. Always in `[0, num_buckets)`.
    pub fn bucket_index(&self, cell_x: i32, cell_z: i32) -> usize {
        let (hx, hz) = self.config.hash_multipliers;
        let n = hx.wrapping_mul(cell_x).wrapping_add(hz.wrapping_mul(cell_z));
        // num_buckets <= MAX_BUCKETS is checked by GridConfig::validate
        n.rem_euclid(self.config.num_buckets as i32) as usize
    }

    /// Bucket for the cell containing `position` (Y is ignored).
    pub fn bucket_for_position(&self, position: Vec3) -> usize {
        self.bucket_index(self.cell_coord(position.x), self.cell_coord(position.z))
    }

    fn placement(&self, obj: &T) -> Placement {
        if obj.is_moving() {
            Placement::Moving
        } else {
            Placement::Static {
                bucket: self.bucket_for_position(obj.position()),
            }
        }
    }

    /// Insert an object. Inserting the same object twice stores it twice.
    pub fn add(&mut self, obj: &'a T) {
        match self.placement(obj) {
            Placement::Moving => {
                self.moving.push(obj);
                tracing::trace!(moving = self.moving.len(), "added moving object");
            }
            Placement::Static { bucket } => {
                self.buckets[bucket].get_or_insert_with(Vec::new).push(obj);
                self.static_count += 1;
                tracing::trace!(bucket, "added static object");
            }
        }
    }

    /// Remove one occurrence of `obj`, matched by address.
    ///
    /// Classification is recomputed from the object's current state. On
    /// error nothing has been modified.
    pub fn remove(&mut self, obj: &T) -> Result<(), GridError> {
        match self.placement(obj) {
            Placement::Moving => {
                let Some(index) = self.moving.iter().position(|o| ptr::eq(*o, obj)) else {
                    tracing::warn!("moving object to remove not found");
                    return Err(GridError::MovingObjectNotFound);
                };
                self.moving.remove(index);
            }
            Placement::Static { bucket } => {
                let chain = match self.buckets[bucket].as_mut() {
                    Some(chain) if !chain.is_empty() => chain,
                    _ => {
                        tracing::warn!(bucket, "remove from empty bucket");
                        return Err(GridError::EmptyBucket { bucket });
                    }
                };
                let Some(index) = chain.iter().position(|o| ptr::eq(*o, obj)) else {
                    tracing::warn!(bucket, "static object to remove not found");
                    return Err(GridError::StaticObjectNotFound { bucket });
                };
                // Chain order carries no meaning
                chain.swap_remove(index);
                self.static_count -= 1;
                tracing::trace!(bucket, "removed static object");
            }
        }
        Ok(())
    }

    /// Drop every object. Allocated chains are emptied, not freed.
    pub fn clear(&mut self) {
        tracing::debug!(
            static_objects = self.static_count,
            moving_objects = self.moving.len(),
            "clearing spatial hash grid"
        );
        self.moving.clear();
        for chain in self.buckets.iter_mut().flatten() {
            chain.clear();
        }
        self.static_count = 0;
    }

    /// Append every object whose bounding box overlaps `bbox` to `out`.
    ///
    /// `out` is not cleared. Two visited cells that share a bucket report the
    /// bucket's matches twice; use [`query_distinct`](Self::query_distinct)
    /// when duplicates matter. A query box whose minimum corner is not finite
    /// is ignored. With [`QueryGuard::MinCorner`], a non-finite maximum corner
    /// skips the buckets and only moving objects are tested.
    pub fn query(&self, bbox: &Aabb, out: &mut Vec<&'a T>) {
        self.sweep(bbox, |obj| out.push(obj));
    }

    /// Same as [`query`](Self::query) but appends each object at most once.
    ///
    /// Only entries appended by this call are deduplicated; whatever `out`
    /// already held is left alone.
    pub fn query_distinct(&self, bbox: &Aabb, out: &mut Vec<&'a T>) {
        let mut seen: HashSet<*const T> = HashSet::new();
        self.sweep(bbox, |obj| {
            if seen.insert(obj as *const T) {
                out.push(obj);
            }
        });
    }

    fn accepts(&self, bbox: &Aabb) -> bool {
        match self.config.query_guard {
            QueryGuard::MinCorner => bbox.is_valid(),
            QueryGuard::BothCorners => bbox.is_finite(),
        }
    }

    /// Inclusive cell range covered by `bbox`, grown by one cell on each side.
    ///
    /// An object's box can reach into neighbouring cells while its position
    /// (the hash key) sits in the next one over. Returns `None` when the
    /// maximum corner is not finite on X or Z: there is no cell range to
    /// sweep and only the moving list is scanned.
    fn cell_range(&self, bbox: &Aabb) -> Option<(i64, i64, i64, i64)> {
        if !bbox.max.x.is_finite() || !bbox.max.z.is_finite() {
            return None;
        }

        // Past num_buckets consecutive cells an axis only revisits buckets
        let span = self.config.num_buckets as i64;

        // 64-bit so the one-cell margin cannot overflow at saturated edges
        let min_x = i64::from(self.cell_coord(bbox.min.x)) - 1;
        let max_x = (i64::from(self.cell_coord(bbox.max.x)) + 1).min(min_x + span - 1);
        let min_z = i64::from(self.cell_coord(bbox.min.z)) - 1;
        let max_z = (i64::from(self.cell_coord(bbox.max.z)) + 1).min(min_z + span - 1);
        Some((min_x, max_x, min_z, max_z))
    }

    fn sweep(&self, bbox: &Aabb, mut visit: impl FnMut(&'a T)) {
        if !self.accepts(bbox) {
            return;
        }

        if let Some((min_x, max_x, min_z, max_z)) = self.cell_range(bbox) {
            for cell_z in min_z..=max_z {
                for cell_x in min_x..=max_x {
                    // Truncation wraps the margin cells the same way i32 hashing does
                    let bucket = self.bucket_index(cell_x as i32, cell_z as i32);
                    let Some(chain) = &self.buckets[bucket] else {
                        continue;
                    };
                    for &obj in chain {
                        if obj.bounding_box().intersects(bbox) {
                            visit(obj);
                        }
                    }
                }
            }
        } else {
            tracing::trace!("query max corner not finite, scanning moving objects only");
        }

        // Moving objects are not hashed, test them all
        for &obj in &self.moving {
            if obj.bounding_box().intersects(bbox) {
                visit(obj);
            }
        }
    }

    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            static_objects: self.static_count,
            moving_objects: self.moving.len(),
            ..GridStats::default()
        };
        for chain in self.buckets.iter().flatten() {
            stats.allocated_buckets += 1;
            if !chain.is_empty() {
                stats.occupied_buckets += 1;
            }
            stats.longest_chain = stats.longest_chain.max(chain.len());
        }
        stats
    }
}

impl<T: GridObject> Default for SpatialHashGrid<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GridObject> std::fmt::Debug for SpatialHashGrid<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialHashGrid")
            .field("config", &self.config)
            .field("static_count", &self.static_count)
            .field("moving_count", &self.moving.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NUM_BUCKETS;
    use crate::object::ObjectId;
    use std::cell::Cell;

    fn static_object(id: u32, x: f32, z: f32) -> WorldObject {
        WorldObject::new_static(ObjectId(id), Vec3::new(x, 0.0, z), Vec3::new(5.0, 0.0, 5.0))
    }

    fn query_box(min: (f32, f32), max: (f32, f32)) -> Aabb {
        Aabb::new(Vec3::new(min.0, 0.0, min.1), Vec3::new(max.0, 0.0, max.1))
    }

    fn contains_ref<T>(list: &[&T], obj: &T) -> bool {
        list.iter().any(|o| ptr::eq(*o, obj))
    }

    /// Object whose motion state can change while the grid borrows it.
    struct Drifter {
        position: Vec3,
        bbox: Aabb,
        velocity: Cell<Vec3>,
        needs_update: Cell<bool>,
    }

    impl Drifter {
        fn at_rest(x: f32, z: f32) -> Self {
            let position = Vec3::new(x, 0.0, z);
            Self {
                position,
                bbox: Aabb::from_center_half_extents(position, Vec3::ONE),
                velocity: Cell::new(Vec3::ZERO),
                needs_update: Cell::new(false),
            }
        }
    }

    impl GridObject for Drifter {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn bounding_box(&self) -> Aabb {
            self.bbox
        }
        fn linear_velocity(&self) -> Vec3 {
            self.velocity.get()
        }
        fn needs_update(&self) -> bool {
            self.needs_update.get()
        }
    }

    #[test]
    fn test_add_static_increments_static_count() {
        let obj = static_object(1, 5.0, 5.0);
        let mut grid = SpatialHashGrid::new();
        grid.add(&obj);
        assert_eq!(grid.static_count(), 1);
        assert_eq!(grid.moving_count(), 0);
    }

    #[test]
    fn test_add_moving_increments_moving_count() {
        let fast = static_object(1, 5.0, 5.0).with_velocity(Vec3::new(100.0, 0.0, 0.0));
        let flagged = static_object(2, 5.0, 5.0).with_needs_update(true);
        let mut grid = SpatialHashGrid::new();
        grid.add(&fast);
        grid.add(&flagged);
        assert_eq!(grid.moving_count(), 2);
        assert_eq!(grid.static_count(), 0);
    }

    #[test]
    fn test_add_then_remove_restores_counts() {
        let still = static_object(1, -120.0, 75.0);
        let moving = static_object(2, 0.0, 0.0).with_velocity(Vec3::X);
        let mut grid = SpatialHashGrid::new();

        grid.add(&still);
        grid.add(&moving);
        assert_eq!(grid.len(), 2);

        assert_eq!(grid.remove(&still), Ok(()));
        assert_eq!(grid.remove(&moving), Ok(()));
        assert_eq!(grid.static_count(), 0);
        assert_eq!(grid.moving_count(), 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_remove_never_added_static_fails() {
        let obj = static_object(1, 5.0, 5.0);
        let mut grid: SpatialHashGrid<'_, WorldObject> = SpatialHashGrid::new();
        let bucket = grid.bucket_for_position(obj.position);
        assert_eq!(grid.remove(&obj), Err(GridError::EmptyBucket { bucket }));
    }

    #[test]
    fn test_remove_never_added_static_from_occupied_bucket_fails() {
        let present = static_object(1, 5.0, 5.0);
        // Same cell, different object with identical contents
        let twin = static_object(1, 5.0, 5.0);
        let mut grid = SpatialHashGrid::new();
        grid.add(&present);

        let bucket = grid.bucket_for_position(twin.position);
        assert_eq!(
            grid.remove(&twin),
            Err(GridError::StaticObjectNotFound { bucket })
        );
        assert_eq!(grid.static_count(), 1);
    }

    #[test]
    fn test_remove_never_added_moving_fails() {
        let obj = static_object(1, 5.0, 5.0).with_velocity(Vec3::Z);
        let mut grid: SpatialHashGrid<'_, WorldObject> = SpatialHashGrid::new();
        assert_eq!(grid.remove(&obj), Err(GridError::MovingObjectNotFound));
    }

    #[test]
    fn test_remove_after_clear_reports_empty_bucket() {
        let obj = static_object(1, 5.0, 5.0);
        let mut grid = SpatialHashGrid::new();
        grid.add(&obj);
        grid.clear();
        let bucket = grid.bucket_for_position(obj.position);
        assert_eq!(grid.remove(&obj), Err(GridError::EmptyBucket { bucket }));
    }

    #[test]
    fn test_remove_is_by_identity() {
        let a = static_object(1, 5.0, 5.0);
        let b = static_object(1, 5.0, 5.0);
        let mut grid = SpatialHashGrid::new();
        grid.add(&a);
        grid.add(&b);
        grid.remove(&b).unwrap();

        let mut out = Vec::new();
        grid.query(&query_box((-5.0, -5.0), (15.0, 15.0)), &mut out);
        assert_eq!(out.len(), 1);
        assert!(ptr::eq(out[0], &a));
    }

    #[test]
    fn test_reclassified_object_is_looked_up_in_wrong_place() {
        let drifter = Drifter::at_rest(5.0, 5.0);
        let mut grid = SpatialHashGrid::new();
        grid.add(&drifter);
        assert_eq!(grid.static_count(), 1);

        // Starts moving after insertion: removal searches the moving list
        drifter.velocity.set(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(grid.remove(&drifter), Err(GridError::MovingObjectNotFound));
        assert_eq!(grid.static_count(), 1);

        drifter.velocity.set(Vec3::ZERO);
        drifter.needs_update.set(true);
        assert_eq!(grid.remove(&drifter), Err(GridError::MovingObjectNotFound));

        drifter.needs_update.set(false);
        assert_eq!(grid.remove(&drifter), Ok(()));
        assert_eq!(grid.static_count(), 0);
    }

    #[test]
    fn test_duplicate_insert_is_stored_twice() {
        let obj = static_object(1, 5.0, 5.0);
        let mut grid = SpatialHashGrid::new();
        grid.add(&obj);
        grid.add(&obj);
        assert_eq!(grid.static_count(), 2);

        grid.remove(&obj).unwrap();
        assert_eq!(grid.static_count(), 1);
        grid.remove(&obj).unwrap();
        assert_eq!(grid.static_count(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let objects: Vec<_> = (0..50)
            .map(|i| static_object(i, i as f32 * 37.0 - 900.0, i as f32 * -23.0))
            .collect();
        let runner = static_object(99, 0.0, 0.0).with_velocity(Vec3::X);
        let mut grid = SpatialHashGrid::new();
        for obj in &objects {
            grid.add(obj);
        }
        grid.add(&runner);

        grid.clear();
        assert_eq!(grid.static_count(), 0);
        assert_eq!(grid.moving_count(), 0);

        let mut out = Vec::new();
        grid.query(&query_box((-2000.0, -2000.0), (2000.0, 2000.0)), &mut out);
        assert!(out.is_empty());

        // Chains survive the clear
        let stats = grid.stats();
        assert!(stats.allocated_buckets > 0);
        assert_eq!(stats.occupied_buckets, 0);
    }

    #[test]
    fn test_cell_coord_floors_negative_values() {
        let grid: SpatialHashGrid<'_, WorldObject> = SpatialHashGrid::new();
        assert_eq!(grid.cell_coord(0.0), 0);
        assert_eq!(grid.cell_coord(49.99), 0);
        assert_eq!(grid.cell_coord(50.0), 1);
        assert_eq!(grid.cell_coord(-0.5), -1);
        assert_eq!(grid.cell_coord(-50.0), -1);
        assert_eq!(grid.cell_coord(-50.5), -2);
    }

    #[test]
    fn test_bucket_index_known_values() {
        let grid: SpatialHashGrid<'_, WorldObject> = SpatialHashGrid::new();
        assert_eq!(grid.bucket_index(0, 0), 0);
        assert_eq!(grid.bucket_index(1, 0), 5377);
        assert_eq!(grid.bucket_index(0, 1), 64511);
        assert_eq!(grid.bucket_index(-1, 0), 60159);
    }

    #[test]
    fn test_bucket_index_is_deterministic_and_in_range() {
        let grid: SpatialHashGrid<'_, WorldObject> = SpatialHashGrid::new();
        let extremes = [i32::MIN, -100_000, -1, 0, 1, 100_000, i32::MAX];
        for &x in &extremes {
            for &z in &extremes {
                let first = grid.bucket_index(x, z);
                assert!(first < NUM_BUCKETS);
                assert_eq!(first, grid.bucket_index(x, z));
            }
        }
    }

    #[test]
    fn test_query_finds_overlapping_static_object() {
        let obj = WorldObject::with_bounds(
            ObjectId(1),
            Vec3::new(5.0, 0.0, 5.0),
            Aabb::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0)),
        );
        let mut grid = SpatialHashGrid::new();
        grid.add(&obj);

        let mut out = Vec::new();
        grid.query(&query_box((-5.0, -5.0), (15.0, 15.0)), &mut out);
        assert!(contains_ref(&out, &obj));

        let mut far = Vec::new();
        grid.query(&query_box((10000.0, 10000.0), (10010.0, 10010.0)), &mut far);
        assert!(!contains_ref(&far, &obj));
    }

    #[test]
    fn test_query_finds_box_straddling_cell_boundary() {
        // Hashed in cell (1, 0) but its box reaches back into cell (0, 0)
        let obj = WorldObject::with_bounds(
            ObjectId(1),
            Vec3::new(55.0, 0.0, 10.0),
            Aabb::new(Vec3::new(40.0, 0.0, 0.0), Vec3::new(70.0, 0.0, 20.0)),
        );
        let mut grid = SpatialHashGrid::new();
        grid.add(&obj);

        let mut out = Vec::new();
        grid.query(&query_box((41.0, 1.0), (45.0, 5.0)), &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_query_appends_without_clearing() {
        let a = static_object(1, 5.0, 5.0);
        let b = static_object(2, 500.0, 500.0);
        let mut grid = SpatialHashGrid::new();
        grid.add(&a);
        grid.add(&b);

        let mut out = vec![&b];
        grid.query(&query_box((0.0, 0.0), (10.0, 10.0)), &mut out);
        assert_eq!(out.len(), 2);
        assert!(ptr::eq(out[0], &b));
        assert!(ptr::eq(out[1], &a));
    }

    #[test]
    fn test_colliding_cells_are_filtered_by_bounds() {
        let grid_probe: SpatialHashGrid<'_, WorldObject> = SpatialHashGrid::new();
        let near = static_object(1, 5.0, 5.0);
        // 65536 cells further along X wraps to the same bucket as cell (0, 0)
        let far = static_object(2, 65536.0 * 50.0 + 5.0, 5.0);
        assert_eq!(
            grid_probe.bucket_for_position(near.position),
            grid_probe.bucket_for_position(far.position)
        );

        let mut grid = SpatialHashGrid::new();
        grid.add(&near);
        grid.add(&far);

        let mut out = Vec::new();
        grid.query(&query_box((-5.0, -5.0), (15.0, 15.0)), &mut out);
        assert_eq!(out.len(), 1);
        assert!(ptr::eq(out[0], &near));
    }

    #[test]
    fn test_shared_bucket_yields_duplicates_unless_distinct() {
        // Four buckets, hash = cx + cz: plenty of collisions in a 4x4 sweep
        let config = GridConfig {
            num_buckets: 4,
            hash_multipliers: (1, 1),
            ..GridConfig::default()
        };
        let obj = static_object(1, 5.0, 5.0);
        let mut grid = SpatialHashGrid::with_config(config).unwrap();
        grid.add(&obj);

        // Cells -2..=1 on both axes; (-2,-2) (-1,1) (0,0) (1,-1) all hit bucket 0
        let bbox = query_box((-5.0, -5.0), (15.0, 15.0));
        let mut out = Vec::new();
        grid.query(&bbox, &mut out);
        assert_eq!(out.len(), 4);

        let mut distinct = Vec::new();
        grid.query_distinct(&bbox, &mut distinct);
        assert_eq!(distinct.len(), 1);
        assert!(ptr::eq(distinct[0], &obj));
    }

    #[test]
    fn test_moving_objects_always_tested() {
        let runner = WorldObject::new_static(
            ObjectId(7),
            Vec3::new(123_456.0, 3.0, -98_765.0),
            Vec3::splat(2.0),
        )
        .with_velocity(Vec3::new(0.0, 0.0, 900.0));
        let mut grid = SpatialHashGrid::new();
        grid.add(&runner);

        let mut out = Vec::new();
        grid.query(&runner.bounding_box, &mut out);
        assert_eq!(out.len(), 1);
        assert!(ptr::eq(out[0], &runner));

        let mut miss = Vec::new();
        grid.query(&query_box((0.0, 0.0), (10.0, 10.0)), &mut miss);
        assert!(miss.is_empty());
    }

    #[test]
    fn test_invalid_min_corner_is_noop() {
        let obj = static_object(1, 5.0, 5.0);
        let mut grid = SpatialHashGrid::new();
        grid.add(&obj);

        let mut out = vec![&obj];
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let bbox = Aabb::new(Vec3::new(bad, 0.0, 0.0), Vec3::new(10.0, 0.0, 10.0));
            grid.query(&bbox, &mut out);
            assert_eq!(out.len(), 1);
        }
    }

    #[test]
    fn test_non_finite_max_corner_scans_moving_only() {
        let still = static_object(1, 5.0, 5.0);
        let runner = static_object(2, 20.0, 20.0).with_velocity(Vec3::X);
        let mut grid = SpatialHashGrid::new();
        grid.add(&still);
        grid.add(&runner);

        for bad in [f32::INFINITY, f32::NAN] {
            let wide_x = Aabb::new(Vec3::ZERO, Vec3::new(bad, 0.0, 30.0));
            let wide_z = Aabb::new(Vec3::ZERO, Vec3::new(30.0, 0.0, bad));
            for bbox in [wide_x, wide_z] {
                let mut out = Vec::new();
                grid.query(&bbox, &mut out);
                assert_eq!(out.len(), 1);
                assert!(ptr::eq(out[0], &runner));
            }
        }
    }

    #[test]
    fn test_huge_span_is_capped_at_bucket_count() {
        let config = GridConfig {
            num_buckets: 4,
            hash_multipliers: (1, 1),
            ..GridConfig::default()
        };
        let obj = static_object(1, 5.0, 5.0);
        let mut grid = SpatialHashGrid::with_config(config).unwrap();
        grid.add(&obj);

        // X is cut to cells -1..=2, Z covers -1..=1; bucket 0 is reached
        // from (-1, 1), (0, 0) and (1, -1)
        let mut out = Vec::new();
        grid.query(&query_box((0.0, 0.0), (1.0e9, 10.0)), &mut out);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_query_in_negative_quadrant() {
        // Cell (-7, -4), not the (-6, -3) truncation would give
        let obj = static_object(1, -320.0, -180.0);
        let mut grid = SpatialHashGrid::new();
        assert_eq!(grid.bucket_for_position(obj.position), grid.bucket_index(-7, -4));
        grid.add(&obj);

        let mut out = Vec::new();
        grid.query(&query_box((-324.0, -184.0), (-321.0, -181.0)), &mut out);
        assert_eq!(out.len(), 1);
        assert!(ptr::eq(out[0], &obj));

        let mut mirrored = Vec::new();
        grid.query(&query_box((321.0, 181.0), (324.0, 184.0)), &mut mirrored);
        assert!(mirrored.is_empty());
    }

    #[test]
    fn test_both_corners_guard_rejects_bad_max() {
        let config = GridConfig {
            query_guard: QueryGuard::BothCorners,
            ..GridConfig::default()
        };
        let obj = static_object(1, 5.0, 5.0);
        let mut grid = SpatialHashGrid::with_config(config).unwrap();
        grid.add(&obj);

        let mut out = Vec::new();
        let bbox = Aabb::new(Vec3::ZERO, Vec3::new(f32::INFINITY, 0.0, 10.0));
        grid.query(&bbox, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = GridConfig {
            cell_size: 0.0,
            ..GridConfig::default()
        };
        let result: Result<SpatialHashGrid<'_, WorldObject>, _> =
            SpatialHashGrid::with_config(config);
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_reflect_chains() {
        let a = static_object(1, 5.0, 5.0);
        let b = static_object(2, 6.0, 6.0);
        let c = static_object(3, 505.0, 5.0);
        let mut grid = SpatialHashGrid::new();
        grid.add(&a);
        grid.add(&b);
        grid.add(&c);

        let stats = grid.stats();
        assert_eq!(stats.static_objects, 3);
        assert_eq!(stats.moving_objects, 0);
        assert_eq!(stats.occupied_buckets, 2);
        assert_eq!(stats.longest_chain, 2);
    }
}
