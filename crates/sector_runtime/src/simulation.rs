//! Fixed-step broad-phase simulation
//!
//! Every tick moves the moving objects, rebuilds a grid over the whole
//! population and probes around each mover.

use anyhow::Result;
use sector_core::math::{Aabb, DeterministicRng, Vec3};
use sector_core::{GridConfig, GridStats, ObjectId, SpatialHashGrid, WorldObject};
use sector_services::SimulationSettings;

/// Work done by one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub queries: usize,
    /// Objects reported by all probes, duplicates included.
    pub candidates: usize,
    pub grid: GridStats,
}

/// Caller-owned object population. The grid only ever borrows from here.
pub struct World {
    statics: Vec<WorldObject>,
    movers: Vec<WorldObject>,
    extent: f32,
    probe_half_extent: f32,
}

impl World {
    /// Scatter objects deterministically from `settings.seed`.
    pub fn generate(settings: &SimulationSettings) -> Self {
        let mut rng = DeterministicRng::new(settings.seed);
        let extent = settings.world_extent;
        let half = Vec3::splat(settings.object_half_extent);
        let mut next_id = 0u32;
        let random_position = |rng: &mut DeterministicRng| {
            Vec3::new(rng.range_f32(-extent, extent), 0.0, rng.range_f32(-extent, extent))
        };

        let statics = (0..settings.static_objects)
            .map(|_| {
                next_id += 1;
                WorldObject::new_static(ObjectId(next_id), random_position(&mut rng), half)
            })
            .collect();

        let movers = (0..settings.moving_objects)
            .map(|_| {
                next_id += 1;
                let position = random_position(&mut rng);
                let heading = rng.range_f32(0.0, std::f32::consts::TAU);
                // Never zero, or the object would be hashed as static
                let speed = rng.range_f32(0.1, 1.0) * settings.max_speed;
                let velocity = Vec3::new(heading.cos(), 0.0, heading.sin()) * speed;
                WorldObject::new_static(ObjectId(next_id), position, half).with_velocity(velocity)
            })
            .collect();

        tracing::debug!(
            statics = settings.static_objects,
            movers = settings.moving_objects,
            seed = rng.seed(),
            "generated world"
        );

        Self {
            statics,
            movers,
            extent,
            probe_half_extent: settings.probe_half_extent,
        }
    }

    pub fn statics(&self) -> &[WorldObject] {
        &self.statics
    }

    pub fn movers(&self) -> &[WorldObject] {
        &self.movers
    }

    /// Integrate movers, reflecting them off the world edges.
    pub fn step(&mut self, dt: f32) {
        for mover in &mut self.movers {
            mover.integrate(dt);

            // Only flip while heading outward, or a mover past the edge jitters
            let p = mover.position;
            let v = &mut mover.linear_velocity;
            if p.x.abs() > self.extent && p.x * v.x > 0.0 {
                v.x = -v.x;
            }
            if p.z.abs() > self.extent && p.z * v.z > 0.0 {
                v.z = -v.z;
            }
        }
    }

    fn probe_box(&self, mover: &WorldObject) -> Aabb {
        Aabb::from_center_half_extents(mover.position, Vec3::splat(self.probe_half_extent))
    }

    /// Index the current population and probe around every mover.
    pub fn run_tick(&self, config: &GridConfig) -> Result<TickReport> {
        let mut grid = SpatialHashGrid::with_config(config.clone())?;
        for obj in self.statics.iter().chain(&self.movers) {
            grid.add(obj);
        }

        // Static round trip keeps remove honest every tick
        if let Some(first) = self.statics.first() {
            grid.remove(first)?;
            grid.add(first);
        }

        let mut report = TickReport::default();
        let mut hits = Vec::new();
        for mover in &self.movers {
            hits.clear();
            grid.query(&self.probe_box(mover), &mut hits);
            report.queries += 1;
            report.candidates += hits.len();
        }

        report.grid = grid.stats();
        Ok(report)
    }
}
