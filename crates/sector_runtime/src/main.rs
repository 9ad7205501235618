//! Sector Runtime
//!
//! Boots logging and settings, builds the sphere mesh, then runs the
//! broad-phase simulation for the configured number of ticks.

mod simulation;

use anyhow::{Context, Result};
use sector_core::time::SimulationTime;
use sector_metrics::{Counter, RingBuffer, TickTimer};
use sector_services::Settings;
use simulation::World;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Sector v{}", sector_core::VERSION);
    sector_services::init_services();

    let settings = match std::env::args_os().nth(1) {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("loading settings from {}", path.to_string_lossy()))?,
        None => {
            tracing::info!("no settings file given, using defaults");
            Settings::default()
        }
    };
    settings.validate().context("validating settings")?;

    let mesh = sector_mesh::create_icosphere(settings.mesh.subdivide_level);
    tracing::info!(
        level = settings.mesh.subdivide_level,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "built sphere mesh"
    );

    let mut world = World::generate(&settings.simulation);
    let mut time = SimulationTime::new();
    let mut timer = TickTimer::new(settings.simulation.ticks.max(1) as usize);
    let mut candidates_per_tick: RingBuffer<usize> = RingBuffer::new(60);
    let mut counters = Counter::new();
    let mut last_report = None;

    tracing::info!(
        ticks = settings.simulation.ticks,
        statics = world.statics().len(),
        movers = world.movers().len(),
        "running simulation"
    );

    for _ in 0..settings.simulation.ticks {
        timer.begin();
        world.step(time.delta_seconds());
        let report = world
            .run_tick(&settings.grid)
            .with_context(|| format!("tick {}", time.tick_count()))?;
        timer.end();

        counters.increment("queries", report.queries);
        counters.increment("candidates", report.candidates);
        candidates_per_tick.push(report.candidates);
        tracing::debug!(
            tick = time.tick_count(),
            candidates = report.candidates,
            "tick complete"
        );

        time.advance_tick();
        last_report = Some(report);
    }

    if let Some(report) = last_report {
        let stats = report.grid;
        tracing::info!(
            static_objects = stats.static_objects,
            moving_objects = stats.moving_objects,
            occupied_buckets = stats.occupied_buckets,
            longest_chain = stats.longest_chain,
            "grid occupancy"
        );
    }

    for (name, value) in counters.iter() {
        tracing::info!(counter = name, value, "totals");
    }

    let (fastest, slowest) = timer.tick_time_range_ms();
    tracing::info!(
        simulated_secs = time.total_time().as_secs_f64(),
        avg_tick_ms = timer.tick_time_ms(),
        fastest_ms = fastest,
        slowest_ms = slowest,
        ticks_per_second = timer.ticks_per_second(),
        recent_candidates_per_tick = candidates_per_tick.average(),
        "simulation finished"
    );

    Ok(())
}
