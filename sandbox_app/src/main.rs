//! Headless sandbox driving the engine
//!
//! Bouncing balls inside a walled arena, a trigger zone and a turret firing
//! projectiles. The loop feeds the engine a synthetic 60 Hz frame delta and
//! logs tick statistics once per simulated second.
//!
//! Usage: `sandbox [config.toml|config.ron]`

mod scene;

use std::rc::Rc;
use std::time::Duration;

use quad_engine::config::{Config, ConfigError, EngineConfig};
use quad_engine::foundation::logging;
use quad_engine::{Engine, EngineError};
use thiserror::Error;

use scene::SceneCounters;

const FRAMES: u32 = 600;
const FRAME_DELTA: Duration = Duration::from_nanos(16_666_667);
const STATS_INTERVAL: u64 = 60;

#[derive(Error, Debug)]
enum SandboxError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn main() {
    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("sandbox: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), SandboxError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::default(),
    };

    logging::init_with_level(&config.log_level);
    log::info!("Starting sandbox '{}'", config.name);

    let bounds = config.world.bounds;
    let mut engine = Engine::new(config)?;
    let counters = Rc::new(SceneCounters::default());
    scene::populate(engine.registry_mut(), bounds, &counters);

    let mut last_report = 0;
    for _ in 0..FRAMES {
        engine.advance(FRAME_DELTA);

        let frame = engine.clock().frame_count();
        if frame >= last_report + STATS_INTERVAL {
            last_report = frame;
            let stats = engine.registry().last_tick_stats();
            log::info!(
                "tick {}: {} live, {} colliders, quad-tree depth {} / {} nodes, {} tests, {} full scans, {} collisions, {} triggers",
                stats.frame,
                engine.registry().live_entities().len(),
                engine.registry().live_colliders().len(),
                engine.registry().quadtree().depth(),
                engine.registry().quadtree().node_count(),
                stats.collision.candidate_tests,
                stats.collision.full_scans,
                stats.collision.collisions,
                stats.collision.triggers,
            );
        }
    }

    log::info!(
        "Done after {} ticks ({:.1} ticks/s): {} zone entries, {} of {} shots hit",
        engine.clock().frame_count(),
        engine.clock().ticks_per_second(),
        counters.zone_entries.get(),
        counters.shots_hit.get(),
        counters.shots_fired.get(),
    );

    Ok(())
}
