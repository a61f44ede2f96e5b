//! Tick loop.
//!
//! Each tick moves the objects, rebuilds the index from scratch and runs the
//! camera query, timing the rebuild and the query separately.

use crate::camera::ViewReport;
use crate::config::{Config, SimulationConfig};
use crate::error::SceneError;
use crate::world::World;
use futures_util::FutureExt;
use spatial::QuadTree;
use std::time::{Duration, Instant};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Timing statistics kept across ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timings {
    pub last_rebuild: Duration,
    pub max_rebuild: Duration,
    pub last_query: Duration,
    pub max_query: Duration,
    /// Exponential moving average of the whole tick, in milliseconds.
    pub tick_avg_ms: f64,
}

/// What happened during one tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub rebuild: Duration,
    pub query: Duration,
    pub view: Option<ViewReport>,
}

/// The world plus tick bookkeeping.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    settings: SimulationConfig,
    tick: u64,
    timings: Timings,
}

impl Simulation {
    /// Create a simulation with the configured population already spawned.
    pub fn new(config: &Config) -> Self {
        Self::with_world(World::populated(config), config.simulation.clone())
    }

    pub fn with_world(world: World, settings: SimulationConfig) -> Self {
        Self {
            world,
            settings,
            tick: 0,
            timings: Timings::default(),
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Number of ticks run so far.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// True once the configured tick limit is reached.
    pub fn finished(&self) -> bool {
        self.settings.ticks > 0 && self.tick >= self.settings.ticks
    }

    /// Run one tick of `dt` seconds.
    pub fn step(&mut self, dt: f32) -> TickReport {
        let tick_start = Instant::now();
        self.world.update(dt);

        let start = Instant::now();
        self.world.rebuild_index();
        let rebuild = start.elapsed();

        let start = Instant::now();
        let view = self.world.query_camera();
        let query = start.elapsed();

        self.tick += 1;
        let timings = &mut self.timings;
        timings.last_rebuild = rebuild;
        timings.max_rebuild = timings.max_rebuild.max(rebuild);
        timings.last_query = query;
        timings.max_query = timings.max_query.max(query);

        let tick_ms = tick_start.elapsed().as_secs_f64() * 1000.0;
        timings.tick_avg_ms = if self.tick == 1 {
            tick_ms
        } else {
            timings.tick_avg_ms * 0.9 + tick_ms * 0.1
        };

        TickReport {
            tick: self.tick,
            rebuild,
            query,
            view,
        }
    }

    /// Log a summary of the world, the index and the timings.
    pub fn report(&self, last: &TickReport) {
        let stats = self.world.tree().stats();
        let counts = self.world.object_counts();
        let (candidates, hits) = last
            .view
            .as_ref()
            .map_or((0, 0), |v| (v.candidates.len(), v.hits.len()));
        info!(
            "Tick #{}: {} objects, {} nodes ({} leaves, depth {}, fullest leaf {}) | rebuild {:.3}ms (max {:.3}ms) | query {:.3}ms (max {:.3}ms), {} candidates, {} in view | avg tick {:.3}ms",
            self.tick,
            counts.total,
            stats.nodes,
            stats.leaves,
            stats.max_depth,
            stats.max_leaf_len,
            as_ms(self.timings.last_rebuild),
            as_ms(self.timings.max_rebuild),
            as_ms(self.timings.last_query),
            as_ms(self.timings.max_query),
            candidates,
            hits,
            self.timings.tick_avg_ms,
        );
        log_outline(self.world.tree());
    }
}

fn as_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Dump every node of the tree at debug level, breadth first.
fn log_outline(tree: &QuadTree) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    for (id, node) in tree.level_order() {
        let b = node.bound();
        debug!(
            "{:?} depth {} {} at ({:.2}, {:.2}) size {:.2}x{:.2}, {} members",
            id,
            node.depth(),
            if node.is_leaf() { "leaf" } else { "internal" },
            b.x(),
            b.y(),
            b.width(),
            b.height(),
            node.len()
        );
    }
}

/// Run the tick loop until the tick limit or Ctrl-C.
pub async fn run(config: Config) -> Result<(), SceneError> {
    config.validate()?;
    let tick_interval_ms = config.simulation.tick_interval_ms;
    let report_every = config.simulation.report_every;

    let mut sim = Simulation::new(&config);
    let counts = sim.world().object_counts();
    info!(
        "World initialized: {} moving, {} static, bounds {}x{}, tree limits depth {} / {} per leaf",
        counts.quads,
        counts.statics,
        config.world.width,
        config.world.height,
        config.tree.max_depth,
        config.tree.max_child_count
    );

    let period = Duration::from_millis(tick_interval_ms);
    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last = Instant::now();
    while !sim.finished() {
        let scheduled = tokio::select! {
            scheduled = ticker.tick() => scheduled,
            _ = &mut shutdown => {
                info!("Interrupted, stopping");
                break;
            }
        };

        // Drain any backlog so the next tick is the most recent one
        let mut skipped = 0u32;
        while ticker.tick().now_or_never().is_some() {
            skipped += 1;
        }
        if skipped > 0 {
            debug!(
                "Skipped {} ticks to stay current (lag: {:?})",
                skipped,
                time::Instant::now().saturating_duration_since(scheduled)
            );
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        let tick_start = Instant::now();
        let report = sim.step(dt);
        let tick_ms = tick_start.elapsed().as_secs_f64() * 1000.0;

        let tick_budget = tick_interval_ms as f64 * 0.9;
        if tick_ms > tick_budget {
            warn!(
                "Slow tick #{}: {:.3}ms (budget: {:.1}ms) - {} objects",
                report.tick,
                tick_ms,
                tick_budget,
                sim.world().objects().len()
            );
        }

        if report_every > 0 && report.tick % report_every == 0 {
            sim.report(&report);
        }
    }

    info!(
        "Stopped after {} ticks (max rebuild {:.3}ms, max query {:.3}ms)",
        sim.tick_count(),
        as_ms(sim.timings().max_rebuild),
        as_ms(sim.timings().max_query)
    );
    Ok(())
}
