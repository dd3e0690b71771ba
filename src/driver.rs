//! Headless frame driver: ticks the engine on a fixed interval.

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;

use std::time::{Duration, Instant};

use canvas::engine::Engine;
use canvas::scene::ReconcileStats;
use canvas::surface::Surface;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Totals for one driver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    /// Frames whose reconcile changed the surface.
    pub busy_frames: u64,
    pub stats: ReconcileStats,
}

/// Tick `engine` at `fps` for `seconds`, then unmount the scene. The engine
/// clock starts at zero when the driver starts.
pub async fn run(engine: &mut Engine, surface: &mut dyn Surface, fps: f64, seconds: f64) -> RunSummary {
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / fps));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let start = Instant::now();
    let mut summary = RunSummary::default();
    info!(fps, seconds, "frame loop started");

    loop {
        ticker.tick().await;
        let now = start.elapsed().as_secs_f64();
        if now >= seconds {
            break;
        }
        let stats = engine.tick(now, surface);
        summary.frames += 1;
        if stats != ReconcileStats::default() {
            summary.busy_frames += 1;
            debug!(now, mounted = stats.mounted, painted = stats.painted, "frame rendered");
        }
        summary.stats += stats;
    }

    summary.stats += engine.shutdown(surface);
    info!(frames = summary.frames, busy = summary.busy_frames, "frame loop stopped");
    summary
}
