mod config;
mod demo;
mod driver;
mod error;

use canvas::doc::{Node, Snapshot};
use canvas::engine::{Engine, EngineConfig};
use canvas::surface::HeadlessSurface;
use uuid::Uuid;

use crate::config::HostConfig;
use crate::error::HostError;

#[tokio::main]
async fn main() -> Result<(), HostError> {
    tracing_subscriber::fmt::init();

    let config = HostConfig::from_env()?;
    tracing::info!(width = config.width, height = config.height, fps = config.fps, "reelboard starting");

    let mut engine = Engine::new(EngineConfig { author: config.author.clone(), ..EngineConfig::default() });
    engine.initialize(config.width, config.height);

    let ids = match &config.snapshot {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| HostError::Io { path: path.clone(), source })?;
            engine.load_state(Uuid::new_v4(), Snapshot::from_json(&json)?);
            tracing::info!(path = %path.display(), nodes = engine.project.doc.len(), "snapshot loaded");
            engine.project.doc.root_nodes().iter().map(Node::id).collect()
        }
        None => demo::seed(&mut engine),
    };
    engine.center_on_nodes(&ids);

    if config.autoplay {
        for id in engine.project.doc.video_editor_ids() {
            engine.play(&id, 0.0);
        }
    }

    let mut surface = HeadlessSurface::new();
    let summary = driver::run(&mut engine, &mut surface, config.fps, config.seconds).await;
    let calls = surface.stats();
    tracing::info!(
        frames = summary.frames,
        mounted = summary.stats.mounted,
        painted = summary.stats.painted,
        surface_calls = calls.total_calls(),
        "reelboard finished"
    );
    Ok(())
}
