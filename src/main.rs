//! Headless snapshot replay.
//!
//! Loads an atlas definition and a snapshot from JSON, applies the snapshot
//! on a local cooperative executor, and logs the resulting scene.
//!
//! Usage: `urchin <atlas.json> <snapshot.json> [options.toml]`

use std::path::Path;
use std::rc::Rc;

use futures::executor::LocalPool;
use urchin::error::UrchinError;
use urchin::manager::AtlasManager;
use urchin::message::Side;
use urchin::options::Options;
use urchin::provider::{AtlasProvider, InMemoryProvider};

fn replay(
    atlas_path: &str,
    snapshot_path: &str,
    options_path: Option<&str>,
) -> Result<(), UrchinError> {
    let options = match options_path {
        Some(path) => Options::load(Path::new(path))?,
        None => Options::default(),
    };
    let provider: Rc<dyn AtlasProvider> = Rc::new(InMemoryProvider::from_json(
        &std::fs::read_to_string(atlas_path)?,
    )?);
    let snapshot = std::fs::read_to_string(snapshot_path)?;

    let mut pool = LocalPool::new();
    let spawner = Box::new(pool.spawner());
    let manager = AtlasManager::new(options, provider, spawner)?;
    manager.subscribe(|event| log::debug!("{event:?}"));

    pool.run_until(manager.from_serialized(&snapshot))?;
    // Direct load requests finish in the background.
    pool.run_until_stalled();

    for node in manager.visible_nodes() {
        for side in Side::ALL {
            if !node.is_visible(side) {
                continue;
            }
            let state = node.side_state(side);
            log::info!(
                "{} ({}) {side:?}: color {:?} alpha {:.2} material {}",
                node.acronym(),
                node.id(),
                state.color,
                state.alpha,
                state.material.as_deref().unwrap_or("default")
            );
        }
    }
    log::info!("{} structures tracked", manager.visible_ids().len());
    Ok(())
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(atlas), Some(snapshot)) = (args.next(), args.next()) else {
        log::error!("Usage: urchin <atlas.json> <snapshot.json> [options.toml]");
        std::process::exit(1);
    };

    if let Err(e) = replay(&atlas, &snapshot, args.next().as_deref()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
