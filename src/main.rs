//! BoxTron entry point
//!
//! Native builds run a headless autopilot demo:
//!
//! ```text
//! boxtron [CONFIG_JSON] [STORE_JSON] [SEED]
//! ```
//!
//! In the browser the game is driven through `boxtron::platform::web::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use boxtron::GameConfig;
    use boxtron::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
    use boxtron::platform::{Autopilot, HeadlessGame};
    use boxtron::sim::GameEvent;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) if path != "-" => GameConfig::load_or_default(&PathBuf::from(path)),
        _ => GameConfig::default(),
    };
    let store_path = args.next().unwrap_or_else(|| "boxtron_scores.json".to_string());
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0xB0C5);

    // Fall back to an in-memory store so the demo still runs
    let store: Box<dyn KeyValueStore> = match JsonFileStore::open(&store_path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("{err}; high score will not be saved");
            Box::new(MemoryStore::new())
        }
    };

    let mut game = HeadlessGame::new(config, store);
    let mut pilot = Autopilot::new(seed, 2);
    log::info!(
        "Autopilot seed {seed}, aiming for {} point(s) per run",
        pilot.target_score()
    );

    let frame_dt = 1.0 / 60.0;
    let max_frames = 60 * 180;
    for _ in 0..max_frames {
        pilot.drive(&mut game);
        game.update(frame_dt);

        for event in game.session_mut().drain_events() {
            match event {
                GameEvent::Scored(score) => log::info!("Score {score}"),
                GameEvent::Died {
                    score,
                    new_high_score,
                } => log::info!(
                    "Run over at {score}{}",
                    if new_high_score { " (new high score)" } else { "" }
                ),
                GameEvent::Restarted => log::info!("Restarting"),
                other => log::debug!("{other:?}"),
            }
        }

        if pilot.finished(&game) {
            break;
        }
    }

    let session = game.session();
    log::info!(
        "Finished after {} restart(s), {:.1}s simulated, high score {}",
        session.restart_count(),
        session.elapsed(),
        session.high_score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Started from JavaScript via `WebGame`
}
