//! Browser bindings (wasm32 only)
//!
//! `LocalStorageStore` persists integers in LocalStorage and `WebGame`
//! exposes the headless game to JavaScript, which forwards pointer events,
//! calls `update` once per animation frame and draws from `nodes_json`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::persistence::KeyValueStore;
use crate::settings::GameConfig;

use super::headless::{HeadlessGame, SceneNode};

/// Key-value store backed by `window.localStorage`
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get_integer(&self, key: &str) -> Option<i64> {
        let storage = Self::storage()?;
        let value = storage.get_item(key).ok().flatten()?;
        value.parse().ok()
    }

    fn set_integer(&mut self, key: &str, value: i64) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, &value.to_string()).is_err() {
                    log::warn!("LocalStorage rejected {key}");
                }
            }
            None => log::warn!("LocalStorage unavailable, {key} not saved"),
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Game handle for JavaScript
#[wasm_bindgen]
pub struct WebGame {
    game: HeadlessGame<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game for an arena of the given size, optionally overriding
    /// the rest of the config with a JSON string
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, config_json: Option<String>) -> WebGame {
        let mut config = match config_json.as_deref().map(GameConfig::from_json) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                log::warn!("Using default config: {err}");
                GameConfig::default()
            }
            None => GameConfig::default(),
        };
        config.arena_width = width;
        config.arena_height = height;
        if let Err(err) = config.validate() {
            log::warn!("Arena {width}x{height} rejected ({err}), using defaults");
            config = GameConfig::default();
        }
        WebGame {
            game: HeadlessGame::new(config, LocalStorageStore),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.game.pointer_down(Vec2::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.game.pointer_move(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.game.pointer_up(Vec2::new(x, y));
    }

    /// Advance by the frame time in seconds
    pub fn update(&mut self, dt: f32) -> u32 {
        self.game.update(dt)
    }

    pub fn score(&self) -> u64 {
        self.game.session().score()
    }

    pub fn high_score(&self) -> u64 {
        self.game.session().high_score()
    }

    pub fn phase(&self) -> String {
        self.game.session().state().as_str().to_string()
    }

    /// Current scene as a JSON array of nodes
    pub fn nodes_json(&self) -> String {
        let nodes: Vec<&SceneNode> = self.game.scene().nodes().collect();
        serde_json::to_string(&nodes).unwrap_or_else(|_| "[]".to_string())
    }
}
