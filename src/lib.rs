//! BoxTron - resize the box around the walls
//!
//! Core modules:
//! - `sim`: Session controller (state machine, scoring, spawn policy)
//! - `platform`: Timer queue, headless scene host and web bindings
//! - `persistence`: Key-value storage for the high score
//! - `settings`: Data-driven game configuration

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::{ConfigError, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Seconds between obstacle spawns
    pub const SPAWN_INTERVAL: f32 = 5.0;
    /// Seconds an obstacle group lives before removing itself
    pub const OBSTACLE_LIFETIME: f32 = 3.0;
    /// Seconds an obstacle group takes to grow to full size
    pub const OBSTACLE_APPROACH_TIME: f32 = 2.0;

    /// Box size change per unit of pointer travel
    pub const DRAG_GAIN: f32 = 2.5;
    /// Initial box width as a fraction of (arena width + arena height)
    pub const INITIAL_WIDTH_FACTOR: f32 = 0.2;

    /// Persistence key for the best score
    pub const HIGH_SCORE_KEY: &str = "boxtron_highscore";

    /// Z ordering
    pub const Z_BORDER: i32 = 1;
    pub const Z_LABEL: i32 = 5;
    pub const Z_RESTART: i32 = 6;

    pub const LABEL_HEIGHT: f32 = 50.0;
    pub const START_PROMPT: &str = "Tap anywhere to start";
    pub const RESTART_TEXT: &str = "restart";
}
