//! Platform layer
//!
//! Reference implementations of the host capabilities:
//! - `timers`: logical timer queue driven by simulation time
//! - `headless`: in-memory scene graph with rectangle contact detection
//! - `autopilot`: scripted player for demos and soak tests
//! - `web`: LocalStorage store and JavaScript bindings (wasm32 only)

pub mod autopilot;
pub mod headless;
pub mod timers;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use autopilot::Autopilot;
pub use headless::{HeadlessGame, HeadlessScene, SceneNode};
pub use timers::TimerQueue;
