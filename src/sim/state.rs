//! Session state and core game types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::host::{NodeId, ObstacleId};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the first tap
    NotStarted,
    /// Active gameplay
    Running,
    /// Box hit a wall; waiting for restart
    Dead,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not_started",
            SessionState::Running => "running",
            SessionState::Dead => "dead",
        }
    }
}

/// The player's resizable box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerBox {
    pub center: Vec2,
    pub size: Vec2,
}

impl PlayerBox {
    /// Square box of side `initial_width`
    pub fn new(center: Vec2, initial_width: f32) -> Self {
        Self {
            center,
            size: Vec2::splat(initial_width),
        }
    }

    pub fn frame(&self) -> Rect {
        Rect::new(self.center, self.size)
    }

    /// Resize from a drag: `anchor_size + delta * gain`, each axis clamped to `[min, max]`
    pub fn resize_from_drag(
        &mut self,
        anchor_size: Vec2,
        delta: Vec2,
        gain: f32,
        min: Vec2,
        max: Vec2,
    ) {
        self.size = (anchor_size + delta * gain).clamp(min, max);
    }
}

/// Where an in-progress drag started
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragAnchor {
    /// Pointer position at pointer-down
    pub position: Vec2,
    /// Box size at pointer-down
    pub size: Vec2,
}

/// A live obstacle group: wall, score gap and outer wall under one parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleGroup {
    pub id: ObstacleId,
    pub root: NodeId,
    pub wall: NodeId,
    pub score_gap: NodeId,
    pub outer_wall: NodeId,
    /// Session time (seconds) when spawned
    pub spawned_at: f64,
    /// Session time when the group removes itself
    pub expires_at: f64,
    /// Set once a wall hit stops all obstacle motion
    pub frozen: bool,
}

impl ObstacleGroup {
    /// Scale of the group at session time `now`: 0 when spawned, 1 once it
    /// has advanced for `approach_time` seconds
    pub fn progress(&self, now: f64, approach_time: f32) -> f32 {
        let t = (now - self.spawned_at) / f64::from(approach_time);
        (t as f32).clamp(0.0, 1.0)
    }
}

/// Notable things that happened, for hosts that play sounds or animate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First tap of the first session
    Started,
    ObstacleSpawned(ObstacleId),
    ObstacleExpired(ObstacleId),
    /// Score after the increment
    Scored(u64),
    Died { score: u64, new_high_score: bool },
    Restarted,
}
