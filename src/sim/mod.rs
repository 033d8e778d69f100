//! Game session simulation
//!
//! All gameplay logic lives here. This module never talks to a renderer,
//! physics engine or storage backend directly; it goes through the
//! capability traits in [`host`].

pub mod category;
pub mod geometry;
pub mod host;
pub mod session;
pub mod state;

pub use category::{CategorySet, Contact, PhysicsCategory, classify};
pub use geometry::Rect;
pub use host::{
    BodyShape, Host, NodeId, NodeKind, NodeSpec, ObstacleId, PhysicsBody, SceneHost, Scheduler,
    TimerEvent,
};
pub use session::GameSession;
pub use state::{DragAnchor, GameEvent, ObstacleGroup, PlayerBox, SessionState};
