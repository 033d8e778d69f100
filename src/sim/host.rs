//! Capabilities the session needs from its host
//!
//! The session never touches a rendering or physics engine directly. It
//! issues scene commands, schedules logical timers and reads/writes one
//! integer setting through these traits. `crate::platform` provides a
//! headless implementation of each.

use serde::{Deserialize, Serialize};

use super::category::{CategorySet, PhysicsCategory};
use super::geometry::Rect;
use crate::persistence::KeyValueStore;

/// Handle to a node owned by the host's scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Identifier of a spawned obstacle group
pub type ObstacleId = u32;

/// What a node represents (hosts pick visuals from this)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    PlayerBox,
    Border,
    /// Parent of one wall, score gap and outer wall
    ObstacleGroup,
    Wall,
    ScoreGap,
    OuterWall,
    Label,
    RestartButton,
}

/// How a physics body fills its frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Only the rectangle's outline
    EdgeLoop,
    /// The whole rectangle
    Solid,
}

/// Physics body attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub category: PhysicsCategory,
    pub shape: BodyShape,
    /// Categories this body wants contact reports for
    pub contacts: CategorySet,
}

impl PhysicsBody {
    pub fn new(category: PhysicsCategory, shape: BodyShape, contacts: CategorySet) -> Self {
        Self {
            category,
            shape,
            contacts,
        }
    }
}

/// Everything a host needs to create a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub frame: Rect,
    pub z: i32,
    pub text: Option<String>,
    pub body: Option<PhysicsBody>,
    pub parent: Option<NodeId>,
    pub visible: bool,
}

impl NodeSpec {
    pub fn new(kind: NodeKind, frame: Rect) -> Self {
        Self {
            kind,
            frame,
            z: 0,
            text: None,
            body: None,
            parent: None,
            visible: true,
        }
    }

    pub fn z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Scene graph commands
pub trait SceneHost {
    /// Add a node and return its handle
    fn add_node(&mut self, spec: NodeSpec) -> NodeId;
    /// Remove a node and all of its children. Unknown ids are ignored.
    fn remove_node(&mut self, id: NodeId);
    /// Remove every node
    fn remove_all_nodes(&mut self);
    /// Replace a label's text
    fn set_text(&mut self, id: NodeId, text: &str);
    /// Move/resize a node (and its physics body)
    fn set_shape(&mut self, id: NodeId, frame: Rect);
    /// Stop all motion on a node
    fn freeze_node(&mut self, id: NodeId);
}

/// Events delivered back to the session when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Spawn loop tick
    SpawnObstacle,
    /// Obstacle lifetime elapsed
    ExpireObstacle(ObstacleId),
}

/// Logical timers. Durations are in seconds of simulation time.
pub trait Scheduler {
    /// Fire `event` once after `delay`
    fn after(&mut self, delay: f32, event: TimerEvent);
    /// Fire `event` every `period`, first after one full period
    fn every(&mut self, period: f32, event: TimerEvent);
    /// Drop every pending timer
    fn cancel_all(&mut self);
}

/// Borrowed bundle of host capabilities passed into each session call
pub struct Host<'a> {
    pub scene: &'a mut dyn SceneHost,
    pub timers: &'a mut dyn Scheduler,
    pub store: &'a mut dyn KeyValueStore,
}

impl<'a> Host<'a> {
    pub fn new(
        scene: &'a mut dyn SceneHost,
        timers: &'a mut dyn Scheduler,
        store: &'a mut dyn KeyValueStore,
    ) -> Self {
        Self {
            scene,
            timers,
            store,
        }
    }
}
