//! Headless host
//!
//! `HeadlessScene` is an in-memory scene graph with just enough physics to
//! report contact-began events between rectangle bodies. `HeadlessGame`
//! bundles it with a timer queue, a store and the session, and runs the
//! fixed-timestep loop.

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::persistence::KeyValueStore;
use crate::settings::GameConfig;
use crate::sim::{
    BodyShape, GameSession, Host, NodeId, NodeKind, NodeSpec, PhysicsBody, PhysicsCategory, Rect,
    SceneHost,
};

use super::timers::TimerQueue;

/// A node as tracked by the headless scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub frame: Rect,
    pub z: i32,
    pub text: Option<String>,
    pub body: Option<PhysicsBody>,
    pub parent: Option<NodeId>,
    pub visible: bool,
    pub frozen: bool,
}

/// In-memory scene graph with rectangle contact detection
#[derive(Debug, Default)]
pub struct HeadlessScene {
    /// Ordered by id for deterministic contact reporting
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u32,
    /// Body pairs currently in contact (lower id first)
    touching: HashSet<(NodeId, NodeId)>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).and_then(|n| n.text.as_deref())
    }

    /// All nodes, ordered by id
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values().filter(move |n| n.kind == kind)
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes_of_kind(kind).count()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find pairs of bodies that started touching since the last call.
    ///
    /// A pair is only considered if at least one side lists the other's
    /// category in its contact mask.
    pub fn detect_contacts(&mut self) -> Vec<(PhysicsCategory, PhysicsCategory)> {
        let bodies: Vec<(NodeId, Rect, PhysicsBody)> = self
            .nodes
            .values()
            .filter_map(|n| n.body.map(|b| (n.id, n.frame, b)))
            .collect();

        let mut began = Vec::new();
        for (i, (a_id, a_frame, a_body)) in bodies.iter().enumerate() {
            for (b_id, b_frame, b_body) in &bodies[i + 1..] {
                let wanted = a_body.contacts.contains(b_body.category)
                    || b_body.contacts.contains(a_body.category);
                if !wanted {
                    continue;
                }

                let key = (*a_id, *b_id);
                if shapes_touch(a_frame, a_body.shape, b_frame, b_body.shape) {
                    if self.touching.insert(key) {
                        began.push((a_body.category, b_body.category));
                    }
                } else {
                    self.touching.remove(&key);
                }
            }
        }
        began
    }

    /// `id` and all of its descendants
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(&current) {
                continue;
            }
            found.push(current);
            stack.extend(
                self.nodes
                    .values()
                    .filter(|n| n.parent == Some(current))
                    .map(|n| n.id),
            );
        }
        found
    }
}

fn shapes_touch(a: &Rect, a_shape: BodyShape, b: &Rect, b_shape: BodyShape) -> bool {
    match (a_shape, b_shape) {
        (BodyShape::EdgeLoop, BodyShape::EdgeLoop) => a.outline_crosses_outline(b),
        (BodyShape::EdgeLoop, BodyShape::Solid) => a.outline_crosses_area(b),
        (BodyShape::Solid, BodyShape::EdgeLoop) => b.outline_crosses_area(a),
        (BodyShape::Solid, BodyShape::Solid) => a.intersects(b),
    }
}

impl SceneHost for HeadlessScene {
    fn add_node(&mut self, spec: NodeSpec) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            SceneNode {
                id,
                kind: spec.kind,
                frame: spec.frame,
                z: spec.z,
                text: spec.text,
                body: spec.body,
                parent: spec.parent,
                visible: spec.visible,
                frozen: false,
            },
        );
        id
    }

    fn remove_node(&mut self, id: NodeId) {
        let removed = self.subtree(id);
        for node in &removed {
            self.nodes.remove(node);
        }
        self.touching
            .retain(|(a, b)| !removed.contains(a) && !removed.contains(b));
    }

    fn remove_all_nodes(&mut self) {
        self.nodes.clear();
        self.touching.clear();
    }

    fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.text = Some(text.to_string());
        }
    }

    fn set_shape(&mut self, id: NodeId, frame: Rect) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.frame = frame;
        }
    }

    fn freeze_node(&mut self, id: NodeId) {
        for node in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(&node) {
                node.frozen = true;
            }
        }
    }
}

/// Session plus headless host, driven by a fixed-timestep loop
#[derive(Debug)]
pub struct HeadlessGame<S: KeyValueStore> {
    session: GameSession,
    scene: HeadlessScene,
    timers: TimerQueue,
    store: S,
    accumulator: f32,
}

impl<S: KeyValueStore> HeadlessGame<S> {
    pub fn new(config: GameConfig, mut store: S) -> Self {
        let mut scene = HeadlessScene::new();
        let mut timers = TimerQueue::new();
        let session = GameSession::new(config, &mut Host::new(&mut scene, &mut timers, &mut store));
        Self {
            session,
            scene,
            timers,
            store,
            accumulator: 0.0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn scene(&self) -> &HeadlessScene {
        &self.scene
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Text of the score label
    pub fn score_text(&self) -> &str {
        self.scene
            .text(self.session.score_label())
            .unwrap_or_default()
    }

    fn with_host<R>(&mut self, f: impl FnOnce(&mut GameSession, &mut Host<'_>) -> R) -> R {
        let Self {
            session,
            scene,
            timers,
            store,
            ..
        } = self;
        let mut host = Host::new(scene, timers, store);
        f(session, &mut host)
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.with_host(|session, host| session.on_pointer_down(position, host));
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        self.with_host(|session, host| session.on_pointer_move(position, host));
    }

    pub fn pointer_up(&mut self, position: Vec2) {
        self.with_host(|session, host| session.on_pointer_up(position, host));
    }

    /// Pointer down and up at the same spot
    pub fn tap(&mut self, position: Vec2) {
        self.pointer_down(position);
        self.pointer_up(position);
    }

    /// Deliver a contact directly, bypassing detection
    pub fn contact(&mut self, a: PhysicsCategory, b: PhysicsCategory) {
        self.with_host(|session, host| session.on_contact(a, b, host));
    }

    /// One simulation step: tick, fire timers, then report new contacts
    pub fn step(&mut self, dt: f32) {
        self.with_host(|session, host| session.tick(dt, host));

        for event in self.timers.advance(dt) {
            self.with_host(|session, host| session.on_timer(event, host));
        }

        for (a, b) in self.scene.detect_contacts() {
            self.with_host(|session, host| session.on_contact(a, b, host));
        }
    }

    /// Advance by a frame's wall-clock `dt`, running whole fixed steps.
    /// Returns the number of steps taken.
    pub fn update(&mut self, dt: f32) -> u32 {
        // Cap so a long stall doesn't fast-forward the game
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Run fixed steps until at least `seconds` of simulation time have passed
    pub fn run_for(&mut self, seconds: f32) {
        let steps = (seconds / SIM_DT).ceil() as u32;
        for _ in 0..steps {
            self.step(SIM_DT);
        }
    }
}
