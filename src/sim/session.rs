//! Game session controller
//!
//! Owns all game state and drives the host through [`Host`]. The host calls
//! in with pointer events, contact reports, fired timers and one `tick` per
//! simulation step; none of these ever run concurrently.

use glam::Vec2;

use super::category::{CategorySet, Contact, PhysicsCategory, classify};
use super::geometry::Rect;
use super::host::{
    BodyShape, Host, NodeId, NodeKind, NodeSpec, ObstacleId, PhysicsBody, TimerEvent,
};
use super::state::{DragAnchor, GameEvent, ObstacleGroup, PlayerBox, SessionState};
use crate::consts::*;
use crate::highscores::HighScore;
use crate::settings::GameConfig;

/// Nodes rebuilt with every scene
#[derive(Debug, Clone, Copy)]
struct SceneNodes {
    player: NodeId,
    border: NodeId,
    score_label: NodeId,
    /// "Tap anywhere to start" / high score label, when shown
    prompt_label: Option<NodeId>,
}

/// One game scene, across any number of restarts
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    state: SessionState,
    score: u64,
    high_score: HighScore,
    /// Number of restarts so far (0 during the first session)
    restart_count: u32,
    /// Pointer is down for the first time in the first session
    first_touch: bool,
    drag: Option<DragAnchor>,
    player: PlayerBox,
    /// Session time in seconds, advanced by `tick`
    elapsed: f64,
    obstacles: Vec<ObstacleGroup>,
    next_obstacle_id: ObstacleId,
    nodes: SceneNodes,
    /// Bounds of the restart control shown after death
    restart_button: Option<Rect>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Load the high score and build the initial scene
    pub fn new(config: GameConfig, host: &mut Host<'_>) -> Self {
        let high_score = HighScore::load(&*host.store, &config.high_score_key);
        let player = PlayerBox::new(Vec2::ZERO, config.initial_width());
        let mut session = Self {
            config,
            state: SessionState::NotStarted,
            score: 0,
            high_score,
            restart_count: 0,
            first_touch: false,
            drag: None,
            player,
            elapsed: 0.0,
            obstacles: Vec::new(),
            next_obstacle_id: 1,
            nodes: SceneNodes {
                player: NodeId(0),
                border: NodeId(0),
                score_label: NodeId(0),
                prompt_label: None,
            },
            restart_button: None,
            events: Vec::new(),
        };
        session.build_scene(host);
        session
    }

    // === Accessors ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == SessionState::Dead
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn restart_count(&self) -> u32 {
        self.restart_count
    }

    pub fn player(&self) -> &PlayerBox {
        &self.player
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Live obstacle groups, oldest first
    pub fn obstacles(&self) -> &[ObstacleGroup] {
        &self.obstacles
    }

    pub fn border_node(&self) -> NodeId {
        self.nodes.border
    }

    pub fn score_label(&self) -> NodeId {
        self.nodes.score_label
    }

    pub fn prompt_label(&self) -> Option<NodeId> {
        self.nodes.prompt_label
    }

    /// Bounds of the restart control, if it is showing
    pub fn restart_bounds(&self) -> Option<Rect> {
        self.restart_button
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Host callbacks ===

    pub fn on_pointer_down(&mut self, position: Vec2, host: &mut Host<'_>) {
        self.drag = Some(DragAnchor {
            position,
            size: self.player.size,
        });

        if self.state == SessionState::NotStarted {
            self.first_touch = true;
            self.state = SessionState::Running;
            if self.restart_count == 0 {
                if let Some(prompt) = self.nodes.prompt_label.take() {
                    host.scene.remove_node(prompt);
                }
                log::info!("Session started");
                self.events.push(GameEvent::Started);
                self.start_game(host);
            }
        }
    }

    pub fn on_pointer_move(&mut self, position: Vec2, host: &mut Host<'_>) {
        if self.state != SessionState::Running {
            return;
        }
        let Some(anchor) = self.drag else {
            return;
        };

        let min = Vec2::splat(self.config.min_box_extent());
        let max = self.config.max_box_size().max(min);
        self.player.resize_from_drag(
            anchor.size,
            position - anchor.position,
            self.config.drag_gain,
            min,
            max,
        );
        host.scene.set_shape(self.nodes.player, self.player.frame());
    }

    pub fn on_pointer_up(&mut self, position: Vec2, host: &mut Host<'_>) {
        self.drag = None;

        // The tap that starts the very first session does nothing else
        if self.first_touch && self.restart_count == 0 {
            self.first_touch = false;
            return;
        }

        if self.is_dead() && self.restart_bounds().is_some_and(|b| b.contains_point(position)) {
            self.restart(host);
        }
    }

    /// Contact began between two bodies
    pub fn on_contact(&mut self, a: PhysicsCategory, b: PhysicsCategory, host: &mut Host<'_>) {
        match classify(a, b) {
            Some(Contact::ScoreGap) => {
                if self.is_dead() {
                    return;
                }
                self.score += 1;
                host.scene.set_text(self.nodes.score_label, &self.score.to_string());
                log::debug!("Scored, now {}", self.score);
                self.events.push(GameEvent::Scored(self.score));
            }
            Some(Contact::Wall) => {
                self.freeze_obstacles(host);
                if !self.is_dead() {
                    self.die(host);
                }
            }
            None => {
                log::debug!("Ignoring contact {} / {}", a.as_str(), b.as_str());
            }
        }
    }

    /// A scheduled timer fired
    pub fn on_timer(&mut self, event: TimerEvent, host: &mut Host<'_>) {
        match event {
            TimerEvent::SpawnObstacle => {
                if self.state == SessionState::Running {
                    self.spawn_obstacle(host);
                } else {
                    log::debug!("Spawn tick while {}, ignored", self.state.as_str());
                }
            }
            TimerEvent::ExpireObstacle(id) => self.expire_obstacle(id, host),
        }
    }

    /// Per-step update: advance live obstacles and keep the border on the
    /// box's current frame
    pub fn tick(&mut self, dt: f32, host: &mut Host<'_>) {
        self.elapsed += f64::from(dt);
        self.advance_obstacles(host);
        host.scene.set_shape(self.nodes.border, self.player.frame());
    }

    // === Lifecycle ===

    fn build_scene(&mut self, host: &mut Host<'_>) {
        let arena_height = self.config.arena_height;
        self.player = PlayerBox::new(Vec2::ZERO, self.config.initial_width());
        let frame = self.player.frame();

        let player = host
            .scene
            .add_node(NodeSpec::new(NodeKind::PlayerBox, frame).hidden());
        let border = host.scene.add_node(
            NodeSpec::new(NodeKind::Border, frame).z(Z_BORDER).body(PhysicsBody::new(
                PhysicsCategory::Border,
                BodyShape::EdgeLoop,
                CategorySet::of(&[
                    PhysicsCategory::Wall,
                    PhysicsCategory::Score,
                    PhysicsCategory::OuterWall,
                ]),
            )),
        );

        let score_text = if self.state == SessionState::NotStarted {
            self.high_score_text()
        } else {
            self.score.to_string()
        };
        let score_frame = self.label_frame(arena_height / 2.0 - arena_height / 5.0);
        let score_label = host.scene.add_node(
            NodeSpec::new(NodeKind::Label, score_frame)
                .z(Z_LABEL)
                .text(score_text),
        );

        let prompt_label = if self.restart_count == 0 {
            Some(host.scene.add_node(
                NodeSpec::new(NodeKind::Label, self.prompt_frame())
                    .z(Z_LABEL)
                    .text(START_PROMPT),
            ))
        } else {
            None
        };

        self.nodes = SceneNodes {
            player,
            border,
            score_label,
            prompt_label,
        };

        if self.restart_count > 0 {
            self.start_game(host);
        }
    }

    fn start_game(&mut self, host: &mut Host<'_>) {
        host.scene.set_text(self.nodes.score_label, &self.score.to_string());
        self.spawn_obstacle(host);
        host.timers
            .every(self.config.spawn_interval, TimerEvent::SpawnObstacle);
    }

    fn die(&mut self, host: &mut Host<'_>) {
        self.state = SessionState::Dead;
        self.drag = None;
        let new_high_score = self.high_score.record(self.score, &mut *host.store);
        log::info!(
            "Died with score {} (high score {})",
            self.score,
            self.high_score.best()
        );

        let bounds = Rect::new(
            self.config.restart_button_center,
            self.config.restart_button_size(),
        );
        let node = host
            .scene
            .add_node(NodeSpec::new(NodeKind::RestartButton, bounds).z(Z_RESTART));
        host.scene.add_node(
            NodeSpec::new(NodeKind::Label, bounds)
                .z(Z_RESTART)
                .text(RESTART_TEXT)
                .parent(node),
        );
        self.restart_button = Some(bounds);

        let prompt = host.scene.add_node(
            NodeSpec::new(NodeKind::Label, self.prompt_frame())
                .z(Z_LABEL)
                .text(self.high_score_text()),
        );
        self.nodes.prompt_label = Some(prompt);

        self.events.push(GameEvent::Died {
            score: self.score,
            new_high_score,
        });
    }

    /// Tear everything down and start a fresh run
    fn restart(&mut self, host: &mut Host<'_>) {
        host.scene.remove_all_nodes();
        host.timers.cancel_all();
        self.obstacles.clear();
        self.restart_button = None;
        self.state = SessionState::Running;
        self.restart_count += 1;
        self.score = 0;
        self.first_touch = false;
        self.drag = None;
        log::info!("Restarted (restart #{})", self.restart_count);
        self.events.push(GameEvent::Restarted);
        self.build_scene(host);
    }

    // === Obstacles ===

    /// New groups start as a point at the arena center and grow in `tick`.
    /// The outer wall covers the whole arena from the start.
    fn spawn_obstacle(&mut self, host: &mut Host<'_>) {
        let id = self.next_obstacle_id;
        self.next_obstacle_id += 1;

        let (wall_frame, gap_frame) = self.obstacle_frames(0.0);
        let arena = Rect::centered(self.config.arena_size());

        let root = host
            .scene
            .add_node(NodeSpec::new(NodeKind::ObstacleGroup, gap_frame));
        let wall = host.scene.add_node(
            NodeSpec::new(NodeKind::Wall, wall_frame)
                .parent(root)
                .hidden()
                .body(PhysicsBody::new(
                    PhysicsCategory::Wall,
                    BodyShape::Solid,
                    CategorySet::EMPTY,
                )),
        );
        let score_gap = host.scene.add_node(
            NodeSpec::new(NodeKind::ScoreGap, gap_frame)
                .parent(root)
                .z(Z_BORDER)
                .body(PhysicsBody::new(
                    PhysicsCategory::Score,
                    BodyShape::EdgeLoop,
                    CategorySet::of(&[PhysicsCategory::Border]),
                )),
        );
        let outer_wall = host.scene.add_node(
            NodeSpec::new(NodeKind::OuterWall, arena)
                .parent(root)
                .hidden()
                .body(PhysicsBody::new(
                    PhysicsCategory::OuterWall,
                    BodyShape::Solid,
                    CategorySet::EMPTY,
                )),
        );

        host.timers
            .after(self.config.obstacle_lifetime, TimerEvent::ExpireObstacle(id));
        self.obstacles.push(ObstacleGroup {
            id,
            root,
            wall,
            score_gap,
            outer_wall,
            spawned_at: self.elapsed,
            expires_at: self.elapsed + f64::from(self.config.obstacle_lifetime),
            frozen: false,
        });
        log::debug!("Spawned obstacle {id} at {:.2}s", self.elapsed);
        self.events.push(GameEvent::ObstacleSpawned(id));
    }

    fn expire_obstacle(&mut self, id: ObstacleId, host: &mut Host<'_>) {
        let Some(index) = self.obstacles.iter().position(|o| o.id == id) else {
            log::debug!("Obstacle {id} already gone");
            return;
        };
        let group = self.obstacles.remove(index);
        host.scene.remove_node(group.root);
        log::debug!("Obstacle {id} expired");
        self.events.push(GameEvent::ObstacleExpired(id));
    }

    /// Grow every unfrozen group toward its full size
    fn advance_obstacles(&self, host: &mut Host<'_>) {
        let approach = self.config.obstacle_approach_time;
        for group in self.obstacles.iter().filter(|o| !o.frozen) {
            let (wall, gap) = self.obstacle_frames(group.progress(self.elapsed, approach));
            host.scene.set_shape(group.root, gap);
            host.scene.set_shape(group.wall, wall);
            host.scene.set_shape(group.score_gap, gap);
        }
    }

    /// Wall and score gap frames of a group scaled by `progress`
    fn obstacle_frames(&self, progress: f32) -> (Rect, Rect) {
        let wall = Rect::centered(self.config.wall_size() * progress);
        (wall, wall.inflate(self.config.gap_size * progress))
    }

    /// Stop the spawn loop and every pending expiry; obstacles stay where they are
    fn freeze_obstacles(&mut self, host: &mut Host<'_>) {
        host.timers.cancel_all();
        for group in self.obstacles.iter_mut().filter(|o| !o.frozen) {
            host.scene.freeze_node(group.root);
            group.frozen = true;
        }
    }

    // === Labels ===

    fn high_score_text(&self) -> String {
        format!("High Score: {}", self.high_score.best())
    }

    fn prompt_frame(&self) -> Rect {
        let h = self.config.arena_height;
        self.label_frame(h / 2.0 - h / 4.0)
    }

    /// Full-width label strip centered at height `y`
    fn label_frame(&self, y: f32) -> Rect {
        Rect::new(
            Vec2::new(0.0, y),
            Vec2::new(self.config.arena_width, LABEL_HEIGHT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::platform::{HeadlessScene, TimerQueue};

    struct Rig {
        scene: HeadlessScene,
        timers: TimerQueue,
        store: MemoryStore,
        session: GameSession,
    }

    impl Rig {
        fn new(store: MemoryStore) -> Self {
            let mut scene = HeadlessScene::new();
            let mut timers = TimerQueue::new();
            let mut store = store;
            let session = GameSession::new(
                GameConfig::default(),
                &mut Host::new(&mut scene, &mut timers, &mut store),
            );
            Self {
                scene,
                timers,
                store,
                session,
            }
        }

        fn call(&mut self, f: impl FnOnce(&mut GameSession, &mut Host<'_>)) {
            let mut host = Host::new(&mut self.scene, &mut self.timers, &mut self.store);
            f(&mut self.session, &mut host);
        }

        fn tap(&mut self, pos: Vec2) {
            self.call(|s, h| {
                s.on_pointer_down(pos, h);
                s.on_pointer_up(pos, h);
            });
        }

        fn contact(&mut self, a: PhysicsCategory, b: PhysicsCategory) {
            self.call(|s, h| s.on_contact(a, b, h));
        }

        fn label(&self, id: NodeId) -> String {
            self.scene.text(id).unwrap_or_default().to_string()
        }
    }

    #[test]
    fn test_initial_scene() {
        let rig = Rig::new(MemoryStore::with(HIGH_SCORE_KEY, 4));
        assert_eq!(rig.session.state(), SessionState::NotStarted);
        assert_eq!(rig.label(rig.session.score_label()), "High Score: 4");
        let prompt = rig.session.prompt_label().unwrap();
        assert_eq!(rig.label(prompt), START_PROMPT);
        assert!(rig.session.obstacles().is_empty());
        assert_eq!(rig.timers.pending(), 0);
    }

    #[test]
    fn test_first_tap_starts_and_spawns() {
        let mut rig = Rig::new(MemoryStore::new());
        rig.tap(Vec2::ZERO);

        assert_eq!(rig.session.state(), SessionState::Running);
        assert!(rig.session.prompt_label().is_none());
        assert_eq!(rig.label(rig.session.score_label()), "0");
        assert_eq!(rig.session.obstacles().len(), 1);
        // Spawn loop + one expiry
        assert_eq!(rig.timers.pending(), 2);
        assert_eq!(
            rig.session.drain_events(),
            vec![GameEvent::Started, GameEvent::ObstacleSpawned(1)]
        );
    }

    #[test]
    fn test_drag_is_ignored_before_start() {
        let mut rig = Rig::new(MemoryStore::new());
        let before = rig.session.player().size;
        rig.call(|s, h| s.on_pointer_move(Vec2::new(50.0, 50.0), h));
        assert_eq!(rig.session.player().size, before);
    }

    #[test]
    fn test_drag_resizes_box() {
        let mut rig = Rig::new(MemoryStore::new());
        let initial = rig.session.config().initial_width();
        rig.call(|s, h| {
            s.on_pointer_down(Vec2::ZERO, h);
            s.on_pointer_move(Vec2::new(10.0, -20.0), h);
        });
        let size = rig.session.player().size;
        assert!((size.x - (initial + 25.0)).abs() < 1e-3);
        assert!((size.y - (initial - 50.0)).abs() < 1e-3);

        // Border only catches up on the next tick
        rig.call(|s, h| s.tick(SIM_DT, h));
        let border = rig.scene.node(rig.session.border_node()).unwrap();
        assert_eq!(border.frame, rig.session.player().frame());
    }

    #[test]
    fn test_scoring_and_death() {
        let mut rig = Rig::new(MemoryStore::with(HIGH_SCORE_KEY, 1));
        rig.tap(Vec2::ZERO);

        for _ in 0..3 {
            rig.contact(PhysicsCategory::Border, PhysicsCategory::Score);
        }
        assert_eq!(rig.session.score(), 3);
        assert_eq!(rig.label(rig.session.score_label()), "3");

        rig.contact(PhysicsCategory::Wall, PhysicsCategory::Border);
        assert_eq!(rig.session.state(), SessionState::Dead);
        assert_eq!(rig.session.high_score(), 3);
        assert_eq!(rig.store.get_integer(HIGH_SCORE_KEY), Some(3));
        assert!(rig.session.restart_bounds().is_some());
        assert_eq!(rig.timers.pending(), 0);

        // Dead: no more points, no second death
        rig.session.drain_events();
        rig.contact(PhysicsCategory::Score, PhysicsCategory::Border);
        rig.contact(PhysicsCategory::Border, PhysicsCategory::Wall);
        assert_eq!(rig.session.score(), 3);
        assert!(rig.session.drain_events().is_empty());
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut rig = Rig::new(MemoryStore::with(HIGH_SCORE_KEY, 10));
        rig.tap(Vec2::ZERO);
        rig.contact(PhysicsCategory::Score, PhysicsCategory::Border);
        rig.contact(PhysicsCategory::Border, PhysicsCategory::Wall);

        assert_eq!(rig.session.high_score(), 10);
        assert_eq!(rig.store.get_integer(HIGH_SCORE_KEY), Some(10));
        let events = rig.session.drain_events();
        assert!(events.contains(&GameEvent::Died {
            score: 1,
            new_high_score: false
        }));
        let prompt = rig.session.prompt_label().unwrap();
        assert_eq!(rig.label(prompt), "High Score: 10");
    }

    #[test]
    fn test_unknown_pairs_are_ignored() {
        let mut rig = Rig::new(MemoryStore::new());
        rig.tap(Vec2::ZERO);
        rig.session.drain_events();
        rig.contact(PhysicsCategory::Border, PhysicsCategory::OuterWall);
        rig.contact(PhysicsCategory::Wall, PhysicsCategory::Score);
        assert_eq!(rig.session.state(), SessionState::Running);
        assert_eq!(rig.session.score(), 0);
        assert!(rig.session.drain_events().is_empty());
    }

    #[test]
    fn test_restart_outside_button_does_nothing() {
        let mut rig = Rig::new(MemoryStore::new());
        rig.tap(Vec2::ZERO);
        rig.contact(PhysicsCategory::Border, PhysicsCategory::Wall);

        rig.tap(Vec2::new(360.0, 600.0));
        assert_eq!(rig.session.state(), SessionState::Dead);
        assert_eq!(rig.session.restart_count(), 0);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut rig = Rig::new(MemoryStore::new());
        rig.tap(Vec2::ZERO);
        rig.contact(PhysicsCategory::Border, PhysicsCategory::Score);
        rig.contact(PhysicsCategory::Border, PhysicsCategory::Wall);

        let center = rig.session.restart_bounds().unwrap().center;
        rig.tap(center);

        assert_eq!(rig.session.state(), SessionState::Running);
        assert_eq!(rig.session.score(), 0);
        assert_eq!(rig.session.restart_count(), 1);
        assert!(rig.session.restart_bounds().is_none());
        assert!(rig.session.prompt_label().is_none());
        assert_eq!(rig.label(rig.session.score_label()), "0");
        // Fresh spawn loop with a single fresh obstacle
        assert_eq!(rig.session.obstacles().len(), 1);
        assert_eq!(rig.session.obstacles()[0].id, 2);
        assert_eq!(rig.timers.pending(), 2);
        assert_eq!(
            rig.session.player().size,
            Vec2::splat(rig.session.config().initial_width())
        );
    }

    #[test]
    fn test_obstacles_grow_until_frozen() {
        let mut rig = Rig::new(MemoryStore::new());
        rig.tap(Vec2::ZERO);
        let group = rig.session.obstacles()[0].clone();
        let frame = |rig: &Rig, id: NodeId| rig.scene.node(id).unwrap().frame;

        assert_eq!(frame(&rig, group.wall).size, Vec2::ZERO);
        let arena = rig.session.config().arena_size();
        assert_eq!(frame(&rig, group.outer_wall), Rect::centered(arena));

        // Halfway through the approach
        rig.call(|s, h| s.tick(1.0, h));
        assert_eq!(frame(&rig, group.wall).size, Vec2::new(150.0, 250.0));
        assert_eq!(frame(&rig, group.score_gap).size, Vec2::new(190.0, 290.0));

        // A wall hit stops the growth where it is
        rig.contact(PhysicsCategory::Border, PhysicsCategory::Wall);
        rig.call(|s, h| s.tick(1.0, h));
        assert_eq!(frame(&rig, group.wall).size, Vec2::new(150.0, 250.0));
    }

    #[test]
    fn test_clock_keeps_running_after_long_uptime() {
        let mut rig = Rig::new(MemoryStore::new());
        rig.call(|s, h| s.tick(530_000.0, h));
        let before = rig.session.elapsed();
        rig.call(|s, h| s.tick(SIM_DT, h));
        assert!(rig.session.elapsed() > before);

        // Obstacles spawned this late still advance
        rig.tap(Vec2::ZERO);
        let wall = rig.session.obstacles()[0].wall;
        rig.call(|s, h| s.tick(SIM_DT, h));
        assert!(rig.scene.node(wall).unwrap().frame.size.x > 0.0);
    }

    #[test]
    fn test_stale_expiry_is_ignored() {
        let mut rig = Rig::new(MemoryStore::new());
        rig.tap(Vec2::ZERO);
        rig.call(|s, h| s.on_timer(TimerEvent::ExpireObstacle(99), h));
        assert_eq!(rig.session.obstacles().len(), 1);

        rig.call(|s, h| s.on_timer(TimerEvent::ExpireObstacle(1), h));
        assert!(rig.session.obstacles().is_empty());
    }
}
