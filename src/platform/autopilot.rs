//! Scripted player
//!
//! Plays the headless game for demos and soak tests: it shapes the box so
//! the wall sits inside it while the border straddles the scoring gap,
//! banks a few points, then shrinks into the wall on purpose and taps
//! restart.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::persistence::KeyValueStore;
use crate::sim::SessionState;

use super::headless::HeadlessGame;

/// Drives a [`HeadlessGame`] through pointer events only
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Points to bank before dying on purpose
    target_score: u64,
    /// Restarts left to perform
    restarts_left: u32,
}

impl Autopilot {
    pub fn new(seed: u64, restarts: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let target_score = rng.random_range(1..=3);
        Self {
            rng,
            target_score,
            restarts_left: restarts,
        }
    }

    pub fn target_score(&self) -> u64 {
        self.target_score
    }

    pub fn restarts_left(&self) -> u32 {
        self.restarts_left
    }

    /// True once the last run has ended and no restarts remain
    pub fn finished<S: KeyValueStore>(&self, game: &HeadlessGame<S>) -> bool {
        game.session().is_dead() && self.restarts_left == 0
    }

    /// Issue this frame's input
    pub fn drive<S: KeyValueStore>(&mut self, game: &mut HeadlessGame<S>) {
        let session = game.session();
        match session.state() {
            SessionState::NotStarted => {
                let target = self.scoring_size(game);
                drag_to(game, target);
            }
            SessionState::Running => {
                let target = if session.score() >= self.target_score {
                    Vec2::splat(session.config().min_box_extent())
                } else {
                    self.scoring_size(game)
                };
                if !session.player().size.abs_diff_eq(target, 0.5) {
                    drag_to(game, target);
                }
            }
            SessionState::Dead => {
                if self.restarts_left == 0 {
                    return;
                }
                if let Some(bounds) = session.restart_bounds() {
                    self.restarts_left -= 1;
                    self.target_score = self.rng.random_range(1..=3);
                    game.tap(bounds.center);
                    // Reshape before the fresh run's first group grows in
                    let target = self.scoring_size(game);
                    drag_to(game, target);
                }
            }
        }
    }

    /// A box that encloses the wall while its outline cuts through the scoring gap
    fn scoring_size<S: KeyValueStore>(&mut self, game: &HeadlessGame<S>) -> Vec2 {
        let config = game.session().config();
        let margin = self.rng.random_range(5.0..config.gap_size.max(6.0));
        let width = config.wall_width + 2.0 * config.gap_size + margin;
        let height = config.wall_height + config.gap_size;
        let min = Vec2::splat(config.min_box_extent());
        Vec2::new(width, height).clamp(min, config.max_box_size().max(min))
    }
}

/// Press at the box center and drag far enough to reach `target` size
fn drag_to<S: KeyValueStore>(game: &mut HeadlessGame<S>, target: Vec2) {
    let session = game.session();
    let anchor = session.player().center;
    let delta = (target - session.player().size) / session.config().drag_gain;
    game.pointer_down(anchor);
    game.pointer_move(anchor + delta);
    game.pointer_up(anchor + delta);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::MemoryStore;
    use crate::settings::GameConfig;

    #[test]
    fn test_autopilot_scores_dies_and_restarts() {
        let mut game = HeadlessGame::new(GameConfig::default(), MemoryStore::new());
        let mut pilot = Autopilot::new(7, 1);

        let mut best = 0;
        for _ in 0..(120.0 / SIM_DT) as u32 {
            pilot.drive(&mut game);
            game.step(SIM_DT);
            best = best.max(game.session().score());
            if pilot.finished(&game) {
                break;
            }
        }

        assert!(pilot.finished(&game));
        assert_eq!(game.session().restart_count(), 1);
        assert!(best >= 1);
        assert_eq!(game.session().high_score(), best);
    }
}
