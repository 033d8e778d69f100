//! Logical timer queue
//!
//! Implements [`Scheduler`] on simulation time. The host advances the queue
//! by each step's `dt` and hands the fired events back to the session.
//! Absolute time is kept in `f64` so that small steps still register after
//! days of uptime; durations and steps stay `f32`.

use crate::sim::{Scheduler, TimerEvent};

#[derive(Debug, Clone)]
struct Timer {
    due: f64,
    period: Option<f64>,
    event: TimerEvent,
    /// Insertion order, breaks ties between timers due at the same time
    seq: u64,
}

/// Pending one-shot and repeating timers
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: f64,
    timers: Vec<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of armed timers (a repeating timer counts once)
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Advance time by `dt` and return every event that fell due, in firing order.
    ///
    /// A repeating timer can fire several times in one call if `dt` spans
    /// several periods.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerEvent> {
        let target = self.now + f64::from(dt.max(0.0));
        let mut fired = Vec::new();

        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= target)
                .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
                .map(|(i, _)| i);
            let Some(index) = next else {
                break;
            };

            let mut timer = self.timers.swap_remove(index);
            self.now = self.now.max(timer.due);
            fired.push(timer.event);

            if let Some(period) = timer.period {
                timer.due += period;
                timer.seq = self.bump_seq();
                self.timers.push(timer);
            }
        }

        self.now = target;
        fired
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn schedule(&mut self, delay: f32, period: Option<f32>, event: TimerEvent) {
        let seq = self.bump_seq();
        self.timers.push(Timer {
            due: self.now + f64::from(delay.max(0.0)),
            period: period.map(f64::from),
            event,
            seq,
        });
    }
}

impl Scheduler for TimerQueue {
    fn after(&mut self, delay: f32, event: TimerEvent) {
        self.schedule(delay, None, event);
    }

    fn every(&mut self, period: f32, event: TimerEvent) {
        if !(period > 0.0) {
            log::warn!("Ignoring repeating timer with period {period}");
            return;
        }
        self.schedule(period, Some(period), event);
    }

    fn cancel_all(&mut self) {
        self.timers.clear();
    }
}
