//! Best-score tracking
//!
//! A single integer persisted through a [`KeyValueStore`]. It only ever
//! goes up, and only when a run ends.

use crate::persistence::KeyValueStore;

/// Persisted best score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    key: String,
    best: u64,
}

impl HighScore {
    /// Read the stored best score. Missing or negative values count as zero.
    pub fn load(store: &dyn KeyValueStore, key: &str) -> Self {
        let best = store
            .get_integer(key)
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(0);
        log::info!("Loaded high score {best}");
        Self {
            key: key.to_string(),
            best,
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true (and persists) if it set a new best.
    pub fn record(&mut self, score: u64, store: &mut dyn KeyValueStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        store.set_integer(&self.key, i64::try_from(score).unwrap_or(i64::MAX));
        log::info!("New high score {score} saved");
        true
    }
}
