//! Time-windowed deduplication of event hashes.
//!
//! The gateway may redeliver the same event when a poll window is re-read. [`Deduper::seen`]
//! turns that at-least-once delivery into at-most-once handling: the first sighting of a hash
//! wins, and repeats within `ttl` of that first sighting are reported as duplicates.
//!
//! A sweep task started by [`Deduper::new`] drops entries older than `ttl` once per `ttl`, so a
//! stale key lives at most about twice the TTL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

/// Default time-to-live for deduplication entries.
pub const DEDUP_TTL: Duration = Duration::from_secs(30);

type Entries = Arc<Mutex<HashMap<String, Instant>>>;

/// Thread-safe set of recently seen hashes with automatic expiry.
pub struct Deduper {
    entries: Entries,
    ttl: Duration,
    stop_tx: watch::Sender<bool>,
}

fn lock(entries: &Entries) -> MutexGuard<'_, HashMap<String, Instant>> {
    // A poisoned map only ever holds timestamps; keep using it.
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Deduper {
    /// Creates a deduper and spawns its sweep task. Must be called inside a tokio runtime.
    pub fn new(ttl: Duration) -> Self {
        let entries: Entries = Arc::new(Mutex::new(HashMap::new()));
        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(sweep_loop(entries.clone(), ttl, stop_rx));
        Self {
            entries,
            ttl,
            stop_tx,
        }
    }

    /// Returns true if `hash` was first seen less than `ttl` ago. Otherwise records `hash` as seen
    /// now and returns false.
    ///
    /// Duplicates do not refresh the timestamp, so a burst of repeats expires on the schedule of
    /// the first sighting.
    pub fn seen(&self, hash: &str) -> bool {
        let now = Instant::now();
        let mut entries = lock(&self.entries);
        if let Some(first_seen) = entries.get(hash) {
            if now.saturating_duration_since(*first_seen) <= self.ttl {
                return true;
            }
        }
        entries.insert(hash.to_string(), now);
        false
    }

    /// Stops the sweep task. Idempotent; `seen` keeps working afterwards without auto-eviction.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for Deduper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Removes entries older than `ttl`. Returns how many were dropped.
fn sweep(entries: &Entries, ttl: Duration) -> usize {
    let now = Instant::now();
    let mut entries = lock(entries);
    let before = entries.len();
    entries.retain(|_, first_seen| now.saturating_duration_since(*first_seen) <= ttl);
    before - entries.len()
}

async fn sweep_loop(entries: Entries, ttl: Duration, mut stop_rx: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval_at(Instant::now() + ttl, ttl);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = sweep(&entries, ttl);
                if removed > 0 {
                    debug!(removed, "dedup sweep");
                }
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    info!("dedup sweep stopped");
                    return;
                }
            }
        }
    }
}
