//! Decay scheduling: one-shot removal timers plus the cosmetic fade curve.
//!
//! Two mechanisms share one clock sample per pump. The per-entry removal
//! timer is authoritative: it fires exactly once at `spawn + duration` and
//! is unaffected by later pace changes. The fade is best-effort cosmetic;
//! a delayed tick can only make the fade lag, never the removal.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default period of the shared decay tick.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Fraction of lifetime after which the fade-out begins.
pub const FADE_START: f64 = 0.8;

/// A scheduled hard removal for one active entry.
#[derive(Debug)]
pub struct PendingTimer {
    pub id: u64,
    pub fire_at: Instant,
    /// Entry this timer removes when it fires.
    pub entry_id: u64,
    pub cancelled: bool,
}

/// One-shot removal timers, processed against an externally sampled `now`.
///
/// Cancellation marks the record and drops it on the next scan, so a stale
/// timer can never fire after its entry was force-removed.
#[derive(Debug)]
pub struct RemovalTimers {
    timers: VecDeque<PendingTimer>,
    next_id: u64,
}

impl RemovalTimers {
    pub fn new() -> Self {
        Self {
            timers: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Schedule removal of `entry_id` at `fire_at`. Returns the timer id.
    pub fn schedule(&mut self, entry_id: u64, fire_at: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push_back(PendingTimer {
            id,
            fire_at,
            entry_id,
            cancelled: false,
        });
        id
    }

    /// Cancel a single timer. Unknown ids are ignored.
    pub fn cancel(&mut self, timer_id: u64) {
        for timer in self.timers.iter_mut() {
            if timer.id == timer_id {
                timer.cancelled = true;
                break;
            }
        }
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        for timer in self.timers.iter_mut() {
            timer.cancelled = true;
        }
    }

    /// Drain timers due at `now`; returns the entry ids to remove.
    /// Cancelled timers are dropped without firing.
    pub fn due(&mut self, now: Instant) -> Vec<u64> {
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].cancelled {
                self.timers.remove(i);
                continue;
            }
            if self.timers[i].fire_at <= now {
                if let Some(timer) = self.timers.remove(i) {
                    fired.push(timer.entry_id);
                }
                continue;
            }
            i += 1;
        }
        fired
    }

    /// Number of live (not cancelled) timers.
    pub fn pending(&self) -> usize {
        self.timers.iter().filter(|t| !t.cancelled).count()
    }
}

impl Default for RemovalTimers {
    fn default() -> Self {
        Self::new()
    }
}

/// Fraction of `duration` elapsed since `spawn_time`. May exceed 1.0 when
/// the pace duration was shortened after spawn.
pub fn progress(spawn_time: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    now.saturating_duration_since(spawn_time).as_secs_f64() / duration.as_secs_f64()
}

/// Opacity for a given lifetime fraction: `None` while fully opaque, then a
/// linear fade from 1 to 0 over the last 20% of the lifetime.
pub fn fade_opacity(progress: f64) -> Option<f64> {
    if progress <= FADE_START {
        return None;
    }
    Some((1.0 - (progress - FADE_START) * 5.0).clamp(0.0, 1.0))
}
