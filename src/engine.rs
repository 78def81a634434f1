//! Admission & toggle controller: the engine's public surface.
//!
//! `DanmakuEngine` is a cloneable handle over single-threaded shared state.
//! Every collaborator (composition UI, settings UI, network completion
//! callbacks, the tick driver) holds a clone of the same engine; there is no
//! process-wide instance.

use crate::active::ActiveRenderSet;
use crate::backlog::BacklogQueue;
use crate::clock::{Clock, SystemClock};
use crate::config::OverlayConfig;
use crate::error::Result;
use crate::item::{DanmakuItem, Origin};
use crate::scheduler::{RemovalTimers, fade_opacity, progress};
use crate::surface::RenderSurface;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Visible lifetime for a speed setting: `(12 - speed)` seconds, so higher
/// speed means a shorter run across the surface. Speed is clamped to 1..=11.
pub fn duration_for_speed(speed: u8) -> Duration {
    Duration::from_millis(u64::from(12 - speed.clamp(1, 11)) * 1000)
}

/// Counts reported by [`DanmakuEngine::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStats {
    pub active: usize,
    pub queued: usize,
    pub total: usize,
}

/// On-demand export document: a dated snapshot of the backlog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub export_date: String,
    pub stats: OverlayStats,
    pub items: Vec<DanmakuItem>,
}

impl ExportSnapshot {
    /// Serialize for download.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a previously exported document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Point-in-time view of one active entry, for UIs and assertions.
#[derive(Debug, Clone)]
pub struct ActiveEntryView {
    pub item_id: String,
    pub spawn_time: Instant,
    pub duration: Duration,
}

struct EngineState {
    config: OverlayConfig,
    backlog: BacklogQueue,
    active: ActiveRenderSet,
    timers: RemovalTimers,
    rng: StdRng,
    next_local_id: u64,
}

/// Danmaku queueing & rendering engine.
#[derive(Clone)]
pub struct DanmakuEngine {
    state: Rc<RefCell<EngineState>>,
    surface: Rc<dyn RenderSurface>,
    clock: Rc<dyn Clock>,
}

impl DanmakuEngine {
    pub fn new(
        config: OverlayConfig,
        surface: Rc<dyn RenderSurface>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let state = EngineState {
            backlog: BacklogQueue::new(config.max_backlog),
            active: ActiveRenderSet::new(),
            timers: RemovalTimers::new(),
            rng: StdRng::from_entropy(),
            next_local_id: 1,
            config,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            surface,
            clock,
        }
    }

    /// Engine with default settings and the system clock.
    pub fn with_surface(surface: Rc<dyn RenderSurface>) -> Self {
        Self::new(OverlayConfig::default(), surface, Rc::new(SystemClock))
    }

    /// Reseed the placement RNG (deterministic positions in tests).
    pub fn seed_rng(&self, seed: u64) {
        self.state.borrow_mut().rng = StdRng::seed_from_u64(seed);
    }

    /// Validate and admit locally produced text. Returns the new item id.
    ///
    /// The item always lands in the backlog; it is spawned onto the surface
    /// only while the overlay is enabled. On a validation error no state
    /// changes; the caller surfaces the warning.
    pub fn submit(&self, text: &str, origin: Origin) -> Result<String> {
        let id = self.next_local_id();
        let item = DanmakuItem::new(id, text, origin, chrono::Utc::now().timestamp_millis())?;
        let item_id = item.id.clone();
        self.admit(item);
        Ok(item_id)
    }

    /// Admit an already-constructed item (server push, completed network
    /// submission, import). Spawns only if the overlay is enabled right now.
    pub fn admit(&self, item: DanmakuItem) {
        let mut state = self.state.borrow_mut();
        tracing::debug!(id = %item.id, origin = item.origin.as_str(), "danmaku admitted");
        if state.config.enabled {
            let now = self.clock.now();
            let duration = duration_for_speed(state.config.speed);
            let EngineState {
                active,
                timers,
                rng,
                ..
            } = &mut *state;
            active.spawn(&item, duration, now, self.surface.as_ref(), rng, timers);
        }
        state.backlog.push(item);
    }

    /// Admit `items` in order. Invalid items are skipped, valid ones
    /// admitted; returns how many were admitted.
    pub fn batch_admit<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = DanmakuItem>,
    {
        let mut admitted = 0;
        for item in items {
            match DanmakuItem::new(item.id, &item.text, item.origin, item.created_at) {
                Ok(item) => {
                    self.admit(item);
                    admitted += 1;
                }
                Err(err) => tracing::debug!(%err, "skipping invalid item in batch"),
            }
        }
        admitted
    }

    /// Toggle the overlay. Enabling replays the whole backlog as fresh
    /// spawns (each restarts its lifetime from now); disabling clears the
    /// surface and cancels pending removals but keeps the backlog. Calls
    /// that do not change the state are no-ops.
    pub fn set_enabled(&self, show: bool) {
        let mut state = self.state.borrow_mut();
        if state.config.enabled == show {
            return;
        }
        state.config.enabled = show;
        if show {
            let now = self.clock.now();
            let duration = duration_for_speed(state.config.speed);
            let EngineState {
                backlog,
                active,
                timers,
                rng,
                ..
            } = &mut *state;
            for item in backlog.snapshot() {
                active.spawn(&item, duration, now, self.surface.as_ref(), rng, timers);
            }
            tracing::info!(replayed = backlog.len(), "overlay enabled");
        } else {
            let EngineState { active, timers, .. } = &mut *state;
            active.clear(self.surface.as_ref(), timers);
            tracing::info!("overlay disabled, surface cleared");
        }
    }

    /// Set the scroll speed (clamped to 1..=11). Live entries change their
    /// visual pace immediately; their scheduled removal stays as spawned.
    pub fn set_speed(&self, speed: u8) {
        let speed = speed.clamp(1, 11);
        let mut state = self.state.borrow_mut();
        state.config.speed = speed;
        let duration = duration_for_speed(speed);
        for entry in state.active.iter_mut() {
            entry.duration = duration;
            self.surface.set_animation_duration(entry.handle, duration);
        }
        tracing::debug!(speed, "speed changed");
    }

    /// Drop everything: surface labels, pending removals, and the backlog.
    /// The only operation that discards history.
    pub fn clear_all(&self) {
        let mut state = self.state.borrow_mut();
        let EngineState {
            backlog,
            active,
            timers,
            ..
        } = &mut *state;
        active.clear(self.surface.as_ref(), timers);
        backlog.clear();
        tracing::info!("overlay cleared");
    }

    /// Advance the engine: fire due removal timers, then run the fade pass.
    /// Both read a single clock sample, so removal stays authoritative even
    /// when ticks are delayed.
    pub fn pump(&self) {
        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        let EngineState { active, timers, .. } = &mut *state;
        for entry_id in timers.due(now) {
            active.remove(entry_id, self.surface.as_ref(), timers);
        }
        for entry in active.iter() {
            let p = progress(entry.spawn_time, now, entry.duration);
            if let Some(opacity) = fade_opacity(p) {
                self.surface.set_opacity(entry.handle, opacity as f32);
            }
        }
    }

    /// Drive the decay scheduler until the task is dropped or aborted.
    /// Not `Send`; run it on a `LocalSet`.
    pub async fn run(&self) {
        let tick = self.state.borrow().config.tick();
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.pump();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().config.enabled
    }

    pub fn speed(&self) -> u8 {
        self.state.borrow().config.speed
    }

    pub fn stats(&self) -> OverlayStats {
        let state = self.state.borrow();
        let active = state.active.len();
        let queued = state.backlog.len();
        OverlayStats {
            active,
            queued,
            total: active + queued,
        }
    }

    /// Snapshot of the backlog in insertion order.
    pub fn snapshot(&self) -> Vec<DanmakuItem> {
        self.state.borrow().backlog.snapshot().collect()
    }

    /// Up to `limit` most recent backlog items, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<DanmakuItem> {
        self.state.borrow().backlog.recent(limit)
    }

    /// Up to `limit` most recent backlog items of one origin, oldest first.
    pub fn by_origin(&self, origin: Origin, limit: usize) -> Vec<DanmakuItem> {
        self.state.borrow().backlog.by_origin(origin, limit)
    }

    /// Case-insensitive substring search over backlog text.
    pub fn search(&self, keyword: &str, limit: usize) -> Vec<DanmakuItem> {
        self.state.borrow().backlog.search(keyword, limit)
    }

    /// Views of the current active entries, in no particular order.
    pub fn active_entries(&self) -> Vec<ActiveEntryView> {
        self.state
            .borrow()
            .active
            .iter()
            .map(|entry| ActiveEntryView {
                item_id: entry.item_id.clone(),
                spawn_time: entry.spawn_time,
                duration: entry.duration,
            })
            .collect()
    }

    /// Number of scheduled (not yet fired or cancelled) removals.
    pub fn pending_removals(&self) -> usize {
        self.state.borrow().timers.pending()
    }

    /// On-demand export document for download.
    pub fn export(&self) -> ExportSnapshot {
        ExportSnapshot {
            export_date: chrono::Local::now().to_rfc3339(),
            stats: self.stats(),
            items: self.snapshot(),
        }
    }

    /// Re-admit a previously exported document, preserving item order.
    /// Returns how many items were admitted.
    pub fn import(&self, snapshot: ExportSnapshot) -> usize {
        self.batch_admit(snapshot.items)
    }

    fn next_local_id(&self) -> String {
        let mut state = self.state.borrow_mut();
        let n = state.next_local_id;
        state.next_local_id += 1;
        format!("local-{n}")
    }
}
