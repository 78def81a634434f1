//! Active render set: the items currently visible on the surface.

use crate::item::DanmakuItem;
use crate::scheduler::RemovalTimers;
use crate::surface::{LABEL_HEIGHT, LabelSpec, LabelStyle, RenderSurface, SurfaceHandle};
use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// One visible label. Holds the item's identity, never the item; the
/// backlog remains the source of truth and may mutate independently.
#[derive(Debug)]
pub struct ActiveRenderEntry {
    pub item_id: String,
    pub spawn_time: Instant,
    /// Pace duration driving the fade. Updated when speed changes; the
    /// removal timer scheduled at spawn is not.
    pub duration: Duration,
    pub handle: SurfaceHandle,
    /// Hard-removal timer scheduled at spawn.
    pub removal_timer: u64,
}

#[derive(Debug)]
pub struct ActiveRenderSet {
    entries: HashMap<u64, ActiveRenderEntry>,
    next_id: u64,
}

impl ActiveRenderSet {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 1,
        }
    }

    /// Place `item` on the surface at a random vertical position, register
    /// the entry, and schedule its hard removal at `now + duration`.
    pub fn spawn(
        &mut self,
        item: &DanmakuItem,
        duration: Duration,
        now: Instant,
        surface: &dyn RenderSurface,
        rng: &mut impl Rng,
        timers: &mut RemovalTimers,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let span = surface.height() - LABEL_HEIGHT;
        let top = if span > 0.0 { rng.gen_range(0.0..span) } else { 0.0 };
        let handle = surface.create_label(&LabelSpec {
            text: item.text.clone(),
            style: LabelStyle::for_origin(item.origin),
            top,
            animation: duration,
        });
        let removal_timer = timers.schedule(id, now + duration);

        self.entries.insert(
            id,
            ActiveRenderEntry {
                item_id: item.id.clone(),
                spawn_time: now,
                duration,
                handle,
                removal_timer,
            },
        );
        id
    }

    /// Remove an entry, detaching its label and cancelling its pending
    /// removal timer. Idempotent: unknown ids are a no-op.
    pub fn remove(
        &mut self,
        entry_id: u64,
        surface: &dyn RenderSurface,
        timers: &mut RemovalTimers,
    ) -> bool {
        let Some(entry) = self.entries.remove(&entry_id) else {
            return false;
        };
        timers.cancel(entry.removal_timer);
        surface.remove_label(entry.handle);
        true
    }

    /// Remove every entry, detaching all labels and cancelling their timers.
    pub fn clear(&mut self, surface: &dyn RenderSurface, timers: &mut RemovalTimers) {
        for (_, entry) in self.entries.drain() {
            timers.cancel(entry.removal_timer);
            surface.remove_label(entry.handle);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveRenderEntry> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ActiveRenderEntry> {
        self.entries.values_mut()
    }
}

impl Default for ActiveRenderSet {
    fn default() -> Self {
        Self::new()
    }
}
