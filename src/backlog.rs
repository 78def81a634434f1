//! Bounded, insertion-ordered backlog of admitted items.
//!
//! The backlog is the source of truth for replay and export: it retains the
//! most recent `max_capacity` items regardless of what is currently visible.
//! Capacity eviction is silent and expected, never an error.

use crate::item::{DanmakuItem, Origin};
use std::collections::VecDeque;

/// Default number of retained items.
pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug)]
pub struct BacklogQueue {
    items: VecDeque<DanmakuItem>,
    max_capacity: usize,
}

impl BacklogQueue {
    pub fn new(max_capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(max_capacity),
            max_capacity,
        }
    }

    /// Append an item, evicting the oldest first when over capacity.
    pub fn push(&mut self, item: DanmakuItem) {
        self.items.push_back(item);
        while self.items.len() > self.max_capacity {
            if let Some(evicted) = self.items.pop_front() {
                tracing::trace!(id = %evicted.id, "backlog full, evicting oldest");
            }
        }
    }

    /// In-order iterator over the current items. Calling again restarts from
    /// the current head.
    pub fn snapshot(&self) -> impl Iterator<Item = DanmakuItem> + '_ {
        self.items.iter().cloned()
    }

    /// Empty the queue. Active render entries are unaffected.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_capacity
    }

    /// Up to `limit` most recent items, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<DanmakuItem> {
        let skip = self.items.len().saturating_sub(limit);
        self.items.iter().skip(skip).cloned().collect()
    }

    /// Up to `limit` most recent items of one origin, oldest first.
    pub fn by_origin(&self, origin: Origin, limit: usize) -> Vec<DanmakuItem> {
        let matched: Vec<DanmakuItem> = self
            .items
            .iter()
            .filter(|item| item.origin == origin)
            .cloned()
            .collect();
        let skip = matched.len().saturating_sub(limit);
        matched.into_iter().skip(skip).collect()
    }

    /// Case-insensitive substring search over item text, oldest first.
    pub fn search(&self, keyword: &str, limit: usize) -> Vec<DanmakuItem> {
        let needle = keyword.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.text.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Origin;

    fn item(id: &str, text: &str, origin: Origin) -> DanmakuItem {
        DanmakuItem::new(id, text, origin, 0).unwrap()
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut queue = BacklogQueue::new(10);
        for i in 0..5 {
            queue.push(item(&format!("i{i}"), &format!("message {i}"), Origin::User));
        }
        let recent = queue.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "i3");
        assert_eq!(recent[1].id, "i4");
    }

    #[test]
    fn by_origin_filters_and_limits() {
        let mut queue = BacklogQueue::new(10);
        queue.push(item("u1", "from user", Origin::User));
        queue.push(item("a1", "from ai", Origin::Ai));
        queue.push(item("u2", "more user", Origin::User));
        queue.push(item("a2", "more ai", Origin::Ai));

        let ai = queue.by_origin(Origin::Ai, 10);
        assert_eq!(
            ai.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            ["a1", "a2"]
        );
        let last_user = queue.by_origin(Origin::User, 1);
        assert_eq!(last_user.len(), 1);
        assert_eq!(last_user[0].id, "u2");
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut queue = BacklogQueue::new(10);
        queue.push(item("1", "Great Parry", Origin::User));
        queue.push(item("2", "nice touch", Origin::User));
        queue.push(item("3", "another parry there", Origin::Ai));

        let hits = queue.search("PARRY", 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "1");
        assert_eq!(hits[1].id, "3");
        assert_eq!(queue.search("parry", 1).len(), 1);
    }
}
