//! Overlay toggle semantics and backlog replay.

mod common;

use common::{TICK, advance, test_engine};
use danmaku_overlay::Origin;
use std::time::Duration;

#[test]
fn disable_clears_surface_but_keeps_backlog() {
    let (engine, surface, _clock) = test_engine();
    for i in 0..3 {
        engine.submit(&format!("msg {i}"), Origin::User).unwrap();
    }
    assert_eq!(surface.label_count(), 3);

    engine.set_enabled(false);
    assert_eq!(surface.label_count(), 0);
    assert_eq!(engine.stats().active, 0);
    assert_eq!(engine.stats().queued, 3);
}

#[test]
fn enable_replays_every_backlog_item() {
    let (engine, surface, _clock) = test_engine();
    for i in 0..5 {
        engine.submit(&format!("msg {i}"), Origin::User).unwrap();
    }
    engine.set_enabled(false);
    engine.set_enabled(true);
    assert_eq!(surface.label_count(), 5);
    assert_eq!(engine.stats().active, 5);
}

#[test]
fn items_admitted_while_disabled_replay_later() {
    let (engine, surface, _clock) = test_engine();
    engine.set_enabled(false);
    for i in 0..4 {
        engine.submit(&format!("queued {i}"), Origin::Ai).unwrap();
    }
    assert_eq!(surface.label_count(), 0);
    assert_eq!(engine.stats().queued, 4);

    engine.set_enabled(true);
    assert_eq!(surface.label_count(), 4);
}

#[test]
fn repeated_enable_is_idempotent() {
    let (engine, surface, _clock) = test_engine();
    for i in 0..3 {
        engine.submit(&format!("msg {i}"), Origin::User).unwrap();
    }
    engine.set_enabled(true);
    engine.set_enabled(true);
    assert_eq!(surface.label_count(), 3, "re-enable must not double-spawn");

    engine.set_enabled(false);
    engine.set_enabled(false);
    assert_eq!(surface.label_count(), 0);
    assert_eq!(engine.stats().queued, 3);
}

#[test]
fn replay_restarts_each_lifetime() {
    let (engine, surface, clock) = test_engine();
    engine.submit("reborn", Origin::User).unwrap();

    // Burn most of the original lifetime, then toggle.
    advance(&engine, &clock, Duration::from_secs(5));
    engine.set_enabled(false);
    engine.set_enabled(true);

    let entry = &engine.active_entries()[0];
    assert_eq!(entry.spawn_time, clock_now(&clock), "spawn time must reset");

    // A fresh 7 seconds from the toggle, not 2 leftover ones.
    advance(&engine, &clock, Duration::from_secs(7) - TICK);
    assert_eq!(surface.label_count(), 1);
    advance(&engine, &clock, TICK);
    assert_eq!(surface.label_count(), 0);
}

#[test]
fn clear_all_discards_backlog_and_surface() {
    let (engine, surface, _clock) = test_engine();
    for i in 0..6 {
        engine.submit(&format!("msg {i}"), Origin::User).unwrap();
    }
    engine.clear_all();
    assert_eq!(surface.label_count(), 0);
    assert_eq!(engine.stats().queued, 0);
    assert_eq!(engine.pending_removals(), 0);

    // Re-enabling has nothing to replay.
    engine.set_enabled(false);
    engine.set_enabled(true);
    assert_eq!(surface.label_count(), 0);
}

fn clock_now(clock: &danmaku_overlay::clock::ManualClock) -> std::time::Instant {
    use danmaku_overlay::clock::Clock;
    clock.now()
}
