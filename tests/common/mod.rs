//! Shared test helpers.

use danmaku_overlay::DanmakuEngine;
use danmaku_overlay::clock::ManualClock;
use danmaku_overlay::config::OverlayConfig;
use danmaku_overlay::surface::HeadlessSurface;
use std::rc::Rc;
use std::time::Duration;

/// Scheduler tick period used by the tests.
#[allow(dead_code)]
pub const TICK: Duration = Duration::from_millis(100);

/// Engine wired to a headless surface and a manually driven clock.
#[allow(dead_code)]
pub fn test_engine() -> (DanmakuEngine, Rc<HeadlessSurface>, ManualClock) {
    test_engine_with(OverlayConfig::default())
}

/// Same, with a caller-provided config.
#[allow(dead_code)]
pub fn test_engine_with(
    config: OverlayConfig,
) -> (DanmakuEngine, Rc<HeadlessSurface>, ManualClock) {
    let surface = Rc::new(HeadlessSurface::new(480.0));
    let clock = ManualClock::new();
    let engine = DanmakuEngine::new(config, surface.clone(), Rc::new(clock.clone()));
    engine.seed_rng(7);
    (engine, surface, clock)
}

/// Advance the clock in scheduler-tick steps, pumping after each step.
#[allow(dead_code)]
pub fn advance(engine: &DanmakuEngine, clock: &ManualClock, total: Duration) {
    let mut remaining = total;
    while remaining > Duration::ZERO {
        let step = remaining.min(TICK);
        clock.advance(step);
        engine.pump();
        remaining -= step;
    }
}
