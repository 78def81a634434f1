use clap::Parser;
use danmaku_overlay::clock::SystemClock;
use danmaku_overlay::config::OverlayConfig;
use danmaku_overlay::generator::CommentaryGenerator;
use danmaku_overlay::surface::HeadlessSurface;
use danmaku_overlay::{DanmakuEngine, Origin};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Headless danmaku overlay demo: feeds generated commentary and scripted
/// user input through the engine and logs surface activity.
#[derive(Parser)]
#[command(name = "danmaku-sim")]
#[command(about = "Danmaku overlay engine demo (headless surface)")]
struct Cli {
    /// Scroll speed 1-11 (higher is faster).
    #[arg(long, default_value_t = 5)]
    speed: u8,

    /// How long to run, in seconds.
    #[arg(long, default_value_t = 12)]
    seconds: u64,

    /// Interval between generated commentary items, in milliseconds.
    #[arg(long, default_value_t = 1500)]
    ai_interval_ms: u64,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 480.0)]
    height: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = OverlayConfig::load();
    config.speed = cli.speed.clamp(1, 11);
    config.save();

    let surface = Rc::new(HeadlessSurface::new(cli.height));
    let engine = DanmakuEngine::new(config, surface.clone(), Rc::new(SystemClock));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let local = tokio::task::LocalSet::new();

    local.block_on(&runtime, async {
        let ticker = {
            let engine = engine.clone();
            tokio::task::spawn_local(async move { engine.run().await })
        };

        let feeder = {
            let engine = engine.clone();
            let interval_ms = cli.ai_interval_ms;
            tokio::task::spawn_local(async move {
                let mut generator = CommentaryGenerator::new();
                let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
                let started = Instant::now();
                loop {
                    interval.tick().await;
                    let line = generator.generate(started.elapsed().as_secs());
                    if let Err(err) = engine.submit(&line, Origin::Ai) {
                        tracing::warn!(%err, "generated line rejected");
                    }
                }
            })
        };

        let viewer = {
            let engine = engine.clone();
            let run_secs = cli.seconds;
            tokio::task::spawn_local(async move {
                tokio::time::sleep(Duration::from_millis(800)).await;
                if let Err(err) = engine.submit("First!", Origin::User) {
                    tracing::warn!(%err, "user line rejected");
                }

                // Toggle the overlay off and back on mid-run to show replay.
                tokio::time::sleep(Duration::from_secs(run_secs / 2)).await;
                engine.set_enabled(false);
                tokio::time::sleep(Duration::from_secs(1)).await;
                engine.set_enabled(true);

                let _ = engine.submit("This replay never gets old", Origin::User);
            })
        };

        tokio::time::sleep(Duration::from_secs(cli.seconds)).await;
        ticker.abort();
        feeder.abort();
        viewer.abort();

        let stats = engine.stats();
        tracing::info!(
            active = stats.active,
            queued = stats.queued,
            labels = surface.label_count(),
            "demo finished"
        );

        let doc = engine.export();
        match doc.to_json_pretty() {
            Ok(json) => println!("{json}"),
            Err(err) => tracing::error!(%err, "export serialization failed"),
        }
    });

    Ok(())
}
