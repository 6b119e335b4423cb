//! TouchBridge headless engine entry point.
//!
//! Wires together the infrastructure adapters and starts the Tokio
//! async runtime. Touch samples arrive over stdin (see
//! `infrastructure::touch_source::stdin` for the line protocol) and
//! synthetic strokes leave through the logging gesture sink.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load settings           -- TOML from the platform config dir
//!  └─ TranslateTouchUseCase   -- engine + nudge driver thread
//!  └─ start services
//!       ├─ stroke pump         (Tokio task: sleeps out stroke durations)
//!       ├─ geometry watch pump (Tokio task: directory -> engine)
//!       └─ stdin touch source  (reader thread)
//! ```

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use touchbridge_core::{SurfaceGeometry, ThresholdPolicy};
use touchbridge_engine::application::dispatch_strokes::GestureSink;
use touchbridge_engine::application::translate_touch::TranslateTouchUseCase;
use touchbridge_engine::application::update_settings::UpdateSettingsUseCase;
use touchbridge_engine::infrastructure::display_directory::{
    fixed::FixedDisplayDirectory, DisplayDirectory,
};
use touchbridge_engine::infrastructure::gesture_sink::logging::LoggingGestureSink;
use touchbridge_engine::infrastructure::storage::settings::{
    load_config, save_config, AppConfig, EngineSettings,
};
use touchbridge_engine::infrastructure::touch_source::{stdin::start_stdin_source, SourceEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Settings are loaded before logging is initialised so the
    // configured level can serve as the fallback when RUST_LOG is unset.
    let (mut config, load_error) = match load_config() {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.engine.log_level)),
        )
        .init();

    info!("TouchBridge engine starting");
    if let Some(err) = load_error {
        warn!(%err, "settings unreadable; using defaults");
    }

    // Bad settings never stop the engine; they are logged and replaced.
    let policy = match config.thresholds.validate() {
        Ok(()) => config.thresholds,
        Err(err) => {
            warn!(%err, "invalid thresholds in settings; using defaults");
            ThresholdPolicy::default()
        }
    };
    let defaults = EngineSettings::default();
    let source = geometry_or(
        config.engine.source_geometry(),
        defaults.source_geometry(),
        "source",
    );
    let target = geometry_or(
        config.engine.target_geometry(),
        defaults.target_geometry(),
        "target",
    );

    // ── Display directory ─────────────────────────────────────────────────────
    let directory = Arc::new(FixedDisplayDirectory::new(target));
    let initial_target = directory.target_geometry()?;

    // ── Engine ────────────────────────────────────────────────────────────────
    let (sink, mut scheduled) = LoggingGestureSink::new();
    let engine = Arc::new(TranslateTouchUseCase::new(
        source,
        initial_target,
        policy,
        config.strokes,
        Arc::new(sink) as Arc<dyn GestureSink>,
    ));
    if !config.engine.enabled {
        engine.set_enabled(false);
    }
    let settings = UpdateSettingsUseCase::new(Arc::clone(&engine));

    // Shutdown flag shared across all background services.
    let running = Arc::new(AtomicBool::new(true));

    // ── Stroke completion pump ────────────────────────────────────────────────
    // At most one stroke is ever in flight, so sleeping out each stroke
    // in channel order reports completions in dispatch order.
    {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            while let Some(stroke) = scheduled.recv().await {
                tokio::time::sleep(Duration::from_millis(stroke.duration_ms)).await;
                engine.on_stroke_completed(stroke.handle);
            }
        });
    }

    // ── Geometry watch pump ───────────────────────────────────────────────────
    {
        let engine = Arc::clone(&engine);
        let mut geometry_rx = directory.watch_geometry();
        tokio::spawn(async move {
            while geometry_rx.changed().await.is_ok() {
                let geometry = *geometry_rx.borrow_and_update();
                engine.set_target_geometry(geometry);
            }
        });
    }

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    {
        let running = Arc::clone(&running);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                running.store(false, Ordering::Relaxed);
            }
        });
    }

    // ── Touch source and event loop ───────────────────────────────────────────
    let mut events = start_stdin_source(source, Arc::clone(&running))?;
    info!("TouchBridge engine ready; reading touch samples from stdin");

    loop {
        if !running.load(Ordering::Relaxed) {
            break;
        }
        tokio::select! {
            maybe = events.recv() => match maybe {
                Some(SourceEvent::Sample { sample, source }) => {
                    engine.submit_sample(sample, source);
                }
                Some(SourceEvent::TargetGeometry(geometry)) => match geometry.validate() {
                    Ok(()) => {
                        directory.update(geometry);
                        config.engine.target_width_px = geometry.width_px;
                        config.engine.target_height_px = geometry.height_px;
                        persist(&config);
                    }
                    Err(err) => warn!(%err, "rejected target geometry update"),
                },
                Some(SourceEvent::MovementScale(scale)) => {
                    config.thresholds = settings.set_movement_scale(scale);
                    persist(&config);
                }
                Some(SourceEvent::Enabled(enabled)) => {
                    settings.set_enabled(enabled);
                    config.engine.enabled = enabled;
                    persist(&config);
                }
                Some(SourceEvent::Shutdown) | None => break,
            },
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }
    }

    running.store(false, Ordering::Relaxed);
    engine.shutdown();
    info!("TouchBridge engine stopped");
    Ok(())
}

/// Returns `geometry` if it is usable, otherwise `fallback`.
fn geometry_or(
    geometry: SurfaceGeometry,
    fallback: SurfaceGeometry,
    surface: &str,
) -> SurfaceGeometry {
    match geometry.validate() {
        Ok(()) => geometry,
        Err(err) => {
            warn!(%err, surface, "invalid surface dimensions in settings; using defaults");
            fallback
        }
    }
}

fn persist(config: &AppConfig) {
    if let Err(err) = save_config(config) {
        warn!(%err, "failed to persist settings");
    }
}
