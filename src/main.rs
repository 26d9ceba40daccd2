//! Application entry point — consent-first key-input logger.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Initialise the [`LogSink`] (creates the log directory once).
//! 4. Create the status channel (hook thread → UI).
//! 5. Build the [`SessionController`] with the global capture source.
//! 6. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::{mpsc, Arc};

use anyhow::Context;
use eframe::egui;

use key_input_logger::{
    app::KeyInputLoggerApp,
    capture::GlobalSource,
    config::{AppConfig, AppPaths},
    session::{LogSink, SessionController},
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([700.0, 430.0])
        .with_min_inner_size([640.0, 380.0]);

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Key input logger starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Log sink — the directory is created here, once, never per write.
    let paths = AppPaths::new();
    let log_file = config.log.log_file(&paths);
    let sink = Arc::new(LogSink::new(log_file).context("initialising log sink")?);
    log::info!("Logging keystrokes to {}", sink.path().display());

    // 4. Status channel (hook thread → UI)
    let (status_tx, status_rx) = mpsc::channel();

    // 5. Session controller
    let controller = SessionController::new(sink, Box::new(GlobalSource::new()), status_tx);

    // 6. Run the UI (blocks until the window is closed)
    let app = KeyInputLoggerApp::new(controller, status_rx, config.clone());
    let options = native_options(&config);

    eframe::run_native(
        "Key Input Logger",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
