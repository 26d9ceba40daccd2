//! egui/eframe host application: consent checkbox, session controls, and the
//! append-only status panel.
//!
//! # Architecture
//!
//! [`KeyInputLoggerApp`] is the top-level [`eframe::App`]. It is a pure
//! driver/observer of the [`SessionController`]: user intents (start, stop,
//! clear, consent changes) go in through controller methods, observability
//! comes back as [`StatusEvent`]s over the std mpsc channel drained each
//! frame. While a window-scoped session is active, the frame's raw input
//! events are handed to the controller so the focused window is the capture
//! surface.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use eframe::egui;

use crate::config::AppConfig;
use crate::session::{SessionController, SessionState, StatusEvent};

/// Blurb shown under the title, matching the scope of what is recorded.
const DESCRIPTION: &str = "Logs only the keys pressed while this window is focused \
                           (or system-wide in global mode). Requires explicit consent.";

const CONSENT_LABEL: &str = "I understand this will record the keys I type \
                             and consent to start logging.";

// ---------------------------------------------------------------------------
// KeyInputLoggerApp
// ---------------------------------------------------------------------------

/// A pending modal alert (the messagebox-equivalent path).
struct Alert {
    title: String,
    message: String,
}

/// eframe application — the consent-first key-input logger window.
pub struct KeyInputLoggerApp {
    /// Session state machine; owns the capture sources and the log sink.
    controller: SessionController,
    /// Receiver end of the status channel (UI-thread side of the deferred
    /// dispatch from the hook thread).
    status_rx: Receiver<StatusEvent>,
    /// Append-only status panel content.
    status_lines: Vec<String>,
    /// Currently displayed modal alert, if any.
    alert: Option<Alert>,
    /// Consent checkbox state, mirrored into the controller on change.
    consent: bool,
    /// "Enable global logging" checkbox state; read at start time.
    global_mode: bool,
    /// Configuration, persisted best-effort on exit.
    config: AppConfig,
}

impl KeyInputLoggerApp {
    pub fn new(
        controller: SessionController,
        status_rx: Receiver<StatusEvent>,
        config: AppConfig,
    ) -> Self {
        let global_mode = config.capture.global;
        Self {
            controller,
            status_rx,
            status_lines: vec![
                "Consent is required to enable logging. The logger records only \
                 while this window is active unless global mode is enabled."
                    .into(),
            ],
            alert: None,
            consent: false,
            global_mode,
            config,
        }
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending status events (non-blocking).
    fn poll_status(&mut self) {
        while let Ok(event) = self.status_rx.try_recv() {
            match event {
                StatusEvent::Notice(message) => self.status_lines.push(message),
                StatusEvent::Alert { title, message } => {
                    self.status_lines.push(format!("{title}: {message}"));
                    self.alert = Some(Alert { title, message });
                }
            }
        }
    }

    // ── Shell integration ────────────────────────────────────────────────

    /// Open the log directory in the platform file manager.
    fn open_log_folder(&mut self) {
        let Some(dir) = self.controller.log_path().parent() else {
            return;
        };

        #[cfg(target_os = "windows")]
        let opener = "explorer";
        #[cfg(target_os = "macos")]
        let opener = "open";
        #[cfg(all(unix, not(target_os = "macos")))]
        let opener = "xdg-open";

        if let Err(e) = std::process::Command::new(opener).arg(dir).spawn() {
            self.alert = Some(Alert {
                title: "Open folder failed".into(),
                message: e.to_string(),
            });
        }
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        let state = self.controller.state();

        ui.horizontal(|ui| {
            let can_start = self.consent && state == SessionState::Idle;
            if ui
                .add_enabled(can_start, egui::Button::new("Start logging"))
                .clicked()
            {
                self.controller.start(self.global_mode);
            }

            if ui
                .add_enabled(state.is_active(), egui::Button::new("Stop logging"))
                .clicked()
            {
                self.controller.stop();
            }

            if ui.button("Open log folder").clicked() {
                self.open_log_folder();
            }

            if ui.button("Clear log file").clicked() {
                self.controller.clear();
            }

            ui.checkbox(&mut self.global_mode, "Enable global logging (across apps)");
        });
    }

    fn draw_status_panel(&self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Session status").strong());
            ui.separator();
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for line in &self.status_lines {
                        ui.label(line);
                    }
                });
        });
    }

    fn draw_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = &self.alert else {
            return;
        };
        let title = alert.title.clone();
        let message = alert.message.clone();

        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alert = None;
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for KeyInputLoggerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_status();

        // Hand this frame's input to the window-scoped source. The controller
        // forwards only while a window-scoped session is active.
        if self.controller.state() == SessionState::ActiveWindowScoped {
            let events = ctx.input(|i| i.events.clone());
            self.controller.feed_window_events(&events);
        }

        // Global-mode statuses arrive from the hook thread between frames;
        // poll for them instead of waiting for the next input event.
        if self.controller.state() == SessionState::ActiveGlobal {
            ctx.request_repaint_after(Duration::from_millis(200));
        }

        // Remember where the window sits for the next launch.
        if let Some(rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.config.ui.window_position = Some((rect.min.x, rect.min.y));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Simple Key Input Logger");
            ui.add_space(4.0);
            ui.label(DESCRIPTION);
            ui.label(format!(
                "Logs are saved to {}.",
                self.controller.log_path().display()
            ));
            ui.add_space(8.0);

            if ui.checkbox(&mut self.consent, CONSENT_LABEL).changed() {
                self.controller.set_consent(self.consent);
            }

            ui.add_space(8.0);
            self.draw_controls(ui);
            ui.add_space(8.0);
            self.draw_status_panel(ui);
        });

        self.draw_alert(ctx);
    }

    /// Stop any active session (so the end marker is written) and persist the
    /// config, best-effort, before the window goes away.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.stop();

        self.config.capture.global = self.global_mode;
        if let Err(e) = self.config.save() {
            log::warn!("Failed to save config on exit: {e}");
        }
        log::info!("Key input logger closing");
    }
}
