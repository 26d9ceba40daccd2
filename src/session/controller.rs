//! Session state machine: consent gate, start/stop lifecycle, and routing of
//! capture output into the log sink.
//!
//! # State machine
//!
//! ```text
//! Idle ──start(use_global=false)──▶ ActiveWindowScoped
//!      ──start(use_global=true)───▶ ActiveGlobal
//!             (both guarded by the consent flag; a failed global start
//!              falls back to Idle with no marker written)
//! ActiveWindowScoped | ActiveGlobal ──stop──▶ Idle
//! ```
//!
//! `start` while active and `stop` while idle are no-ops. Consent gates entry
//! only: revoking it mid-session does not stop the session.
//!
//! The controller lives on the UI thread and is the sole owner of the session
//! state and the active capture source. The global hook thread never touches
//! it — events delivered from the background reach only the sink (via the
//! pipeline callback) and the status channel, which the UI drains on its own
//! thread.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::capture::{normalize, CaptureError, CaptureSource, EventSink, WindowSource};
use crate::session::sink::LogSink;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Lifecycle state of the logging session. Exactly one value at any time,
/// owned exclusively by [`SessionController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No capture is running.
    #[default]
    Idle,
    /// Capturing keys delivered to the focused host window.
    ActiveWindowScoped,
    /// Capturing keys system-wide through the OS hook.
    ActiveGlobal,
}

impl SessionState {
    /// `true` while a session is running (either mode).
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SessionState::ActiveWindowScoped | SessionState::ActiveGlobal
        )
    }
}

// ---------------------------------------------------------------------------
// StatusEvent
// ---------------------------------------------------------------------------

/// Observability events for the UI layer, one per notable transition.
///
/// Sent over a `std::sync::mpsc` channel so the hook thread can report write
/// failures without touching UI state; the UI drains the channel on its own
/// thread each frame.
#[derive(Debug, Clone)]
pub enum StatusEvent {
    /// A line for the append-only status panel.
    Notice(String),
    /// A blocking, user-facing error (the dialog-equivalent path): refused
    /// consent, a failed global start, a failed clear.
    Alert { title: String, message: String },
}

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Owns the session state, the consent flag, and the two capture sources;
/// routes the active source's events through `normalize` into the sink.
pub struct SessionController {
    state: SessionState,
    consent: bool,
    sink: Arc<LogSink>,
    window: WindowSource,
    global: Box<dyn CaptureSource>,
    status_tx: Sender<StatusEvent>,
}

impl SessionController {
    /// Build a controller over `sink`, using `global` for system-wide capture
    /// and reporting through `status_tx`. Starts idle, without consent.
    pub fn new(
        sink: Arc<LogSink>,
        global: Box<dyn CaptureSource>,
        status_tx: Sender<StatusEvent>,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            consent: false,
            sink,
            window: WindowSource::new(),
            global,
            status_tx,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    /// Path of the log file (for display and for the open-folder action).
    pub fn log_path(&self) -> &Path {
        self.sink.path()
    }

    // ── Consent ──────────────────────────────────────────────────────────

    /// Record the user's consent decision. Gates only future starts; an
    /// active session keeps running if consent is revoked.
    pub fn set_consent(&mut self, granted: bool) {
        self.consent = granted;
    }

    // ── Transitions ──────────────────────────────────────────────────────

    /// Start a session in the requested mode.
    ///
    /// No-op while already active. Refused (state unchanged, alert reported)
    /// when consent has not been granted. A global source that fails to start
    /// leaves the controller idle with no marker written and no handle
    /// retained.
    pub fn start(&mut self, use_global: bool) {
        if self.state != SessionState::Idle {
            return;
        }
        if !self.consent {
            self.alert(
                "Consent required",
                "Please provide consent before starting logging.",
            );
            return;
        }

        let on_event = self.pipeline();
        let result = if use_global {
            self.global.start(on_event)
        } else {
            self.window.start(on_event)
        };

        match result {
            Ok(()) => {
                if use_global {
                    self.state = SessionState::ActiveGlobal;
                    self.notice("Global logging enabled. Keys from other apps will be recorded.");
                } else {
                    self.state = SessionState::ActiveWindowScoped;
                    self.notice(
                        "Logging started. Focus this window and type. \
                         Use 'Stop logging' to end.",
                    );
                }
                self.write_marker(format!("\n--- Session started {} ---\n", timestamp()));
            }
            Err(CaptureError::DependencyMissing) => {
                self.alert(
                    "Dependency required",
                    format!(
                        "{}\n\nGlobal logging is unavailable in this build; \
                         window-scoped logging still works.",
                        CaptureError::DependencyMissing
                    ),
                );
            }
            Err(err @ CaptureError::HookRejected(_)) => {
                self.alert("Global listener failed", err.to_string());
            }
        }
    }

    /// Stop the running session, if any, and write the end marker.
    pub fn stop(&mut self) {
        match self.state {
            SessionState::Idle => return,
            SessionState::ActiveWindowScoped => self.window.stop(),
            SessionState::ActiveGlobal => self.global.stop(),
        }
        self.state = SessionState::Idle;
        self.write_marker(format!("\n--- Session ended {} ---\n", timestamp()));
        self.notice("Logging stopped.");
    }

    /// Truncate the log file. A deliberate user action, so failure surfaces
    /// as an alert rather than a quiet status line.
    pub fn clear(&mut self) {
        match self.sink.clear() {
            Ok(()) => self.notice("Log file cleared."),
            Err(e) => self.alert("Clear failed", e.to_string()),
        }
    }

    /// Hand one frame's egui input events to the window-scoped source.
    ///
    /// Events are forwarded only while a window-scoped session is active.
    pub fn feed_window_events(&self, events: &[egui::Event]) {
        if self.state == SessionState::ActiveWindowScoped {
            self.window.feed(events);
        }
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// The normalize→sink pipeline handed to whichever source starts.
    ///
    /// Must stay safe to call from the hook thread: it owns clones of the
    /// sink and the status sender and touches nothing else. A failed write
    /// is reported and swallowed — one missed key never ends the session.
    fn pipeline(&self) -> EventSink {
        let sink = Arc::clone(&self.sink);
        let status_tx = self.status_tx.clone();
        Arc::new(move |event| {
            let token = normalize(&event);
            if let Err(e) = sink.append_token(&token) {
                let _ = status_tx.send(StatusEvent::Notice(format!("Failed to write key: {e}")));
            }
        })
    }

    fn write_marker(&self, line: String) {
        if let Err(e) = self.sink.append_marker(&line) {
            self.notice(format!("Failed writing to file: {e}"));
        }
    }

    fn notice(&self, message: impl Into<String>) {
        let _ = self.status_tx.send(StatusEvent::Notice(message.into()));
    }

    fn alert(&self, title: &str, message: impl Into<String>) {
        let _ = self.status_tx.send(StatusEvent::Alert {
            title: title.into(),
            message: message.into(),
        });
    }
}

/// Wall-clock timestamp for session markers.
fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
