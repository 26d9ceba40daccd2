//! Key-event capture: raw event shape, normalization, and the two sources.
//!
//! # Overview
//!
//! Two structurally different sources deliver key events:
//!
//! * [`WindowSource`] — synchronous, on the UI thread, only while the host
//!   window has input focus (fed from egui's per-frame input events).
//! * [`GlobalSource`] — an OS-level hook on a dedicated background thread,
//!   regardless of focus (backed by `rdev`, behind the `global-capture`
//!   feature).
//!
//! Each source owns its own adapter into [`RawKeyEvent`]; from there a single
//! [`normalize`] function maps every event to the [`Token`] written to the
//! log, so both modes produce identical output for the same keys.

pub mod global;
pub mod normalize;
pub mod window;

pub use global::GlobalSource;
pub use normalize::{normalize, Token};
pub use window::WindowSource;

use std::sync::Arc;

use thiserror::Error;

// ---------------------------------------------------------------------------
// RawKeyEvent
// ---------------------------------------------------------------------------

/// Which capture source produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Delivered by the focused host window, on the UI thread.
    WindowScoped,
    /// Delivered by the system-wide hook, on its background thread.
    Global,
}

/// Platform-neutral key-event descriptor.
///
/// Exactly one of `printable` / `name` is meaningful per event: a key that
/// produced text carries the character, everything else carries a lowercase
/// symbolic name (`"backspace"`, `"left"`, …). Events are ephemeral — only
/// the [`Token`] derived from them is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// The character the key produced, if any.
    pub printable: Option<char>,
    /// Symbolic key name, if the key produced no character.
    pub name: Option<String>,
    /// Where the event came from.
    pub source: KeySource,
}

impl RawKeyEvent {
    /// Event for a key that produced the character `ch`.
    pub fn printable(ch: char, source: KeySource) -> Self {
        Self {
            printable: Some(ch),
            name: None,
            source,
        }
    }

    /// Event for a non-character key with the symbolic name `name`.
    pub fn named(name: impl Into<String>, source: KeySource) -> Self {
        Self {
            printable: None,
            name: Some(name.into()),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// EventSink
// ---------------------------------------------------------------------------

/// Callback a capture source delivers events into.
///
/// `Send + Sync` because [`GlobalSource`] invokes it from the hook thread.
pub type EventSink = Arc<dyn Fn(RawKeyEvent) + Send + Sync>;

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Failures when starting a capture source.
///
/// Only [`GlobalSource`] can fail at start time; [`WindowSource`] never does.
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    /// The global hook support was not compiled in.
    #[error(
        "global capture support is not compiled in — \
         rebuild with `--features global-capture`"
    )]
    DependencyMissing,

    /// The OS refused to install the keyboard hook (missing privilege,
    /// unsupported display server, …).
    #[error("the system refused the keyboard hook: {0}")]
    HookRejected(String),
}

// ---------------------------------------------------------------------------
// CaptureSource
// ---------------------------------------------------------------------------

/// Common capability surface of the two capture variants.
///
/// `start` registers `on_event` as the delivery callback; `stop` deregisters
/// it and is idempotent — safe on an already-stopped or never-started source.
/// For [`WindowSource`] no invocation happens after `stop` returns; for
/// [`GlobalSource`] shutdown is best-effort (an event racing `stop` may still
/// be delivered, but none after a subsequent `start`).
pub trait CaptureSource: Send {
    /// Begin delivering events into `on_event`.
    fn start(&mut self, on_event: EventSink) -> Result<(), CaptureError>;

    /// Cease delivery. Idempotent.
    fn stop(&mut self);
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------

/// Scriptable capture source for controller tests: records start/stop calls,
/// exposes the registered callback so tests can emit events "from the
/// source", and can be told to fail at `start`.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockCaptureSource {
    /// When set, `start` fails with a clone of this error.
    pub fail_with: Option<CaptureError>,
    /// Number of successful `start` calls.
    pub started: Arc<std::sync::atomic::AtomicUsize>,
    /// Number of effective `stop` calls (stop of a running source).
    pub stopped: Arc<std::sync::atomic::AtomicUsize>,
    /// The currently registered callback, if running.
    pub on_event: Arc<std::sync::Mutex<Option<EventSink>>>,
}

#[cfg(test)]
impl MockCaptureSource {
    /// Deliver an event through the registered callback, as the real source's
    /// background thread would.
    pub fn emit(&self, event: RawKeyEvent) {
        let guard = self.on_event.lock().unwrap();
        if let Some(cb) = guard.as_ref() {
            cb(event);
        }
    }

    /// Whether a callback is currently registered.
    pub fn is_running(&self) -> bool {
        self.on_event.lock().unwrap().is_some()
    }
}

#[cfg(test)]
impl CaptureSource for MockCaptureSource {
    fn start(&mut self, on_event: EventSink) -> Result<(), CaptureError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.started
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.on_event.lock().unwrap() = Some(on_event);
        Ok(())
    }

    fn stop(&mut self) {
        if self.on_event.lock().unwrap().take().is_some() {
            self.stopped
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }
}
