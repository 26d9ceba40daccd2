//! System-wide capture source backed by `rdev::listen`.
//!
//! `rdev::listen` is a blocking OS-level call that must run on a dedicated
//! thread — [`GlobalListener::start`] spawns that thread and returns a handle
//! whose drop sets a stop flag so the callback silently discards further
//! events.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has no graceful shutdown API. Setting the stop flag
//! prevents events from being forwarded, but the OS thread itself remains
//! blocked in the rdev event loop until the process exits. rdev holds no
//! resources that need explicit cleanup, so this is safe; it does mean an
//! event racing `stop` may still be delivered, which the session model
//! accepts (stop/start actions happen at human timescales).
//!
//! The whole hook is behind the `global-capture` cargo feature. Without it,
//! [`GlobalSource::start`] reports [`CaptureError::DependencyMissing`] and
//! window-scoped capture remains fully functional.

use super::{CaptureError, CaptureSource, EventSink};

#[cfg(feature = "global-capture")]
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc, Arc,
};
#[cfg(feature = "global-capture")]
use std::time::Duration;

#[cfg(feature = "global-capture")]
use super::{KeySource, RawKeyEvent};

// ---------------------------------------------------------------------------
// GlobalSource
// ---------------------------------------------------------------------------

/// System-wide capture source. Holds the listener handle while running.
#[derive(Default)]
pub struct GlobalSource {
    #[cfg(feature = "global-capture")]
    listener: Option<GlobalListener>,
}

impl GlobalSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaptureSource for GlobalSource {
    #[cfg(feature = "global-capture")]
    fn start(&mut self, on_event: EventSink) -> Result<(), CaptureError> {
        if self.listener.is_none() {
            self.listener = Some(GlobalListener::start(on_event)?);
        }
        Ok(())
    }

    #[cfg(not(feature = "global-capture"))]
    fn start(&mut self, _on_event: EventSink) -> Result<(), CaptureError> {
        Err(CaptureError::DependencyMissing)
    }

    fn stop(&mut self) {
        #[cfg(feature = "global-capture")]
        {
            // Dropping the handle sets the stop flag.
            self.listener = None;
        }
    }
}

// ---------------------------------------------------------------------------
// GlobalListener
// ---------------------------------------------------------------------------

/// How long to wait for `rdev::listen` to fail before assuming the hook
/// installed. A refused hook errors out immediately; a working one blocks
/// for the life of the process.
#[cfg(feature = "global-capture")]
const HOOK_START_GRACE: Duration = Duration::from_millis(250);

/// Handle to a running global listener thread.
///
/// Construct with [`GlobalListener::start`]; drop to stop forwarding events.
#[cfg(feature = "global-capture")]
struct GlobalListener {
    /// Shared stop flag — set `true` on [`Drop`].
    stop: Arc<AtomicBool>,
    /// Kept so the thread is not detached prematurely; never joined because
    /// `rdev::listen` never returns on success.
    _thread: std::thread::JoinHandle<()>,
}

#[cfg(feature = "global-capture")]
impl GlobalListener {
    /// Spawn the dedicated hook thread and begin forwarding key presses into
    /// `on_event`.
    ///
    /// # Errors
    ///
    /// [`CaptureError::HookRejected`] when the OS refuses the hook (detected
    /// by `rdev::listen` failing within the startup grace window).
    fn start(on_event: EventSink) -> Result<Self, CaptureError> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let (err_tx, err_rx) = mpsc::channel();

        let thread = std::thread::Builder::new()
            .name("global-capture".into())
            .spawn(move || {
                let result = rdev::listen(move |event: rdev::Event| {
                    if stop_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    if let rdev::EventType::KeyPress(key) = event.event_type {
                        on_event(raw_from_rdev(key, event.name.as_deref()));
                    }
                });
                if let Err(e) = result {
                    log::error!("global-capture: rdev::listen exited with error: {e:?}");
                    let _ = err_tx.send(e);
                }
            })
            .map_err(|e| CaptureError::HookRejected(e.to_string()))?;

        match err_rx.recv_timeout(HOOK_START_GRACE) {
            Ok(e) => Err(CaptureError::HookRejected(format!("{e:?}"))),
            Err(_) => Ok(Self {
                stop,
                _thread: thread,
            }),
        }
    }
}

#[cfg(feature = "global-capture")]
impl Drop for GlobalListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // The OS thread stays blocked inside rdev::listen until process exit.
    }
}

// ---------------------------------------------------------------------------
// rdev adapter
// ---------------------------------------------------------------------------

/// Adapt one rdev key press into the shared [`RawKeyEvent`] shape.
///
/// rdev reports the produced text in `Event::name`; a single non-control
/// character there is a printable event. Everything else (navigation,
/// modifiers, dead keys, multi-char IME output) falls back to a symbolic
/// name derived from the key code.
#[cfg(feature = "global-capture")]
fn raw_from_rdev(key: rdev::Key, name: Option<&str>) -> RawKeyEvent {
    if let Some(text) = name {
        let mut chars = text.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if !ch.is_control() {
                return RawKeyEvent::printable(ch, KeySource::Global);
            }
        }
    }
    RawKeyEvent::named(symbolic_name(key), KeySource::Global)
}

/// Symbolic name for an rdev key code.
///
/// Keys without an entry use their debug representation, which the normalizer
/// turns into an uppercase bracketed tag (`F5` → `[F5]`).
#[cfg(feature = "global-capture")]
fn symbolic_name(key: rdev::Key) -> String {
    use rdev::Key;

    let name = match key {
        Key::Space => "space",
        Key::Return | Key::KpReturn => "return",
        Key::Tab => "tab",
        Key::Backspace => "backspace",
        Key::Escape => "escape",
        Key::ShiftLeft => "shift_l",
        Key::ShiftRight => "shift_r",
        Key::ControlLeft => "control_l",
        Key::ControlRight => "control_r",
        Key::Alt => "alt_l",
        Key::AltGr => "alt_r",
        Key::CapsLock => "caps_lock",
        Key::LeftArrow => "left",
        Key::RightArrow => "right",
        Key::UpArrow => "up",
        Key::DownArrow => "down",
        Key::Delete => "delete",
        Key::Insert => "insert",
        Key::Home => "home",
        Key::End => "end",
        Key::PageUp => "page_up",
        Key::PageDown => "page_down",
        other => return format!("{other:?}"),
    };
    name.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
