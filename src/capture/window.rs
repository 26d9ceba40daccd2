//! Window-scoped capture source, fed from egui's per-frame input events.
//!
//! egui only reports key events while the host window has input focus, so
//! feeding the frame's events through this source gives focus-scoped capture
//! for free. Everything here runs synchronously on the UI thread: after
//! [`WindowSource::stop`] returns, no further callback invocations occur.
//!
//! # Adapter rules
//!
//! * `egui::Event::Text` carries the characters a key actually produced
//!   (shift- and layout-aware) — each char becomes a printable
//!   [`RawKeyEvent`].
//! * `egui::Event::Key` presses are translated only for keys that never
//!   produce a `Text` event (enter, tab, backspace, navigation, F-keys);
//!   translating character keys here as well would log them twice.
//!
//! egui does not surface bare modifier presses (shift, ctrl, alt, caps lock)
//! as events, so those appear only in global-mode logs.

use super::{CaptureError, CaptureSource, EventSink, KeySource, RawKeyEvent};

// ---------------------------------------------------------------------------
// WindowSource
// ---------------------------------------------------------------------------

/// Focus-scoped capture source.
///
/// [`start`] registers the delivery callback and never fails; [`feed`] is
/// called by the UI each frame with that frame's input events and forwards
/// them while started; [`stop`] deregisters the callback.
///
/// [`start`]: CaptureSource::start
/// [`feed`]: WindowSource::feed
/// [`stop`]: CaptureSource::stop
#[derive(Default)]
pub struct WindowSource {
    on_event: Option<EventSink>,
}

impl WindowSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapt and forward one frame's egui input events.
    ///
    /// A no-op unless the source is started.
    pub fn feed(&self, events: &[egui::Event]) {
        let Some(on_event) = &self.on_event else {
            return;
        };

        for event in events {
            match event {
                egui::Event::Text(text) => {
                    for ch in text.chars() {
                        on_event(RawKeyEvent::printable(ch, KeySource::WindowScoped));
                    }
                }
                egui::Event::Key {
                    key, pressed: true, ..
                } => {
                    if let Some(name) = symbolic_name(*key) {
                        on_event(RawKeyEvent::named(name, KeySource::WindowScoped));
                    }
                }
                _ => {}
            }
        }
    }
}

impl CaptureSource for WindowSource {
    fn start(&mut self, on_event: EventSink) -> Result<(), CaptureError> {
        self.on_event = Some(on_event);
        Ok(())
    }

    fn stop(&mut self) {
        self.on_event = None;
    }
}

// ---------------------------------------------------------------------------
// egui key adapter
// ---------------------------------------------------------------------------

/// Symbolic name for an egui key that produces no `Text` event.
///
/// Returns `None` for character keys (covered by `Text`) and for keys this
/// source does not translate.
fn symbolic_name(key: egui::Key) -> Option<&'static str> {
    use egui::Key;

    Some(match key {
        Key::Enter => "return",
        Key::Tab => "tab",
        Key::Backspace => "backspace",
        Key::Escape => "escape",
        Key::ArrowLeft => "left",
        Key::ArrowRight => "right",
        Key::ArrowUp => "up",
        Key::ArrowDown => "down",
        Key::Delete => "delete",
        Key::Insert => "insert",
        Key::Home => "home",
        Key::End => "end",
        Key::PageUp => "page_up",
        Key::PageDown => "page_down",
        Key::F1 => "f1",
        Key::F2 => "f2",
        Key::F3 => "f3",
        Key::F4 => "f4",
        Key::F5 => "f5",
        Key::F6 => "f6",
        Key::F7 => "f7",
        Key::F8 => "f8",
        Key::F9 => "f9",
        Key::F10 => "f10",
        Key::F11 => "f11",
        Key::F12 => "f12",
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Collecting sink + the source wired to it.
    fn collecting_source() -> (WindowSource, Arc<Mutex<Vec<RawKeyEvent>>>) {
        let seen: Arc<Mutex<Vec<RawKeyEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let mut source = WindowSource::new();
        source
            .start(Arc::new(move |event| {
                seen_clone.lock().unwrap().push(event);
            }))
            .expect("window source start never fails");
        (source, seen)
    }

    fn key_press(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::default(),
        }
    }

    #[test]
    fn text_events_become_printable_events() {
        let (source, seen) = collecting_source();
        source.feed(&[egui::Event::Text("hi".into())]);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                RawKeyEvent::printable('h', KeySource::WindowScoped),
                RawKeyEvent::printable('i', KeySource::WindowScoped),
            ]
        );
    }

    #[test]
    fn named_keys_become_symbolic_events() {
        let (source, seen) = collecting_source();
        source.feed(&[
            key_press(egui::Key::Enter),
            key_press(egui::Key::ArrowLeft),
            key_press(egui::Key::F5),
        ]);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                RawKeyEvent::named("return", KeySource::WindowScoped),
                RawKeyEvent::named("left", KeySource::WindowScoped),
                RawKeyEvent::named("f5", KeySource::WindowScoped),
            ]
        );
    }

    #[test]
    fn character_key_presses_are_left_to_text_events() {
        // Key::A arrives alongside Text("a"); only the Text side may log.
        let (source, seen) = collecting_source();
        source.feed(&[key_press(egui::Key::A), egui::Event::Text("a".into())]);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![RawKeyEvent::printable('a', KeySource::WindowScoped)]
        );
    }

    #[test]
    fn key_releases_are_ignored() {
        let (source, seen) = collecting_source();
        source.feed(&[egui::Event::Key {
            key: egui::Key::Enter,
            physical_key: None,
            pressed: false,
            repeat: false,
            modifiers: egui::Modifiers::default(),
        }]);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn nothing_is_delivered_before_start_or_after_stop() {
        let seen: Arc<Mutex<Vec<RawKeyEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let mut source = WindowSource::new();
        source.feed(&[egui::Event::Text("x".into())]);
        assert!(seen.lock().unwrap().is_empty());

        source
            .start(Arc::new(move |event| {
                seen_clone.lock().unwrap().push(event);
            }))
            .unwrap();
        source.feed(&[egui::Event::Text("x".into())]);
        assert_eq!(seen.lock().unwrap().len(), 1);

        source.stop();
        source.feed(&[egui::Event::Text("x".into())]);
        assert_eq!(seen.lock().unwrap().len(), 1);

        // stop is idempotent
        source.stop();
    }
}
