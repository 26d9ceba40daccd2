//! Consent-gated key-input recorder.
//!
//! Captures keyboard events either while the application window holds focus
//! (window-scoped mode) or system-wide (global mode), normalizes each event
//! into a canonical textual token, and appends the tokens to a persistent log
//! file bracketed by session markers.
//!
//! # Architecture
//!
//! ```text
//! egui input events ──▶ WindowSource ──┐
//!                                      ├─▶ RawKeyEvent ─▶ normalize() ─▶ Token ─▶ LogSink
//! rdev hook thread  ──▶ GlobalSource ──┘
//!                                            ▲
//!            SessionController ──────────────┘
//!            (consent gate, Idle ⇄ Active, one source at a time)
//!
//! StatusEvent (std mpsc) ──▶ KeyInputLoggerApp status panel
//! ```
//!
//! The controller and both capture handles live on the UI thread; only the
//! rdev delivery thread runs in the background, and it touches nothing but
//! the event pipeline (sink writes) and the status channel.

pub mod app;
pub mod capture;
pub mod config;
pub mod session;
