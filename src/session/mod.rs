//! Session lifecycle and persistence.
//!
//! [`SessionController`] owns the consent-gated state machine and routes the
//! active capture source's output into [`LogSink`], the append-only log file
//! writer. [`StatusEvent`]s flow to the UI over a std mpsc channel.

pub mod controller;
pub mod sink;

pub use controller::{SessionController, SessionState, StatusEvent};
pub use sink::{LogSink, SinkError};
