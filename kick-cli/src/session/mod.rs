//! Live session orchestration.
//!
//! A session wires the chat feed, the sliding-window aggregator, the
//! snapshot scheduler, the viewer-count poller, and the optional capture
//! subsystem together behind one stop signal.

pub mod controller;
pub mod listener;
pub mod options;
pub mod scheduler;
pub mod signal;
pub mod state;

pub use controller::run_session;
pub use options::{ScreenshotOptions, ScreenshotTrigger, SessionOptions};
pub use signal::{StopReason, StopSignal};
pub use state::{CaptureRef, SessionState};
