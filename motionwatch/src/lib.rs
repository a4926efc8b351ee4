mod board;
mod error;
mod monitor;

pub use board::{Board, Resources};
pub use error::MonitorError;
pub use monitor::{halt, Monitor, MonitorStats, PollOutcome, HALT_POLL_MS};

pub use motion::{MotionConfig, MotionError, MotionReading, MotionStatus};
