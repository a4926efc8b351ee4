mod config;
mod evaluator;
mod tracker;

pub use config::{MotionConfig, MotionError, STANDARD_GRAVITY};
pub use evaluator::{MotionEvaluator, MotionReading, MotionStatus};
pub use tracker::{IdleState, MotionTracker, TrackerUpdate};
