//! Motion evaluation from a single acceleration sample.
//!
//! The magnitude of the acceleration vector is compared with gravity, so the
//! result does not depend on how the sensor is mounted. Only deviation from
//! the resting magnitude counts as motion.

use hal::Vector3d;

use crate::config::MotionConfig;

/// Motion detection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStatus {
    /// No motion detected
    Still,
    /// Motion detected
    Moving,
}

/// Result of evaluating one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionReading {
    /// Euclidean norm of the acceleration vector (m/s²)
    pub magnitude: f32,
    /// `|magnitude - gravity|` (m/s²)
    pub net: f32,
    pub status: MotionStatus,
}

impl MotionReading {
    pub fn is_moving(&self) -> bool {
        self.status == MotionStatus::Moving
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MotionEvaluator {
    threshold: f32,
    gravity: f32,
}

impl MotionEvaluator {
    pub fn new(threshold: f32, gravity: f32) -> Self {
        Self { threshold, gravity }
    }

    pub fn from_config(config: &MotionConfig) -> Self {
        Self::new(config.motion_threshold, config.gravity)
    }

    /// Classify a sample. A net value equal to the threshold is still.
    pub fn evaluate(&self, acceleration: &Vector3d) -> MotionReading {
        let magnitude = acceleration.norm();
        let net = (magnitude - self.gravity).abs();
        let status = if net > self.threshold {
            MotionStatus::Moving
        } else {
            MotionStatus::Still
        };

        MotionReading {
            magnitude,
            net,
            status,
        }
    }
}
