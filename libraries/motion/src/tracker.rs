// Motion tracking state and idle-timeout detection
use hal::{Millis, Vector3d};
use log::{debug, trace};

use crate::config::MotionConfig;
use crate::evaluator::{MotionEvaluator, MotionReading};

/// Outcome of an idle-timeout check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleState {
    /// Time since the last motion is within the timeout
    Idle { idle_ms: u32 },
    /// The timeout elapsed; the timer has already been restarted
    TimedOut { idle_ms: u32 },
}

impl IdleState {
    pub fn timed_out(&self) -> bool {
        matches!(self, IdleState::TimedOut { .. })
    }
}

/// Result of feeding one sample through the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerUpdate {
    pub reading: MotionReading,
    pub idle: IdleState,
}

/// Owns the last-motion timestamp.
///
/// `last_motion_ms` is the later of the last sample whose net acceleration
/// exceeded the threshold and the last timeout.
#[derive(Debug, Clone)]
pub struct MotionTracker {
    config: MotionConfig,
    evaluator: MotionEvaluator,
    last_motion_ms: Millis,
}

impl MotionTracker {
    pub fn new(config: MotionConfig, now_ms: Millis) -> Self {
        Self {
            evaluator: MotionEvaluator::from_config(&config),
            config,
            last_motion_ms: now_ms,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn last_motion_ms(&self) -> Millis {
        self.last_motion_ms
    }

    /// Time since the last motion, tolerant of clock rollover
    pub fn idle_ms(&self, now_ms: Millis) -> u32 {
        now_ms.wrapping_sub(self.last_motion_ms)
    }

    /// Evaluate a sample and restart the timer if it shows motion.
    pub fn record(&mut self, acceleration: &Vector3d, now_ms: Millis) -> MotionReading {
        let reading = self.evaluator.evaluate(acceleration);
        trace!(
            "sample |a|={:.3} net={:.3} at {} ms",
            reading.magnitude,
            reading.net,
            now_ms
        );

        if reading.is_moving() {
            debug!("motion detected: net {:.3} m/s² at {} ms", reading.net, now_ms);
            self.last_motion_ms = now_ms;
        }
        reading
    }

    /// Check for a timeout. On timeout the timer restarts at `now_ms`, so a
    /// timeout is reported once per window of inactivity.
    pub fn check_idle(&mut self, now_ms: Millis) -> IdleState {
        let idle_ms = self.idle_ms(now_ms);
        if idle_ms > self.config.idle_timeout_ms {
            self.last_motion_ms = now_ms;
            IdleState::TimedOut { idle_ms }
        } else {
            IdleState::Idle { idle_ms }
        }
    }

    /// `record` followed by `check_idle`
    pub fn update(&mut self, acceleration: &Vector3d, now_ms: Millis) -> TrackerUpdate {
        let reading = self.record(acceleration, now_ms);
        let idle = self.check_idle(now_ms);
        TrackerUpdate { reading, idle }
    }
}
