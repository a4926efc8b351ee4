// Motion detection configuration
use thiserror::Error;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f32 = 9.81;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("Invalid motion threshold: {0} must be a finite, non-negative value")]
    InvalidThreshold(f32),

    #[error("Invalid idle timeout: must be greater than zero")]
    InvalidIdleTimeout,

    #[error("Invalid sample period: must be greater than zero")]
    InvalidSamplePeriod,

    #[error("Invalid gravity reference: {0} must be a finite, positive value")]
    InvalidGravity(f32),
}

/// Tuning for the motion evaluator and the idle-timeout check.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Net acceleration (m/s²) that must be exceeded to count as motion
    pub motion_threshold: f32,

    /// Inactivity period after which a notification fires (ms)
    pub idle_timeout_ms: u32,

    /// Delay between two polls of the sensor (ms)
    pub sample_period_ms: u32,

    /// Resting acceleration magnitude subtracted from every sample (m/s²)
    pub gravity: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            motion_threshold: 0.1,
            idle_timeout_ms: 10_000,
            sample_period_ms: 500,
            gravity: STANDARD_GRAVITY,
        }
    }
}

impl MotionConfig {
    pub fn with_motion_threshold(mut self, threshold: f32) -> Self {
        self.motion_threshold = threshold;
        self
    }

    pub fn with_idle_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.idle_timeout_ms = timeout_ms;
        self
    }

    pub fn with_sample_period_ms(mut self, period_ms: u32) -> Self {
        self.sample_period_ms = period_ms;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Check that every parameter is usable.
    ///
    /// A zero threshold is allowed and makes any deviation from rest count
    /// as motion.
    pub fn validate(&self) -> Result<(), MotionError> {
        if !self.motion_threshold.is_finite() || self.motion_threshold < 0.0 {
            return Err(MotionError::InvalidThreshold(self.motion_threshold));
        }
        if self.idle_timeout_ms == 0 {
            return Err(MotionError::InvalidIdleTimeout);
        }
        if self.sample_period_ms == 0 {
            return Err(MotionError::InvalidSamplePeriod);
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(MotionError::InvalidGravity(self.gravity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_sketch() {
        let config = MotionConfig::default();
        assert_eq!(config.motion_threshold, 0.1);
        assert_eq!(config.idle_timeout_ms, 10_000);
        assert_eq!(config.sample_period_ms, 500);
        assert_eq!(config.gravity, STANDARD_GRAVITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = MotionConfig::default()
            .with_motion_threshold(0.5)
            .with_idle_timeout_ms(2_000)
            .with_sample_period_ms(50)
            .with_gravity(9.80665);
        assert_eq!(config.motion_threshold, 0.5);
        assert_eq!(config.idle_timeout_ms, 2_000);
        assert_eq!(config.sample_period_ms, 50);
        assert_eq!(config.gravity, 9.80665);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = MotionConfig::default();

        assert_eq!(
            base.with_motion_threshold(-0.1).validate(),
            Err(MotionError::InvalidThreshold(-0.1))
        );
        assert!(matches!(
            base.with_motion_threshold(f32::NAN).validate(),
            Err(MotionError::InvalidThreshold(_))
        ));
        assert_eq!(
            base.with_idle_timeout_ms(0).validate(),
            Err(MotionError::InvalidIdleTimeout)
        );
        assert_eq!(
            base.with_sample_period_ms(0).validate(),
            Err(MotionError::InvalidSamplePeriod)
        );
        assert_eq!(
            base.with_gravity(0.0).validate(),
            Err(MotionError::InvalidGravity(0.0))
        );
        assert!(base.with_motion_threshold(0.0).validate().is_ok());
    }
}
