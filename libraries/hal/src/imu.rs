/// IMU (Inertial Measurement Unit) sensor interface
use crate::types::Vector3d;

/// One combined reading of every channel the IMU exposes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuEvent {
    /// Acceleration in m/s²
    pub acceleration: Vector3d,

    /// Angular rate in rad/s
    pub gyro: Vector3d,

    /// Die temperature in Celsius
    pub temperature: f32,
}

impl Default for ImuEvent {
    fn default() -> Self {
        Self {
            acceleration: Vector3d::zeros(),
            gyro: Vector3d::zeros(),
            temperature: 0.0,
        }
    }
}

/// 6-axis IMU interface (accelerometer + gyroscope)
pub trait ImuSensor {
    /// Initialize the IMU sensor
    ///
    /// Returns false if the device did not respond
    fn init(&mut self) -> bool;

    /// Get acceleration data (in m/s²)
    fn get_acceleration(&mut self) -> Vector3d;

    /// Get gyroscope data (in rad/s)
    fn get_gyro(&mut self) -> Vector3d;

    /// Get the current temperature of the IMU in Celsius
    fn get_temperature(&mut self) -> f32;

    /// Read acceleration, gyroscope and temperature together
    ///
    /// Drivers that can burst-read all channels should override this.
    fn get_event(&mut self) -> ImuEvent {
        ImuEvent {
            acceleration: self.get_acceleration(),
            gyro: self.get_gyro(),
            temperature: self.get_temperature(),
        }
    }

    /// Human readable name of the device
    fn name(&self) -> &str {
        "imu"
    }
}
