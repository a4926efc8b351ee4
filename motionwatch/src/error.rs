use motion::MotionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] MotionError),

    #[error("Board provides no IMU")]
    MissingImu,

    #[error("Sensor {sensor} did not respond during initialization")]
    SensorInit { sensor: String },
}
