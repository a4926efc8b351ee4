use hal::{Clock, Delay, ImuSensor};

pub trait Board
where
    Self: Sized,
{
    fn name(&self) -> &str;

    fn split_resources(self) -> Resources;
}

/// Peripherals handed to the monitor. A board without an IMU leaves it `None`.
pub struct Resources {
    pub imu: Option<Box<dyn ImuSensor>>,
    pub clock: Box<dyn Clock>,
    pub delay: Box<dyn Delay>,
}
