// IMU driver module
//
// Chip drivers are async and talk to the bus through embedded-hal-async.
// `BlockingImu` drives them to completion so they can sit behind the
// synchronous `hal::ImuSensor` interface used by the monitor.

use core::fmt::Debug;

use embassy_futures::block_on;
use hal::{ImuEvent, ImuSensor, Vector3d};
use log::{error, warn};

pub mod lsm6dso32;

/// Interface for IMU chip implementations
#[allow(async_fn_in_trait)]
pub trait ImuChip {
    type Error: Debug;

    /// Probe and configure the chip
    async fn init(&mut self) -> Result<(), Self::Error>;

    /// Read acceleration, angular rate and temperature in one transfer
    async fn read_event(&mut self) -> Result<ImuEvent, Self::Error>;

    /// Get the name of the chip
    fn chip_name(&self) -> &'static str;
}

/// Synchronous wrapper around an async IMU chip
///
/// Reads never fail from the caller's point of view: a failed transfer is
/// counted and the last good event is returned instead. `init` only succeeds
/// once a first event has been read, so there is always a good event to
/// fall back on.
pub struct BlockingImu<C: ImuChip> {
    chip: C,
    last_event: ImuEvent,
    read_errors: u32,
}

impl<C: ImuChip> BlockingImu<C> {
    pub fn new(chip: C) -> Self {
        Self {
            chip,
            last_event: ImuEvent::default(),
            read_errors: 0,
        }
    }

    /// Number of reads that failed since creation
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }
}

impl<C: ImuChip> ImuSensor for BlockingImu<C> {
    fn init(&mut self) -> bool {
        if let Err(err) = block_on(self.chip.init()) {
            error!("{} init failed: {:?}", self.chip.chip_name(), err);
            return false;
        }

        match block_on(self.chip.read_event()) {
            Ok(event) => {
                self.last_event = event;
                true
            }
            Err(err) => {
                error!("{} first read failed: {:?}", self.chip.chip_name(), err);
                false
            }
        }
    }

    fn get_acceleration(&mut self) -> Vector3d {
        self.get_event().acceleration
    }

    fn get_gyro(&mut self) -> Vector3d {
        self.get_event().gyro
    }

    fn get_temperature(&mut self) -> f32 {
        self.get_event().temperature
    }

    fn get_event(&mut self) -> ImuEvent {
        match block_on(self.chip.read_event()) {
            Ok(event) => {
                self.last_event = event;
                event
            }
            Err(err) => {
                self.read_errors = self.read_errors.saturating_add(1);
                warn!("{} read failed: {:?}", self.chip.chip_name(), err);
                self.last_event
            }
        }
    }

    fn name(&self) -> &str {
        self.chip.chip_name()
    }
}
