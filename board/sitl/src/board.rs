use motionwatch::{Board, Resources};

use crate::clock::{SystemClock, ThreadDelay, VirtualClock};
use crate::imu::{Scenario, SimulatedImu};

pub struct SimulatedBoard {
    scenario: Scenario,
    shake_every: u32,
    virtual_time: bool,
}

impl SimulatedBoard {
    pub fn new(scenario: Scenario, shake_every: u32, virtual_time: bool) -> Self {
        SimulatedBoard {
            scenario,
            shake_every,
            virtual_time,
        }
    }
}

impl Board for SimulatedBoard {
    fn name(&self) -> &str {
        if self.virtual_time {
            "SITL (virtual time)"
        } else {
            "SITL"
        }
    }

    fn split_resources(self) -> Resources {
        let imu = Box::new(SimulatedImu::new(self.scenario, self.shake_every));
        // A dead sensor is never polled, so the only wait is the halt loop,
        // which would spin on a virtual delay
        if self.virtual_time && self.scenario != Scenario::Dead {
            let clock = VirtualClock::new();
            Resources {
                imu: Some(imu),
                delay: Box::new(clock.delay()),
                clock: Box::new(clock),
            }
        } else {
            Resources {
                imu: Some(imu),
                clock: Box::new(SystemClock::new()),
                delay: Box::new(ThreadDelay),
            }
        }
    }
}
