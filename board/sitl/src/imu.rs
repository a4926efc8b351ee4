use hal::{ImuSensor, Vector3d};
use serde::Deserialize;

const GRAVITY: f32 = 9.81;

/// Peak sensor noise on each axis (m/s²)
const NOISE_AMPLITUDE: f32 = 0.02;

/// Tilt rate for the tilt scenario (rad per sample)
const TILT_STEP: f32 = 0.05;

/// Samples per burst in the shake scenario
const SHAKE_LENGTH: u32 = 3;

#[derive(clap::ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Resting flat, gravity on z
    Stationary,
    /// Resting with a short burst of motion at a fixed interval
    Shake,
    /// Slowly rotating with no linear acceleration
    Tilt,
    /// Sensor that never answers
    Dead,
}

/// IMU that synthesizes samples for a scenario, one per read
pub struct SimulatedImu {
    scenario: Scenario,
    shake_every: u32,
    tick: u32,
}

impl SimulatedImu {
    /// `shake_every` is raised to leave at least one still sample between
    /// bursts
    pub fn new(scenario: Scenario, shake_every: u32) -> Self {
        SimulatedImu {
            scenario,
            shake_every: shake_every.max(SHAKE_LENGTH + 1),
            tick: 0,
        }
    }

    /// Small deterministic dither, well below the default threshold
    fn noise(&self, axis: u32) -> Vector3d {
        let phase = self.tick.wrapping_mul(3).wrapping_add(axis) as f32;
        let n = |k: f32| NOISE_AMPLITUDE * (phase * k).sin();
        Vector3d::new(n(1.7), n(2.3), n(0.9)) / 3f32.sqrt()
    }

    fn is_shaking(&self) -> bool {
        self.tick % self.shake_every < SHAKE_LENGTH
            && self.tick >= self.shake_every
    }

    fn sample(&self) -> Vector3d {
        let rest = Vector3d::new(0.0, 0.0, GRAVITY);
        match self.scenario {
            Scenario::Stationary | Scenario::Dead => rest + self.noise(0),
            Scenario::Shake => {
                if self.is_shaking() {
                    rest + Vector3d::new(2.5, -1.5, 3.0)
                } else {
                    rest + self.noise(1)
                }
            }
            Scenario::Tilt => {
                let angle = self.tick as f32 * TILT_STEP;
                Vector3d::new(0.0, GRAVITY * angle.sin(), GRAVITY * angle.cos())
            }
        }
    }
}

impl ImuSensor for SimulatedImu {
    fn init(&mut self) -> bool {
        self.scenario != Scenario::Dead
    }

    fn get_acceleration(&mut self) -> Vector3d {
        let sample = self.sample();
        self.tick = self.tick.wrapping_add(1);
        sample
    }

    fn get_gyro(&mut self) -> Vector3d {
        match self.scenario {
            Scenario::Tilt => Vector3d::new(TILT_STEP, 0.0, 0.0),
            _ => Vector3d::zeros(),
        }
    }

    fn get_temperature(&mut self) -> f32 {
        25.0
    }

    fn name(&self) -> &str {
        "simulated IMU"
    }
}
