#![cfg_attr(not(test), no_std)]

pub mod imu;

pub use imu::lsm6dso32::{
    AccelRange, DataRate, GyroRange, Lsm6dso32, Lsm6dso32Config, Lsm6dso32Error,
};
pub use imu::{BlockingImu, ImuChip};
