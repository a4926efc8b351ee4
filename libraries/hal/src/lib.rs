#![no_std]
extern crate nalgebra;

mod imu;
mod notify;
mod time;
mod types;

pub use imu::*;
pub use notify::*;
pub use time::*;
pub use types::*;
