use core::f32::consts::PI;
use core::fmt::Debug;

use embedded_hal_async::i2c::I2c;
use hal::{ImuEvent, Vector3d};
use log::{debug, info};
use thiserror::Error;

use crate::imu::ImuChip;

// LSM6DSO32 I2C addresses (depends on SA0 pin state)
pub const LSM6DSO32_I2C_ADDR_PRIMARY: u8 = 0x6A;
pub const LSM6DSO32_I2C_ADDR_SECONDARY: u8 = 0x6B;

// Register addresses
pub const LSM6DSO32_REG_WHO_AM_I: u8 = 0x0F;
pub const LSM6DSO32_REG_CTRL1_XL: u8 = 0x10;
pub const LSM6DSO32_REG_CTRL2_G: u8 = 0x11;
pub const LSM6DSO32_REG_CTRL3_C: u8 = 0x12;
pub const LSM6DSO32_REG_OUT_TEMP_L: u8 = 0x20;

// Temperature, gyro and accel output registers are contiguous
pub const LSM6DSO32_OUTPUT_LENGTH: usize = 14;

// Chip ID for verification
pub const LSM6DSO32_CHIP_ID: u8 = 0x6C;

// CTRL3_C bits
pub const LSM6DSO32_CTRL3_SW_RESET: u8 = 0x01;
pub const LSM6DSO32_CTRL3_IF_INC: u8 = 0x04;
pub const LSM6DSO32_CTRL3_BDU: u8 = 0x40;

const RESET_POLL_ATTEMPTS: usize = 100;

const TEMPERATURE_LSB_PER_C: f32 = 256.0;
const TEMPERATURE_OFFSET_C: f32 = 25.0;

/// Gravity used to convert g to m/s²
const GRAVITY_STANDARD: f32 = 9.80665;

#[derive(Error, Debug)]
pub enum Lsm6dso32Error<E: Debug> {
    #[error("I2C bus error: {0:?}")]
    Bus(E),

    #[error("Unexpected WHO_AM_I value {0:#04x}")]
    WrongDevice(u8),

    #[error("Software reset did not complete")]
    ResetTimeout,
}

/// Output data rate shared by the accelerometer and the gyroscope
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataRate {
    PowerDown = 0,
    Hz12_5 = 1,
    Hz26 = 2,
    Hz52 = 3,
    Hz104 = 4,
    Hz208 = 5,
    Hz416 = 6,
    Hz833 = 7,
    Hz1660 = 8,
    Hz3330 = 9,
    Hz6660 = 10,
}

/// Accelerometer full scale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccelRange {
    G4,
    G8,
    G16,
    G32,
}

impl AccelRange {
    /// FS_XL field of CTRL1_XL
    fn bits(self) -> u8 {
        match self {
            AccelRange::G4 => 0b00,
            AccelRange::G32 => 0b01,
            AccelRange::G8 => 0b10,
            AccelRange::G16 => 0b11,
        }
    }

    /// Sensitivity in mg/LSB
    pub fn sensitivity(self) -> f32 {
        match self {
            AccelRange::G4 => 0.122,
            AccelRange::G8 => 0.244,
            AccelRange::G16 => 0.488,
            AccelRange::G32 => 0.976,
        }
    }
}

/// Gyroscope full scale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GyroRange {
    Dps125,
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    /// FS_G and FS_125 fields of CTRL2_G
    fn bits(self) -> u8 {
        match self {
            GyroRange::Dps125 => 0b0010,
            GyroRange::Dps250 => 0b0000,
            GyroRange::Dps500 => 0b0100,
            GyroRange::Dps1000 => 0b1000,
            GyroRange::Dps2000 => 0b1100,
        }
    }

    /// Sensitivity in mdps/LSB
    pub fn sensitivity(self) -> f32 {
        match self {
            GyroRange::Dps125 => 4.375,
            GyroRange::Dps250 => 8.75,
            GyroRange::Dps500 => 17.5,
            GyroRange::Dps1000 => 35.0,
            GyroRange::Dps2000 => 70.0,
        }
    }
}

/// Configuration for LSM6DSO32 sensor
#[derive(Clone, Copy, Debug)]
pub struct Lsm6dso32Config {
    /// I2C address of the LSM6DSO32 (0x6A or 0x6B)
    pub i2c_addr: u8,

    pub accel_rate: DataRate,
    pub accel_range: AccelRange,

    pub gyro_rate: DataRate,
    pub gyro_range: GyroRange,
}

impl Default for Lsm6dso32Config {
    fn default() -> Self {
        Self {
            i2c_addr: LSM6DSO32_I2C_ADDR_PRIMARY,
            accel_rate: DataRate::Hz104,
            accel_range: AccelRange::G8,
            gyro_rate: DataRate::Hz104,
            gyro_range: GyroRange::Dps1000,
        }
    }
}

impl Lsm6dso32Config {
    fn ctrl1_xl(&self) -> u8 {
        ((self.accel_rate as u8) << 4) | (self.accel_range.bits() << 2)
    }

    fn ctrl2_g(&self) -> u8 {
        ((self.gyro_rate as u8) << 4) | self.gyro_range.bits()
    }
}

/// LSM6DSO32 accelerometer + gyroscope
pub struct Lsm6dso32<I: I2c> {
    i2c: I,
    config: Lsm6dso32Config,
}

impl<I: I2c> Lsm6dso32<I> {
    /// Create a new driver with the default configuration at the given address
    pub fn new(i2c: I, addr: u8) -> Self {
        Self::new_with_config(
            i2c,
            Lsm6dso32Config {
                i2c_addr: addr,
                ..Default::default()
            },
        )
    }

    /// Create a new driver at the primary I2C address (0x6A)
    pub fn new_primary(i2c: I) -> Self {
        Self::new(i2c, LSM6DSO32_I2C_ADDR_PRIMARY)
    }

    pub fn new_with_config(i2c: I, config: Lsm6dso32Config) -> Self {
        Self { i2c, config }
    }

    pub fn config(&self) -> &Lsm6dso32Config {
        &self.config
    }

    /// Give the bus back
    pub fn release(self) -> I {
        self.i2c
    }

    async fn read_register(&mut self, reg: u8) -> Result<u8, Lsm6dso32Error<I::Error>> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.config.i2c_addr, &[reg], &mut buffer)
            .await
            .map_err(Lsm6dso32Error::Bus)?;
        Ok(buffer[0])
    }

    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Lsm6dso32Error<I::Error>> {
        self.i2c
            .write(self.config.i2c_addr, &[reg, value])
            .await
            .map_err(Lsm6dso32Error::Bus)
    }

    /// Read the chip ID
    pub async fn chip_id(&mut self) -> Result<u8, Lsm6dso32Error<I::Error>> {
        self.read_register(LSM6DSO32_REG_WHO_AM_I).await
    }

    async fn reset(&mut self) -> Result<(), Lsm6dso32Error<I::Error>> {
        self.write_register(LSM6DSO32_REG_CTRL3_C, LSM6DSO32_CTRL3_SW_RESET)
            .await?;

        // SW_RESET clears itself once the registers are back to defaults
        for _ in 0..RESET_POLL_ATTEMPTS {
            let ctrl3 = self.read_register(LSM6DSO32_REG_CTRL3_C).await?;
            if ctrl3 & LSM6DSO32_CTRL3_SW_RESET == 0 {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(Lsm6dso32Error::ResetTimeout)
    }

    pub async fn read_raw(&mut self) -> Result<[i16; 7], Lsm6dso32Error<I::Error>> {
        let mut buffer = [0u8; LSM6DSO32_OUTPUT_LENGTH];
        self.i2c
            .write_read(self.config.i2c_addr, &[LSM6DSO32_REG_OUT_TEMP_L], &mut buffer)
            .await
            .map_err(Lsm6dso32Error::Bus)?;

        let mut raw = [0i16; 7];
        for (value, bytes) in raw.iter_mut().zip(buffer.chunks_exact(2)) {
            *value = i16::from_le_bytes([bytes[0], bytes[1]]);
        }
        Ok(raw)
    }

    fn convert(&self, raw: [i16; 7]) -> ImuEvent {
        let accel_scale = self.config.accel_range.sensitivity() * 1e-3 * GRAVITY_STANDARD;
        let gyro_scale = self.config.gyro_range.sensitivity() * 1e-3 * PI / 180.0;

        ImuEvent {
            temperature: raw[0] as f32 / TEMPERATURE_LSB_PER_C + TEMPERATURE_OFFSET_C,
            gyro: Vector3d::new(
                raw[1] as f32 * gyro_scale,
                raw[2] as f32 * gyro_scale,
                raw[3] as f32 * gyro_scale,
            ),
            acceleration: Vector3d::new(
                raw[4] as f32 * accel_scale,
                raw[5] as f32 * accel_scale,
                raw[6] as f32 * accel_scale,
            ),
        }
    }
}

impl<I: I2c> ImuChip for Lsm6dso32<I> {
    type Error = Lsm6dso32Error<I::Error>;

    async fn init(&mut self) -> Result<(), Self::Error> {
        let chip_id = self.chip_id().await?;
        if chip_id != LSM6DSO32_CHIP_ID {
            return Err(Lsm6dso32Error::WrongDevice(chip_id));
        }

        self.reset().await?;

        self.write_register(
            LSM6DSO32_REG_CTRL3_C,
            LSM6DSO32_CTRL3_BDU | LSM6DSO32_CTRL3_IF_INC,
        )
        .await?;
        let ctrl1 = self.config.ctrl1_xl();
        let ctrl2 = self.config.ctrl2_g();
        self.write_register(LSM6DSO32_REG_CTRL1_XL, ctrl1).await?;
        self.write_register(LSM6DSO32_REG_CTRL2_G, ctrl2).await?;

        debug!("CTRL1_XL={:#04x} CTRL2_G={:#04x}", ctrl1, ctrl2);
        info!(
            "LSM6DSO32 at {:#04x}: accel {:?} @ {:?}, gyro {:?} @ {:?}",
            self.config.i2c_addr,
            self.config.accel_range,
            self.config.accel_rate,
            self.config.gyro_range,
            self.config.gyro_rate
        );
        Ok(())
    }

    async fn read_event(&mut self) -> Result<ImuEvent, Self::Error> {
        let raw = self.read_raw().await?;
        Ok(self.convert(raw))
    }

    fn chip_name(&self) -> &'static str {
        "LSM6DSO32"
    }
}
