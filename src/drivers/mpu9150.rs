//! MPU9150 9-axis IMU (accelerometer/gyro die)

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::config::MPU9150_ADDR;

// MPU9150 registers
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const REG_PWR_MGMT_1: u8 = 0x6B;
pub const REG_WHO_AM_I: u8 = 0x75;

/// WHO_AM_I reads back the 7-bit address with AD0 ignored
const WHO_AM_I_VALUE: u8 = 0x68;

/// Raw 3-axis sample
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Vec3 {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// MPU9150 driver
pub struct Mpu9150<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, E> Mpu9150<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    /// Device with AD0 low
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, MPU9150_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn who_am_i(&mut self) -> Result<u8, E> {
        self.read_reg(REG_WHO_AM_I)
    }

    pub fn is_present(&mut self) -> Result<bool, E> {
        Ok(self.who_am_i()? == WHO_AM_I_VALUE)
    }

    /// Leave sleep mode, internal oscillator
    pub fn wake(&mut self) -> Result<(), E> {
        self.i2c.write(self.address, &[REG_PWR_MGMT_1, 0x00])
    }

    /// Accelerometer counts, big-endian on the wire
    pub fn read_accel_raw(&mut self) -> Result<Vec3, E> {
        let mut data = [0u8; 6];
        self.i2c
            .write_read(self.address, &[REG_ACCEL_XOUT_H], &mut data)?;

        Ok(Vec3 {
            x: i16::from_be_bytes([data[0], data[1]]),
            y: i16::from_be_bytes([data[2], data[3]]),
            z: i16::from_be_bytes([data[4], data[5]]),
        })
    }

    pub fn bus(&self) -> &I2C {
        &self.i2c
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, E> {
        let mut value = [0u8; 1];
        self.i2c.write_read(self.address, &[reg], &mut value)?;
        Ok(value[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::i2c::{Mock, Transaction};

    #[test]
    fn who_am_i_reads_register_0x75() {
        let i2c = Mock::new(&[Transaction::write_read(0x68, vec![0x75], vec![0x68])]);
        let mut imu = Mpu9150::new(i2c);

        assert_eq!(imu.who_am_i().unwrap(), 0x68);
        imu.release().done();
    }

    #[test]
    fn foreign_chip_is_not_present() {
        let i2c = Mock::new(&[Transaction::write_read(0x69, vec![0x75], vec![0x71])]);
        let mut imu = Mpu9150::with_address(i2c, 0x69);

        assert!(!imu.is_present().unwrap());
        imu.release().done();
    }

    #[test]
    fn wake_clears_power_management() {
        let i2c = Mock::new(&[Transaction::write(0x68, vec![0x6B, 0x00])]);
        let mut imu = Mpu9150::new(i2c);

        imu.wake().unwrap();
        imu.release().done();
    }

    #[test]
    fn accel_sample_is_big_endian() {
        let i2c = Mock::new(&[Transaction::write_read(
            0x68,
            vec![0x3B],
            vec![0x40, 0x00, 0xFF, 0xFE, 0x00, 0x10],
        )]);
        let mut imu = Mpu9150::new(i2c);

        assert_eq!(imu.read_accel_raw().unwrap(), Vec3 { x: 16384, y: -2, z: 16 });
        imu.release().done();
    }
}
