//! Firmware test modes
//!
//! The mode is fixed at build time through cargo features. Everything that
//! produces console output lives here so it runs on the host as well.

use core::ops::Range;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::serial;

use crate::config::MPU9150_ADDR;
use crate::diagnostics::Diagnostics;
use crate::drivers::cc2420::Reading;
use crate::drivers::{mpu9150, SerialConsole};
use crate::hal::twi::BusRegisters;
use crate::hal::{I2cMaster, TwiError};

/// Counter digits printed by the UART test, one line each
pub const UART_TEST_COUNTS: Range<u8> = b'0'..b'9';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    /// Toggle PA0/PA1 forever
    Blink,
    /// Print numbered lines forever
    Uart,
    /// Read the MPU9150 WHO_AM_I forever
    Imu,
    /// Read the CC2420 manufacturer id forever
    Spi,
    TogglePortD,
    TogglePortB,
}

impl TestMode {
    /// Mode chosen by the enabled features, first match wins
    pub const fn selected() -> Self {
        if cfg!(feature = "imu-test") {
            Self::Imu
        } else if cfg!(feature = "spi-test") {
            Self::Spi
        } else if cfg!(feature = "uart-test") {
            Self::Uart
        } else if cfg!(feature = "toggle-portd") {
            Self::TogglePortD
        } else if cfg!(feature = "toggle-portb") {
            Self::TogglePortB
        } else {
            Self::Blink
        }
    }

    /// Only the IMU probe brings up the TWI controller
    pub const fn uses_i2c(self) -> bool {
        matches!(self, Self::Imu)
    }
}

/// One pass of the UART test: "test0" through "test8"
pub fn write_uart_test_lines<W: serial::Write<u8>>(
    console: &mut SerialConsole<W>,
) -> Result<(), W::Error> {
    for count in UART_TEST_COUNTS {
        console.write_str("test")?;
        console.write_byte(count)?;
        console.write_str("\r\n")?;
    }
    Ok(())
}

/// One IMU probe: a single register read with repeated start
pub fn read_who_am_i<R, D>(bus: &mut I2cMaster<R, D>) -> Result<u8, TwiError>
where
    R: BusRegisters,
    D: DelayUs<u8>,
{
    bus.read_register(MPU9150_ADDR, mpu9150::REG_WHO_AM_I)
}

/// WHO_AM_I as two hex digits, or the bus error behind the failed read
pub fn report_who_am_i<W: serial::Write<u8>>(
    console: &mut SerialConsole<W>,
    result: Result<u8, TwiError>,
    diagnostics: &Diagnostics,
) -> Result<(), W::Error> {
    match result {
        Ok(id) => {
            console.write_hex(id)?;
            console.write_str("\r\n")
        }
        Err(_) => console.report(diagnostics),
    }
}

/// Manufacturer id as four hex digits
pub fn report_manufacturer_id<W: serial::Write<u8>>(
    console: &mut SerialConsole<W>,
    reading: Reading,
) -> Result<(), W::Error> {
    let [hi, lo] = reading.value.to_be_bytes();
    console.write_hex(hi)?;
    console.write_hex(lo)?;
    console.write_str("\r\n")
}
