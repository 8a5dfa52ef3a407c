//! TWI (I2C) master
//!
//! Polled driver for the ATmega128 two-wire interface. Register access goes
//! through [`BusRegisters`] so the same driver runs against the real
//! peripheral ([`AvrTwi`]) and the simulator used by the unit tests.

pub mod bitrate;
pub mod error;
pub mod master;
pub mod registers;

#[cfg(target_arch = "avr")]
mod avr;

#[cfg(target_arch = "avr")]
pub use avr::AvrTwi;
pub use bitrate::{Bitrate, Prescaler};
pub use error::{Phase, TwiError};
pub use master::{Config, ErrorPolicy, I2cMaster};
pub use registers::{BusRegisters, TwiStatus};
