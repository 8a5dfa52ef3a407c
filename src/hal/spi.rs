//! SPI master
#![allow(clippy::new_without_default)]

use avr_device::atmega128a::{PORTB, SPI};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::spi::FullDuplex;

use crate::hal::gpio::Port;

// PB0 SS, PB1 SCK, PB2 MOSI. MISO (PB3) stays an input.
const SPI_OUTPUTS: u8 = 0x07;

// SPCR
const SPE: u8 = 1 << 6;
const MSTR: u8 = 1 << 4;
const SPR0: u8 = 1 << 0;
// SPSR
const SPIF: u8 = 1 << 7;

/// SPI peripheral driver
pub struct Spi {
    _spi: PhantomData<SPI>,
}

impl Spi {
    /// Master, mode 0, MSB first, F_CPU/16
    pub fn new() -> Self {
        Port::<PORTB>::new().set_outputs(SPI_OUTPUTS);
        unsafe {
            (*SPI::ptr()).spcr.write(|w| w.bits(SPE | MSTR | SPR0));
        }

        Self { _spi: PhantomData }
    }
}

impl FullDuplex<u8> for Spi {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        unsafe {
            let p = SPI::ptr();
            if (*p).spsr.read().bits() & SPIF == 0 {
                return Err(nb::Error::WouldBlock);
            }
            Ok((*p).spdr.read().bits())
        }
    }

    fn send(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        unsafe {
            (*SPI::ptr()).spdr.write(|w| w.bits(byte));
        }
        Ok(())
    }
}

impl embedded_hal::blocking::spi::transfer::Default<u8> for Spi {}
