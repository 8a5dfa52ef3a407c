//! CC2420 radio, register reads over SPI
//!
//! A register access is one 24-bit frame: command byte (bit 7 RAM/register,
//! bit 6 read, bits 5:0 address) followed by 16 data bits. The chip shifts
//! its status byte out while the command goes in.

use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;

const REG_READ: u8 = 0x40;
const REG_ADDR_MASK: u8 = 0x3F;

/// Manufacturer ID, lower 16 bits
pub const MANFIDL: u8 = 0x1E;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<SpiE, PinE> {
    Spi(SpiE),
    Pin(PinE),
}

/// Status byte and register contents from one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub status: u8,
    pub value: u16,
}

pub struct Cc2420<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS, SpiE, PinE> Cc2420<SPI, CS>
where
    SPI: Transfer<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    pub fn read_register(&mut self, register: u8) -> Result<Reading, Error<SpiE, PinE>> {
        let mut frame = [REG_READ | (register & REG_ADDR_MASK), 0x00, 0x00];

        self.cs.set_low().map_err(Error::Pin)?;
        let transfer = self.spi.transfer(&mut frame).map(|_| ());
        // CSn goes back high even when the transfer failed
        self.cs.set_high().map_err(Error::Pin)?;
        transfer.map_err(Error::Spi)?;

        Ok(Reading {
            status: frame[0],
            value: u16::from_be_bytes([frame[1], frame[2]]),
        })
    }

    pub fn manufacturer_id(&mut self) -> Result<Reading, Error<SpiE, PinE>> {
        self.read_register(MANFIDL)
    }

    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_hal_mock::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    fn chip_select() -> PinMock {
        PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ])
    }

    #[test]
    fn manufacturer_id_frame() {
        let spi = SpiMock::new(&[SpiTransaction::transfer(
            vec![0x5E, 0x00, 0x00],
            vec![0x40, 0x23, 0x3D],
        )]);
        let mut radio = Cc2420::new(spi, chip_select());

        assert_eq!(
            radio.manufacturer_id().unwrap(),
            Reading { status: 0x40, value: 0x233D }
        );

        let (mut spi, mut cs) = radio.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn address_is_limited_to_six_bits() {
        let spi = SpiMock::new(&[SpiTransaction::transfer(
            vec![0x7F, 0x00, 0x00],
            vec![0x00, 0x00, 0x01],
        )]);
        let mut radio = Cc2420::new(spi, chip_select());

        assert_eq!(radio.read_register(0xFF).unwrap().value, 1);

        let (mut spi, mut cs) = radio.release();
        spi.done();
        cs.done();
    }
}
