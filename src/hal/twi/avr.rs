use avr_device::atmega128a::TWI;

use super::registers::BusRegisters;

/// The on-chip TWI register block
pub struct AvrTwi {
    twi: TWI,
}

impl AvrTwi {
    pub fn new(twi: TWI) -> Self {
        Self { twi }
    }

    pub fn free(self) -> TWI {
        self.twi
    }
}

impl BusRegisters for AvrTwi {
    #[inline]
    fn read_control(&mut self) -> u8 {
        self.twi.twcr.read().bits()
    }

    #[inline]
    fn write_control(&mut self, value: u8) {
        unsafe { self.twi.twcr.write(|w| w.bits(value)) }
    }

    #[inline]
    fn read_status(&mut self) -> u8 {
        self.twi.twsr.read().bits()
    }

    #[inline]
    fn write_status(&mut self, value: u8) {
        unsafe { self.twi.twsr.write(|w| w.bits(value)) }
    }

    #[inline]
    fn read_data(&mut self) -> u8 {
        self.twi.twdr.read().bits()
    }

    #[inline]
    fn write_data(&mut self, value: u8) {
        unsafe { self.twi.twdr.write(|w| w.bits(value)) }
    }

    #[inline]
    fn read_bitrate(&mut self) -> u8 {
        self.twi.twbr.read().bits()
    }

    #[inline]
    fn write_bitrate(&mut self, value: u8) {
        unsafe { self.twi.twbr.write(|w| w.bits(value)) }
    }
}
