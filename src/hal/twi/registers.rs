//! TWI register interface and bit layout

/// TWI interrupt flag: set by hardware when an operation completes,
/// cleared by writing a one.
pub const TWINT: u8 = 1 << 7;
/// Enable acknowledge
pub const TWEA: u8 = 1 << 6;
/// Start condition
pub const TWSTA: u8 = 1 << 5;
/// Stop condition, cleared by hardware once the stop is on the bus
pub const TWSTO: u8 = 1 << 4;
/// Write collision
pub const TWWC: u8 = 1 << 3;
/// TWI enable
pub const TWEN: u8 = 1 << 2;
/// TWI interrupt enable
pub const TWIE: u8 = 1 << 0;

/// Control bits that survive a command write in `receive_byte`
pub const TWCR_CMD_MASK: u8 = 0x0F;

/// Protocol status bits of TWSR
pub const TWSR_STATUS_MASK: u8 = 0xF8;
/// Prescaler bits of TWSR
pub const TWSR_PRESCALER_MASK: u8 = 0x03;
/// Status mask used after a receive, ignores whether we sent ACK or NACK
pub const TWSR_READ_MASK: u8 = 0xF0;

/// Access to the four TWI registers the master driver uses.
///
/// The driver keeps no shadow copy: every status decision re-reads the
/// hardware. Reads take `&mut self` because on real silicon (and in the
/// simulator) reading the control register is how completion is observed.
pub trait BusRegisters {
    /// TWCR
    fn read_control(&mut self) -> u8;
    fn write_control(&mut self, value: u8);

    /// TWSR, status code in the top five bits, prescaler in the bottom two
    fn read_status(&mut self) -> u8;
    fn write_status(&mut self, value: u8);

    /// TWDR
    fn read_data(&mut self) -> u8;
    fn write_data(&mut self, value: u8);

    /// TWBR
    fn read_bitrate(&mut self) -> u8;
    fn write_bitrate(&mut self, value: u8);
}

impl<T: BusRegisters + ?Sized> BusRegisters for &mut T {
    fn read_control(&mut self) -> u8 {
        (**self).read_control()
    }

    fn write_control(&mut self, value: u8) {
        (**self).write_control(value)
    }

    fn read_status(&mut self) -> u8 {
        (**self).read_status()
    }

    fn write_status(&mut self, value: u8) {
        (**self).write_status(value)
    }

    fn read_data(&mut self) -> u8 {
        (**self).read_data()
    }

    fn write_data(&mut self, value: u8) {
        (**self).write_data(value)
    }

    fn read_bitrate(&mut self) -> u8 {
        (**self).read_bitrate()
    }

    fn write_bitrate(&mut self, value: u8) {
        (**self).write_bitrate(value)
    }
}

/// Master-mode TWI status codes (TWSR with the prescaler bits masked off)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TwiStatus {
    BusError = 0x00,
    StartTransmitted = 0x08,
    RepStartTransmitted = 0x10,
    AddrWriteAck = 0x18,
    AddrWriteNack = 0x20,
    DataWriteAck = 0x28,
    DataWriteNack = 0x30,
    ArbitrationLost = 0x38,
    AddrReadAck = 0x40,
    AddrReadNack = 0x48,
    DataReadAck = 0x50,
    DataReadNack = 0x58,
    NoInfo = 0xF8,
}

impl TwiStatus {
    /// Decode a raw TWSR value. Slave-mode codes yield `None`.
    pub fn from_register(twsr: u8) -> Option<Self> {
        let status = match twsr & TWSR_STATUS_MASK {
            0x00 => Self::BusError,
            0x08 => Self::StartTransmitted,
            0x10 => Self::RepStartTransmitted,
            0x18 => Self::AddrWriteAck,
            0x20 => Self::AddrWriteNack,
            0x28 => Self::DataWriteAck,
            0x30 => Self::DataWriteNack,
            0x38 => Self::ArbitrationLost,
            0x40 => Self::AddrReadAck,
            0x48 => Self::AddrReadNack,
            0x50 => Self::DataReadAck,
            0x58 => Self::DataReadNack,
            0xF8 => Self::NoInfo,
            _ => return None,
        };
        Some(status)
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ignores_prescaler_bits() {
        assert_eq!(TwiStatus::from_register(0x08 | 0x02), Some(TwiStatus::StartTransmitted));
        assert_eq!(TwiStatus::from_register(0x5B), Some(TwiStatus::DataReadNack));
        assert_eq!(TwiStatus::from_register(0xF9), Some(TwiStatus::NoInfo));
    }

    #[test]
    fn slave_codes_are_not_master_statuses() {
        assert_eq!(TwiStatus::from_register(0x60), None);
        assert_eq!(TwiStatus::from_register(0xA8), None);
    }
}
