//! SCL clock selection
//!
//! The TWI clock is `SCL = F_CPU / (prescaler * (16 + 2 * TWBR))`. The
//! prescaler is picked from the requested rate so that TWBR stays in range
//! for slow buses, then TWBR is solved from the formula.

use super::error::TwiError;

/// TWSR prescaler selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    Div1,
    Div4,
    Div16,
}

impl Prescaler {
    /// Band table: below 8kHz use /16, below 31kHz use /4, otherwise /1
    pub const fn for_khz(khz: u16) -> Self {
        if khz < 8 {
            Self::Div16
        } else if khz < 31 {
            Self::Div4
        } else {
            Self::Div1
        }
    }

    pub const fn factor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div4 => 4,
            Self::Div16 => 16,
        }
    }

    /// TWPS1:TWPS0 encoding
    pub const fn bits(self) -> u8 {
        match self {
            Self::Div1 => 0b00,
            Self::Div4 => 0b01,
            Self::Div16 => 0b10,
        }
    }
}

/// Register values for one bus clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bitrate {
    pub prescaler: Prescaler,
    /// TWBR value
    pub divider: u8,
}

impl Bitrate {
    /// Compute prescaler and divider for `khz` on a `cpu_hz` core clock.
    ///
    /// `F_CPU / (2000 * prescaler * khz)` less the fixed 8 when it is at
    /// least 8. A divider that does not fit TWBR saturates at 255 (slowest
    /// clock the band allows).
    pub fn compute(cpu_hz: u32, khz: u16) -> Result<Self, TwiError> {
        if khz == 0 {
            return Err(TwiError::InvalidBitrate);
        }

        let prescaler = Prescaler::for_khz(khz);
        let mut divider = cpu_hz / (2000 * prescaler.factor() * u32::from(khz));
        if divider >= 8 {
            divider -= 8;
        }

        Ok(Self {
            prescaler,
            divider: u8::try_from(divider).unwrap_or(u8::MAX),
        })
    }

    /// SCL frequency in Hz these settings produce on a `cpu_hz` core clock
    pub fn scl_hz(&self, cpu_hz: u32) -> u32 {
        cpu_hz / (self.prescaler.factor() * (16 + 2 * u32::from(self.divider)))
    }
}
