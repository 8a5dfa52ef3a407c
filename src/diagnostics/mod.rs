//! Bus error bookkeeping
//!
//! Every failure the TWI master sees is reported here, whether or not the
//! active error policy lets it abort the transaction. The console prints the
//! record; nothing here touches hardware.

use crate::hal::twi::TwiError;

/// One reported failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Error {
    pub error: TwiError,
    /// Raw TWSR when the failure was seen
    pub status: u8,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    last_error: Option<Error>,
    error_count: u16,
}

impl Diagnostics {
    pub const fn new() -> Self {
        Self {
            last_error: None,
            error_count: 0,
        }
    }

    pub fn report_error(&mut self, error: TwiError, status: u8) {
        #[cfg(feature = "defmt")]
        defmt::warn!("i2c: {} TWSR={=u8:#x}", error, status);

        self.last_error = Some(Error { error, status });
        self.error_count = self.error_count.saturating_add(1);
    }

    pub fn last_error(&self) -> Option<Error> {
        self.last_error
    }

    pub fn error_count(&self) -> u16 {
        self.error_count
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::twi::Phase;

    #[test]
    fn keeps_last_error_and_counts_all() {
        let mut diag = Diagnostics::new();
        assert_eq!(diag.last_error(), None);

        diag.report_error(TwiError::Nack(Phase::WriteAddress), 0x20);
        diag.report_error(TwiError::Timeout(Phase::Start), 0xF8);

        assert_eq!(diag.error_count(), 2);
        assert_eq!(
            diag.last_error(),
            Some(Error { error: TwiError::Timeout(Phase::Start), status: 0xF8 })
        );

        diag.clear();
        assert_eq!(diag.error_count(), 0);
        assert_eq!(diag.last_error(), None);
    }
}
