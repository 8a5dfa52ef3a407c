use super::registers::{TwiStatus, TWSR_READ_MASK, TWSR_STATUS_MASK};

/// Protocol step a status check belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Start,
    RepeatedStart,
    WriteAddress,
    ReadAddress,
    WriteData,
    ReadData,
}

impl Phase {
    /// Status that means this step went through
    pub const fn expected(self) -> TwiStatus {
        match self {
            Self::Start => TwiStatus::StartTransmitted,
            Self::RepeatedStart => TwiStatus::RepStartTransmitted,
            Self::WriteAddress => TwiStatus::AddrWriteAck,
            Self::ReadAddress => TwiStatus::AddrReadAck,
            Self::WriteData => TwiStatus::DataWriteAck,
            Self::ReadData => TwiStatus::DataReadAck,
        }
    }

    /// Status the slave answers with when it does not acknowledge
    pub const fn nack(self) -> Option<TwiStatus> {
        match self {
            Self::WriteAddress => Some(TwiStatus::AddrWriteNack),
            Self::ReadAddress => Some(TwiStatus::AddrReadNack),
            Self::WriteData => Some(TwiStatus::DataWriteNack),
            Self::Start | Self::RepeatedStart | Self::ReadData => None,
        }
    }

    /// Check a raw TWSR value against this step.
    ///
    /// After a receive the ACK bit of the status is ours, not the slave's,
    /// so only the top nibble is compared.
    pub fn check(self, twsr: u8) -> Result<(), TwiError> {
        let expected = self.expected().code();
        let ok = match self {
            Self::ReadData => twsr & TWSR_READ_MASK == expected,
            _ => twsr & TWSR_STATUS_MASK == expected,
        };
        if ok {
            return Ok(());
        }

        let code = twsr & TWSR_STATUS_MASK;
        match self.nack() {
            Some(nack) if nack.code() == code => Err(TwiError::Nack(self)),
            _ => Err(TwiError::Status { phase: self, code }),
        }
    }
}

/// TWI master errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiError {
    /// A bus clock of 0kHz was requested
    InvalidBitrate,
    /// The completion flag did not set within the poll budget
    Timeout(Phase),
    /// The slave did not acknowledge
    Nack(Phase),
    /// Any other status, e.g. arbitration lost or bus error
    Status { phase: Phase, code: u8 },
    /// The stop bit never cleared
    StopTimeout,
}

impl TwiError {
    /// One-line description in the firmware's log wording
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidBitrate => "Bitrate must be at least 1kHz",
            Self::Timeout(Phase::Start | Phase::RepeatedStart) => "Start timed out",
            Self::Timeout(Phase::ReadData) => "Read byte timed out",
            Self::Timeout(_) => "i2c not ready for sending",
            Self::Nack(Phase::WriteAddress) => "Write address not acked",
            Self::Nack(Phase::ReadAddress) => "Read address not acked",
            Self::Nack(_) => "Write byte not acked",
            Self::Status { phase: Phase::Start, .. } => "Start not acked",
            Self::Status { phase: Phase::RepeatedStart, .. } => "Repeated Start not acked",
            Self::Status { phase: Phase::WriteAddress, .. } => "Write address not acked",
            Self::Status { phase: Phase::ReadAddress, .. } => "Read address not acked",
            Self::Status { phase: Phase::WriteData, .. } => "Write byte not acked",
            Self::Status { phase: Phase::ReadData, .. } => "Read byte not acked",
            Self::StopTimeout => "Stop condition stuck",
        }
    }
}

impl ufmt::uDisplay for TwiError {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str(self.message())
    }
}
