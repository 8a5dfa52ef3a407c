//! Polled TWI master
//!
//! Three layers, each only calling the one below:
//! - bitrate setup and enable (`init`, `set_bitrate`)
//! - primitives, one hardware command each with a bounded wait
//!   (`send_start`, `send_stop`, `send_byte`, `receive_byte`, ...)
//! - register transactions built from the primitives (`read_register`,
//!   `read_registers`, `write_register`, `write_registers`) plus the
//!   embedded-hal blocking I2C traits
//!
//! Every transaction owns its whole start..stop sequence. Once a start has
//! been issued the stop is sent even if a step in between failed.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::i2c::{Read, Write, WriteRead};

use super::bitrate::Bitrate;
use super::error::{Phase, TwiError};
use super::registers::{
    BusRegisters, TWCR_CMD_MASK, TWEA, TWEN, TWINT, TWSR_PRESCALER_MASK, TWSTA, TWSTO,
};
use crate::config;
use crate::diagnostics::Diagnostics;

/// What a register transaction does when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorPolicy {
    /// Abort at the first failure, send stop, return the error
    Propagate,
    /// Record the failure and carry on with the sequence, like the legacy
    /// firmware. Reads then return whatever TWDR holds.
    LogAndContinue,
}

/// Driver timing and policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Core clock the bit-rate divider is computed for
    pub cpu_hz: u32,
    /// Control register polls before an operation times out
    pub poll_budget: u16,
    /// Poll rounds `send_byte` waits for a previous operation to finish
    pub ready_retries: u16,
    /// Polls of the stop bit before the stop is reported stuck
    pub stop_budget: u16,
    pub policy: ErrorPolicy,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            cpu_hz: config::CPU_FREQ_HZ,
            poll_budget: config::I2C_POLL_BUDGET,
            ready_retries: config::I2C_READY_RETRIES,
            stop_budget: config::I2C_STOP_BUDGET,
            policy: ErrorPolicy::Propagate,
        }
    }

    #[must_use]
    pub const fn cpu_hz(mut self, hz: u32) -> Self {
        self.cpu_hz = hz;
        self
    }

    #[must_use]
    pub const fn poll_budget(mut self, polls: u16) -> Self {
        self.poll_budget = polls;
        self
    }

    #[must_use]
    pub const fn ready_retries(mut self, rounds: u16) -> Self {
        self.ready_retries = rounds;
        self
    }

    #[must_use]
    pub const fn stop_budget(mut self, polls: u16) -> Self {
        self.stop_budget = polls;
        self
    }

    #[must_use]
    pub const fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// TWI master driver
pub struct I2cMaster<R, D> {
    regs: R,
    delay: D,
    config: Config,
    diagnostics: Diagnostics,
}

impl<R, D> I2cMaster<R, D>
where
    R: BusRegisters,
    D: DelayUs<u8>,
{
    /// Wrap the registers. The controller is left untouched until `init`.
    pub fn new(regs: R, delay: D, config: Config) -> Self {
        Self {
            regs,
            delay,
            config,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Set the default 100kHz clock and enable the controller
    pub fn init(&mut self) -> Result<Bitrate, TwiError> {
        let rate = self.set_bitrate(config::I2C_DEFAULT_KHZ)?;
        self.enable();
        Ok(rate)
    }

    /// Program prescaler and divider for `khz`. Nothing is written for 0kHz.
    pub fn set_bitrate(&mut self, khz: u16) -> Result<Bitrate, TwiError> {
        let rate = Bitrate::compute(self.config.cpu_hz, khz)?;

        let twsr = self.regs.read_status();
        self.regs
            .write_status((twsr & !TWSR_PRESCALER_MASK) | rate.prescaler.bits());
        self.regs.write_bitrate(rate.divider);

        Ok(rate)
    }

    /// Poll TWINT up to the configured budget. `false` on timeout.
    pub fn wait_for_complete(&mut self) -> bool {
        for _ in 0..self.config.poll_budget {
            if self.regs.read_control() & TWINT != 0 {
                return true;
            }
        }
        false
    }

    pub fn send_start(&mut self) -> Result<(), TwiError> {
        self.start_condition(Phase::Start)
    }

    /// Start without releasing the bus first
    pub fn send_repeated_start(&mut self) -> Result<(), TwiError> {
        self.start_condition(Phase::RepeatedStart)
    }

    pub fn send_stop(&mut self) -> Result<(), TwiError> {
        self.regs.write_control(TWINT | TWEN | TWSTO);

        // TWSTO clears once the stop is on the bus. TWINT is not set.
        for _ in 0..self.config.stop_budget {
            if self.regs.read_control() & TWSTO == 0 {
                return Ok(());
            }
        }
        Err(TwiError::StopTimeout)
    }

    /// Put one byte on the bus. The slave's answer is not checked here.
    pub fn send_byte(&mut self, byte: u8) -> Result<(), TwiError> {
        self.transmit(byte, Phase::WriteData)
    }

    /// SLA+W
    pub fn send_write_address(&mut self, address: u8) -> Result<(), TwiError> {
        self.transmit(address << 1, Phase::WriteAddress)?;
        Phase::WriteAddress.check(self.regs.read_status())
    }

    /// SLA+R
    pub fn send_read_address(&mut self, address: u8) -> Result<(), TwiError> {
        self.transmit((address << 1) | 0x01, Phase::ReadAddress)?;
        Phase::ReadAddress.check(self.regs.read_status())
    }

    /// Data byte or register pointer in master transmitter mode
    pub fn send_data(&mut self, byte: u8) -> Result<(), TwiError> {
        self.transmit(byte, Phase::WriteData)?;
        Phase::WriteData.check(self.regs.read_status())
    }

    /// Clock in one byte, answering ACK (more to come) or NACK (last byte).
    /// Fetch it with `received_byte`.
    pub fn receive_byte(&mut self, ack: bool) -> Result<(), TwiError> {
        let control = self.regs.read_control() & TWCR_CMD_MASK;
        let ea = if ack { TWEA } else { 0 };
        self.regs.write_control(control | TWINT | ea);

        if !self.wait_for_complete() {
            return Err(TwiError::Timeout(Phase::ReadData));
        }
        Phase::ReadData.check(self.regs.read_status())
    }

    #[inline]
    pub fn received_byte(&mut self) -> u8 {
        self.regs.read_data()
    }

    /// Raw TWSR, prescaler bits included
    #[inline]
    pub fn status(&mut self) -> u8 {
        self.regs.read_status()
    }

    /// Read one register of the device at `address`
    pub fn read_register(&mut self, address: u8, register: u8) -> Result<u8, TwiError> {
        self.transaction(true, |bus| {
            bus.select_register(address, register)?;
            bus.step(Self::send_repeated_start)?;
            bus.step(|b| b.send_read_address(address))?;
            bus.step(|b| b.receive_byte(false))?;
            Ok(bus.received_byte())
        })
    }

    /// Burst-read `dest.len()` consecutive registers starting at `register`.
    /// An empty `dest` does not touch the bus.
    pub fn read_registers(
        &mut self,
        address: u8,
        register: u8,
        dest: &mut [u8],
    ) -> Result<(), TwiError> {
        if dest.is_empty() {
            return Ok(());
        }

        self.transaction(true, |bus| {
            bus.select_register(address, register)?;
            bus.step(Self::send_repeated_start)?;
            bus.step(|b| b.send_read_address(address))?;
            bus.receive_into(dest)
        })
    }

    pub fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), TwiError> {
        self.write_registers(address, register, &[value])
    }

    /// Write `data` to consecutive registers starting at `register`
    pub fn write_registers(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), TwiError> {
        self.transaction(false, |bus| {
            bus.select_register(address, register)?;
            bus.send_all(data)
        })
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    pub fn release(self) -> (R, D) {
        (self.regs, self.delay)
    }

    fn start_condition(&mut self, phase: Phase) -> Result<(), TwiError> {
        // Bus free time between a stop and the next start
        self.delay.delay_us(config::I2C_START_SETUP_US);

        self.regs.write_control(TWINT | TWSTA | TWEN);
        if !self.wait_for_complete() {
            return Err(TwiError::Timeout(phase));
        }
        phase.check(self.regs.read_status())
    }

    fn transmit(&mut self, byte: u8, phase: Phase) -> Result<(), TwiError> {
        self.wait_until_ready(phase)?;

        self.regs.write_data(byte);
        self.regs.write_control(TWINT | TWEN);
        if self.wait_for_complete() {
            Ok(())
        } else {
            Err(TwiError::Timeout(phase))
        }
    }

    /// TWDR may only be loaded while TWINT is set
    fn wait_until_ready(&mut self, phase: Phase) -> Result<(), TwiError> {
        for _ in 0..self.config.ready_retries.max(1) {
            if self.wait_for_complete() {
                return Ok(());
            }
            self.delay.delay_us(config::I2C_START_SETUP_US);
        }
        Err(TwiError::Timeout(phase))
    }

    fn enable(&mut self) {
        let control = self.regs.read_control() & !TWINT;
        self.regs.write_control(control | TWEN);
    }

    fn disable(&mut self) {
        let control = self.regs.read_control() & !TWINT;
        self.regs.write_control(control & !TWEN);
    }

    /// Run one primitive and apply the error policy to its outcome
    fn step(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<(), TwiError>,
    ) -> Result<(), TwiError> {
        let result = op(self);
        self.settle(result)
    }

    fn settle(&mut self, result: Result<(), TwiError>) -> Result<(), TwiError> {
        let Err(error) = result else {
            return Ok(());
        };

        let status = self.regs.read_status();
        self.diagnostics.report_error(error, status);
        match self.config.policy {
            ErrorPolicy::Propagate => Err(error),
            ErrorPolicy::LogAndContinue => Ok(()),
        }
    }

    /// Run `body`, then always send stop. Read transactions also cycle TWEN
    /// afterwards to drop any state the controller kept.
    fn transaction<T>(
        &mut self,
        reset_after: bool,
        body: impl FnOnce(&mut Self) -> Result<T, TwiError>,
    ) -> Result<T, TwiError> {
        let result = body(self);

        let stop = self.send_stop();
        let stop = self.settle(stop);
        if reset_after {
            self.disable();
            self.enable();
        }

        let value = result?;
        stop.map(|()| value)
    }

    fn open_write(&mut self, address: u8) -> Result<(), TwiError> {
        self.step(Self::send_start)?;
        self.step(|b| b.send_write_address(address))
    }

    fn open_read(&mut self, address: u8) -> Result<(), TwiError> {
        self.step(Self::send_start)?;
        self.step(|b| b.send_read_address(address))
    }

    fn select_register(&mut self, address: u8, register: u8) -> Result<(), TwiError> {
        self.open_write(address)?;
        self.step(|b| b.send_data(register))
    }

    fn send_all(&mut self, bytes: &[u8]) -> Result<(), TwiError> {
        for &byte in bytes {
            self.step(|b| b.send_data(byte))?;
        }
        Ok(())
    }

    /// ACK every byte but the last, NACK the last to end the read
    fn receive_into(&mut self, dest: &mut [u8]) -> Result<(), TwiError> {
        let last = dest.len().saturating_sub(1);
        for (i, slot) in dest.iter_mut().enumerate() {
            self.step(|b| b.receive_byte(i < last))?;
            *slot = self.received_byte();
        }
        Ok(())
    }
}

impl<R, D> Write for I2cMaster<R, D>
where
    R: BusRegisters,
    D: DelayUs<u8>,
{
    type Error = TwiError;

    /// An empty `bytes` still addresses the device, which makes a presence probe
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), TwiError> {
        self.transaction(false, |bus| {
            bus.open_write(address)?;
            bus.send_all(bytes)
        })
    }
}

impl<R, D> Read for I2cMaster<R, D>
where
    R: BusRegisters,
    D: DelayUs<u8>,
{
    type Error = TwiError;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), TwiError> {
        if buffer.is_empty() {
            return Ok(());
        }

        self.transaction(true, |bus| {
            bus.open_read(address)?;
            bus.receive_into(buffer)
        })
    }
}

impl<R, D> WriteRead for I2cMaster<R, D>
where
    R: BusRegisters,
    D: DelayUs<u8>,
{
    type Error = TwiError;

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), TwiError> {
        if buffer.is_empty() {
            return Write::write(self, address, bytes);
        }

        self.transaction(true, |bus| {
            bus.open_write(address)?;
            bus.send_all(bytes)?;
            bus.step(Self::send_repeated_start)?;
            bus.step(|b| b.send_read_address(address))?;
            bus.receive_into(buffer)
        })
    }
}
