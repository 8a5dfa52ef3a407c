//! Software model of the TWI register block
//!
//! Responds to control register commands the way the master-mode state
//! machine of the ATmega128 does, with register-file devices on the bus.
//! Every bus-level action is logged as a `BusEvent` so tests can assert the
//! exact wire sequence.

use crate::hal::twi::registers::{
    BusRegisters, TwiStatus, TWEA, TWEN, TWINT, TWSR_PRESCALER_MASK, TWSR_STATUS_MASK, TWSTA,
    TWSTO,
};

/// One observable bus action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    RepeatedStart,
    Address { address: u8, read: bool, acked: bool },
    Write { byte: u8, acked: bool },
    /// A received byte and whether the master acknowledged it
    Read { ack: bool },
    Stop,
    Disable,
    Enable,
}

/// Whether commands ever finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Immediate,
    /// TWINT never sets again, the state machine is wedged
    Never,
}

/// A slave with a 256-byte auto-incrementing register file
pub struct SimDevice {
    pub address: u8,
    pub registers: [u8; 256],
    pointer: u8,
    nack_data: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    Started,
    Transmit { address: u8, pointer_loaded: bool },
    Receive { address: u8 },
    AddressNacked { read: bool },
}

pub struct SimulatedTwi {
    control: u8,
    status: u8,
    data: u8,
    bitrate: u8,
    mode: Mode,
    completion: Completion,
    stop_stuck: bool,
    devices: Vec<SimDevice>,
    events: Vec<BusEvent>,
    control_reads: usize,
    control_writes: usize,
}

impl SimulatedTwi {
    pub fn new() -> Self {
        Self {
            control: 0,
            status: TwiStatus::NoInfo.code(),
            data: 0xFF,
            bitrate: 0,
            mode: Mode::Idle,
            completion: Completion::Immediate,
            stop_stuck: false,
            devices: Vec::new(),
            events: Vec::new(),
            control_reads: 0,
            control_writes: 0,
        }
    }

    /// Attach a device with some registers preloaded
    pub fn with_device(mut self, address: u8, preset: &[(u8, u8)]) -> Self {
        let mut registers = [0u8; 256];
        for &(reg, value) in preset {
            registers[usize::from(reg)] = value;
        }
        self.devices.push(SimDevice {
            address,
            registers,
            pointer: 0,
            nack_data: false,
        });
        self
    }

    /// Make an attached device refuse every data byte
    pub fn with_data_nack(mut self, address: u8) -> Self {
        if let Some(device) = self.device_mut(address) {
            device.nack_data = true;
        }
        self
    }

    pub fn set_completion(&mut self, completion: Completion) {
        self.completion = completion;
    }

    pub fn set_stop_stuck(&mut self, stuck: bool) {
        self.stop_stuck = stuck;
    }

    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Forget events and access counters, keep bus and device state
    pub fn clear_log(&mut self) {
        self.events.clear();
        self.control_reads = 0;
        self.control_writes = 0;
    }

    pub fn control_reads(&self) -> usize {
        self.control_reads
    }

    pub fn control_writes(&self) -> usize {
        self.control_writes
    }

    pub fn register(&self, address: u8, register: u8) -> Option<u8> {
        self.device(address)
            .map(|device| device.registers[usize::from(register)])
    }

    pub fn bitrate(&self) -> u8 {
        self.bitrate
    }

    pub fn prescaler_bits(&self) -> u8 {
        self.status & TWSR_PRESCALER_MASK
    }

    pub fn is_enabled(&self) -> bool {
        self.control & TWEN != 0
    }

    fn device(&self, address: u8) -> Option<&SimDevice> {
        self.devices.iter().find(|d| d.address == address)
    }

    fn device_mut(&mut self, address: u8) -> Option<&mut SimDevice> {
        self.devices.iter_mut().find(|d| d.address == address)
    }

    fn complete(&mut self, status: TwiStatus) {
        if self.completion == Completion::Never {
            return;
        }
        self.status = (self.status & TWSR_PRESCALER_MASK) | status.code();
        self.control |= TWINT;
    }

    fn start(&mut self) {
        if self.mode == Mode::Idle {
            self.events.push(BusEvent::Start);
            self.mode = Mode::Started;
            self.complete(TwiStatus::StartTransmitted);
        } else {
            self.events.push(BusEvent::RepeatedStart);
            self.mode = Mode::Started;
            self.complete(TwiStatus::RepStartTransmitted);
        }
    }

    fn stop(&mut self) {
        self.events.push(BusEvent::Stop);
        self.mode = Mode::Idle;
        self.status = (self.status & TWSR_PRESCALER_MASK) | TwiStatus::NoInfo.code();
        if !self.stop_stuck {
            self.control &= !TWSTO;
        }
    }

    fn transfer(&mut self, ack: bool) {
        match self.mode {
            Mode::Started => self.address_phase(),
            Mode::Transmit { address, pointer_loaded } => {
                let byte = self.data;
                let Some(device) = self.device_mut(address) else {
                    return;
                };
                if device.nack_data {
                    self.events.push(BusEvent::Write { byte, acked: false });
                    self.complete(TwiStatus::DataWriteNack);
                    return;
                }

                if pointer_loaded {
                    device.registers[usize::from(device.pointer)] = byte;
                    device.pointer = device.pointer.wrapping_add(1);
                } else {
                    device.pointer = byte;
                }
                self.mode = Mode::Transmit { address, pointer_loaded: true };
                self.events.push(BusEvent::Write { byte, acked: true });
                self.complete(TwiStatus::DataWriteAck);
            }
            Mode::Receive { address } => {
                let Some(device) = self.device_mut(address) else {
                    return;
                };
                let byte = device.registers[usize::from(device.pointer)];
                device.pointer = device.pointer.wrapping_add(1);

                self.data = byte;
                self.events.push(BusEvent::Read { ack });
                self.complete(if ack {
                    TwiStatus::DataReadAck
                } else {
                    TwiStatus::DataReadNack
                });
            }
            Mode::AddressNacked { read: true } => {
                // Nobody drives SDA, TWDR keeps its old contents
                self.events.push(BusEvent::Read { ack });
                self.complete(TwiStatus::NoInfo);
            }
            Mode::AddressNacked { read: false } => {
                self.events.push(BusEvent::Write { byte: self.data, acked: false });
                self.complete(TwiStatus::DataWriteNack);
            }
            Mode::Idle => self.complete(TwiStatus::NoInfo),
        }
    }

    fn address_phase(&mut self) {
        let address = self.data >> 1;
        let read = self.data & 0x01 != 0;
        let present = self.device(address).is_some();

        self.events.push(BusEvent::Address { address, read, acked: present });
        let status = match (present, read) {
            (true, false) => {
                self.mode = Mode::Transmit { address, pointer_loaded: false };
                TwiStatus::AddrWriteAck
            }
            (true, true) => {
                self.mode = Mode::Receive { address };
                TwiStatus::AddrReadAck
            }
            (false, read) => {
                self.mode = Mode::AddressNacked { read };
                if read {
                    TwiStatus::AddrReadNack
                } else {
                    TwiStatus::AddrWriteNack
                }
            }
        };
        self.complete(status);
    }
}

impl Default for SimulatedTwi {
    fn default() -> Self {
        Self::new()
    }
}

impl BusRegisters for SimulatedTwi {
    fn read_control(&mut self) -> u8 {
        self.control_reads += 1;
        self.control
    }

    fn write_control(&mut self, value: u8) {
        self.control_writes += 1;
        let was_enabled = self.control & TWEN != 0;

        if value & TWEN == 0 {
            if was_enabled {
                self.events.push(BusEvent::Disable);
            }
            self.control = value & !TWINT;
            self.mode = Mode::Idle;
            self.status = (self.status & TWSR_PRESCALER_MASK) | TwiStatus::NoInfo.code();
            return;
        }
        if !was_enabled {
            self.events.push(BusEvent::Enable);
        }

        // Writing TWINT as zero leaves the flag as it is
        if value & TWINT == 0 {
            self.control = (self.control & TWINT) | value;
            return;
        }

        // Writing TWINT as one clears it and starts the command
        self.control = value & !TWINT;
        if value & TWSTO != 0 {
            self.stop();
        } else if value & TWSTA != 0 {
            self.start();
        } else {
            self.transfer(value & TWEA != 0);
        }
    }

    fn read_status(&mut self) -> u8 {
        self.status
    }

    fn write_status(&mut self, value: u8) {
        // Only the prescaler bits are writable
        self.status = (self.status & TWSR_STATUS_MASK) | (value & TWSR_PRESCALER_MASK);
    }

    fn read_data(&mut self) -> u8 {
        self.data
    }

    fn write_data(&mut self, value: u8) {
        self.data = value;
    }

    fn read_bitrate(&mut self) -> u8 {
        self.bitrate
    }

    fn write_bitrate(&mut self, value: u8) {
        self.bitrate = value;
    }
}
