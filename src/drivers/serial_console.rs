use embedded_hal::serial;

use crate::diagnostics::Diagnostics;

const HEX_CHARS: [u8; 16] = *b"0123456789ABCDEF";

/// Text output over any embedded-hal serial port
pub struct SerialConsole<W> {
    serial: W,
}

impl<W: serial::Write<u8>> SerialConsole<W> {
    pub fn new(serial: W) -> Self {
        Self { serial }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), W::Error> {
        nb::block!(self.serial.write(byte))
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), W::Error> {
        for byte in s.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    pub fn write_line(&mut self, s: &str) -> Result<(), W::Error> {
        self.write_str(s)?;
        self.write_str("\r\n")
    }

    // Debug helper - print hex value
    pub fn write_hex(&mut self, val: u8) -> Result<(), W::Error> {
        self.write_byte(HEX_CHARS[(val >> 4) as usize])?;
        self.write_byte(HEX_CHARS[(val & 0xF) as usize])
    }

    // Print formatted debug info
    pub fn debug(&mut self, msg: &str, val: u8) -> Result<(), W::Error> {
        self.write_str("[DBG] ")?;
        self.write_str(msg)?;
        self.write_str(": 0x")?;
        self.write_hex(val)?;
        self.write_str("\r\n")
    }

    /// Print the last bus failure, if any
    pub fn report(&mut self, diagnostics: &Diagnostics) -> Result<(), W::Error> {
        let Some(last) = diagnostics.last_error() else {
            return Ok(());
        };

        self.write_str("[ERR] i2c: TWSR=0x")?;
        self.write_hex(last.status)?;
        self.write_str(" ")?;
        self.write_line(last.error.message())
    }

    pub fn release(self) -> W {
        self.serial
    }
}

impl<W: serial::Write<u8>> ufmt::uWrite for SerialConsole<W> {
    type Error = W::Error;

    fn write_str(&mut self, s: &str) -> Result<(), W::Error> {
        SerialConsole::write_str(self, s)
    }
}
