//! USART0, polled transmit

/// Baud error the normal-speed divisor may have before double speed is used
const BAUD_TOLERANCE_PERCENT: u32 = 2;

/// UBRR value and U2X flag for one baud rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaudSetting {
    pub ubrr: u16,
    pub double_speed: bool,
}

impl BaudSetting {
    /// Round to the nearest normal-speed divisor and fall back to double
    /// speed when that lands outside the tolerance.
    pub const fn compute(cpu_hz: u32, baud: u32) -> Self {
        let ubrr = (cpu_hz + 8 * baud) / (16 * baud) - 1;
        let cycles = 16 * (ubrr + 1);
        let too_slow = 100 * cpu_hz > cycles * (100 * baud + baud * BAUD_TOLERANCE_PERCENT);
        let too_fast = 100 * cpu_hz < cycles * (100 * baud - baud * BAUD_TOLERANCE_PERCENT);

        if too_slow || too_fast {
            Self {
                ubrr: ((cpu_hz + 4 * baud) / (8 * baud) - 1) as u16,
                double_speed: true,
            }
        } else {
            Self {
                ubrr: ubrr as u16,
                double_speed: false,
            }
        }
    }
}

#[cfg(target_arch = "avr")]
pub use self::usart0::Usart0;

#[cfg(target_arch = "avr")]
mod usart0 {
    use avr_device::atmega128a::USART0;
    use core::convert::Infallible;
    use embedded_hal::serial;

    use super::BaudSetting;

    // UCSR0A
    const UDRE: u8 = 1 << 5;
    const U2X: u8 = 1 << 1;
    // UCSR0B
    const RXEN: u8 = 1 << 4;
    const TXEN: u8 = 1 << 3;
    // UCSR0C, 8 data bits, no parity, 1 stop bit
    const UCSZ_8BIT: u8 = (1 << 2) | (1 << 1);

    pub struct Usart0 {
        usart: USART0,
    }

    impl Usart0 {
        pub fn new(usart: USART0, setting: BaudSetting) -> Self {
            unsafe {
                usart.ubrr0h.write(|w| w.bits((setting.ubrr >> 8) as u8));
                usart.ubrr0l.write(|w| w.bits(setting.ubrr as u8));
                usart.ucsr0a.modify(|r, w| {
                    if setting.double_speed {
                        w.bits(r.bits() | U2X)
                    } else {
                        w.bits(r.bits() & !U2X)
                    }
                });
                usart.ucsr0c.write(|w| w.bits(UCSZ_8BIT));
                usart.ucsr0b.write(|w| w.bits(RXEN | TXEN));
            }

            Self { usart }
        }

        fn data_register_empty(&self) -> bool {
            self.usart.ucsr0a.read().bits() & UDRE != 0
        }
    }

    impl serial::Write<u8> for Usart0 {
        type Error = Infallible;

        fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
            if !self.data_register_empty() {
                return Err(nb::Error::WouldBlock);
            }
            unsafe { self.usart.udr0.write(|w| w.bits(byte)) }
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Infallible> {
            if self.data_register_empty() {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_baud_on_8mhz_needs_double_speed() {
        assert_eq!(
            BaudSetting::compute(8_000_000, 115_200),
            BaudSetting { ubrr: 8, double_speed: true }
        );
    }

    #[test]
    fn slow_baud_stays_normal_speed() {
        assert_eq!(
            BaudSetting::compute(16_000_000, 9600),
            BaudSetting { ubrr: 103, double_speed: false }
        );
        assert_eq!(
            BaudSetting::compute(8_000_000, 9600),
            BaudSetting { ubrr: 51, double_speed: false }
        );
    }
}
