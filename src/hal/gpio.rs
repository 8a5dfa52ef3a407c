use avr_device::atmega128a::{PORTA, PORTB, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::OutputPin;

/// Whole-port access by bit mask
pub struct Port<PORT> {
    _port: PhantomData<PORT>,
}

/// One output pin of a port
pub struct Pin<PORT, const P: u8> {
    _port: PhantomData<PORT>,
}

macro_rules! impl_port {
    ($PORT:ident, $port:ident, $ddr:ident) => {
        impl Port<$PORT> {
            pub const fn new() -> Self {
                Self { _port: PhantomData }
            }

            /// Set DDRx bits
            pub fn set_outputs(&mut self, mask: u8) {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | mask));
                }
            }

            pub fn set_high(&mut self, mask: u8) {
                avr_device::interrupt::free(|_| unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | mask));
                });
            }

            pub fn set_low(&mut self, mask: u8) {
                avr_device::interrupt::free(|_| unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !mask));
                });
            }

            /// The Timer0 handler also flips PORTA bits, so the
            /// read-modify-write runs with interrupts off.
            pub fn toggle(&mut self, mask: u8) {
                avr_device::interrupt::free(|_| unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() ^ mask));
                });
            }

            pub fn pin<const P: u8>(&mut self) -> Pin<$PORT, P> {
                self.set_outputs(1 << P);
                Pin { _port: PhantomData }
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P> {
            type Error = Infallible;

            fn set_low(&mut self) -> Result<(), Infallible> {
                Port::<$PORT>::new().set_low(1 << P);
                Ok(())
            }

            fn set_high(&mut self) -> Result<(), Infallible> {
                Port::<$PORT>::new().set_high(1 << P);
                Ok(())
            }
        }
    };
}

impl_port!(PORTA, porta, ddra);
impl_port!(PORTB, portb, ddrb);
impl_port!(PORTD, portd, ddrd);
