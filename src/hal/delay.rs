use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::config::CPU_FREQ_HZ;

const CYCLES_PER_US: u32 = CPU_FREQ_HZ / 1_000_000;
// nop, counter update and branch
const CYCLES_PER_ITERATION: u32 = 4;

/// Busy-wait delay. Loop overhead makes it run slightly long, never short.
pub struct Delay;

impl DelayUs<u16> for Delay {
    fn delay_us(&mut self, us: u16) {
        let iterations = u32::from(us) * CYCLES_PER_US / CYCLES_PER_ITERATION;
        for _ in 0..iterations {
            avr_device::asm::nop();
        }
    }
}

impl DelayUs<u8> for Delay {
    #[inline]
    fn delay_us(&mut self, us: u8) {
        DelayUs::<u16>::delay_us(self, u16::from(us));
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        for _ in 0..ms {
            DelayUs::<u16>::delay_us(self, 1000);
        }
    }
}
