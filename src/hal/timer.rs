use avr_device::atmega128a::{PORTA, TC0};
use core::marker::PhantomData;

use crate::config::TIMER_LED_MASK;
use crate::hal::gpio::Port;

// ASSR
const AS0: u8 = 1 << 3;
// TIMSK
const TOIE0: u8 = 1 << 0;

/// Timer0 clock select (CS02:0). Timer0 has its own /32 and /128 taps.
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum ClockSelect {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div32 = 3,
    Div64 = 4,
    Div128 = 5,
    Div256 = 6,
    Div1024 = 7,
}

pub struct Timer0 {
    _timer: PhantomData<TC0>,
}

impl Timer0 {
    pub fn new() -> Self {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr0.write(|w| w.bits(0));
            (*p).tcnt0.write(|w| w.bits(0));
        }
        Self { _timer: PhantomData }
    }

    /// Clock the timer from the 32.768kHz crystal on TOSC1/TOSC2
    pub fn use_external_crystal(&mut self) {
        unsafe {
            (*TC0::ptr()).assr.modify(|r, w| w.bits(r.bits() | AS0));
        }
    }

    pub fn start(&mut self, clock: ClockSelect) {
        unsafe {
            (*TC0::ptr()).tccr0.write(|w| w.bits(clock as u8));
        }
    }

    pub fn set_counter(&mut self, value: u8) {
        unsafe {
            (*TC0::ptr()).tcnt0.write(|w| w.bits(value));
        }
    }

    /// Only the Timer0 overflow interrupt is left enabled
    pub fn enable_overflow_interrupt(&mut self) {
        unsafe {
            (*TC0::ptr()).timsk.write(|w| w.bits(TOIE0));
        }
    }
}

impl Default for Timer0 {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of the TIMER0_OVF handler
pub fn on_overflow() {
    Port::<PORTA>::new().toggle(TIMER_LED_MASK);
    unsafe {
        (*TC0::ptr()).tcnt0.write(|w| w.bits(0));
    }
}
