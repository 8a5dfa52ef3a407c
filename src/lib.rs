//! ATmega128 blink/probe firmware
//!
//! Polled TWI master plus the small set of peripherals the bring-up test
//! modes need. Register-level code only builds for AVR. Everything else
//! runs under `cargo test` on the host.

#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod hal;

#[cfg(test)]
pub(crate) mod testing;
