pub mod twi;
pub mod uart;

#[cfg(target_arch = "avr")]
pub mod delay;
#[cfg(target_arch = "avr")]
pub mod gpio;
#[cfg(target_arch = "avr")]
pub mod spi;
#[cfg(target_arch = "avr")]
pub mod timer;

// Re-export commonly used types
pub use twi::{Config as TwiConfig, ErrorPolicy, I2cMaster, TwiError};
pub use uart::BaudSetting;

#[cfg(target_arch = "avr")]
pub use delay::Delay;
#[cfg(target_arch = "avr")]
pub use gpio::{Pin, Port};
#[cfg(target_arch = "avr")]
pub use spi::Spi;
#[cfg(target_arch = "avr")]
pub use timer::{ClockSelect, Timer0};
#[cfg(target_arch = "avr")]
pub use twi::AvrTwi;
#[cfg(target_arch = "avr")]
pub use uart::Usart0;
