//! Configuration constants for the ATmega128 blink firmware

/// CPU frequency in Hz (internal RC oscillator)
pub const CPU_FREQ_HZ: u32 = 8_000_000;

/// UART0 baud rate
pub const UART_BAUD: u32 = 115_200;

/// I2C bus clock selected by `I2cMaster::init`, in kHz
pub const I2C_DEFAULT_KHZ: u16 = 100;

/// Completion-flag polls per TWI operation.
///
/// Each poll is a handful of cycles, so at 8MHz this is several ms: well over
/// one byte time at any supported bus clock.
pub const I2C_POLL_BUDGET: u16 = 8000;

/// Poll rounds `send_byte` spends waiting for the controller to be ready
pub const I2C_READY_RETRIES: u16 = 8;

/// Polls of the stop bit before a stop condition is reported stuck
pub const I2C_STOP_BUDGET: u16 = 8000;

/// Bus free time before a (repeated) start, in microseconds
pub const I2C_START_SETUP_US: u8 = 2;

/// MPU9150 address with AD0 tied low
pub const MPU9150_ADDR: u8 = 0x68;

/// LEDs driven by the blink loop (PA0, PA1)
pub const BLINK_LED_MASK: u8 = 0x03;

/// LED toggled from the Timer0 overflow interrupt (PA2)
pub const TIMER_LED_MASK: u8 = 0x04;

/// Blink half-period in milliseconds
pub const BLINK_PERIOD_MS: u16 = 100;
