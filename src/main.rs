#![cfg_attr(target_arch = "avr", no_std, no_main, feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
use atmega128_blink::{
    application::{self, TestMode},
    config::{BLINK_LED_MASK, BLINK_PERIOD_MS, CPU_FREQ_HZ, UART_BAUD},
    drivers::{Cc2420, SerialConsole},
    hal::{
        timer, AvrTwi, BaudSetting, ClockSelect, Delay, ErrorPolicy, I2cMaster, Port, Spi,
        Timer0, TwiConfig, Usart0,
    },
};
#[cfg(target_arch = "avr")]
use avr_device::atmega128a::{Peripherals, PORTA, PORTB, PORTD};
#[cfg(target_arch = "avr")]
use embedded_hal::blocking::delay::{DelayMs, DelayUs};

// PD0, PD1
#[cfg(target_arch = "avr")]
const PORTD_TOGGLE_MASK: u8 = 0x03;
// PB0..PB2
#[cfg(target_arch = "avr")]
const PORTB_TOGGLE_MASK: u8 = 0x07;

#[cfg(target_arch = "avr")]
const TWI_POLICY: ErrorPolicy = if cfg!(feature = "legacy-errors") {
    ErrorPolicy::LogAndContinue
} else {
    ErrorPolicy::Propagate
};

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    let dp = Peripherals::take().unwrap();
    let mode = TestMode::selected();
    let mut delay = Delay;

    // Status LEDs, whole port A
    let mut leds = Port::<PORTA>::new();
    leds.set_outputs(0xFF);

    let baud = BaudSetting::compute(CPU_FREQ_HZ, UART_BAUD);
    let mut console = SerialConsole::new(Usart0::new(dp.USART0, baud));

    let mut timer = Timer0::new();
    timer.use_external_crystal();
    timer.set_counter(0);
    timer.start(ClockSelect::Div128);
    timer.enable_overflow_interrupt();

    let mut imu_bus = if mode.uses_i2c() {
        let config = TwiConfig::new().cpu_hz(CPU_FREQ_HZ).policy(TWI_POLICY);
        let mut bus = I2cMaster::new(AvrTwi::new(dp.TWI), Delay, config);
        if let Err(e) = bus.init() {
            ufmt::uwriteln!(console, "[ERR] i2c: {}\r", e).ok();
        }
        Some(bus)
    } else {
        None
    };

    let mut chip_select = Port::<PORTB>::new().pin::<0>();
    embedded_hal::digital::v2::OutputPin::set_high(&mut chip_select).ok();
    let mut radio = Cc2420::new(Spi::new(), chip_select);

    // Enable interrupts globally
    unsafe { avr_device::interrupt::enable() };

    match mode {
        TestMode::Blink => loop {
            leds.toggle(BLINK_LED_MASK);
            delay.delay_ms(BLINK_PERIOD_MS);
        },
        TestMode::Uart => loop {
            application::write_uart_test_lines(&mut console).ok();
        },
        TestMode::Imu => loop {
            if let Some(bus) = imu_bus.as_mut() {
                let result = application::read_who_am_i(bus);
                application::report_who_am_i(&mut console, result, bus.diagnostics()).ok();
            }
        },
        TestMode::Spi => loop {
            match radio.manufacturer_id() {
                Ok(reading) => {
                    application::report_manufacturer_id(&mut console, reading).ok();
                }
                Err(_) => {
                    console.write_line("[ERR] spi").ok();
                }
            }
        },
        TestMode::TogglePortD => {
            let mut port = Port::<PORTD>::new();
            port.set_outputs(PORTD_TOGGLE_MASK);
            loop {
                port.toggle(PORTD_TOGGLE_MASK);
                delay.delay_us(1u8);
            }
        }
        TestMode::TogglePortB => {
            let mut port = Port::<PORTB>::new();
            port.set_outputs(PORTB_TOGGLE_MASK);
            loop {
                port.toggle(PORTB_TOGGLE_MASK);
                delay.delay_us(1u8);
            }
        }
    }
}

#[cfg(target_arch = "avr")]
#[avr_device::interrupt(atmega128a)]
fn TIMER0_OVF() {
    timer::on_overflow();
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
