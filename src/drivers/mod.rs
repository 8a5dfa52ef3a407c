pub mod cc2420;
pub mod mpu9150;
pub mod serial_console;

pub use cc2420::Cc2420;
pub use mpu9150::{Mpu9150, Vec3};
pub use serial_console::SerialConsole;
