pub mod pwm_engine;
pub mod serial_console;

pub use pwm_engine::{Parameters, PwmEngine, PwmError};
pub use serial_console::SerialConsole;
