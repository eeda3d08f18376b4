//! Application layer: ties the serial console to the PWM engine

use embedded_hal::serial;

use crate::config::PwmConfig;
use crate::drivers::pwm_engine::{self, PwmEngine};
use crate::drivers::SerialConsole;
use crate::hal::PwmTimer;
use crate::protocol::Command;

/// Main application state and logic
pub struct Application<T, S> {
    engine: PwmEngine<T>,
    console: SerialConsole<S>,
}

impl<T, S> Application<T, S>
where
    T: PwmTimer,
    S: serial::Read<u8> + serial::Write<u8>,
{
    /// Configure the timer. Outputs stay parked until [`start`](Self::start).
    pub fn new(timer: T, serial: S, config: PwmConfig) -> Self {
        Self {
            engine: PwmEngine::new(timer, config),
            console: SerialConsole::new(serial),
        }
    }

    /// Switch to the default frequency and duty cycle and print the first
    /// status line
    pub fn start(&mut self) -> pwm_engine::Result<()> {
        let config = *self.engine.config();
        match self
            .engine
            .apply(config.default_frequency_khz, config.default_duty_pct)
        {
            Ok(()) => {
                self.report();
                Ok(())
            }
            Err(err) => {
                self.console.error(err);
                Err(err)
            }
        }
    }

    /// Handle at most one pending command byte
    pub fn poll(&mut self) {
        if let Some(byte) = self.console.read_byte() {
            self.handle_byte(byte);
        }
    }

    /// Run the command for `byte`, then print the status line. Unknown bytes
    /// are dropped without output.
    pub fn handle_byte(&mut self, byte: u8) {
        let Some(command) = Command::from_byte(byte) else {
            return;
        };

        match self.execute(command) {
            Ok(()) => self.report(),
            Err(err) => self.console.error(err),
        }
    }

    pub fn execute(&mut self, command: Command) -> pwm_engine::Result<()> {
        match command {
            Command::SelectFrequency(steps) => {
                let config = *self.engine.config();
                self.engine.apply(
                    u16::from(steps).saturating_mul(config.frequency_step_khz),
                    config.default_duty_pct,
                )
            }
            Command::DecreaseDuty => self.engine.decrease_duty_cycle(),
            Command::IncreaseDuty => self.engine.increase_duty_cycle(),
            Command::ToggleDuty => self.engine.toggle_duty_cycle(),
        }
    }

    pub fn engine(&self) -> &PwmEngine<T> {
        &self.engine
    }

    pub fn free(self) -> (T, S) {
        (self.engine.free(), self.console.free())
    }

    fn report(&mut self) {
        self.console.report(self.engine.parameters());

        #[cfg(feature = "debug")]
        {
            let params = *self.engine.parameters();
            self.console.debug("TOP", params.period_ticks);
            self.console.debug("OCR1A", params.on_ticks);
            self.console.debug("OCR1B", params.complement_ticks());
        }
    }
}
