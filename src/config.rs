//! Configuration constants for the push-pull PWM firmware

use crate::hal::Prescaler;

/// CPU frequency in Hz, also the Timer1 input clock
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Startup switching frequency in kHz
pub const DEFAULT_FREQUENCY_KHZ: u16 = 10;

/// Startup duty cycle in percent, also used after every frequency command
pub const DEFAULT_DUTY_PCT: u8 = 20;

/// Highest duty cycle reachable by stepping or toggling
pub const DUTY_CEILING_PCT: u8 = 48;

/// Duty cycle the toggle command falls back to from the ceiling
pub const TOGGLE_DUTY_PCT: u8 = 10;

/// kHz selected per digit command ('0' selects ten steps)
pub const FREQUENCY_STEP_KHZ: u16 = 10;

/// Everything the PWM engine needs to know about the board and its policy.
///
/// Defaults match the Arduino Uno build: 16MHz clock, no divider (62.5ns
/// ticks), inverted channel A.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PwmConfig {
    pub clock_hz: u32,
    pub prescaler: Prescaler,
    pub inverted: bool,
    pub default_frequency_khz: u16,
    pub default_duty_pct: u8,
    pub duty_ceiling_pct: u8,
    pub toggle_duty_pct: u8,
    pub frequency_step_khz: u16,
}

impl PwmConfig {
    /// Convert microseconds into undivided timer clock cycles
    #[inline]
    pub fn ticks_for(&self, us: u16) -> u32 {
        us as u32 * (self.clock_hz / 1_000_000)
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            clock_hz: CPU_FREQ_HZ,
            prescaler: Prescaler::Direct,
            inverted: true,
            default_frequency_khz: DEFAULT_FREQUENCY_KHZ,
            default_duty_pct: DEFAULT_DUTY_PCT,
            duty_ceiling_pct: DUTY_CEILING_PCT,
            toggle_duty_pct: TOGGLE_DUTY_PCT,
            frequency_step_khz: FREQUENCY_STEP_KHZ,
        }
    }
}
