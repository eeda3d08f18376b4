//! Hardware abstraction for the single PWM timer and its two outputs.
//!
//! The PWM engine only talks to [`PwmTimer`]. On the AVR target Timer1 backs
//! it; host tests use [`crate::testing::RecordingTimer`].

pub mod pwm;

#[cfg(target_arch = "avr")]
pub mod gpio;
#[cfg(target_arch = "avr")]
pub mod timer;
#[cfg(target_arch = "avr")]
pub mod uart;

use embedded_hal::digital::v2::OutputPin;

pub use pwm::configure;

#[cfg(target_arch = "avr")]
pub use gpio::board;
#[cfg(target_arch = "avr")]
pub use timer::Timer1;
#[cfg(target_arch = "avr")]
pub use uart::Usart0;

/// Timer clock selection. Discriminants are the CS1 bit patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

impl Prescaler {
    /// Clock division factor. `Stop` divides by nothing; callers never
    /// compute ticks with it.
    pub const fn divisor(self) -> u16 {
        match self {
            Prescaler::Stop | Prescaler::Direct => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Output compare channels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Primary high drive (OC1A)
    A,
    /// Primary low drive (OC1B)
    B,
}

/// What an output does on compare match while counting up. The opposite
/// happens on the down slope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOutput {
    ClearOnMatch,
    SetOnMatch,
}

impl CompareOutput {
    /// COMnx1:0 bit pattern
    #[inline]
    pub const fn bits(self) -> u8 {
        match self {
            CompareOutput::ClearOnMatch => 0b10,
            CompareOutput::SetOnMatch => 0b11,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            CompareOutput::ClearOnMatch => CompareOutput::SetOnMatch,
            CompareOutput::SetOnMatch => CompareOutput::ClearOnMatch,
        }
    }
}

/// Register-level operations the PWM engine needs from its timer.
///
/// Implementations do exactly what each method names; sequencing (stop,
/// write, start) is the caller's job.
pub trait PwmTimer {
    /// Disconnect both compare outputs and drive the pins low
    fn park_outputs(&mut self);

    /// Halt the counting clock
    fn stop(&mut self);

    /// Start counting with the given clock selection
    fn start(&mut self, prescaler: Prescaler);

    /// Connect the outputs to the compare units
    fn set_output_modes(&mut self, a: CompareOutput, b: CompareOutput);

    /// Select phase and frequency correct counting with TOP in the capture
    /// register. Leaves the clock stopped.
    fn enter_dual_slope(&mut self);

    fn set_top(&mut self, count: u16);

    fn set_compare(&mut self, channel: Channel, count: u16);

    fn set_counter(&mut self, count: u16);
}

/// The two drive pins, parked low while the timer is not driving them
pub struct OutputPair<A, B> {
    pub primary_high: A,
    pub primary_low: B,
}

impl<A: OutputPin, B: OutputPin> OutputPair<A, B> {
    pub fn new(primary_high: A, primary_low: B) -> Self {
        Self {
            primary_high,
            primary_low,
        }
    }

    /// Drive both pins low so no load is energized
    pub fn park(&mut self) {
        self.primary_high.set_low().ok();
        self.primary_low.set_low().ok();
    }
}
