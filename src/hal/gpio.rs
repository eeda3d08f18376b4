use avr_device::atmega328p::PORTB;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::OutputPin;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

/// PORTB pin. Only PORTB carries the Timer1 compare outputs.
#[derive(Debug)]
pub struct Pin<const P: u8, MODE> {
    _mode: PhantomData<MODE>,
}

/// PORTB split into the pins this firmware uses
pub struct Parts {
    pub pb1: Pin<1, Input>,
    pub pb2: Pin<2, Input>,
}

/// Take ownership of PORTB. Pins start as inputs (reset state).
pub fn split(_portb: PORTB) -> Parts {
    Parts {
        pb1: Pin { _mode: PhantomData },
        pb2: Pin { _mode: PhantomData },
    }
}

impl<const P: u8, MODE: PinMode> Pin<P, MODE> {
    /// Switch to output, driving low first so the pin never glitches high
    pub fn into_output(self) -> Pin<P, Output> {
        unsafe {
            (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() & !(1 << P)));
            (*PORTB::ptr()).ddrb.modify(|r, w| w.bits(r.bits() | (1 << P)));
        }
        Pin { _mode: PhantomData }
    }
}

impl<const P: u8> OutputPin for Pin<P, Output> {
    type Error = Infallible;

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        unsafe {
            (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() & !(1 << P)));
        }
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        unsafe {
            (*PORTB::ptr()).portb.modify(|r, w| w.bits(r.bits() | (1 << P)));
        }
        Ok(())
    }
}

// Arduino Uno pin definitions
pub mod board {
    use super::*;

    /// Digital 9, OC1A: primary high drive
    pub type D9 = Pin<1, Output>;
    /// Digital 10, OC1B: primary low drive
    pub type D10 = Pin<2, Output>;
}
