use avr_device::atmega328p::TC1;
use embedded_hal::digital::v2::OutputPin;

use super::{Channel, CompareOutput, OutputPair, Prescaler, PwmTimer};

const PRESCALER_MASK: u8 = 0x07;

// TCCR1A: COM1A1:0 at 7:6, COM1B1:0 at 5:4, WGM11:10 = 00
const COM1A_SHIFT: u8 = 6;
const COM1B_SHIFT: u8 = 4;

// TCCR1B: WGM13 set, WGM12 clear, no clock
const TCCR1B_WGM13: u8 = 0x10;

/// Timer1 driving OC1A and OC1B
pub struct Timer1<A, B> {
    tc1: TC1,
    outputs: OutputPair<A, B>,
}

impl<A: OutputPin, B: OutputPin> Timer1<A, B> {
    pub fn new(tc1: TC1, outputs: OutputPair<A, B>) -> Self {
        // Disable timer interrupts, nothing here is interrupt driven
        unsafe {
            tc1.timsk1.write(|w| w.bits(0));
        }
        Self { tc1, outputs }
    }

    pub fn free(self) -> (TC1, OutputPair<A, B>) {
        (self.tc1, self.outputs)
    }
}

impl<A: OutputPin, B: OutputPin> PwmTimer for Timer1<A, B> {
    fn park_outputs(&mut self) {
        // Disconnected compare outputs hand the pins back to PORTB
        unsafe {
            self.tc1.tccr1a.write(|w| w.bits(0));
        }
        self.outputs.park();
    }

    fn stop(&mut self) {
        unsafe {
            self.tc1
                .tccr1b
                .modify(|r, w| w.bits(r.bits() & !PRESCALER_MASK));
        }
    }

    fn start(&mut self, prescaler: Prescaler) {
        unsafe {
            self.tc1.tccr1b.modify(|r, w| {
                w.bits((r.bits() & !PRESCALER_MASK) | (prescaler.bits() & PRESCALER_MASK))
            });
        }
    }

    fn set_output_modes(&mut self, a: CompareOutput, b: CompareOutput) {
        let bits = (a.bits() << COM1A_SHIFT) | (b.bits() << COM1B_SHIFT);
        unsafe {
            self.tc1.tccr1a.write(|w| w.bits(bits));
        }
    }

    fn enter_dual_slope(&mut self) {
        unsafe {
            self.tc1.tccr1b.write(|w| w.bits(TCCR1B_WGM13));
        }
    }

    fn set_top(&mut self, count: u16) {
        unsafe {
            self.tc1.icr1.write(|w| w.bits(count));
        }
    }

    fn set_compare(&mut self, channel: Channel, count: u16) {
        unsafe {
            match channel {
                Channel::A => self.tc1.ocr1a.write(|w| w.bits(count)),
                Channel::B => self.tc1.ocr1b.write(|w| w.bits(count)),
            }
        }
    }

    fn set_counter(&mut self, count: u16) {
        unsafe {
            self.tc1.tcnt1.write(|w| w.bits(count));
        }
    }
}
