use avr_device::atmega328p::USART0;
use core::convert::Infallible;
use embedded_hal::serial;

use crate::config::CPU_FREQ_HZ;

// UCSR0A
const RXC0: u8 = 1 << 7;
const UDRE0: u8 = 1 << 5;

// UCSR0B
const RXEN0: u8 = 1 << 4;
const TXEN0: u8 = 1 << 3;

// UCSR0C: asynchronous, no parity, 1 stop bit, 8 data bits
const UCSR0C_8N1: u8 = 0x06;

/// UBRR value for normal speed mode, e.g. 103 for 9600 baud at 16MHz
pub const fn ubrr_for(baud: u32) -> u16 {
    (CPU_FREQ_HZ / (16 * baud) - 1) as u16
}

/// Polled USART0. No interrupts and no buffering: commands arrive at
/// human typing speed and the status line is written byte by byte.
pub struct Usart0 {
    usart: USART0,
}

impl Usart0 {
    pub fn new(usart: USART0, baud: u32) -> Self {
        unsafe {
            usart.ubrr0.write(|w| w.bits(ubrr_for(baud)));
            usart.ucsr0c.write(|w| w.bits(UCSR0C_8N1));
            usart.ucsr0b.write(|w| w.bits(RXEN0 | TXEN0));
        }

        Self { usart }
    }

    pub fn free(self) -> USART0 {
        self.usart
    }
}

impl serial::Read<u8> for Usart0 {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        if self.usart.ucsr0a.read().bits() & RXC0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.usart.udr0.read().bits())
    }
}

impl serial::Write<u8> for Usart0 {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.usart.ucsr0a.read().bits() & UDRE0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        unsafe {
            self.usart.udr0.write(|w| w.bits(byte));
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        if self.usart.ucsr0a.read().bits() & UDRE0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    }
}
