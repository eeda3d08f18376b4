use embedded_hal::serial;
use ufmt::{uWrite, uwrite};

use super::pwm_engine::{Parameters, PwmError};

/// Operator console on a byte-oriented serial port.
///
/// Write errors are dropped: the port is the only place they could be
/// reported.
pub struct SerialConsole<S> {
    serial: S,
}

impl<S> SerialConsole<S>
where
    S: serial::Read<u8> + serial::Write<u8>,
{
    pub fn new(serial: S) -> Self {
        Self { serial }
    }

    pub fn free(self) -> S {
        self.serial
    }

    /// Next received byte, if any. Never blocks.
    pub fn read_byte(&mut self) -> Option<u8> {
        self.serial.read().ok()
    }

    pub fn write_byte(&mut self, byte: u8) {
        nb::block!(self.serial.write(byte)).ok();
    }

    /// Status line. Field order and units are parsed by host tooling, keep
    /// them stable.
    pub fn report(&mut self, params: &Parameters) {
        uwrite!(
            self,
            "Period: {} us  Frequency: {} kHz  Duty Cycle: {}%  Period ticks: {}  ON ticks: {}\r\n",
            params.period_us,
            params.frequency_khz,
            params.duty_pct,
            params.period_ticks,
            params.on_ticks
        )
        .ok();
    }

    // Debug helper - print 16-bit hex value
    pub fn write_hex(&mut self, val: u16) {
        const HEX_CHARS: [u8; 16] = *b"0123456789ABCDEF";
        for shift in [12, 8, 4, 0] {
            self.write_byte(HEX_CHARS[((val >> shift) & 0xF) as usize]);
        }
    }

    // Print formatted debug info
    pub fn debug(&mut self, msg: &str, val: u16) {
        self.write_str("[DBG] ").ok();
        self.write_str(msg).ok();
        self.write_str(": 0x").ok();
        self.write_hex(val);
        self.write_str("\r\n").ok();
    }

    pub fn error(&mut self, err: PwmError) {
        uwrite!(self, "[ERR] {}\r\n", err).ok();
    }
}

impl<S> uWrite for SerialConsole<S>
where
    S: serial::Write<u8>,
{
    type Error = S::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            nb::block!(self.serial.write(byte))?;
        }
        Ok(())
    }
}
