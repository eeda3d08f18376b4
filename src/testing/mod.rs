//! Off-target test support
//!
//! [`RecordingTimer`] stands in for Timer1: it logs every call in order and
//! mirrors the register state, so tests can check both what was written and
//! when. No allocation, usable from `no_std` builds too.

use crate::hal::{Channel, CompareOutput, Prescaler, PwmTimer};

const LOG_SIZE: usize = 32;

/// One recorded timer call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    ParkOutputs,
    Stop,
    Start(Prescaler),
    OutputModes(CompareOutput, CompareOutput),
    DualSlope,
    Top(u16),
    Compare(Channel, u16),
    Counter(u16),
}

/// Register state as the hardware would hold it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub top: u16,
    pub compare_a: u16,
    pub compare_b: u16,
    pub counter: u16,
    pub running: bool,
    pub prescaler: Option<Prescaler>,
    pub output_modes: Option<(CompareOutput, CompareOutput)>,
    pub dual_slope: bool,
    pub parked: bool,
}

pub struct RecordingTimer {
    log: [Op; LOG_SIZE],
    len: usize,
    registers: Registers,
    // Period/compare/counter writes made with the clock running
    live_writes: usize,
}

impl RecordingTimer {
    pub const fn new() -> Self {
        Self {
            log: [Op::Stop; LOG_SIZE],
            len: 0,
            registers: Registers {
                top: 0,
                compare_a: 0,
                compare_b: 0,
                counter: 0,
                running: false,
                prescaler: None,
                output_modes: None,
                dual_slope: false,
                parked: false,
            },
            live_writes: 0,
        }
    }

    /// Calls since the last [`clear`](Self::clear), oldest first. Keeps the
    /// most recent entries once the log is full.
    pub fn ops(&self) -> &[Op] {
        &self.log[..self.len]
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn registers(&self) -> Registers {
        self.registers
    }

    pub fn live_writes(&self) -> usize {
        self.live_writes
    }

    fn record(&mut self, op: Op) {
        if self.len == LOG_SIZE {
            self.log.copy_within(1.., 0);
            self.len -= 1;
        }
        self.log[self.len] = op;
        self.len += 1;
    }

    fn record_write(&mut self, op: Op) {
        if self.registers.running {
            self.live_writes += 1;
        }
        self.record(op);
    }
}

impl Default for RecordingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmTimer for RecordingTimer {
    fn park_outputs(&mut self) {
        self.registers.parked = true;
        self.registers.output_modes = None;
        self.record(Op::ParkOutputs);
    }

    fn stop(&mut self) {
        self.registers.running = false;
        self.record(Op::Stop);
    }

    fn start(&mut self, prescaler: Prescaler) {
        self.registers.running = prescaler != Prescaler::Stop;
        self.registers.prescaler = Some(prescaler);
        self.record(Op::Start(prescaler));
    }

    fn set_output_modes(&mut self, a: CompareOutput, b: CompareOutput) {
        self.registers.parked = false;
        self.registers.output_modes = Some((a, b));
        self.record_write(Op::OutputModes(a, b));
    }

    fn enter_dual_slope(&mut self) {
        // Rewrites the whole control register, clock select included
        self.registers.dual_slope = true;
        self.registers.running = false;
        self.record(Op::DualSlope);
    }

    fn set_top(&mut self, count: u16) {
        self.registers.top = count;
        self.record_write(Op::Top(count));
    }

    fn set_compare(&mut self, channel: Channel, count: u16) {
        match channel {
            Channel::A => self.registers.compare_a = count,
            Channel::B => self.registers.compare_b = count,
        }
        self.record_write(Op::Compare(channel, count));
    }

    fn set_counter(&mut self, count: u16) {
        self.registers.counter = count;
        self.record_write(Op::Counter(count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_registers() {
        let mut timer = RecordingTimer::new();
        timer.set_top(800);
        timer.set_compare(Channel::A, 160);
        timer.set_compare(Channel::B, 640);
        timer.start(Prescaler::Direct);

        let regs = timer.registers();
        assert_eq!((regs.top, regs.compare_a, regs.compare_b), (800, 160, 640));
        assert!(regs.running);
        assert_eq!(timer.live_writes(), 0);
    }

    #[test]
    fn counts_writes_while_running() {
        let mut timer = RecordingTimer::new();
        timer.start(Prescaler::Direct);
        timer.set_counter(5);
        assert_eq!(timer.live_writes(), 1);

        timer.stop();
        timer.set_counter(6);
        assert_eq!(timer.live_writes(), 1);
    }

    #[test]
    fn log_keeps_latest_entries() {
        let mut timer = RecordingTimer::new();
        for count in 0..40 {
            timer.set_top(count);
        }

        let ops = timer.ops();
        assert_eq!(ops.len(), LOG_SIZE);
        assert_eq!(ops[0], Op::Top(8));
        assert_eq!(ops[LOG_SIZE - 1], Op::Top(39));

        timer.clear();
        assert!(timer.ops().is_empty());
    }
}
