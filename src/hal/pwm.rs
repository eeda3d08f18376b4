//! Timer setup for complementary PWM
//!
//! Puts the timer into phase and frequency correct mode with both compare
//! outputs connected in opposite senses. Dual-slope counting runs at half
//! the rate of fast PWM (one output period is an up ramp plus a down ramp),
//! the engine accounts for that when computing TOP.

use super::{CompareOutput, PwmTimer};

/// Compare modes for channel A and channel B
///
/// Channel B always uses the opposite mode of channel A, so the pair stays
/// complementary whichever polarity is picked.
pub const fn output_modes(inverted: bool) -> (CompareOutput, CompareOutput) {
    let a = if inverted {
        CompareOutput::SetOnMatch
    } else {
        CompareOutput::ClearOnMatch
    };
    (a, a.opposite())
}

/// One-time timer setup. Run before any period or compare value is written.
///
/// The clock is left stopped; the engine starts it on the first apply.
pub fn configure<T: PwmTimer>(timer: &mut T, inverted: bool) {
    // Nothing switches while registers are in flux
    timer.park_outputs();
    timer.stop();

    let (a, b) = output_modes(inverted);
    timer.set_output_modes(a, b);

    timer.enter_dual_slope();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, RecordingTimer};

    #[test]
    fn setup_sequence() {
        let mut timer = RecordingTimer::new();
        configure(&mut timer, true);

        assert_eq!(
            timer.ops(),
            &[
                Op::ParkOutputs,
                Op::Stop,
                Op::OutputModes(CompareOutput::SetOnMatch, CompareOutput::ClearOnMatch),
                Op::DualSlope,
            ]
        );
    }

    #[test]
    fn clock_left_stopped() {
        let mut timer = RecordingTimer::new();
        configure(&mut timer, false);

        let regs = timer.registers();
        assert!(!regs.running);
        assert!(regs.dual_slope);
        assert_eq!(
            regs.output_modes,
            Some((CompareOutput::ClearOnMatch, CompareOutput::SetOnMatch))
        );
    }

    #[test]
    fn channels_always_opposite() {
        for inverted in [false, true] {
            let (a, b) = output_modes(inverted);
            assert_ne!(a, b);
        }
        assert_ne!(output_modes(true).0, output_modes(false).0);
    }
}
