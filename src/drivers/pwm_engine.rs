//! Frequency and duty cycle control for the complementary PWM pair

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

use crate::config::PwmConfig;
use crate::hal::{self, Channel, PwmTimer};

/// Rejected PWM settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PwmError {
    ZeroFrequency,
    DutyOutOfRange(u8),
    /// Half period needs more ticks than the 16-bit TOP register holds
    PeriodOverflow(u32),
}

pub type Result<T> = core::result::Result<T, PwmError>;

impl uDisplay for PwmError {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match *self {
            PwmError::ZeroFrequency => f.write_str("frequency must be at least 1 kHz"),
            PwmError::DutyOutOfRange(duty) => uwrite!(f, "duty cycle {}% out of range", duty),
            PwmError::PeriodOverflow(ticks) => uwrite!(f, "period of {} ticks overflows TOP", ticks),
        }
    }
}

/// Derived timer settings for one (frequency, duty cycle) pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    pub frequency_khz: u16,
    pub duty_pct: u8,
    pub period_us: u16,
    /// TOP: ticks per half period
    pub period_ticks: u16,
    /// Channel A compare
    pub on_ticks: u16,
}

impl Parameters {
    /// Channel B compare. Together with `on_ticks` it always adds up to
    /// exactly one `period_ticks`.
    #[inline]
    pub fn complement_ticks(&self) -> u16 {
        self.period_ticks - self.on_ticks
    }
}

/// Period in microseconds, truncated. 3 kHz gives 333us.
pub fn period_us(frequency_khz: u16) -> Result<u16> {
    if frequency_khz == 0 {
        return Err(PwmError::ZeroFrequency);
    }
    Ok(1000 / frequency_khz)
}

/// Compute timer settings without touching hardware.
///
/// Dual-slope counting reaches TOP once per half period, so TOP is the tick
/// count of half the period. Using the full period would double the output
/// period.
pub fn compute(config: &PwmConfig, frequency_khz: u16, duty_pct: u8) -> Result<Parameters> {
    let period_us = period_us(frequency_khz)?;
    if duty_pct > 100 {
        return Err(PwmError::DutyOutOfRange(duty_pct));
    }

    // Above 500 kHz the half period truncates to 0us and TOP to 0
    let ticks = config.ticks_for(period_us / 2) / config.prescaler.divisor() as u32;
    let period_ticks = u16::try_from(ticks).map_err(|_| PwmError::PeriodOverflow(ticks))?;

    // Fits: on_ticks <= ticks <= u16::MAX
    let on_ticks = (ticks * duty_pct as u32 / 100) as u16;

    Ok(Parameters {
        frequency_khz,
        duty_pct,
        period_us,
        period_ticks,
        on_ticks,
    })
}

/// Owns the timer and the current PWM parameters
pub struct PwmEngine<T> {
    timer: T,
    config: PwmConfig,
    params: Parameters,
}

impl<T: PwmTimer> PwmEngine<T> {
    /// Configure the timer for complementary output. The clock stays
    /// stopped until the first [`apply`](Self::apply).
    pub fn new(mut timer: T, config: PwmConfig) -> Self {
        hal::configure(&mut timer, config.inverted);

        Self {
            timer,
            config,
            params: Parameters::default(),
        }
    }

    /// Set frequency and duty cycle. On error nothing is written and the
    /// previous settings stay in effect.
    pub fn apply(&mut self, frequency_khz: u16, duty_pct: u8) -> Result<()> {
        let params = compute(&self.config, frequency_khz, duty_pct)?;
        self.load(&params);
        self.params = params;
        Ok(())
    }

    /// One percent more duty, up to the configured ceiling
    pub fn increase_duty_cycle(&mut self) -> Result<()> {
        if self.params.duty_pct >= self.config.duty_ceiling_pct {
            return Ok(());
        }
        self.apply(self.params.frequency_khz, self.params.duty_pct + 1)
    }

    /// One percent less duty, down to zero
    pub fn decrease_duty_cycle(&mut self) -> Result<()> {
        if self.params.duty_pct == 0 {
            return Ok(());
        }
        self.apply(self.params.frequency_khz, self.params.duty_pct - 1)
    }

    /// Jump to the ceiling, or back to the toggle value when already there
    pub fn toggle_duty_cycle(&mut self) -> Result<()> {
        let duty = if self.params.duty_pct != self.config.duty_ceiling_pct {
            self.config.duty_ceiling_pct
        } else {
            self.config.toggle_duty_pct
        };
        self.apply(self.params.frequency_khz, duty)
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn config(&self) -> &PwmConfig {
        &self.config
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn free(self) -> T {
        self.timer
    }

    fn load(&mut self, params: &Parameters) {
        // Counter halted for the whole update, never runs on mixed values
        self.timer.stop();

        self.timer.set_top(params.period_ticks);
        self.timer.set_compare(Channel::A, params.on_ticks);
        self.timer.set_compare(Channel::B, params.complement_ticks());

        // Match channel A on the next tick instead of up to a period later
        self.timer.set_counter(params.on_ticks.saturating_sub(1));

        self.timer.start(self.config.prescaler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{CompareOutput, Prescaler};
    use crate::testing::{Op, RecordingTimer};

    fn engine() -> PwmEngine<RecordingTimer> {
        PwmEngine::new(RecordingTimer::new(), PwmConfig::default())
    }

    #[test]
    fn period_truncates() {
        assert_eq!(period_us(10), Ok(100));
        assert_eq!(period_us(3), Ok(333));
        assert_eq!(period_us(0), Err(PwmError::ZeroFrequency));
    }

    #[test]
    fn ten_khz_twenty_percent() {
        let p = compute(&PwmConfig::default(), 10, 20).unwrap();
        assert_eq!(p.period_us, 100);
        assert_eq!(p.period_ticks, 800);
        assert_eq!(p.on_ticks, 160);
        assert_eq!(p.complement_ticks(), 640);
    }

    #[test]
    fn hundred_khz_twenty_percent() {
        let p = compute(&PwmConfig::default(), 100, 20).unwrap();
        assert_eq!(p.period_us, 10);
        assert_eq!(p.period_ticks, 80);
        assert_eq!(p.on_ticks, 16);
        assert_eq!(p.complement_ticks(), 64);
    }

    #[test]
    fn prescaler_divides_ticks() {
        let config = PwmConfig {
            prescaler: Prescaler::Div8,
            ..PwmConfig::default()
        };
        let p = compute(&config, 10, 20).unwrap();
        assert_eq!(p.period_ticks, 100);
        assert_eq!(p.on_ticks, 20);
    }

    #[test]
    fn channels_sum_to_period() {
        let config = PwmConfig::default();
        for frequency in 1..=1000 {
            for duty in 0..=100 {
                let p = compute(&config, frequency, duty).unwrap();
                assert!(p.on_ticks <= p.period_ticks);
                assert_eq!(p.on_ticks + p.complement_ticks(), p.period_ticks);
            }
        }
    }

    #[test]
    fn sub_microsecond_half_period_gives_zero_top() {
        let config = PwmConfig::default();
        for frequency in [501, 750, 1000] {
            let p = compute(&config, frequency, 20).unwrap();
            assert_eq!(p.period_us, 1);
            assert_eq!(p.period_ticks, 0);
            assert_eq!(p.on_ticks, 0);
            assert_eq!(p.complement_ticks(), 0);
        }

        let mut engine = engine();
        engine.apply(750, 20).unwrap();
        let regs = engine.timer().registers();
        assert_eq!((regs.top, regs.compare_a, regs.compare_b, regs.counter), (0, 0, 0, 0));
        assert!(regs.running);
    }

    #[test]
    fn rejects_bad_input() {
        let config = PwmConfig::default();
        assert_eq!(compute(&config, 0, 20), Err(PwmError::ZeroFrequency));
        assert_eq!(compute(&config, 10, 101), Err(PwmError::DutyOutOfRange(101)));

        let fast = PwmConfig {
            clock_hz: 160_000_000,
            ..PwmConfig::default()
        };
        assert_eq!(compute(&fast, 1, 20), Err(PwmError::PeriodOverflow(80_000)));
    }

    #[test]
    fn new_configures_with_clock_stopped() {
        let engine = engine();
        let regs = engine.timer().registers();
        assert!(!regs.running);
        assert!(regs.dual_slope);
        assert_eq!(
            regs.output_modes,
            Some((CompareOutput::SetOnMatch, CompareOutput::ClearOnMatch))
        );
    }

    #[test]
    fn apply_write_order() {
        let mut engine = engine();
        engine.timer.clear();

        engine.apply(10, 20).unwrap();

        assert_eq!(
            engine.timer().ops(),
            &[
                Op::Stop,
                Op::Top(800),
                Op::Compare(Channel::A, 160),
                Op::Compare(Channel::B, 640),
                Op::Counter(159),
                Op::Start(Prescaler::Direct),
            ]
        );
        assert!(engine.timer().registers().running);
    }

    #[test]
    fn never_writes_while_running() {
        let mut engine = engine();
        engine.apply(10, 20).unwrap();
        engine.apply(50, 30).unwrap();
        engine.increase_duty_cycle().unwrap();
        engine.toggle_duty_cycle().unwrap();
        engine.decrease_duty_cycle().unwrap();

        assert_eq!(engine.timer().live_writes(), 0);
    }

    #[test]
    fn zero_duty_preloads_counter_at_bottom() {
        let mut engine = engine();
        engine.apply(10, 0).unwrap();
        assert_eq!(engine.timer().registers().counter, 0);
        assert_eq!(engine.timer().registers().compare_b, 800);
    }

    #[test]
    fn apply_is_idempotent() {
        let mut engine = engine();
        engine.apply(20, 33).unwrap();
        let first = engine.timer().registers();
        let params = *engine.parameters();

        engine.apply(20, 33).unwrap();
        assert_eq!(engine.timer().registers(), first);
        assert_eq!(*engine.parameters(), params);
    }

    #[test]
    fn failed_apply_changes_nothing() {
        let mut engine = engine();
        engine.apply(10, 20).unwrap();
        engine.timer.clear();

        assert_eq!(engine.apply(0, 20), Err(PwmError::ZeroFrequency));
        assert!(engine.timer().ops().is_empty());
        assert_eq!(engine.parameters().frequency_khz, 10);
        assert_eq!(engine.parameters().on_ticks, 160);
    }

    #[test]
    fn duty_steps() {
        let mut engine = engine();
        engine.apply(10, 20).unwrap();

        engine.increase_duty_cycle().unwrap();
        assert_eq!(engine.parameters().duty_pct, 21);
        assert_eq!(engine.parameters().on_ticks, 168);

        engine.decrease_duty_cycle().unwrap();
        engine.decrease_duty_cycle().unwrap();
        assert_eq!(engine.parameters().duty_pct, 19);
        assert_eq!(engine.parameters().frequency_khz, 10);
    }

    #[test]
    fn increase_stops_at_ceiling() {
        let mut engine = engine();
        engine.apply(10, 48).unwrap();
        engine.timer.clear();

        engine.increase_duty_cycle().unwrap();
        assert_eq!(engine.parameters().duty_pct, 48);
        assert!(engine.timer().ops().is_empty());
    }

    #[test]
    fn decrease_stops_at_zero() {
        let mut engine = engine();
        engine.apply(10, 0).unwrap();
        engine.timer.clear();

        engine.decrease_duty_cycle().unwrap();
        assert_eq!(engine.parameters().duty_pct, 0);
        assert!(engine.timer().ops().is_empty());
    }

    #[test]
    fn toggle_between_ceiling_and_fallback() {
        let mut engine = engine();
        engine.apply(30, 48).unwrap();

        engine.toggle_duty_cycle().unwrap();
        assert_eq!(engine.parameters().duty_pct, 10);

        engine.toggle_duty_cycle().unwrap();
        assert_eq!(engine.parameters().duty_pct, 48);
        assert_eq!(engine.parameters().frequency_khz, 30);

        engine.apply(30, 20).unwrap();
        engine.toggle_duty_cycle().unwrap();
        assert_eq!(engine.parameters().duty_pct, 48);
    }

    #[test]
    fn ceiling_is_configurable() {
        let config = PwmConfig {
            duty_ceiling_pct: 45,
            toggle_duty_pct: 5,
            ..PwmConfig::default()
        };
        let mut engine = PwmEngine::new(RecordingTimer::new(), config);
        engine.apply(10, 45).unwrap();

        engine.increase_duty_cycle().unwrap();
        assert_eq!(engine.parameters().duty_pct, 45);

        engine.toggle_duty_cycle().unwrap();
        assert_eq!(engine.parameters().duty_pct, 5);
    }

    #[test]
    fn stepping_before_apply_is_rejected() {
        let mut engine = engine();
        assert_eq!(engine.increase_duty_cycle(), Err(PwmError::ZeroFrequency));
        assert!(!engine.timer().registers().running);
    }
}
