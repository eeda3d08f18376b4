//! Complementary push-pull PWM on a single 16-bit timer.
//!
//! Timer1 of an ATmega328P drives OC1A (primary high) and OC1B (primary low)
//! in phase and frequency correct mode. Frequency and duty cycle are set from
//! a one-byte serial command interface, every change is echoed as a status
//! line.
#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod drivers;
pub mod hal;
pub mod protocol;
pub mod testing;

pub use application::Application;
pub use config::PwmConfig;
