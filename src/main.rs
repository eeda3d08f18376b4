#![no_std]
#![no_main]

use panic_halt as _;
use avr_device::atmega328p::Peripherals;

use pushpull_pwm::config::{PwmConfig, UART_BAUD};
use pushpull_pwm::hal::{board, gpio, OutputPair, Timer1, Usart0};
use pushpull_pwm::Application;

#[avr_device::entry]
fn main() -> ! {
    let dp = Peripherals::take().unwrap();

    let serial = Usart0::new(dp.USART0, UART_BAUD);

    // Pins become outputs driven low before the timer takes them over
    let pins = gpio::split(dp.PORTB);
    let primary_high: board::D9 = pins.pb1.into_output();
    let primary_low: board::D10 = pins.pb2.into_output();
    let timer = Timer1::new(dp.TC1, OutputPair::new(primary_high, primary_low));

    let mut app = Application::new(timer, serial, PwmConfig::default());
    if app.start().is_err() {
        // Timer still stopped with both outputs parked low
        loop {
            avr_device::asm::sleep();
        }
    }

    loop {
        app.poll();
    }
}
