use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds only run the unit and integration tests
    let target = env::var("TARGET").unwrap();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega328P (Arduino Uno pinout, Timer1 on PB1/PB2)
    println!("cargo:rustc-link-arg=-mmcu=atmega328p");

    if env::var("CARGO_FEATURE_DEBUG").is_ok() {
        println!("cargo:warning=Register trace enabled on the serial console");
    }

    println!("cargo:warning=Building for ATmega328P at 16MHz");
}
