//! Location-refresh pushbutton.
//!
//! A single GPIO pushbutton (pull-up, active low) asks the host loop to take
//! a fresh fix and re-aim the needle. Holding the button fires only once;
//! it must be released and pressed again to fire again.

use std::error::Error;
use std::thread;
use std::time::Duration;

// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, InputPin, Level};

// This is only used in testing, not compiled in release.
#[cfg(test)]
use crate::mocks::mock_gpio::{Gpio, InputPin, Level};

use crate::config::GPIO_REFRESH_BUTTON;

pub struct RefreshButton {
    pin: InputPin,
    was_pressed: bool,
}

impl RefreshButton {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::with_pin(GPIO_REFRESH_BUTTON)
    }

    pub fn with_pin(button_pin: u8) -> Result<Self, Box<dyn Error>> {
        let gpio = Gpio::new()?;
        let pin = gpio.get(button_pin)?.into_input_pullup();

        // Let the pull-up settle before the first read.
        thread::sleep(Duration::from_millis(50));

        Ok(Self {
            pin,
            was_pressed: false,
        })
    }

    pub fn is_pressed(&self) -> bool {
        self.pin.read() == Level::Low
    }

    /// Edge detector: true exactly once per press.
    pub fn take_press(&mut self) -> bool {
        let pressed = self.is_pressed();
        let fired = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        fired
    }
}
