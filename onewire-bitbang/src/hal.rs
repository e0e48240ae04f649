use crate::OneWireLine;
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};

/// A [`OneWireLine`] built from an [`embedded-hal`](embedded_hal) pin and timer.
///
/// The pin must be configured as open-drain with an external pull-up: setting it high releases the
/// line, setting it low pulls the line down, and reading it returns the actual line level.
#[derive(Debug)]
pub struct HalLine<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> HalLine<P, D> {
    /// Creates a new line from an open-drain pin and a delay provider.
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Consumes the line, returning the pin and the delay provider.
    pub fn into_inner(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P: InputPin + OutputPin, D: DelayNs> OneWireLine for HalLine<P, D> {
    type Error = <P as ErrorType>::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        // The line idles high.
        self.pin.set_high()
    }

    fn drive(&mut self, level: bool) -> Result<(), Self::Error> {
        if level {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }

    fn sample(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn delay_us(&mut self, us: u32) {
        if us > 0 {
            self.delay.delay_us(us);
        }
    }
}
