use crate::{OneWire, OneWireError, OneWireLine, OneWireResult, STANDARD};

/// A 1-Wire bus master synthesizing the bus waveforms in software.
///
/// Takes ownership of a [`OneWireLine`] and drives it with the standard-speed [`STANDARD`] timings.
/// Every slot is run to completion once started; the caller must not be preempted for longer than
/// a few microseconds while a transaction is in flight.
#[derive(Debug)]
pub struct BitBang<L> {
    line: L,
}

impl<L: OneWireLine> BitBang<L> {
    /// Creates a new bus master over `line`, initializing the line first.
    ///
    /// # Errors
    /// Returns [`OneWireError::Initialization`] carrying the platform error if the line cannot be
    /// initialized.
    pub fn new(mut line: L) -> OneWireResult<Self, L::Error> {
        line.init().map_err(OneWireError::Initialization)?;
        Ok(Self { line })
    }
}

impl<L> BitBang<L> {
    /// Returns a reference to the underlying line.
    pub fn line(&self) -> &L {
        &self.line
    }

    /// Returns a mutable reference to the underlying line.
    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }

    /// Consumes the bus master, returning the underlying line.
    pub fn into_inner(self) -> L {
        self.line
    }
}

impl<L: OneWireLine> OneWire for BitBang<L> {
    type BusError = L::Error;

    fn reset(&mut self) -> OneWireResult<bool, Self::BusError> {
        self.line.drive(true)?;
        self.line.delay_us(STANDARD.reset_idle);
        self.line.drive(false)?;
        self.line.delay_us(STANDARD.reset_low);
        self.line.release()?;
        self.line.delay_us(STANDARD.reset_sample);
        // Devices answer by pulling the line low.
        let presence = !self.line.sample()?;
        self.line.delay_us(STANDARD.reset_recovery);
        Ok(presence)
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        let (low, release) = if bit {
            (STANDARD.write_one_low, STANDARD.write_one_release)
        } else {
            (STANDARD.write_zero_low, STANDARD.write_zero_release)
        };
        self.line.drive(false)?;
        self.line.delay_us(low);
        self.line.release()?;
        self.line.delay_us(release);
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        self.line.drive(false)?;
        self.line.delay_us(STANDARD.write_one_low);
        self.line.release()?;
        self.line.delay_us(STANDARD.read_sample);
        let bit = self.line.sample()?;
        self.line.delay_us(STANDARD.read_recovery);
        Ok(bit)
    }
}
