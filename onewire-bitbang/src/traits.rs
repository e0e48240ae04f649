use crate::OneWireResult;

/// Electrical access to a single open-drain 1-Wire line.
///
/// An implementor represents one physical line; every transaction of a [`BitBang`](crate::BitBang)
/// bus goes through it. The line idles high through an external pull-up resistor.
pub trait OneWireLine {
    /// The error type returned by the platform when the line cannot be driven or sampled.
    type Error;

    /// Prepares the line for use. Called once before any transaction.
    ///
    /// # Errors
    /// Returns the platform error if the line cannot be configured.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Forces the line to a logic level.
    ///
    /// # Errors
    /// Returns the platform error if the pin cannot be driven.
    fn drive(&mut self, level: bool) -> Result<(), Self::Error>;

    /// Stops driving the line, letting the pull-up return it high.
    ///
    /// # Errors
    /// Returns the platform error if the pin cannot be released.
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Samples the instantaneous logic level of the line.
    ///
    /// # Errors
    /// Returns the platform error if the pin cannot be read.
    fn sample(&mut self) -> Result<bool, Self::Error>;

    /// Blocks for approximately `us` microseconds.
    ///
    /// Accuracy at the short end (a few microseconds) bounds the correctness of every waveform.
    fn delay_us(&mut self, us: u32);
}

/// Trait for 1-Wire communication.
/// This trait defines the basic operations required for 1-Wire communication, such as resetting the bus,
/// writing and reading bytes, and writing and reading bits.
///
/// Only [`reset`](OneWire::reset), [`write_bit`](OneWire::write_bit) and [`read_bit`](OneWire::read_bit)
/// are required; byte, touch and block transactions are built on top of them, least significant bit first.
pub trait OneWire {
    /// The error type returned by the operations of this trait.
    /// This type is used to indicate errors in the underlying hardware or communication.
    type BusError;

    /// Resets the 1-Wire bus.
    ///
    /// # Returns
    /// `true` if at least one device answered with a presence pulse.
    ///
    /// # Errors
    /// This method returns an error if the reset operation fails.
    fn reset(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Writes a single bit to the 1-Wire bus.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError>;

    /// Reads a single bit from the 1-Wire bus.
    /// # Returns
    /// The bit read from the bus.
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Writes a byte to the 1-Wire bus, least significant bit first.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        for i in 0..8 {
            self.write_bit((byte >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Reads a byte from the 1-Wire bus, least significant bit first.
    ///
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        let mut byte = 0;
        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }

    /// Transmits `byte` while sampling what the bus carries in the same slots.
    ///
    /// Every `1` bit of `byte` is sent as a read slot, whose sampled value is stored in the result;
    /// every `0` bit is sent as a write-0 slot and stored as `0`. Slaves driving the bus therefore
    /// show up in the result only where `byte` has recessive bits.
    ///
    /// # Errors
    /// This method returns an error if any slot fails.
    fn touch_byte(&mut self, byte: u8) -> OneWireResult<u8, Self::BusError> {
        let mut result = 0;
        for i in 0..8 {
            let mask = 1 << i;
            if byte & mask != 0 {
                if self.read_bit()? {
                    result |= mask;
                }
            } else {
                self.write_bit(false)?;
            }
        }
        Ok(result)
    }

    /// Applies [`touch_byte`](OneWire::touch_byte) to each byte of `data` in order, in place.
    ///
    /// # Errors
    /// This method returns an error if any slot fails. Bytes before the failing one are already updated.
    fn touch_block(&mut self, data: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for byte in data.iter_mut() {
            *byte = self.touch_byte(*byte)?;
        }
        Ok(())
    }

    /// Writes a sequence of bytes to the 1-Wire bus.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_bytes(&mut self, bytes: &[u8]) -> OneWireResult<(), Self::BusError> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Fills `buf` with bytes read from the 1-Wire bus.
    ///
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for byte in buf.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(())
    }
}
