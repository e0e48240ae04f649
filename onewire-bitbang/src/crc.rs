/// Reflected form of the Dallas/Maxim polynomial x^8 + x^5 + x^4 + 1.
const POLYNOMIAL: u8 = 0x8c;

const fn crc8_byte(byte: u8) -> u8 {
    let mut crc = byte;
    let mut bit = 0;
    while bit < 8 {
        crc = if crc & 0x1 == 0x1 {
            (crc >> 1) ^ POLYNOMIAL
        } else {
            crc >> 1
        };
        bit += 1;
    }
    crc
}

#[cfg_attr(not(feature = "crc-table"), allow(dead_code))]
const fn crc8_table() -> [u8; 256] {
    let mut table = [0; 256];
    let mut idx = 0;
    while idx < 256 {
        table[idx] = crc8_byte(idx as u8);
        idx += 1;
    }
    table
}

#[cfg(feature = "crc-table")]
static CRC8_TABLE: [u8; 256] = crc8_table();

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Calculate CRC-8 used in 1-Wire communications.
///
/// With the `crc-table` feature (default) each byte costs one lookup in a 256-entry table built at
/// compile time; without it the polynomial is applied bit by bit.
pub struct OneWireCrc(u8);

impl OneWireCrc {
    /// Creates an accumulator with a zero value.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Clears the accumulator, starting an independent validation.
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Update the CRC with the incoming byte, returning the new value.
    pub fn update(&mut self, byte: u8) -> u8 {
        #[cfg(feature = "crc-table")]
        {
            self.0 = CRC8_TABLE[(self.0 ^ byte) as usize];
        }
        #[cfg(not(feature = "crc-table"))]
        {
            self.0 = crc8_byte(self.0 ^ byte);
        }
        self.0
    }

    /// Compute the CRC of a sequence of bytes.
    pub fn checksum(sequence: &[u8]) -> u8 {
        let mut crc = OneWireCrc::new();
        for &byte in sequence {
            crc.update(byte);
        }
        crc.0
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    pub fn validate(sequence: &[u8]) -> bool {
        // Running the CRC over its own value yields zero.
        Self::checksum(sequence) == 0x0
    }
}
