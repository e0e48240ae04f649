use core::fmt;

use crate::OneWireCrc;

/// A 64-bit 1-Wire ROM code, as transmitted on the bus.
///
/// | Byte | Description |
/// |------|-------------|
/// | 0 | Family code (e.g., 0x28 for DS18B20) |
/// | 1-6 | Serial number, least significant byte first |
/// | 7 | CRC-8 (`0b1_0011_0001` poly) of bytes 0-6 |
///
/// Converting to and from [`u64`] uses little-endian order, so the family code sits in the lowest
/// byte of the integer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RomCode([u8; 8]);

impl RomCode {
    /// Creates a ROM code from its raw bytes. The CRC byte is not checked.
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Assembles a ROM code from a family code and serial number, computing the CRC byte.
    pub fn from_parts(family: u8, serial: [u8; 6]) -> Self {
        let mut bytes = [family, 0, 0, 0, 0, 0, 0, 0];
        bytes[1..7].copy_from_slice(&serial);
        bytes[7] = OneWireCrc::checksum(&bytes[..7]);
        Self(bytes)
    }

    /// The family code.
    pub const fn family(&self) -> u8 {
        self.0[0]
    }

    /// The 48-bit serial number.
    pub fn serial(&self) -> [u8; 6] {
        let mut serial = [0; 6];
        serial.copy_from_slice(&self.0[1..7]);
        serial
    }

    /// The CRC byte carried by the code.
    pub const fn crc(&self) -> u8 {
        self.0[7]
    }

    /// Whether the CRC byte matches the family code and serial number.
    pub fn is_valid(&self) -> bool {
        OneWireCrc::validate(&self.0)
    }

    /// The raw bytes, in bus order.
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl From<[u8; 8]> for RomCode {
    fn from(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl From<RomCode> for [u8; 8] {
    fn from(rom: RomCode) -> Self {
        rom.0
    }
}

impl From<u64> for RomCode {
    fn from(value: u64) -> Self {
        Self(value.to_le_bytes())
    }
}

impl From<RomCode> for u64 {
    fn from(rom: RomCode) -> Self {
        u64::from_le_bytes(rom.0)
    }
}

impl fmt::LowerHex for RomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&u64::from(*self), f)
    }
}

impl fmt::UpperHex for RomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&u64::from(*self), f)
    }
}

impl fmt::Display for RomCode {
    /// Formats as `FF-SSSSSSSSSSSS-CC`: family, serial (most significant byte first), CRC.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}-", self.family())?;
        for byte in self.serial().iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "-{:02x}", self.crc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    const AN27: [u8; 8] = [0x02, 0x1c, 0xb8, 0x01, 0x00, 0x00, 0x00, 0xa2];

    #[test]
    fn parts() {
        let rom = RomCode::from(AN27);
        assert_eq!(rom.family(), 0x02);
        assert_eq!(rom.serial(), [0x1c, 0xb8, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(rom.crc(), 0xa2);
        assert!(rom.is_valid());
        assert_eq!(RomCode::from_parts(0x02, rom.serial()), rom);
    }

    #[test]
    fn invalid_crc() {
        let mut bytes = AN27;
        bytes[7] ^= 0x01;
        assert!(!RomCode::new(bytes).is_valid());
    }

    #[test]
    fn u64_is_little_endian() {
        let rom = RomCode::from(AN27);
        let value = u64::from(rom);
        assert_eq!(value, 0xa200_0000_01b8_1c02);
        assert_eq!(RomCode::from(value), rom);
    }

    #[test]
    fn formatting() {
        let rom = RomCode::from(AN27);
        assert_eq!(format!("{rom}"), "02-00000001b81c-a2");
        assert_eq!(format!("{rom:016x}"), "a200000001b81c02");
        assert_eq!(format!("{rom:X}"), "A200000001B81C02");
    }
}
