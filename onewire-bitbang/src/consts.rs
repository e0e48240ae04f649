//! Command constants for 1-Wire communication.

/// Command to search for devices on the 1-Wire bus (all devices, no alarm condition).
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;
