//! Standard-speed 1-Wire slot timings.
//!
//! Values follow the recommended standard-speed timings of
//! [Application Note 126](https://www.analog.com/en/resources/technical-articles/1wire-communication-through-software.html).
//! All durations are in microseconds.

/// Durations used to synthesize the 1-Wire waveforms, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTiming {
    /// Low time of a write-1 slot, also the low time initiating a read slot (A).
    pub write_one_low: u32,
    /// Release time completing a write-1 slot (B).
    pub write_one_release: u32,
    /// Low time of a write-0 slot (C).
    pub write_zero_low: u32,
    /// Release time completing a write-0 slot (D).
    pub write_zero_release: u32,
    /// Delay between releasing the line and sampling it in a read slot (E).
    pub read_sample: u32,
    /// Remainder of the read slot after sampling (F).
    pub read_recovery: u32,
    /// Idle time before the reset pulse (G).
    pub reset_idle: u32,
    /// Low time of the reset pulse (H).
    pub reset_low: u32,
    /// Delay between releasing the reset pulse and sampling for presence (I).
    pub reset_sample: u32,
    /// Remainder of the reset sequence after the presence sample (J).
    pub reset_recovery: u32,
}

impl SlotTiming {
    /// Total duration of a write slot carrying `bit`.
    pub const fn write_slot(&self, bit: bool) -> u32 {
        if bit {
            self.write_one_low + self.write_one_release
        } else {
            self.write_zero_low + self.write_zero_release
        }
    }

    /// Total duration of a read slot.
    pub const fn read_slot(&self) -> u32 {
        self.write_one_low + self.read_sample + self.read_recovery
    }

    /// Total duration of the reset and presence-detect sequence.
    pub const fn reset_sequence(&self) -> u32 {
        self.reset_idle + self.reset_low + self.reset_sample + self.reset_recovery
    }
}

/// Standard-speed timings.
pub const STANDARD: SlotTiming = SlotTiming {
    write_one_low: 6,
    write_one_release: 64,
    write_zero_low: 60,
    write_zero_release: 10,
    read_sample: 9,
    read_recovery: 55,
    reset_idle: 0,
    reset_low: 480,
    reset_sample: 70,
    reset_recovery: 410,
};

// Every bit slot occupies the same time on the wire.
const _: () = assert!(STANDARD.write_slot(true) == STANDARD.write_slot(false));
const _: () = assert!(STANDARD.read_slot() == STANDARD.write_slot(true));
