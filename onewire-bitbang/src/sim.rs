//! Simulated open-drain line with 1-Wire slaves, for tests.

use std::{boxed::Box, collections::VecDeque, vec::Vec};

use crate::{ONEWIRE_SEARCH_CMD, OneWireLine, RomCode};

/// Shortest low time, in microseconds, that slaves treat as a reset pulse.
const RESET_THRESHOLD_US: u64 = 480;
/// Slaves sample written bits this long after the falling edge.
const SLAVE_SAMPLE_US: u64 = 15;

/// Error injected by [`SimLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SimFault;

/// A slave device sitting on a [`SimLine`].
pub(crate) trait Slave {
    /// Reset pulse seen. Returns whether the slave answers with a presence pulse.
    fn reset(&mut self) -> bool;
    /// The master pulled the line low, opening a slot. Returns whether the slave holds the line
    /// low for the rest of the slot.
    fn slot_start(&mut self) -> bool;
    /// The master released the line; `bit` is what the slot carried from the master.
    fn slot_end(&mut self, bit: bool);
}

/// Wired-AND line with a simulated microsecond clock.
pub(crate) struct SimLine {
    slaves: Vec<Box<dyn Slave>>,
    initialized: bool,
    fail_init: bool,
    fail_drive: bool,
    fail_next_drive: bool,
    master_low: bool,
    low_since: u64,
    slave_low: bool,
    elapsed: u64,
}

impl SimLine {
    pub(crate) fn new() -> Self {
        Self {
            slaves: Vec::new(),
            initialized: false,
            fail_init: false,
            fail_drive: false,
            fail_next_drive: false,
            master_low: false,
            low_since: 0,
            slave_low: false,
            elapsed: 0,
        }
    }

    pub(crate) fn with_slave(mut self, slave: impl Slave + 'static) -> Self {
        self.slaves.push(Box::new(slave));
        self
    }

    pub(crate) fn with_roms(mut self, roms: &[RomCode]) -> Self {
        for rom in roms {
            self.slaves.push(Box::new(RomSlave::new(*rom.as_bytes())));
        }
        self
    }

    pub(crate) fn with_failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Disconnects every slave from the line.
    pub(crate) fn clear_slaves(&mut self) {
        self.slaves.clear();
    }

    pub(crate) fn fail_drive(&mut self) {
        self.fail_drive = true;
    }

    /// Fails the next drive only.
    pub(crate) fn fail_next_drive(&mut self) {
        self.fail_next_drive = true;
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn elapsed_us(&self) -> u64 {
        self.elapsed
    }

    fn pull_low(&mut self) {
        if self.master_low {
            return;
        }
        self.master_low = true;
        self.low_since = self.elapsed;
        self.slave_low = false;
        for slave in self.slaves.iter_mut() {
            self.slave_low |= slave.slot_start();
        }
    }

    fn let_go(&mut self) {
        if !self.master_low {
            return;
        }
        self.master_low = false;
        let low = self.elapsed - self.low_since;
        if low >= RESET_THRESHOLD_US {
            self.slave_low = false;
            for slave in self.slaves.iter_mut() {
                self.slave_low |= slave.reset();
            }
        } else {
            let bit = low < SLAVE_SAMPLE_US;
            for slave in self.slaves.iter_mut() {
                slave.slot_end(bit);
            }
        }
    }
}

impl OneWireLine for SimLine {
    type Error = SimFault;

    fn init(&mut self) -> Result<(), Self::Error> {
        if self.fail_init {
            return Err(SimFault);
        }
        self.initialized = true;
        Ok(())
    }

    fn drive(&mut self, level: bool) -> Result<(), Self::Error> {
        if !self.initialized || self.fail_drive {
            return Err(SimFault);
        }
        if self.fail_next_drive {
            self.fail_next_drive = false;
            return Err(SimFault);
        }
        if level {
            self.let_go();
        } else {
            self.pull_low();
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        if !self.initialized {
            return Err(SimFault);
        }
        self.let_go();
        Ok(())
    }

    fn sample(&mut self) -> Result<bool, Self::Error> {
        if !self.initialized {
            return Err(SimFault);
        }
        Ok(!self.master_low && !self.slave_low)
    }

    fn delay_us(&mut self, us: u32) {
        self.elapsed += u64::from(us);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Command { bits: u8, count: u8 },
    SendBit(u8),
    SendComplement(u8),
    ReceiveDirection(u8),
}

/// A slave with a ROM code that takes part in the search ROM command.
pub(crate) struct RomSlave {
    rom: [u8; 8],
    searchable: bool,
    phase: Phase,
}

impl RomSlave {
    pub(crate) fn new(rom: [u8; 8]) -> Self {
        Self {
            rom,
            searchable: true,
            phase: Phase::Idle,
        }
    }

    /// A slave that answers resets but ignores the search command.
    pub(crate) fn mute(rom: [u8; 8]) -> Self {
        Self {
            searchable: false,
            ..Self::new(rom)
        }
    }

    fn rom_bit(&self, pos: u8) -> bool {
        (self.rom[(pos / 8) as usize] >> (pos % 8)) & 1 == 1
    }
}

impl Slave for RomSlave {
    fn reset(&mut self) -> bool {
        self.phase = Phase::Command { bits: 0, count: 0 };
        true
    }

    fn slot_start(&mut self) -> bool {
        match self.phase {
            Phase::SendBit(pos) => !self.rom_bit(pos),
            Phase::SendComplement(pos) => self.rom_bit(pos),
            _ => false,
        }
    }

    fn slot_end(&mut self, bit: bool) {
        self.phase = match self.phase {
            Phase::Idle => Phase::Idle,
            Phase::Command { bits, count } => {
                let bits = bits | (u8::from(bit) << count);
                match count + 1 {
                    8 if bits == ONEWIRE_SEARCH_CMD && self.searchable => Phase::SendBit(0),
                    8 => Phase::Idle,
                    count => Phase::Command { bits, count },
                }
            }
            Phase::SendBit(pos) => Phase::SendComplement(pos),
            Phase::SendComplement(pos) => Phase::ReceiveDirection(pos),
            Phase::ReceiveDirection(pos) => {
                if bit != self.rom_bit(pos) || pos == 63 {
                    Phase::Idle
                } else {
                    Phase::SendBit(pos + 1)
                }
            }
        };
    }
}

/// A slave that records eight written bits, then replays them on the next eight slots.
#[derive(Default)]
pub(crate) struct Echo {
    bits: VecDeque<bool>,
    replay: bool,
}

impl Slave for Echo {
    fn reset(&mut self) -> bool {
        self.bits.clear();
        self.replay = false;
        true
    }

    fn slot_start(&mut self) -> bool {
        self.replay && self.bits.front() == Some(&false)
    }

    fn slot_end(&mut self, bit: bool) {
        if self.replay {
            self.bits.pop_front();
            self.replay = !self.bits.is_empty();
        } else {
            self.bits.push_back(bit);
            self.replay = self.bits.len() == 8;
        }
    }
}
