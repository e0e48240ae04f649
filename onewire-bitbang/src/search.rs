use log::{debug, trace};

use crate::{ONEWIRE_SEARCH_CMD, OneWire, OneWireCrc, OneWireResult, RomCode};

/// Reason a search step ended without returning a ROM code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFault {
    /// No device answered the reset pulse.
    NoPresence,
    /// A bit and its complement both read 1: no device is taking part in the search.
    BusIdle,
    /// The 64 collected bits failed the CRC-8 check.
    CrcMismatch,
    /// The collected code has a zero family byte, which marks an empty or shorted bus.
    NullFamily,
    /// Every device has already been returned by this sweep.
    Exhausted,
}

/// State of one enumeration of the devices on a 1-Wire bus.
///
/// This structure implements the [1-Wire search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html).
/// It is owned by the caller and passed the bus on every step, so independent searches on
/// different buses each keep their own state. A step discovers at most one device:
/// call [`start`](SearchState::start) once, then [`resume`](SearchState::resume) until it
/// returns `None`. Each success yields a ROM code not returned before in the same sweep, in an
/// order fixed by the codes present on the bus.
///
/// Only one transaction may be in flight on a bus at a time; callers sharing a bus or a
/// search state must serialize access themselves.
#[derive(Debug, Clone)]
pub struct SearchState {
    rom: [u8; 8],
    last_discrepancy: u8,
    last_family_discrepancy: u8,
    last_device: bool,
    crc: OneWireCrc,
    fault: Option<SearchFault>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    /// Creates a search state positioned at the beginning of a sweep.
    pub const fn new() -> Self {
        Self {
            rom: [0; 8],
            last_discrepancy: 0,
            last_family_discrepancy: 0,
            last_device: false,
            crc: OneWireCrc::new(),
            fault: None,
        }
    }

    /// Clears the discrepancy cursors and the exhausted flag, so the next step begins a new sweep.
    /// The ROM buffer keeps its contents.
    pub fn reset(&mut self) {
        self.last_discrepancy = 0;
        self.last_family_discrepancy = 0;
        self.last_device = false;
    }

    /// Starts a new sweep and performs its first step.
    ///
    /// # Returns
    /// The first device found, or `None` if no device could be found; [`last_fault`](SearchState::last_fault)
    /// tells why.
    ///
    /// # Errors
    /// Only failures of the underlying bus are returned as errors.
    pub fn start<T: OneWire>(
        &mut self,
        onewire: &mut T,
    ) -> OneWireResult<Option<RomCode>, T::BusError> {
        self.reset();
        self.resume(onewire)
    }

    /// Performs one search step from the current state, finding the next device of the sweep.
    ///
    /// Returns `None` once the sweep is complete, leaving the state exhausted until a new sweep is
    /// started. Unlike a wrap-around search, further calls keep returning `None` without touching
    /// the bus; use [`start`](SearchState::start) to enumerate again. Any bus inconsistency (no presence pulse, idle bus, CRC mismatch, zero family code)
    /// also returns `None` and resets the cursors, so the next step starts over.
    ///
    /// # Errors
    /// Only failures of the underlying bus are returned as errors.
    pub fn resume<T: OneWire>(
        &mut self,
        onewire: &mut T,
    ) -> OneWireResult<Option<RomCode>, T::BusError> {
        self.fault = None;
        if self.last_device {
            self.fault = Some(SearchFault::Exhausted);
            return Ok(None);
        }
        let res = self.step(onewire);
        if let Err(e) = res {
            // The bus is in an unknown state, restart the sweep next time.
            self.reset();
            return Err(e);
        }
        if self.fault.is_none() && self.rom[0] == 0 {
            self.fault = Some(SearchFault::NullFamily);
        }
        if let Some(fault) = self.fault {
            debug!("search step failed: {fault:?}, restarting sweep");
            self.reset();
            return Ok(None);
        }
        trace!(
            "found {:x}, last discrepancy {}, done {}",
            u64::from_le_bytes(self.rom),
            self.last_discrepancy,
            self.last_device
        );
        Ok(Some(RomCode::new(self.rom)))
    }

    /// Prepares the next [`resume`](SearchState::resume) to look for devices with the given family
    /// code.
    ///
    /// The first device returned afterwards is the first one of the family in sweep order, if any is
    /// present. Devices of other families may still follow; callers check
    /// [`RomCode::family`] (or use [`OneWireSearch::with_family`]) to stop there.
    pub fn target_family(&mut self, family: u8) {
        self.seed([family, 0, 0, 0, 0, 0, 0, 0]);
    }

    /// The ROM buffer: the code of the last device found, or a partially collected code after a
    /// failed step.
    pub fn rom(&self) -> [u8; 8] {
        self.rom
    }

    /// Bit position (1-64) of the last discrepancy where the `0` branch was taken, `0` if none.
    pub fn last_discrepancy(&self) -> u8 {
        self.last_discrepancy
    }

    /// Same as [`last_discrepancy`](SearchState::last_discrepancy), restricted to the family code
    /// (bit positions 1-8).
    pub fn last_family_discrepancy(&self) -> u8 {
        self.last_family_discrepancy
    }

    /// Whether the last device of the sweep has been returned.
    pub fn is_exhausted(&self) -> bool {
        self.last_device
    }

    /// Why the last step returned `None`, if it did.
    pub fn last_fault(&self) -> Option<SearchFault> {
        self.fault
    }

    /// Seeds the ROM buffer and forces every bit position to be explored along it.
    fn seed(&mut self, rom: [u8; 8]) {
        self.rom = rom;
        self.last_discrepancy = 64;
        self.last_family_discrepancy = 0;
        self.last_device = false;
    }

    /// One pass over the 64 bits of the ROM. Records a fault instead of updating the cursors if
    /// the pass cannot complete.
    fn step<T: OneWire>(&mut self, onewire: &mut T) -> OneWireResult<(), T::BusError> {
        if !onewire.reset()? {
            self.fault = Some(SearchFault::NoPresence);
            return Ok(());
        }
        onewire.write_byte(ONEWIRE_SEARCH_CMD)?;
        self.crc.reset();

        let mut id_bit_num: u8 = 1;
        let mut last_zero: u8 = 0;
        let mut idx: usize = 0; // Index in the ROM array
        let mut rom_mask: u8 = 1; // Mask for the current bit in the ROM byte
        while idx < self.rom.len() {
            // Every responding device sends its bit, then the complement, on a wired-AND line.
            let id_bit = onewire.read_bit()?;
            let complement_bit = onewire.read_bit()?;
            if id_bit && complement_bit {
                self.fault = Some(SearchFault::BusIdle);
                return Ok(());
            }
            let dir = if id_bit != complement_bit {
                // All remaining devices agree on this bit.
                id_bit
            } else {
                let dir = if id_bit_num < self.last_discrepancy {
                    self.rom[idx] & rom_mask > 0
                } else {
                    id_bit_num == self.last_discrepancy
                };
                if !dir {
                    last_zero = id_bit_num;
                    if last_zero < 9 {
                        self.last_family_discrepancy = last_zero;
                    }
                }
                dir
            };
            if dir {
                self.rom[idx] |= rom_mask;
            } else {
                self.rom[idx] &= !rom_mask;
            }
            // Devices whose bit differs from the direction drop out until the next reset.
            onewire.write_bit(dir)?;

            id_bit_num += 1;
            rom_mask <<= 1;
            if rom_mask == 0 {
                self.crc.update(self.rom[idx]);
                idx += 1;
                rom_mask = 1;
            }
        }

        if self.crc.value() != 0 {
            self.fault = Some(SearchFault::CrcMismatch);
            return Ok(());
        }
        self.last_discrepancy = last_zero;
        self.last_device = last_zero == 0;
        Ok(())
    }
}

/// A structure for searching devices on a 1-Wire bus.
///
/// Borrows the bus and owns a [`SearchState`], covering the usual "list every device" use:
///
/// ```ignore
/// let mut search = OneWireSearch::new(&mut bus);
/// while let Some(rom) = search.next()? {
///     // ...
/// }
/// ```
pub struct OneWireSearch<'a, T> {
    onewire: &'a mut T,
    state: SearchState,
    family: Option<u8>,
    started: bool,
}

impl<'a, T> OneWireSearch<'a, T> {
    /// Creates a new [`OneWireSearch`] instance.
    ///
    /// # Arguments
    /// * `onewire` - A mutable reference to a type that implements the `OneWire` trait.
    pub fn new(onewire: &'a mut T) -> Self {
        Self {
            onewire,
            state: SearchState::new(),
            family: None,
            started: false,
        }
    }

    /// Creates a new [`OneWireSearch`] instance returning only devices with a specific family code.
    /// # Arguments
    /// * `onewire` - A mutable reference to a type that implements the `OneWire` trait.
    /// * `family` - The family code of the devices to search for.
    pub fn with_family(onewire: &'a mut T, family: u8) -> Self {
        let mut state = SearchState::new();
        state.target_family(family);
        Self {
            onewire,
            state,
            family: Some(family),
            started: true,
        }
    }

    /// The underlying search state.
    pub fn state(&self) -> &SearchState {
        &self.state
    }
}

impl<T: OneWire> OneWireSearch<'_, T> {
    /// Searches for the next device on the 1-Wire bus.
    ///
    /// The first call starts a sweep; later calls continue it. `None` signals that the sweep is
    /// over, or that a bus inconsistency interrupted it. In both cases, and after a bus error, the
    /// next call begins a fresh sweep.
    ///
    /// # Errors
    /// Only failures of the underlying bus are returned as errors.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> OneWireResult<Option<RomCode>, T::BusError> {
        let res = if self.started {
            self.state.resume(self.onewire)
        } else {
            self.started = true;
            self.state.start(self.onewire)
        };
        let found = match res {
            Ok(found) => found,
            Err(e) => {
                self.restart();
                return Err(e);
            }
        };
        let found = match (found, self.family) {
            (Some(rom), Some(family)) if rom.family() != family => {
                trace!("left family {family:02x} at {rom:x}");
                None
            }
            _ => found,
        };
        if found.is_none() {
            self.restart();
        }
        Ok(found)
    }

    /// Verifies if the device with the given ROM code is present on the 1-Wire bus.
    ///
    /// Walks the search tree along `rom` only. The search state is reset afterwards, and calling
    /// [next](OneWireSearch::next) after this call will start a new search.
    ///
    /// # Errors
    /// Only failures of the underlying bus are returned as errors.
    pub fn verify(&mut self, rom: RomCode) -> OneWireResult<bool, T::BusError> {
        self.state.seed(*rom.as_bytes());
        let res = self.state.resume(self.onewire);
        self.restart();
        Ok(res? == Some(rom))
    }

    /// Puts the search back at the beginning of a sweep. The last fault stays readable.
    fn restart(&mut self) {
        match self.family {
            Some(family) => self.state.target_family(family),
            None => self.state.reset(),
        }
        self.started = self.family.is_some();
    }
}
