#![no_std]
#![deny(missing_docs)]
//! # onewire-bitbang
//! A no-std, bit-banged implementation of the 1-Wire bus master.
//!
//! The crate synthesizes the 1-Wire reset, write and read waveforms from four electrical
//! primitives (drive, release, sample and a microsecond delay) that the host platform supplies
//! through the [OneWireLine] trait. [HalLine] provides those primitives for any open-drain
//! [`embedded-hal`](embedded_hal) pin paired with a [`DelayNs`](embedded_hal::delay::DelayNs) timer.
//!
//! [BitBang] turns a line into a [OneWire] bus, exposing bit, byte, touch and block transactions.
//! On top of any [OneWire] bus, [SearchState] implements the
//! [1-Wire search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html),
//! discovering one [RomCode] per step, and [OneWireSearch] wraps it for the common
//! enumerate-everything case. ROM codes are checked with the Dallas/Maxim CRC-8 in [OneWireCrc].

#[cfg(test)]
extern crate std;

mod bitbang;
mod consts;
mod crc;
mod error;
mod hal;
mod rom;
mod search;
#[cfg(test)]
mod sim;
mod timing;
mod traits;

pub use bitbang::BitBang;
pub use consts::ONEWIRE_SEARCH_CMD;
pub use crc::OneWireCrc;
pub use error::OneWireError;
pub use hal::HalLine;
pub use rom::RomCode;
pub use search::{OneWireSearch, SearchFault, SearchState};
pub use timing::{STANDARD, SlotTiming};
pub use traits::{OneWire, OneWireLine};

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
