//! AK4619 four-channel audio codec driver.
//!
//! Register-level control of the AKM AK4619VN (two stereo ADCs, two stereo
//! DACs) over either of its two control ports: 4-wire SPI with a dedicated
//! active-low chip-select per codec, or I2C at one of two strap-selected
//! addresses. The audio data path (TDM/I2S) never passes through this
//! crate; only the control port does.
//!
//! # Layers
//!
//! - [`bus`]: the blocking transport primitives the driver consumes
//!   ([`SpiPort`], [`I2cPort`]), with adapters for any `embedded-hal` 1.0
//!   bus.
//! - [`Interface`]: the transport binding of one codec, framing SPI/I2C
//!   register transactions with bounded retry while the bus reports busy.
//! - [`Ak4619`]: the device handle, with whole-register get/set pairs,
//!   bit-field get/set pairs using read-modify-write semantics, and the dB
//!   to volume-code conversion ([`db_to_code`]).
//!
//! Every get issues a live bus read and every set a live bus write; the
//! handle caches nothing. The driver takes no locks. The caller serializes
//! access to a shared bus, which `&mut` receivers enforce within one
//! context.
//!
//! # I2C address selection
//!
//! | A0 pin | 7-bit address |
//! |--------|---------------|
//! | GND    | `0x10`        |
//! | VDD    | `0x11`        |
//!
//! # Example
//!
//! ```no_run
//! use ak4619::{Ak4619, Converter, SoftMute, A0};
//!
//! # fn demo<I, D>(i2c: I, delay: D) -> Result<(), ak4619::Error>
//! # where
//! #     I: ak4619::I2cPort,
//! #     D: embedded_hal::delay::DelayNs,
//! # {
//! let mut codec = Ak4619::new_i2c(i2c, A0::Gnd, delay);
//! codec.init()?;
//! codec.set_soft_mute(Converter::Dac1, SoftMute::Enabled)?;
//! # Ok(())
//! # }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments

pub mod bus;
mod driver;
mod fields;
pub mod registers;
mod transport;
mod types;
mod volume;

pub use bus::{BusError, HalI2c, HalSpi, I2cPort, SpiPort};
pub use driver::Ak4619;
pub use transport::{
    Interface, NoPort, A0, I2C_ATTEMPT_DELAY_MS, MAX_ATTEMPTS, SPI_ATTEMPT_DELAY_MS,
};
pub use types::{
    AdcChannel, AnalogInputMode, AudioInterfaceFormat, BclkEdge, Converter, ConverterKind,
    DacInputSource, DcBlockingFilter, DeemphasisMode, DigitalFilter, MicGain, PowerMode,
    ResetMode, SdoutMode, SlotStart, SoftMute, SystemClock, TdmMode, VolumeTransition,
    WordLength,
};
pub use volume::{db_to_code, MUTE_DB};

/// Driver status for every fallible operation.
///
/// Parameter errors (`NotBound`, `InvalidRegister`, `OutOfRange`) are
/// detected before any bus activity; `Busy` and `Communication` come out of
/// the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The handle has no transport bound, or the operation needs the other
    /// transport.
    NotBound,
    /// Register address beyond the device's register map.
    InvalidRegister,
    /// Selector or setting outside its legal range, or register contents
    /// that decode to no defined setting.
    OutOfRange,
    /// The bus stayed busy through every retry attempt.
    Busy,
    /// Hard bus or chip-select fault.
    Communication,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotBound => write!(f, "no transport bound to the codec handle"),
            Self::InvalidRegister => write!(f, "register address outside the device map"),
            Self::OutOfRange => write!(f, "setting or selector outside its legal range"),
            Self::Busy => write!(f, "bus still busy after all retry attempts"),
            Self::Communication => write!(f, "bus communication fault"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
