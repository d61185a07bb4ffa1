//! Framed register transactions over SPI or I2C with bounded busy-retry.
//!
//! A register write is one 4-byte SPI frame inside a chip-select window, or
//! one single-byte memory-mapped I2C write. A register read clocks the
//! 4-byte read frame full-duplex and takes the byte the device shifts out
//! in the last position. Both transports share the retry policy: a busy bus
//! is retried a bounded number of times with a fixed per-transport
//! back-off, while any other fault aborts immediately.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::bus::{BusError, I2cPort, SpiPort};
use crate::registers::{
    I2C_DEVICE_ADDRESS, REG_LAST, SPI_ACTIVATE_FRAME, SPI_CMD_READ, SPI_CMD_WRITE,
};
use crate::Error;

/// Retries after the first try before a busy bus is given up on.
pub const MAX_ATTEMPTS: u8 = 3;
/// Back-off between SPI attempts.
pub const SPI_ATTEMPT_DELAY_MS: u32 = 1;
/// Back-off between I2C attempts.
pub const I2C_ATTEMPT_DELAY_MS: u32 = 10;

/// Level of the A0 address strap pin, selecting one of the two I2C device
/// addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum A0 {
    /// Strap tied to ground: address 0x10.
    Gnd = 0,
    /// Strap tied to VDD: address 0x11.
    Vdd = 1,
}

impl A0 {
    /// 7-bit device address selected by this strap level.
    pub const fn address(self) -> u8 {
        I2C_DEVICE_ADDRESS + self as u8
    }
}

/// Transport binding of one codec instance.
///
/// Exactly one variant is live for the lifetime of a handle. Register
/// operations against [`Interface::Uninit`] fail with [`Error::NotBound`]
/// before touching any bus.
pub enum Interface<I2C, SPI, NCS> {
    /// No transport bound.
    Uninit,
    /// Control port over I2C.
    I2c {
        /// Bus access.
        port: I2C,
        /// Level of the codec's A0 address strap.
        a0: A0,
    },
    /// Control port over SPI.
    Spi {
        /// Bus access.
        port: SPI,
        /// Dedicated active-low chip-select line for this codec.
        ncs: NCS,
    },
}

/// Placeholder for the transport half of an [`Interface`] a handle never
/// uses. Uninhabited, so the corresponding variant cannot even be
/// constructed.
pub enum NoPort {}

impl SpiPort for NoPort {
    fn transmit(&mut self, _frame: &[u8]) -> Result<(), BusError> {
        match *self {}
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), BusError> {
        match *self {}
    }
}

impl I2cPort for NoPort {
    fn mem_write(&mut self, _address: u8, _register: u8, _value: u8) -> Result<(), BusError> {
        match *self {}
    }

    fn mem_read(&mut self, _address: u8, _register: u8) -> Result<u8, BusError> {
        match *self {}
    }
}

impl embedded_hal::digital::ErrorType for NoPort {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoPort {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }
}

impl<I2C, SPI, NCS> Interface<I2C, SPI, NCS>
where
    I2C: I2cPort,
    SPI: SpiPort,
    NCS: OutputPin,
{
    /// One framed register write, with busy-retry.
    pub(crate) fn write_register(
        &mut self,
        delay: &mut impl DelayNs,
        register: u8,
        value: u8,
    ) -> Result<(), Error> {
        if register > REG_LAST {
            return Err(Error::InvalidRegister);
        }
        match self {
            Self::Uninit => Err(Error::NotBound),
            Self::I2c { port, a0 } => {
                let address = a0.address();
                retry(delay, I2C_ATTEMPT_DELAY_MS, || {
                    port.mem_write(address, register, value)
                })
            }
            Self::Spi { port, ncs } => {
                let frame = [SPI_CMD_WRITE, 0x00, register, value];
                retry(delay, SPI_ATTEMPT_DELAY_MS, || {
                    selected(ncs, || port.transmit(&frame))
                })
            }
        }
    }

    /// One framed register read, with busy-retry.
    pub(crate) fn read_register(
        &mut self,
        delay: &mut impl DelayNs,
        register: u8,
    ) -> Result<u8, Error> {
        if register > REG_LAST {
            return Err(Error::InvalidRegister);
        }
        match self {
            Self::Uninit => Err(Error::NotBound),
            Self::I2c { port, a0 } => {
                let address = a0.address();
                retry(delay, I2C_ATTEMPT_DELAY_MS, || {
                    port.mem_read(address, register)
                })
            }
            Self::Spi { port, ncs } => {
                // The device shifts the register contents out on the fourth
                // byte of the read frame; the pad byte is don't-care.
                let frame = [SPI_CMD_READ, 0x00, register, 0x00];
                retry(delay, SPI_ATTEMPT_DELAY_MS, || {
                    let mut response = [0u8; 4];
                    selected(ncs, || port.transfer(&mut response, &frame))?;
                    Ok(response[3])
                })
            }
        }
    }

    /// Send the bus-activation sequence the codec requires once before any
    /// SPI register traffic. Fails with [`Error::NotBound`] on handles not
    /// bound to SPI.
    pub(crate) fn activate_spi(&mut self, delay: &mut impl DelayNs) -> Result<(), Error> {
        match self {
            Self::Spi { port, ncs } => retry(delay, SPI_ATTEMPT_DELAY_MS, || {
                selected(ncs, || port.transmit(&SPI_ACTIVATE_FRAME))
            }),
            _ => Err(Error::NotBound),
        }
    }
}

/// Run one SPI transaction inside a chip-select low window.
///
/// The line is released even when the transaction fails, so a retry starts
/// from a deselected chip. A chip-select drive failure is a hard fault.
fn selected<NCS: OutputPin>(
    ncs: &mut NCS,
    transaction: impl FnOnce() -> Result<(), BusError>,
) -> Result<(), BusError> {
    ncs.set_low().map_err(|_| BusError::Fault)?;
    let outcome = transaction();
    ncs.set_high().map_err(|_| BusError::Fault)?;
    outcome
}

/// Bounded busy-retry: up to [`MAX_ATTEMPTS`] retries after the first try,
/// backing off `interval_ms` after every busy attempt. Hard faults abort
/// immediately; success short-circuits.
fn retry<T>(
    delay: &mut impl DelayNs,
    interval_ms: u32,
    mut transaction: impl FnMut() -> Result<T, BusError>,
) -> Result<T, Error> {
    for _ in 0..=MAX_ATTEMPTS {
        match transaction() {
            Ok(value) => return Ok(value),
            Err(BusError::Busy) => delay.delay_ms(interval_ms),
            Err(BusError::Fault) => return Err(Error::Communication),
        }
    }
    Err(Error::Busy)
}
