//! Bus port traits and embedded-hal adapters.
//!
//! The codec speaks two control transports. Rather than binding the
//! transport layer directly to `embedded-hal` bus traits, it consumes two
//! small port traits exposing exactly the primitives it needs, each with a
//! tri-state outcome: success, transient busy, hard fault. Busy is the only
//! condition the transport layer retries, so a port implementation decides
//! which of its failures are worth a second attempt.

use embedded_hal::i2c::{Error as _, ErrorKind as I2cErrorKind, I2c};
use embedded_hal::spi::SpiBus;

/// Failed transaction outcome reported by a bus port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The bus unit is momentarily occupied; the transaction may be retried.
    Busy,
    /// The bus unit failed; retrying is pointless.
    Fault,
}

/// Blocking SPI primitives consumed by the transport layer.
///
/// Chip-select is not part of the port; the transport layer gates it
/// separately around every transaction.
pub trait SpiPort {
    /// Transmit `frame`, discarding whatever the device shifts back.
    fn transmit(&mut self, frame: &[u8]) -> Result<(), BusError>;

    /// Transmit `write` while capturing the same number of bytes into
    /// `read` (full duplex).
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), BusError>;
}

/// Blocking single-byte memory-mapped I2C primitives consumed by the
/// transport layer.
pub trait I2cPort {
    /// Write one byte to `register` of the device at the 7-bit `address`.
    fn mem_write(&mut self, address: u8, register: u8, value: u8) -> Result<(), BusError>;

    /// Read one byte from `register` of the device at the 7-bit `address`.
    fn mem_read(&mut self, address: u8, register: u8) -> Result<u8, BusError>;
}

impl<T: SpiPort + ?Sized> SpiPort for &mut T {
    fn transmit(&mut self, frame: &[u8]) -> Result<(), BusError> {
        T::transmit(self, frame)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), BusError> {
        T::transfer(self, read, write)
    }
}

impl<T: I2cPort + ?Sized> I2cPort for &mut T {
    fn mem_write(&mut self, address: u8, register: u8, value: u8) -> Result<(), BusError> {
        T::mem_write(self, address, register, value)
    }

    fn mem_read(&mut self, address: u8, register: u8) -> Result<u8, BusError> {
        T::mem_read(self, address, register)
    }
}

/// Any `embedded-hal` SPI bus as a [`SpiPort`].
///
/// A blocking [`SpiBus`] either completes or fails; there is no transient
/// busy condition to surface, so every error maps to [`BusError::Fault`].
/// The adapter flushes after each call because the transport layer raises
/// chip-select itself and the bus may buffer words.
pub struct HalSpi<T>(pub T);

impl<T: SpiBus> SpiPort for HalSpi<T> {
    fn transmit(&mut self, frame: &[u8]) -> Result<(), BusError> {
        self.0.write(frame).map_err(|_| BusError::Fault)?;
        self.0.flush().map_err(|_| BusError::Fault)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), BusError> {
        self.0.transfer(read, write).map_err(|_| BusError::Fault)?;
        self.0.flush().map_err(|_| BusError::Fault)
    }
}

/// Any `embedded-hal` I2C bus as an [`I2cPort`].
///
/// Lost arbitration and general bus contention are transient on a shared
/// I2C bus and map to [`BusError::Busy`]; every other error kind is a
/// [`BusError::Fault`].
pub struct HalI2c<T>(pub T);

impl<T: I2c> I2cPort for HalI2c<T> {
    fn mem_write(&mut self, address: u8, register: u8, value: u8) -> Result<(), BusError> {
        self.0.write(address, &[register, value]).map_err(classify)
    }

    fn mem_read(&mut self, address: u8, register: u8) -> Result<u8, BusError> {
        let mut value = [0u8; 1];
        self.0
            .write_read(address, &[register], &mut value)
            .map_err(classify)?;
        Ok(value[0])
    }
}

fn classify<E: embedded_hal::i2c::Error>(err: E) -> BusError {
    match err.kind() {
        I2cErrorKind::ArbitrationLoss | I2cErrorKind::Bus => BusError::Busy,
        _ => BusError::Fault,
    }
}
