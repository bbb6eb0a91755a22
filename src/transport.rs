//! Access to the physical link.
//!
//! The driver never talks to a bus directly. It goes through [`Transport`], which can be
//! backed by an [`embedded_hal::i2c::I2c`] implementation ([`I2cTransport`]) or by a pair of
//! plain functions ([`FnTransport`]).

use embedded_hal::i2c::{ErrorKind, I2c};

use crate::error::BusError;

/// Read and write capability for one sensor link.
pub trait Transport {
    type Error;

    /// Reads `buffer.len()` bytes from the device at `address`.
    ///
    /// Zero-length reads must be supported, they trigger a measurement.
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError<Self::Error>>;

    /// Writes `data` to the device at `address`.
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError<Self::Error>>;

    /// Whether both directions are available.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError<Self::Error>> {
        T::read(self, address, buffer)
    }

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError<Self::Error>> {
        T::write(self, address, data)
    }

    fn is_ready(&self) -> bool {
        T::is_ready(self)
    }
}

/// [`Transport`] over a blocking embedded-hal I2C bus.
///
/// A NACK maps to [`BusError::Nack`], every other bus error to [`BusError::Other`].
/// embedded-hal has no timeout error kind, so this adapter never reports
/// [`BusError::Timeout`]. Implement [`Transport`] directly, or use [`FnTransport`], for a bus
/// whose timeouts should surface as [`DeviceError::Timeout`](crate::DeviceError::Timeout).
pub struct I2cTransport<I2C> {
    i2c: I2C,
}

impl<I2C> I2cTransport<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

fn bus_error<E: embedded_hal::i2c::Error>(error: E) -> BusError<E> {
    match error.kind() {
        ErrorKind::NoAcknowledge(_) => BusError::Nack,
        _ => BusError::Other(error),
    }
}

impl<I2C> Transport for I2cTransport<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError<Self::Error>> {
        self.i2c.read(address, buffer).map_err(bus_error)
    }

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError<Self::Error>> {
        self.i2c.write(address, data).map_err(bus_error)
    }
}

/// Platform read function: fills `data` from the device at `address`.
pub type ReadFn = fn(address: u8, data: &mut [u8]) -> Result<(), BusError<()>>;
/// Platform write function: sends `data` to the device at `address`.
pub type WriteFn = fn(address: u8, data: &[u8]) -> Result<(), BusError<()>>;

/// [`Transport`] built from two platform functions. Either may be left out, in which case
/// the driver refuses to run any transaction.
///
/// The functions must not block indefinitely; timeouts are theirs to enforce.
#[derive(Clone, Copy, Debug, Default)]
pub struct FnTransport {
    pub read: Option<ReadFn>,
    pub write: Option<WriteFn>,
}

impl FnTransport {
    pub fn new(read: ReadFn, write: WriteFn) -> Self {
        Self {
            read: Some(read),
            write: Some(write),
        }
    }
}

impl Transport for FnTransport {
    type Error = ();

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError<()>> {
        match self.read {
            Some(read) => read(address, buffer),
            None => Err(BusError::Missing),
        }
    }

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError<()>> {
        match self.write {
            Some(write) => write(address, data),
            None => Err(BusError::Missing),
        }
    }

    fn is_ready(&self) -> bool {
        self.read.is_some() && self.write.is_some()
    }
}
