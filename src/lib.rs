//! Platform-agnostic driver for Amphenol NPA-700 / NPA-730 series pressure sensors, built on
//! the [`embedded-hal`] traits.
//!
//! The driver reads pressure alone or together with 8-bit or 11-bit temperature, converts the
//! counts to pascals and degrees celsius according to the configured [`Variant`] and decodes
//! the status bits of every reply. Stale and saturated values are still returned, flagged in
//! [`Reading::advisory`]. EEPROM / command-mode configuration of the sensor is not supported.
//!
//! ## Features
//!
//! - `defmt`: log through the `defmt` framework.
//! - `log`: log through the `log` facade.
//!
//! ## Example
//!
//! ```rust,ignore
//! use npa_700::{Config, I2cTransport, Npa700, Variant};
//!
//! let i2c = /* embedded_hal::i2c::I2c instance */;
//! let delay = /* embedded_hal::delay::DelayNs instance */;
//!
//! let mut sensor = Npa700::new(I2cTransport::new(i2c), delay, Config::new(Variant::Npa001D));
//! let reading = sensor.read_pressure_temp_hires().unwrap();
//! if reading.advisory.is_clear() {
//!     println!("{} Pa", reading.pressure_pa);
//! }
//! ```
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[macro_use]
mod fmt;

mod calibration;
mod command;
mod error;
mod sample;
mod transport;

use embedded_hal::delay::DelayNs;

pub use calibration::{
    is_saturated, Direction, Span, TemperatureResolution, Variant, PRESSURE_FIELD_MAX,
    PRESSURE_MAX_COUNTS, PRESSURE_MIDDLE_COUNTS, PRESSURE_MIN_COUNTS,
};
pub use command::Command;
pub use error::{BusError, DeviceError, Severity, Status};
pub use sample::{Advisory, Reading, StatusBits, Temperature};
pub use transport::{FnTransport, I2cTransport, ReadFn, Transport, WriteFn};

use sample::Frame;

/// Factory default I2C address.
pub const DEFAULT_ADDRESS: u8 = 0x28;

const MAX_ADDRESS: u8 = 0x7F;
const MAX_FRAME_LEN: usize = 4;

/// What a read does when the sensor has no fresh sample yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acquisition {
    /// Return the stale value with [`Advisory::stale`] set.
    #[default]
    NonBlocking,
    /// Keep fetching until a fresh value arrives, failing with
    /// [`DeviceError::Timeout`] once `timeout_us` has been spent waiting.
    Blocking { timeout_us: u32, poll_interval_us: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit bus address.
    pub address: u8,
    /// Sensor range. Reads fail with [`DeviceError::Param`] until one is set.
    pub variant: Option<Variant>,
    pub acquisition: Acquisition,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            variant: None,
            acquisition: Acquisition::NonBlocking,
        }
    }
}

impl Config {
    pub fn new(variant: Variant) -> Self {
        Self::default().with_variant(variant)
    }

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_acquisition(mut self, acquisition: Acquisition) -> Self {
        self.acquisition = acquisition;
        self
    }
}

/// Position of the driver in the measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Idle,
    /// Measurement request is on the bus.
    Triggered,
    /// The sensor is converting; fetches return stale data.
    ConversionPending,
    /// A fresh sample has been fetched and is being handed out.
    Ready,
}

/// Driver for one NPA-700 sensor.
///
/// Every operation is a single attempt with at most one transaction on the bus at a time.
/// Share an instance between execution contexts only behind a mutex.
pub struct Npa700<T, D> {
    transport: T,
    delay: D,
    config: Config,
    state: State,
    last_status: Status,
}

impl<T, D> Npa700<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Create a new driver instance. Nothing is sent to the sensor.
    ///
    /// Pass `&mut transport` to keep ownership of the bus.
    /// The delay is only used in [`Acquisition::Blocking`] mode.
    pub fn new(transport: T, delay: D, config: Config) -> Self {
        Self {
            transport,
            delay,
            config,
            state: State::Idle,
            last_status: Status::Success,
        }
    }

    /// Destroy the driver and hand back the transport and delay.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_variant(&mut self, variant: Variant) {
        self.config.variant = Some(variant);
    }

    pub fn set_acquisition(&mut self, acquisition: Acquisition) {
        self.config.acquisition = acquisition;
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Status of the most recent operation.
    pub fn last_status(&self) -> Status {
        self.last_status
    }

    /// Wake a sleep-mode sensor and start one conversion.
    ///
    /// Reads issued before the conversion finishes return stale data. Parts without a sleep
    /// mode convert continuously and do not need this.
    pub fn trigger_sample(&mut self) -> Result<(), DeviceError<T::Error>> {
        match self.request_measurement() {
            Ok(()) => {
                self.last_status = Status::Success;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Read pressure only. Shortest transaction.
    pub fn read_pressure(&mut self) -> Result<Reading, DeviceError<T::Error>> {
        self.read(Command::ReadDF2)
    }

    /// Read pressure and 11-bit temperature.
    pub fn read_pressure_temp_hires(&mut self) -> Result<Reading, DeviceError<T::Error>> {
        self.read(Command::ReadDF4)
    }

    /// Read pressure and 8-bit temperature. One byte shorter on the bus than
    /// [`Npa700::read_pressure_temp_hires`].
    pub fn read_pressure_temp_lowres(&mut self) -> Result<Reading, DeviceError<T::Error>> {
        self.read(Command::ReadDF3)
    }

    fn read(&mut self, command: Command) -> Result<Reading, DeviceError<T::Error>> {
        match self.acquire(command) {
            Ok(reading) => {
                if !reading.advisory.stale {
                    self.set_state(State::Idle);
                }
                self.last_status = reading.status();
                if !reading.advisory.is_clear() {
                    warn!("reading flagged, status {}", self.last_status.code());
                }
                Ok(reading)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn request_measurement(&mut self) -> Result<(), DeviceError<T::Error>> {
        self.check_link()?;
        self.set_state(State::Triggered);
        trace!("Read_MR to {}", self.config.address);
        self.transport.read(self.config.address, &mut [])?;
        self.set_state(State::ConversionPending);
        Ok(())
    }

    fn acquire(&mut self, command: Command) -> Result<Reading, DeviceError<T::Error>> {
        self.check_link()?;
        let variant = self.config.variant.ok_or(DeviceError::Param)?;
        let mut waited_us: u32 = 0;

        loop {
            let reading = self.fetch(command, variant)?;
            if !reading.advisory.stale {
                return Ok(reading);
            }
            match self.config.acquisition {
                Acquisition::NonBlocking => return Ok(reading),
                Acquisition::Blocking {
                    timeout_us,
                    poll_interval_us,
                } => {
                    if waited_us >= timeout_us {
                        return Err(DeviceError::Timeout);
                    }
                    // Never sleep past the timeout.
                    let step = poll_interval_us.max(1).min(timeout_us - waited_us);
                    self.delay.delay_us(step);
                    waited_us += step;
                }
            }
        }
    }

    fn fetch(
        &mut self,
        command: Command,
        variant: Variant,
    ) -> Result<Reading, DeviceError<T::Error>> {
        // A transport that returns without filling the buffer leaves the diagnostic bits set.
        let mut buffer = [0xFF; MAX_FRAME_LEN];
        let frame = &mut buffer[..command.frame_len()];
        trace!("{:?} from {}", command, self.config.address);
        self.transport.read(self.config.address, frame)?;

        let reading = Frame::parse(frame, command).decode::<T::Error>(variant)?;
        if reading.advisory.stale {
            self.set_state(State::ConversionPending);
        } else {
            self.set_state(State::Ready);
        }
        Ok(reading)
    }

    fn check_link(&self) -> Result<(), DeviceError<T::Error>> {
        if !self.transport.is_ready() {
            return Err(DeviceError::Null);
        }
        if self.config.address > MAX_ADDRESS {
            return Err(DeviceError::Param);
        }
        Ok(())
    }

    fn fail(&mut self, error: DeviceError<T::Error>) -> DeviceError<T::Error> {
        self.last_status = error.status();
        self.set_state(State::Idle);
        error!("transaction failed, status {}", self.last_status.code());
        error
    }

    fn set_state(&mut self, state: State) {
        if self.state != state {
            debug!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}
