//! Raw frame decoding and the reading types handed back to callers.

use crate::calibration::{is_saturated, TemperatureResolution, Variant, PRESSURE_FIELD_MAX};
use crate::command::Command;
use crate::error::{DeviceError, Status};

/// Two status bits at the top of the first byte of every data fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusBits {
    /// 0b00: valid data
    Normal,
    /// 0b01: device in command mode
    Command,
    /// 0b10: data already fetched since the last measurement
    Stale,
    /// 0b11: diagnostic condition
    Diagnostic,
}

impl StatusBits {
    pub fn from_byte(byte: u8) -> StatusBits {
        match byte >> 6 {
            0 => StatusBits::Normal,
            1 => StatusBits::Command,
            2 => StatusBits::Stale,
            _ => StatusBits::Diagnostic,
        }
    }
}

/// Warnings attached to an otherwise valid reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Advisory {
    /// The value was already read and has not been updated since.
    pub stale: bool,
    /// The pressure output is outside the calibrated window.
    pub saturated: bool,
}

impl Advisory {
    pub fn is_clear(&self) -> bool {
        !self.stale && !self.saturated
    }

    /// Single status for the reading. Staleness is reported ahead of saturation.
    pub fn status(&self) -> Status {
        if self.stale {
            Status::WarnOld
        } else if self.saturated {
            Status::WarnSat
        } else {
            Status::Success
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Temperature {
    pub celsius: f32,
    pub counts: u16,
    pub resolution: TemperatureResolution,
}

impl Temperature {
    /// Number of significant bits carried by `counts`.
    pub fn significant_bits(&self) -> u8 {
        self.resolution.bits()
    }
}

/// A converted measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub pressure_pa: f32,
    pub pressure_counts: u16,
    /// Present for the pressure + temperature fetches only.
    pub temperature: Option<Temperature>,
    pub advisory: Advisory,
}

impl Reading {
    pub fn status(&self) -> Status {
        self.advisory.status()
    }
}

/// Fields of one data fetch, before unit conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Frame {
    pub status: StatusBits,
    pub pressure_counts: u16,
    pub temperature_counts: Option<(u16, TemperatureResolution)>,
}

impl Frame {
    /// Layout: `S1 S0 P13..P8 | P7..P0 | T10..T3 | T2 T1 T0 x x x x x`.
    ///
    /// Missing bytes read as 0xFF, which decodes as a diagnostic condition.
    pub fn parse(buffer: &[u8], command: Command) -> Frame {
        let byte = |i: usize| buffer.get(i).copied().unwrap_or(0xFF);
        let status = StatusBits::from_byte(byte(0));
        let pressure_counts = (u16::from(byte(0)) << 8 | u16::from(byte(1))) & PRESSURE_FIELD_MAX;
        let temperature_counts = command.temperature().map(|resolution| {
            let counts = match resolution {
                TemperatureResolution::Low => u16::from(byte(2)),
                TemperatureResolution::High => u16::from(byte(2)) << 3 | u16::from(byte(3) >> 5),
            };
            (counts, resolution)
        });

        Frame {
            status,
            pressure_counts,
            temperature_counts,
        }
    }

    /// Applies the status policy: stale data is still a reading, command mode and diagnostic
    /// conditions are failures.
    pub fn decode<E>(&self, variant: Variant) -> Result<Reading, DeviceError<E>> {
        let stale = match self.status {
            StatusBits::Normal => false,
            StatusBits::Stale => true,
            StatusBits::Command => return Err(DeviceError::Mode),
            StatusBits::Diagnostic => return Err(DeviceError::Internal),
        };

        let temperature = self.temperature_counts.map(|(counts, resolution)| Temperature {
            celsius: resolution.celsius_from_counts(counts),
            counts,
            resolution,
        });

        Ok(Reading {
            pressure_pa: variant.pressure_from_counts(self.pressure_counts),
            pressure_counts: self.pressure_counts,
            temperature,
            advisory: Advisory {
                stale,
                saturated: is_saturated(self.pressure_counts),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{PRESSURE_MAX_COUNTS, PRESSURE_MIDDLE_COUNTS};

    #[test]
    fn check_parse_status_bits() {
        assert_eq!(StatusBits::from_byte(0x3F), StatusBits::Normal);
        assert_eq!(StatusBits::from_byte(0x40), StatusBits::Command);
        assert_eq!(StatusBits::from_byte(0x80), StatusBits::Stale);
        assert_eq!(StatusBits::from_byte(0xC0), StatusBits::Diagnostic);
    }

    #[test]
    fn check_parse_pressure_masks_status() {
        let frame = Frame::parse(&[0xA0, 0x00], Command::ReadDF2);
        assert_eq!(frame.status, StatusBits::Stale);
        assert_eq!(frame.pressure_counts, PRESSURE_MIDDLE_COUNTS);
        assert_eq!(frame.temperature_counts, None);
    }

    #[test]
    fn check_parse_temperature_fields() {
        let buffer = [0x20, 0x00, 0xAB, 0xE0];
        let high = Frame::parse(&buffer, Command::ReadDF4);
        assert_eq!(high.temperature_counts, Some((0x55F, TemperatureResolution::High)));

        let low = Frame::parse(&buffer[..3], Command::ReadDF3);
        assert_eq!(low.temperature_counts, Some((0xAB, TemperatureResolution::Low)));
    }

    #[test]
    fn check_short_buffer_reads_as_diagnostic() {
        let frame = Frame::parse(&[], Command::ReadDF2);
        assert_eq!(frame.status, StatusBits::Diagnostic);
        assert_eq!(
            frame.decode::<()>(Variant::Npa001D),
            Err(DeviceError::Internal)
        );
    }

    #[test]
    fn check_decode_rejects_command_mode() {
        let frame = Frame::parse(&[0x60, 0x00], Command::ReadDF2);
        assert_eq!(frame.decode::<()>(Variant::Npa001D), Err(DeviceError::Mode));
    }

    #[test]
    fn check_decode_flags_saturation_and_staleness() {
        let counts = PRESSURE_MAX_COUNTS + 10;
        let buffer = [0x80 | (counts >> 8) as u8, counts as u8];
        let reading = Frame::parse(&buffer, Command::ReadDF2)
            .decode::<()>(Variant::Npa005D)
            .unwrap();
        assert!(reading.advisory.stale);
        assert!(reading.advisory.saturated);
        assert_eq!(reading.status(), Status::WarnOld);
        assert!(reading.pressure_pa > 34470.0);
    }

    #[test]
    fn check_advisory_status() {
        assert_eq!(Advisory::default().status(), Status::Success);
        assert!(Advisory::default().is_clear());
        let saturated = Advisory {
            stale: false,
            saturated: true,
        };
        assert_eq!(saturated.status(), Status::WarnSat);
    }
}
