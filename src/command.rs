use crate::calibration::TemperatureResolution;

/// Bus transactions understood by the sensor in normal operating mode.
///
/// All of them are plain reads from the sensor address; the command is encoded in the
/// number of bytes clocked out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Measurement request: wakes a sleep-mode part and starts a conversion.
    ReadMR,
    /// Data fetch, pressure only.
    ReadDF2,
    /// Data fetch, pressure and 8-bit temperature.
    ReadDF3,
    /// Data fetch, pressure and 11-bit temperature.
    ReadDF4,
}

impl Command {
    pub fn frame_len(&self) -> usize {
        match *self {
            Command::ReadMR => 0,
            Command::ReadDF2 => 2,
            Command::ReadDF3 => 3,
            Command::ReadDF4 => 4,
        }
    }

    pub fn temperature(&self) -> Option<TemperatureResolution> {
        match *self {
            Command::ReadMR | Command::ReadDF2 => None,
            Command::ReadDF3 => Some(TemperatureResolution::Low),
            Command::ReadDF4 => Some(TemperatureResolution::High),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_command_len() {
        assert_eq!(Command::ReadMR.frame_len(), 0);
        assert_eq!(Command::ReadDF2.frame_len(), 2);
        assert_eq!(Command::ReadDF3.frame_len(), 3);
        assert_eq!(Command::ReadDF4.frame_len(), 4);
    }

    #[test]
    fn check_command_temperature() {
        assert_eq!(Command::ReadDF2.temperature(), None);
        assert_eq!(Command::ReadDF3.temperature(), Some(TemperatureResolution::Low));
        assert_eq!(Command::ReadDF4.temperature(), Some(TemperatureResolution::High));
    }
}
