/// Failure reported by a [`Transport`](crate::Transport).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<E> {
    /// The sensor did not acknowledge.
    Nack,
    /// The bus did not complete the transfer in time.
    Timeout,
    /// The transport has no implementation for the requested direction.
    Missing,
    /// Any other bus fault.
    Other(E),
}

/// Errors returned by the driver. A failed call never yields a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError<E> {
    /// Bus negative-acknowledge. Transient.
    Nack,
    /// Bus timeout, or no fresh sample within the blocking timeout. Transient.
    Timeout,
    /// A transport capability is missing.
    Null,
    /// Transport fault.
    Transport(E),
    /// Driver is misconfigured: no variant, or an address outside the 7-bit range.
    Param,
    /// Sensor reports command mode, which this driver does not support.
    Mode,
    /// Sensor reports a diagnostic fault.
    Internal,
}

impl<E> DeviceError<E> {
    pub fn status(&self) -> Status {
        match *self {
            DeviceError::Nack => Status::ErrNack,
            DeviceError::Timeout => Status::ErrTout,
            DeviceError::Null => Status::ErrNull,
            DeviceError::Transport(_) => Status::ErrImpl,
            DeviceError::Param => Status::ErrParam,
            DeviceError::Mode => Status::ErrMode,
            DeviceError::Internal => Status::ErrInternal,
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DeviceError::Nack | DeviceError::Timeout)
    }
}

impl<E> From<BusError<E>> for DeviceError<E> {
    fn from(error: BusError<E>) -> Self {
        match error {
            BusError::Nack => DeviceError::Nack,
            BusError::Timeout => DeviceError::Timeout,
            BusError::Missing => DeviceError::Null,
            BusError::Other(e) => DeviceError::Transport(e),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Outcome of a transaction as a flat code.
///
/// Codes with the most significant bit set are fatal, the others are warnings.
///
/// Value | Meaning
/// ------|---------------------------------------
/// 0     | Success
/// 1     | Warning: value is saturated
/// 2     | Warning: value was already read
/// 128   | Error: internal error in sensor
/// 129   | Error: bus did not acknowledge
/// 130   | Error: bus timed out
/// 132   | Error: transport capability missing
/// 136   | Error: transport fault
/// 144   | Error: invalid parameter
/// 160   | Error: sensor is in command mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Success,
    WarnSat,
    WarnOld,
    ErrInternal,
    ErrNack,
    ErrTout,
    ErrNull,
    ErrImpl,
    ErrParam,
    ErrMode,
}

const FATAL: u8 = 0x80;

impl Status {
    pub fn code(&self) -> u8 {
        match *self {
            Status::Success => 0,
            Status::WarnSat => 1,
            Status::WarnOld => 2,
            Status::ErrInternal => FATAL,
            Status::ErrNack => FATAL + 1,
            Status::ErrTout => FATAL + 2,
            Status::ErrNull => FATAL + 4,
            Status::ErrImpl => FATAL + 8,
            Status::ErrParam => FATAL + 16,
            Status::ErrMode => FATAL + 32,
        }
    }

    pub fn from_code(code: u8) -> Option<Status> {
        match code {
            0 => Some(Status::Success),
            1 => Some(Status::WarnSat),
            2 => Some(Status::WarnOld),
            0x80 => Some(Status::ErrInternal),
            0x81 => Some(Status::ErrNack),
            0x82 => Some(Status::ErrTout),
            0x84 => Some(Status::ErrNull),
            0x88 => Some(Status::ErrImpl),
            0x90 => Some(Status::ErrParam),
            0xA0 => Some(Status::ErrMode),
            _ => None,
        }
    }

    pub fn severity(&self) -> Severity {
        match *self {
            Status::Success => Severity::Success,
            Status::WarnSat | Status::WarnOld => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.code() & FATAL != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Status; 10] = [
        Status::Success,
        Status::WarnSat,
        Status::WarnOld,
        Status::ErrInternal,
        Status::ErrNack,
        Status::ErrTout,
        Status::ErrNull,
        Status::ErrImpl,
        Status::ErrParam,
        Status::ErrMode,
    ];

    #[test]
    fn check_codes_are_unique() {
        for status in ALL {
            assert_eq!(Status::from_code(status.code()), Some(status));
        }
        assert_eq!(Status::from_code(3), None);
        assert_eq!(Status::from_code(0xFF), None);
    }

    #[test]
    fn check_fatal_bit_matches_severity() {
        for status in ALL {
            assert_eq!(status.is_fatal(), status.severity() == Severity::Error);
        }
    }

    #[test]
    fn check_severity_order() {
        assert!(Severity::Success < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Status::WarnOld.severity() < Status::ErrNack.severity());
    }

    #[test]
    fn check_bus_error_conversion() {
        assert_eq!(DeviceError::from(BusError::<()>::Nack), DeviceError::Nack);
        assert_eq!(DeviceError::from(BusError::<()>::Timeout), DeviceError::Timeout);
        assert_eq!(DeviceError::from(BusError::<()>::Missing), DeviceError::Null);
        assert_eq!(DeviceError::from(BusError::Other(7u8)), DeviceError::Transport(7u8));
        assert_eq!(DeviceError::Transport(7u8).status(), Status::ErrImpl);
    }

    #[test]
    fn check_transient_errors() {
        assert!(DeviceError::<()>::Nack.is_transient());
        assert!(DeviceError::<()>::Timeout.is_transient());
        assert!(!DeviceError::<()>::Param.is_transient());
        assert!(!DeviceError::<()>::Null.is_transient());
    }
}
