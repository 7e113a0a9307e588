//! Connector status domain types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Connector status as reported by StatusNotification (OCPP 1.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorStatus {
    Available,
    Preparing,
    Charging,
    SuspendedEV,
    SuspendedEVSE,
    Finishing,
    Reserved,
    Unavailable,
    Faulted,
}

impl ConnectorStatus {
    pub const ALL: [ConnectorStatus; 9] = [
        Self::Available,
        Self::Preparing,
        Self::Charging,
        Self::SuspendedEV,
        Self::SuspendedEVSE,
        Self::Finishing,
        Self::Reserved,
        Self::Unavailable,
        Self::Faulted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Preparing => "Preparing",
            Self::Charging => "Charging",
            Self::SuspendedEV => "SuspendedEV",
            Self::SuspendedEVSE => "SuspendedEVSE",
            Self::Finishing => "Finishing",
            Self::Reserved => "Reserved",
            Self::Unavailable => "Unavailable",
            Self::Faulted => "Faulted",
        }
    }
}

impl fmt::Display for ConnectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown connector status: {s}"))
    }
}

/// ChargePointErrorCode (OCPP 1.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargePointErrorCode {
    ConnectorLockFailure,
    EvCommunicationError,
    GroundFailure,
    HighTemperature,
    InternalError,
    LocalListConflict,
    NoError,
    OtherError,
    OverCurrentFailure,
    OverVoltage,
    PowerMeterFailure,
    PowerSwitchFailure,
    ReaderFailure,
    ResetFailure,
    UnderVoltage,
    WeakSignal,
}

impl ChargePointErrorCode {
    pub const ALL: [ChargePointErrorCode; 16] = [
        Self::ConnectorLockFailure,
        Self::EvCommunicationError,
        Self::GroundFailure,
        Self::HighTemperature,
        Self::InternalError,
        Self::LocalListConflict,
        Self::NoError,
        Self::OtherError,
        Self::OverCurrentFailure,
        Self::OverVoltage,
        Self::PowerMeterFailure,
        Self::PowerSwitchFailure,
        Self::ReaderFailure,
        Self::ResetFailure,
        Self::UnderVoltage,
        Self::WeakSignal,
    ];

    /// Wire spelling, e.g. `EVCommunicationError`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectorLockFailure => "ConnectorLockFailure",
            Self::EvCommunicationError => "EVCommunicationError",
            Self::GroundFailure => "GroundFailure",
            Self::HighTemperature => "HighTemperature",
            Self::InternalError => "InternalError",
            Self::LocalListConflict => "LocalListConflict",
            Self::NoError => "NoError",
            Self::OtherError => "OtherError",
            Self::OverCurrentFailure => "OverCurrentFailure",
            Self::OverVoltage => "OverVoltage",
            Self::PowerMeterFailure => "PowerMeterFailure",
            Self::PowerSwitchFailure => "PowerSwitchFailure",
            Self::ReaderFailure => "ReaderFailure",
            Self::ResetFailure => "ResetFailure",
            Self::UnderVoltage => "UnderVoltage",
            Self::WeakSignal => "WeakSignal",
        }
    }
}

impl fmt::Display for ChargePointErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChargePointErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| format!("unknown error code: {s}"))
    }
}

/// Current status projection of one connector.
///
/// Connector 0 is the charge point controller and is tracked the same way
/// as physical connectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorStatusRecord {
    pub charge_point_id: String,
    pub connector_id: u32,
    pub status: ConnectorStatus,
    pub error_code: ChargePointErrorCode,
    pub info: Option<String>,
    /// Timestamp reported by the charge point, or receipt time if absent
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_roundtrip() {
        for status in ConnectorStatus::ALL {
            assert_eq!(status.as_str().parse::<ConnectorStatus>().unwrap(), status);
        }
        assert!("Occupied".parse::<ConnectorStatus>().is_err());
    }

    #[test]
    fn error_code_uses_wire_spelling() {
        assert_eq!(
            "EVCommunicationError".parse::<ChargePointErrorCode>().unwrap(),
            ChargePointErrorCode::EvCommunicationError
        );
        assert_eq!(ChargePointErrorCode::HighTemperature.to_string(), "HighTemperature");
        for code in ChargePointErrorCode::ALL {
            assert_eq!(code.as_str().parse::<ChargePointErrorCode>().unwrap(), code);
        }
    }
}
