//! OCPP protocol version
//!
//! The version a charge point speaks is negotiated by the transport and
//! recorded on the charge point at boot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// OCPP protocol versions the transport may normalize into 1.6 messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OcppVersion {
    V12,
    V15,
    V16,
}

impl OcppVersion {
    /// Identifier stored against the charge point, e.g. `ocpp1.6`.
    ///
    /// Doubles as the WebSocket subprotocol name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V12 => "ocpp1.2",
            Self::V15 => "ocpp1.5",
            Self::V16 => "ocpp1.6",
        }
    }

    pub fn version_string(&self) -> &'static str {
        match self {
            Self::V12 => "1.2",
            Self::V15 => "1.5",
            Self::V16 => "1.6",
        }
    }
}

impl fmt::Display for OcppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OCPP {}", self.version_string())
    }
}

impl FromStr for OcppVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ocpp1.2" => Ok(Self::V12),
            "ocpp1.5" => Ok(Self::V15),
            "ocpp1.6" => Ok(Self::V16),
            other => Err(format!("unsupported OCPP protocol: {other}")),
        }
    }
}
