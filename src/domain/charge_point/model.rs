//! Charge Point domain entity

use chrono::{DateTime, Utc};

use super::super::ocpp::OcppVersion;

/// A registered charge point.
///
/// Existence of the record is what makes a charge box id "known"; rows are
/// created by out-of-band registration, never by protocol traffic.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargePoint {
    /// Charge box identity as presented by the transport
    pub id: String,
    /// Protocol reported at the most recent boot
    pub ocpp_protocol: Option<OcppVersion>,
    pub registered_at: DateTime<Utc>,
    pub last_heartbeat_at: Option<DateTime<Utc>>,
}

impl ChargePoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ocpp_protocol: None,
            registered_at: Utc::now(),
            last_heartbeat_at: None,
        }
    }
}

/// Outcome of a BootNotification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    Accepted,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_charge_point_has_no_boot_data() {
        let cp = ChargePoint::new("CP001");
        assert_eq!(cp.id, "CP001");
        assert!(cp.ocpp_protocol.is_none());
        assert!(cp.last_heartbeat_at.is_none());
    }
}
