//! Transaction domain entity

use chrono::{DateTime, Duration, Utc};

/// Stop half of a transaction, filled exactly once
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionStop {
    pub timestamp: DateTime<Utc>,
    /// Meter value at stop (Wh)
    pub meter_value: i32,
    pub reason: Option<String>,
    /// Tag presented at stop, which may differ from the starting tag
    pub id_tag: Option<String>,
}

/// Charging transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Store-assigned id, echoed by the charge point in later messages
    pub id: i32,
    pub charge_point_id: String,
    pub connector_id: u32,
    /// ID tag that started the transaction
    pub id_tag: String,
    pub start_timestamp: DateTime<Utc>,
    /// Meter value at start (Wh)
    pub meter_start: i32,
    /// Reservation consumed by this transaction, if any
    pub reservation_id: Option<i32>,
    pub stop: Option<TransactionStop>,
}

impl Transaction {
    pub fn is_open(&self) -> bool {
        self.stop.is_none()
    }

    /// Open, or closed no longer than `grace` before `now`
    pub fn accepts_readings(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        match &self.stop {
            None => true,
            Some(stop) => now - stop.timestamp <= grace,
        }
    }

    /// Energy consumed in Wh, once stopped
    pub fn energy_consumed(&self) -> Option<i32> {
        self.stop
            .as_ref()
            .map(|stop| stop.meter_value - self.meter_start)
    }
}

/// Start data for a transaction before the store assigns its id
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub charge_point_id: String,
    pub connector_id: u32,
    pub id_tag: String,
    pub start_timestamp: DateTime<Utc>,
    pub meter_start: i32,
}

impl NewTransaction {
    pub fn into_transaction(self, id: i32) -> Transaction {
        Transaction {
            id,
            charge_point_id: self.charge_point_id,
            connector_id: self.connector_id,
            id_tag: self.id_tag,
            start_timestamp: self.start_timestamp,
            meter_start: self.meter_start,
            reservation_id: None,
            stop: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        NewTransaction {
            charge_point_id: "CP001".into(),
            connector_id: 1,
            id_tag: "TAG-001".into(),
            start_timestamp: Utc::now(),
            meter_start: 1_000,
        }
        .into_transaction(42)
    }

    #[test]
    fn new_transaction_is_open() {
        let tx = sample();
        assert_eq!(tx.id, 42);
        assert!(tx.is_open());
        assert!(tx.reservation_id.is_none());
        assert!(tx.energy_consumed().is_none());
    }

    #[test]
    fn stopped_transaction_reports_energy() {
        let mut tx = sample();
        tx.stop = Some(TransactionStop {
            timestamp: Utc::now(),
            meter_value: 3_500,
            reason: Some("Local".into()),
            id_tag: None,
        });
        assert!(!tx.is_open());
        assert_eq!(tx.energy_consumed(), Some(2_500));
    }

    #[test]
    fn late_readings_accepted_within_grace() {
        let now = Utc::now();
        let mut tx = sample();
        assert!(tx.accepts_readings(now, Duration::zero()));

        tx.stop = Some(TransactionStop {
            timestamp: now - Duration::seconds(30),
            meter_value: 1_200,
            reason: None,
            id_tag: None,
        });
        assert!(tx.accepts_readings(now, Duration::seconds(60)));
        assert!(!tx.accepts_readings(now, Duration::seconds(10)));
    }
}
