//! Reservation domain entity

use chrono::{DateTime, Utc};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Reservation is live and may be consumed
    Accepted,
    /// Reservation was consumed by a transaction
    Used,
    /// Reservation cancelled by user or system
    Cancelled,
    /// Reservation expired (past expiry_date)
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Used => "Used",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Accepted" => Some(Self::Accepted),
            "Used" => Some(Self::Used),
            "Cancelled" => Some(Self::Cancelled),
            "Expired" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Accepted)
    }

    /// Forward-only transition table: only `Accepted` may move, and only
    /// into one of the terminal states.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Accepted, Self::Used)
                | (Self::Accepted, Self::Cancelled)
                | (Self::Accepted, Self::Expired)
        )
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connector reservation
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    /// Store-assigned reservation ID
    pub id: i32,
    pub charge_point_id: String,
    /// Connector ID (0 = any connector)
    pub connector_id: u32,
    /// ID tag the reservation is held for
    pub id_tag: String,
    pub expiry_date: DateTime<Utc>,
    pub status: ReservationStatus,
    /// Transaction that consumed the reservation; set together with `Used`
    pub transaction_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Accepted
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Expired || self.expiry_date < now
    }

    /// Whether a start on this charge point, connector and tag may
    /// consume the reservation. Connector 0 matches any connector.
    pub fn matches(&self, charge_point_id: &str, connector_id: u32, id_tag: &str) -> bool {
        self.charge_point_id == charge_point_id
            && (self.connector_id == 0 || self.connector_id == connector_id)
            && self.id_tag == id_tag
    }
}

/// Reservation data before the store assigns its id
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub charge_point_id: String,
    pub connector_id: u32,
    pub id_tag: String,
    pub expiry_date: DateTime<Utc>,
}

impl NewReservation {
    pub fn into_reservation(self, id: i32, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            charge_point_id: self.charge_point_id,
            connector_id: self.connector_id,
            id_tag: self.id_tag,
            expiry_date: self.expiry_date,
            status: ReservationStatus::Accepted,
            transaction_id: None,
            created_at,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
