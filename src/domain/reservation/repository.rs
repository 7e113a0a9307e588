//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewReservation, Reservation, ReservationStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a new `Accepted` reservation and return it with its id
    async fn insert(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Conditionally move a reservation out of `Accepted`.
    ///
    /// The update only applies while the stored status is still `Accepted`;
    /// returns whether this call performed it. `transaction_id` is written
    /// together with the new status when given.
    async fn transition(
        &self,
        id: i32,
        to: ReservationStatus,
        transaction_id: Option<i32>,
    ) -> DomainResult<bool>;

    /// Accepted reservations whose expiry date is before `now`
    async fn find_expired(&self, now: DateTime<Utc>) -> DomainResult<Vec<Reservation>>;

    /// Accepted reservations for a charge point
    async fn find_active_for_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<Reservation>>;

    /// All reservations (any status)
    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;
}
