//! Reservation management: create, cancel, expire, and claim at start

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::locks::KeyedLocks;
use crate::domain::{
    DomainError, DomainResult, NewReservation, RepositoryProvider, Reservation,
    ReservationStatus, Transaction, UnitOfWork,
};

/// What happened to the reservation referenced by a StartTransaction
#[derive(Debug, Clone, PartialEq)]
pub enum ReservationClaim {
    /// Moved to `Used` and linked to the new transaction
    Linked(i32),
    NotFound,
    /// Already `Used`, `Cancelled` or `Expired`
    NotAccepted(ReservationStatus),
    Expired,
    /// Charge point, connector or tag differ from the reservation
    Mismatch,
    /// Another start consumed it first
    LostRace,
}

impl ReservationClaim {
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked(_))
    }
}

pub struct ReservationManager {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<KeyedLocks>,
}

impl ReservationManager {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<KeyedLocks>) -> Self {
        Self { repos, locks }
    }

    pub async fn reserve(
        &self,
        charge_point_id: &str,
        connector_id: u32,
        id_tag: &str,
        expiry_date: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        if self
            .repos
            .charge_points()
            .find_by_id(charge_point_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("ChargePoint", "id", charge_point_id));
        }
        if expiry_date <= Utc::now() {
            return Err(DomainError::Validation(format!(
                "reservation expiry {} is in the past",
                expiry_date
            )));
        }

        let reservation = self
            .repos
            .reservations()
            .insert(NewReservation {
                charge_point_id: charge_point_id.to_string(),
                connector_id,
                id_tag: id_tag.to_string(),
                expiry_date,
            })
            .await?;

        info!(
            reservation_id = reservation.id,
            charge_point_id,
            connector_id,
            id_tag,
            expiry = %expiry_date,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Cancel an `Accepted` reservation. Returns false when it had already
    /// left `Accepted`.
    pub async fn cancel(&self, reservation_id: i32) -> DomainResult<bool> {
        let _guard = self.locks.lock(format!("reservation:{}", reservation_id)).await;

        if self
            .repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Reservation", "id", reservation_id));
        }

        let cancelled = self
            .repos
            .reservations()
            .transition(reservation_id, ReservationStatus::Cancelled, None)
            .await?;
        if cancelled {
            info!(reservation_id, "Reservation cancelled");
        } else {
            warn!(reservation_id, "Reservation is no longer Accepted, not cancelled");
        }
        Ok(cancelled)
    }

    /// Mark every overdue `Accepted` reservation as `Expired`; returns the ids
    /// this call expired.
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> DomainResult<Vec<i32>> {
        let overdue = self.repos.reservations().find_expired(now).await?;
        let mut expired = Vec::with_capacity(overdue.len());

        for reservation in overdue {
            let _guard = self.locks.lock(format!("reservation:{}", reservation.id)).await;
            if self
                .repos
                .reservations()
                .transition(reservation.id, ReservationStatus::Expired, None)
                .await?
            {
                expired.push(reservation.id);
            }
        }

        if !expired.is_empty() {
            info!(count = expired.len(), ids = ?expired, "Expired overdue reservations");
        }
        Ok(expired)
    }

    pub async fn find(&self, reservation_id: i32) -> DomainResult<Option<Reservation>> {
        self.repos.reservations().find_by_id(reservation_id).await
    }

    pub async fn list_active(&self, charge_point_id: &str) -> DomainResult<Vec<Reservation>> {
        self.repos
            .reservations()
            .find_active_for_charge_point(charge_point_id)
            .await
    }

    pub async fn list_all(&self) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_all().await
    }

    /// Try to consume a reservation for a freshly inserted transaction,
    /// inside the caller's unit of work. Business mismatches are outcomes,
    /// never errors.
    pub async fn claim_for_start(
        uow: &dyn UnitOfWork,
        reservation_id: i32,
        tx: &Transaction,
        now: DateTime<Utc>,
    ) -> DomainResult<ReservationClaim> {
        let Some(reservation) = uow.reservations().find_by_id(reservation_id).await? else {
            return Ok(ReservationClaim::NotFound);
        };

        if reservation.status != ReservationStatus::Accepted {
            return Ok(ReservationClaim::NotAccepted(reservation.status));
        }
        if reservation.is_expired_at(now) {
            return Ok(ReservationClaim::Expired);
        }
        if !reservation.matches(&tx.charge_point_id, tx.connector_id, &tx.id_tag) {
            return Ok(ReservationClaim::Mismatch);
        }

        if !uow
            .reservations()
            .transition(reservation_id, ReservationStatus::Used, Some(tx.id))
            .await?
        {
            return Ok(ReservationClaim::LostRace);
        }
        uow.transactions()
            .link_reservation(tx.id, reservation_id)
            .await?;

        Ok(ReservationClaim::Linked(reservation_id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::NewTransaction;
    use crate::infrastructure::InMemoryRepositoryProvider;

    async fn setup() -> (Arc<InMemoryRepositoryProvider>, ReservationManager) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos
            .charge_points()
            .save(crate::domain::ChargePoint::new("CP001"))
            .await
            .unwrap();
        let manager = ReservationManager::new(repos.clone(), Arc::new(KeyedLocks::new()));
        (repos, manager)
    }

    #[tokio::test]
    async fn reserve_requires_known_charge_point_and_future_expiry() {
        let (_, manager) = setup().await;
        let later = Utc::now() + Duration::hours(1);

        let err = manager.reserve("GHOST", 1, "TAG", later).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = manager
            .reserve("CP001", 1, "TAG", Utc::now() - Duration::minutes(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let r = manager.reserve("CP001", 1, "TAG", later).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Accepted);
        assert_eq!(manager.list_active("CP001").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_only_from_accepted() {
        let (_, manager) = setup().await;
        let r = manager
            .reserve("CP001", 1, "TAG", Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        assert!(manager.cancel(r.id).await.unwrap());
        assert!(!manager.cancel(r.id).await.unwrap());
        assert_eq!(
            manager.find(r.id).await.unwrap().unwrap().status,
            ReservationStatus::Cancelled
        );
        assert!(matches!(
            manager.cancel(999).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn expire_overdue_skips_live_and_terminal() {
        let (_, manager) = setup().await;
        let now = Utc::now();
        let soon = manager
            .reserve("CP001", 1, "A", now + Duration::seconds(5))
            .await
            .unwrap();
        let later = manager
            .reserve("CP001", 2, "B", now + Duration::hours(1))
            .await
            .unwrap();
        let cancelled = manager
            .reserve("CP001", 3, "C", now + Duration::seconds(5))
            .await
            .unwrap();
        manager.cancel(cancelled.id).await.unwrap();

        let expired = manager.expire_overdue(now + Duration::minutes(1)).await.unwrap();
        assert_eq!(expired, vec![soon.id]);

        let mut got = Vec::new();
        for id in [soon.id, later.id, cancelled.id] {
            got.push(manager.find(id).await.unwrap().unwrap().status);
        }
        assert_eq!(
            got,
            vec![
                ReservationStatus::Expired,
                ReservationStatus::Accepted,
                ReservationStatus::Cancelled
            ]
        );

        // Second run has nothing left to do
        assert!(manager
            .expire_overdue(now + Duration::minutes(1))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn claim_links_only_matching_reservation() {
        let (repos, manager) = setup().await;
        let now = Utc::now();
        let any_connector = manager
            .reserve("CP001", 0, "TAG", now + Duration::hours(1))
            .await
            .unwrap();
        let other_tag = manager
            .reserve("CP001", 2, "SOMEONE", now + Duration::hours(1))
            .await
            .unwrap();

        let uow = repos.begin().await.unwrap();
        let tx = uow
            .transactions()
            .insert(NewTransaction {
                charge_point_id: "CP001".into(),
                connector_id: 2,
                id_tag: "TAG".into(),
                start_timestamp: now,
                meter_start: 0,
            })
            .await
            .unwrap();

        let claim = ReservationManager::claim_for_start(uow.as_ref(), other_tag.id, &tx, now)
            .await
            .unwrap();
        assert_eq!(claim, ReservationClaim::Mismatch);

        let claim = ReservationManager::claim_for_start(uow.as_ref(), any_connector.id, &tx, now)
            .await
            .unwrap();
        assert_eq!(claim, ReservationClaim::Linked(any_connector.id));

        let replay = ReservationManager::claim_for_start(uow.as_ref(), any_connector.id, &tx, now)
            .await
            .unwrap();
        assert_eq!(replay, ReservationClaim::NotAccepted(ReservationStatus::Used));

        let missing = ReservationManager::claim_for_start(uow.as_ref(), 4242, &tx, now)
            .await
            .unwrap();
        assert_eq!(missing, ReservationClaim::NotFound);
        uow.commit().await.unwrap();

        let linked = repos.transactions().find_by_id(tx.id).await.unwrap().unwrap();
        assert_eq!(linked.reservation_id, Some(any_connector.id));
        let used = manager.find(any_connector.id).await.unwrap().unwrap();
        assert_eq!(used.status, ReservationStatus::Used);
        assert_eq!(used.transaction_id, Some(tx.id));
    }

    #[tokio::test]
    async fn expired_reservation_is_not_claimed() {
        let (repos, manager) = setup().await;
        let now = Utc::now();
        let r = manager
            .reserve("CP001", 1, "TAG", now + Duration::seconds(30))
            .await
            .unwrap();

        let uow = repos.begin().await.unwrap();
        let tx = uow
            .transactions()
            .insert(NewTransaction {
                charge_point_id: "CP001".into(),
                connector_id: 1,
                id_tag: "TAG".into(),
                start_timestamp: now,
                meter_start: 0,
            })
            .await
            .unwrap();
        let claim =
            ReservationManager::claim_for_start(uow.as_ref(), r.id, &tx, now + Duration::minutes(5))
                .await
                .unwrap();
        assert_eq!(claim, ReservationClaim::Expired);
        drop(uow);

        assert_eq!(
            manager.find(r.id).await.unwrap().unwrap().status,
            ReservationStatus::Accepted
        );
    }
}
