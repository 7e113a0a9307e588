//! Transaction lifecycle: StartTransaction and StopTransaction
//!
//! Each call runs in one unit of work and is serialized against other calls
//! touching the same id tag, reservation or transaction through
//! [`KeyedLocks`]. Storage-level conditional updates back the locks up when
//! several processes share one database.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::locks::KeyedLocks;
use super::reservation::{ReservationClaim, ReservationManager};
use crate::domain::{
    flatten_samples, Authorization, DomainError, DomainResult, IdTagStatus, MeterSample,
    NewTransaction, RepositoryProvider, Transaction, TransactionStop,
};

#[derive(Debug, Clone)]
pub struct StartTransactionInput {
    pub charge_point_id: String,
    pub connector_id: u32,
    pub id_tag: String,
    pub timestamp: DateTime<Utc>,
    pub meter_start: i32,
    pub reservation_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartOutcome {
    pub transaction_id: i32,
    pub id_tag_info: Authorization,
    pub reservation: Option<ReservationClaim>,
}

#[derive(Debug, Clone)]
pub struct StopTransactionInput {
    pub charge_point_id: String,
    pub transaction_id: i32,
    pub timestamp: DateTime<Utc>,
    pub meter_stop: i32,
    /// Tag presented at stop
    pub id_tag: Option<String>,
    pub reason: Option<String>,
    /// Final readings sent with the stop
    pub transaction_data: Vec<MeterSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopOutcome {
    pub transaction: Transaction,
    /// Present only when the stop carried an id tag
    pub id_tag_info: Option<Authorization>,
}

pub struct TransactionLifecycleManager {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<KeyedLocks>,
}

impl TransactionLifecycleManager {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<KeyedLocks>) -> Self {
        Self { repos, locks }
    }

    /// Record a started transaction.
    ///
    /// The transaction is stored whatever the tag's authorization; the
    /// outcome is reported through `id_tag_info`. A referenced reservation
    /// is consumed only if it is live and matches.
    pub async fn start(&self, input: StartTransactionInput) -> DomainResult<StartOutcome> {
        let mut keys = vec![format!("tag:{}", input.id_tag)];
        if let Some(reservation_id) = input.reservation_id {
            keys.push(format!("reservation:{}", reservation_id));
        }
        let _guards = self.locks.lock_all(keys).await;

        let now = Utc::now();
        let uow = self.repos.begin().await?;

        let tag = uow.id_tags().find_by_id(&input.id_tag).await?;
        let mut id_tag_info = Authorization::for_tag(tag.as_ref(), now);
        if id_tag_info.is_accepted() && tag.as_ref().is_some_and(|t| t.in_transaction) {
            id_tag_info.status = IdTagStatus::ConcurrentTx;
        }

        let tx = uow
            .transactions()
            .insert(NewTransaction {
                charge_point_id: input.charge_point_id.clone(),
                connector_id: input.connector_id,
                id_tag: input.id_tag.clone(),
                start_timestamp: input.timestamp,
                meter_start: input.meter_start,
            })
            .await?;

        let reservation = match input.reservation_id {
            Some(reservation_id) => {
                let claim =
                    ReservationManager::claim_for_start(uow.as_ref(), reservation_id, &tx, now)
                        .await?;
                if claim.is_linked() {
                    info!(transaction_id = tx.id, reservation_id, "Reservation used");
                } else {
                    warn!(
                        transaction_id = tx.id,
                        reservation_id,
                        outcome = ?claim,
                        "Reservation not applied to transaction"
                    );
                }
                Some(claim)
            }
            None => None,
        };

        if tag.is_some() {
            uow.id_tags().set_in_transaction(&input.id_tag, true).await?;
        }

        uow.commit().await?;

        info!(
            transaction_id = tx.id,
            charge_point_id = %input.charge_point_id,
            connector_id = input.connector_id,
            id_tag = %input.id_tag,
            meter_start = input.meter_start,
            status = %id_tag_info.status,
            "Transaction started"
        );

        Ok(StartOutcome {
            transaction_id: tx.id,
            id_tag_info,
            reservation,
        })
    }

    /// Close an open transaction and store its final readings.
    ///
    /// Stopping a missing or already closed transaction is an
    /// `IntegrityViolation`.
    pub async fn stop(&self, input: StopTransactionInput) -> DomainResult<StopOutcome> {
        let transaction_id = input.transaction_id;

        // The starting tag is needed for the lock set
        let Some(existing) = self.repos.transactions().find_by_id(transaction_id).await? else {
            return Err(unknown_transaction(transaction_id));
        };
        let _guards = self
            .locks
            .lock_all([
                format!("transaction:{}", transaction_id),
                format!("tag:{}", existing.id_tag),
            ])
            .await;

        let now = Utc::now();
        let uow = self.repos.begin().await?;

        let Some(mut tx) = uow.transactions().find_by_id(transaction_id).await? else {
            return Err(unknown_transaction(transaction_id));
        };
        if !tx.is_open() {
            return Err(already_stopped(transaction_id));
        }
        let same_charge_point = tx.charge_point_id == input.charge_point_id;
        if !same_charge_point {
            warn!(
                transaction_id,
                owner = %tx.charge_point_id,
                charge_point_id = %input.charge_point_id,
                "Stop received from a different charge point"
            );
        }

        let stop = TransactionStop {
            timestamp: input.timestamp,
            meter_value: input.meter_stop,
            reason: input.reason.clone(),
            id_tag: input.id_tag.clone(),
        };
        if !uow.transactions().close(transaction_id, stop.clone()).await? {
            return Err(already_stopped(transaction_id));
        }

        if uow.transactions().count_open_for_tag(&tx.id_tag).await? == 0 {
            uow.id_tags().set_in_transaction(&tx.id_tag, false).await?;
        }

        let readings = flatten_samples(
            &input.charge_point_id,
            tx.connector_id,
            same_charge_point.then_some(transaction_id),
            input.transaction_data,
        );
        let reading_count = readings.len();
        uow.meter_values().append(readings).await?;

        let id_tag_info = match input.id_tag.as_deref() {
            Some(id_tag) => {
                let tag = uow.id_tags().find_by_id(id_tag).await?;
                Some(Authorization::for_tag(tag.as_ref(), now))
            }
            None => None,
        };

        uow.commit().await?;

        tx.stop = Some(stop);
        info!(
            transaction_id,
            charge_point_id = %tx.charge_point_id,
            meter_stop = input.meter_stop,
            energy_wh = tx.energy_consumed(),
            final_readings = reading_count,
            "Transaction stopped"
        );

        Ok(StopOutcome {
            transaction: tx,
            id_tag_info,
        })
    }

    pub async fn find(&self, transaction_id: i32) -> DomainResult<Option<Transaction>> {
        self.repos.transactions().find_by_id(transaction_id).await
    }

    pub async fn list_for_charge_point(&self, charge_point_id: &str) -> DomainResult<Vec<Transaction>> {
        self.repos.transactions().find_by_charge_point(charge_point_id).await
    }

    pub async fn list_all(&self) -> DomainResult<Vec<Transaction>> {
        self.repos.transactions().find_all().await
    }
}

fn unknown_transaction(transaction_id: i32) -> DomainError {
    DomainError::IntegrityViolation(format!("transaction {} does not exist", transaction_id))
}

fn already_stopped(transaction_id: i32) -> DomainError {
    DomainError::IntegrityViolation(format!("transaction {} is already stopped", transaction_id))
}
