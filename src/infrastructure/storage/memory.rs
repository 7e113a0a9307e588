//! In-memory storage implementation
//!
//! One writer at a time: a unit of work holds the writer lock for its whole
//! lifetime and edits a private copy of the tables, which replaces the shared
//! tables on commit. Readers outside the unit only ever see committed state.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OwnedMutexGuard;

use crate::domain::charge_point::{ChargePoint, ChargePointRepository};
use crate::domain::connector::{ConnectorStatusRecord, ConnectorStatusRepository};
use crate::domain::id_tag::{IdTagRepository, OcppTag};
use crate::domain::meter_value::{MeterValueRepository, NewSampledValue, SampledValueRecord};
use crate::domain::repositories::{RepositoryProvider, UnitOfWork};
use crate::domain::reservation::{
    NewReservation, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::transaction::{
    NewTransaction, Transaction, TransactionRepository, TransactionStop,
};
use crate::domain::{DomainError, DomainResult, OcppVersion};

// ── Tables ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Tables {
    charge_points: BTreeMap<String, ChargePoint>,
    tags: BTreeMap<String, OcppTag>,
    connectors: BTreeMap<(String, u32), ConnectorStatusRecord>,
    transactions: BTreeMap<i32, Transaction>,
    reservations: BTreeMap<i32, Reservation>,
    /// Appended batches; cloning the tables only copies the batch handles
    meter_values: Vec<Arc<[SampledValueRecord]>>,
    next_transaction_id: i32,
    next_reservation_id: i32,
    next_meter_value_id: i64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            charge_points: BTreeMap::new(),
            tags: BTreeMap::new(),
            connectors: BTreeMap::new(),
            transactions: BTreeMap::new(),
            reservations: BTreeMap::new(),
            meter_values: Vec::new(),
            next_transaction_id: 1,
            next_reservation_id: 1,
            next_meter_value_id: 1,
        }
    }
}

impl Tables {
    fn meter_values(&self) -> impl Iterator<Item = &SampledValueRecord> {
        self.meter_values.iter().flat_map(|batch| batch.iter())
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::Storage("in-memory storage lock poisoned".to_string())
}

struct Shared {
    tables: RwLock<Tables>,
    writer: Arc<tokio::sync::Mutex<()>>,
}

enum Access {
    Committed(Arc<Shared>),
    Working(Mutex<Tables>),
}

/// Implements every repository trait over either the committed tables or a
/// unit of work's private copy.
struct MemoryRepos {
    access: Access,
}

impl MemoryRepos {
    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> DomainResult<R> {
        match &self.access {
            Access::Committed(shared) => {
                let tables = shared.tables.read().map_err(poisoned)?;
                Ok(f(&tables))
            }
            Access::Working(tables) => {
                let tables = tables.lock().map_err(poisoned)?;
                Ok(f(&tables))
            }
        }
    }

    async fn write<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> DomainResult<R> {
        match &self.access {
            Access::Committed(shared) => {
                let _writer = shared.writer.lock().await;
                let mut tables = shared.tables.write().map_err(poisoned)?;
                Ok(f(&mut tables))
            }
            Access::Working(tables) => {
                let mut tables = tables.lock().map_err(poisoned)?;
                Ok(f(&mut tables))
            }
        }
    }
}

// ── Provider ────────────────────────────────────────────────────

/// In-memory storage for development and testing
pub struct InMemoryRepositoryProvider {
    shared: Arc<Shared>,
    repos: MemoryRepos,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            tables: RwLock::new(Tables::default()),
            writer: Arc::new(tokio::sync::Mutex::new(())),
        });
        Self {
            repos: MemoryRepos {
                access: Access::Committed(shared.clone()),
            },
            shared,
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn charge_points(&self) -> &dyn ChargePointRepository {
        &self.repos
    }

    fn id_tags(&self) -> &dyn IdTagRepository {
        &self.repos
    }

    fn connectors(&self) -> &dyn ConnectorStatusRepository {
        &self.repos
    }

    fn transactions(&self) -> &dyn TransactionRepository {
        &self.repos
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.repos
    }

    fn meter_values(&self) -> &dyn MeterValueRepository {
        &self.repos
    }

    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let guard = self.shared.writer.clone().lock_owned().await;
        let snapshot = self.shared.tables.read().map_err(poisoned)?.clone();
        Ok(Box::new(InMemoryUnitOfWork {
            shared: self.shared.clone(),
            repos: MemoryRepos {
                access: Access::Working(Mutex::new(snapshot)),
            },
            _writer: guard,
        }))
    }
}

// ── Unit of work ────────────────────────────────────────────────

pub struct InMemoryUnitOfWork {
    shared: Arc<Shared>,
    repos: MemoryRepos,
    _writer: OwnedMutexGuard<()>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn id_tags(&self) -> &dyn IdTagRepository {
        &self.repos
    }

    fn transactions(&self) -> &dyn TransactionRepository {
        &self.repos
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.repos
    }

    fn meter_values(&self) -> &dyn MeterValueRepository {
        &self.repos
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let InMemoryUnitOfWork {
            shared,
            repos,
            _writer,
        } = *self;
        let working = match repos.access {
            Access::Working(tables) => tables.into_inner().map_err(poisoned)?,
            Access::Committed(_) => return Ok(()),
        };
        *shared.tables.write().map_err(poisoned)? = working;
        Ok(())
    }
}

// ── Repository impls ────────────────────────────────────────────

#[async_trait]
impl ChargePointRepository for MemoryRepos {
    async fn save(&self, charge_point: ChargePoint) -> DomainResult<()> {
        self.write(|t| {
            if t.charge_points.contains_key(&charge_point.id) {
                return Err(DomainError::Conflict(format!(
                    "Charge point {}",
                    charge_point.id
                )));
            }
            t.charge_points
                .insert(charge_point.id.clone(), charge_point);
            Ok(())
        })
        .await?
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargePoint>> {
        self.read(|t| t.charge_points.get(id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<ChargePoint>> {
        self.read(|t| t.charge_points.values().cloned().collect())
    }

    async fn update_protocol(&self, id: &str, protocol: OcppVersion) -> DomainResult<bool> {
        self.write(|t| match t.charge_points.get_mut(id) {
            Some(cp) => {
                cp.ocpp_protocol = Some(protocol);
                true
            }
            None => false,
        })
        .await
    }

    async fn touch_heartbeat(&self, id: &str, at: DateTime<Utc>) -> DomainResult<bool> {
        self.write(|t| match t.charge_points.get_mut(id) {
            Some(cp) => {
                cp.last_heartbeat_at = Some(at);
                true
            }
            None => false,
        })
        .await
    }
}

#[async_trait]
impl IdTagRepository for MemoryRepos {
    async fn save(&self, tag: OcppTag) -> DomainResult<()> {
        self.write(|t| {
            t.tags.insert(tag.id_tag.clone(), tag);
        })
        .await
    }

    async fn find_by_id(&self, id_tag: &str) -> DomainResult<Option<OcppTag>> {
        self.read(|t| t.tags.get(id_tag).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<OcppTag>> {
        self.read(|t| t.tags.values().cloned().collect())
    }

    async fn set_in_transaction(&self, id_tag: &str, in_transaction: bool) -> DomainResult<bool> {
        self.write(|t| match t.tags.get_mut(id_tag) {
            Some(tag) => {
                tag.in_transaction = in_transaction;
                true
            }
            None => false,
        })
        .await
    }
}

#[async_trait]
impl ConnectorStatusRepository for MemoryRepos {
    async fn upsert(&self, record: ConnectorStatusRecord) -> DomainResult<()> {
        self.write(|t| {
            let key = (record.charge_point_id.clone(), record.connector_id);
            t.connectors.insert(key, record);
        })
        .await
    }

    async fn find(
        &self,
        charge_point_id: &str,
        connector_id: u32,
    ) -> DomainResult<Option<ConnectorStatusRecord>> {
        self.read(|t| {
            t.connectors
                .get(&(charge_point_id.to_string(), connector_id))
                .cloned()
        })
    }

    async fn find_by_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<ConnectorStatusRecord>> {
        self.read(|t| {
            t.connectors
                .values()
                .filter(|r| r.charge_point_id == charge_point_id)
                .cloned()
                .collect()
        })
    }
}

#[async_trait]
impl TransactionRepository for MemoryRepos {
    async fn insert(&self, transaction: NewTransaction) -> DomainResult<Transaction> {
        self.write(|t| {
            let id = t.next_transaction_id;
            t.next_transaction_id += 1;
            let tx = transaction.into_transaction(id);
            t.transactions.insert(id, tx.clone());
            tx
        })
        .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Transaction>> {
        self.read(|t| t.transactions.get(&id).cloned())
    }

    async fn link_reservation(&self, id: i32, reservation_id: i32) -> DomainResult<bool> {
        self.write(|t| match t.transactions.get_mut(&id) {
            Some(tx) => {
                tx.reservation_id = Some(reservation_id);
                true
            }
            None => false,
        })
        .await
    }

    async fn close(&self, id: i32, stop: TransactionStop) -> DomainResult<bool> {
        self.write(|t| match t.transactions.get_mut(&id) {
            Some(tx) if tx.is_open() => {
                tx.stop = Some(stop);
                true
            }
            _ => false,
        })
        .await
    }

    async fn count_open_for_tag(&self, id_tag: &str) -> DomainResult<u64> {
        self.read(|t| {
            t.transactions
                .values()
                .filter(|tx| tx.is_open() && tx.id_tag == id_tag)
                .count() as u64
        })
    }

    async fn find_by_charge_point(&self, charge_point_id: &str) -> DomainResult<Vec<Transaction>> {
        self.read(|t| {
            t.transactions
                .values()
                .filter(|tx| tx.charge_point_id == charge_point_id)
                .cloned()
                .collect()
        })
    }

    async fn find_all(&self) -> DomainResult<Vec<Transaction>> {
        self.read(|t| t.transactions.values().cloned().collect())
    }
}

#[async_trait]
impl ReservationRepository for MemoryRepos {
    async fn insert(&self, reservation: NewReservation) -> DomainResult<Reservation> {
        self.write(|t| {
            let id = t.next_reservation_id;
            t.next_reservation_id += 1;
            let r = reservation.into_reservation(id, Utc::now());
            t.reservations.insert(id, r.clone());
            r
        })
        .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        self.read(|t| t.reservations.get(&id).cloned())
    }

    async fn transition(
        &self,
        id: i32,
        to: ReservationStatus,
        transaction_id: Option<i32>,
    ) -> DomainResult<bool> {
        if !ReservationStatus::Accepted.can_transition_to(to) {
            return Err(DomainError::Validation(format!(
                "reservation cannot move to {}",
                to
            )));
        }
        self.write(|t| match t.reservations.get_mut(&id) {
            Some(r) if r.status == ReservationStatus::Accepted => {
                r.status = to;
                if transaction_id.is_some() {
                    r.transaction_id = transaction_id;
                }
                true
            }
            _ => false,
        })
        .await
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        self.read(|t| {
            t.reservations
                .values()
                .filter(|r| r.is_active() && r.expiry_date < now)
                .cloned()
                .collect()
        })
    }

    async fn find_active_for_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<Reservation>> {
        self.read(|t| {
            t.reservations
                .values()
                .filter(|r| r.is_active() && r.charge_point_id == charge_point_id)
                .cloned()
                .collect()
        })
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        self.read(|t| t.reservations.values().cloned().collect())
    }
}

#[async_trait]
impl MeterValueRepository for MemoryRepos {
    async fn append(&self, values: Vec<NewSampledValue>) -> DomainResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        self.write(|t| {
            let first = t.next_meter_value_id;
            t.next_meter_value_id += values.len() as i64;
            let batch: Arc<[SampledValueRecord]> = values
                .into_iter()
                .zip(first..)
                .map(|(value, id)| value.into_record(id))
                .collect();
            t.meter_values.push(batch);
        })
        .await
    }

    async fn find_by_transaction(
        &self,
        transaction_id: i32,
    ) -> DomainResult<Vec<SampledValueRecord>> {
        self.read(|t| {
            t.meter_values()
                .filter(|v| v.transaction_id == Some(transaction_id))
                .cloned()
                .collect()
        })
    }

    async fn find_by_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Vec<SampledValueRecord>> {
        self.read(|t| {
            t.meter_values()
                .filter(|v| v.charge_point_id == charge_point_id)
                .cloned()
                .collect()
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::SampledReading;

    fn new_tx(tag: &str) -> NewTransaction {
        NewTransaction {
            charge_point_id: "CP001".into(),
            connector_id: 1,
            id_tag: tag.into(),
            start_timestamp: Utc::now(),
            meter_start: 0,
        }
    }

    #[tokio::test]
    async fn uncommitted_writes_are_invisible_and_discarded() {
        let repos = InMemoryRepositoryProvider::new();
        repos.id_tags().save(OcppTag::new("TAG-1")).await.unwrap();

        let uow = repos.begin().await.unwrap();
        let tx = uow.transactions().insert(new_tx("TAG-1")).await.unwrap();
        uow.id_tags().set_in_transaction("TAG-1", true).await.unwrap();

        // Visible inside the unit, not outside
        assert!(uow.transactions().find_by_id(tx.id).await.unwrap().is_some());
        assert!(repos.transactions().find_by_id(tx.id).await.unwrap().is_none());

        drop(uow);

        assert!(repos.transactions().find_all().await.unwrap().is_empty());
        let tag = repos.id_tags().find_by_id("TAG-1").await.unwrap().unwrap();
        assert!(!tag.in_transaction);
    }

    #[tokio::test]
    async fn commit_applies_all_writes() {
        let repos = InMemoryRepositoryProvider::new();
        repos.id_tags().save(OcppTag::new("TAG-1")).await.unwrap();

        let uow = repos.begin().await.unwrap();
        let tx = uow.transactions().insert(new_tx("TAG-1")).await.unwrap();
        uow.id_tags().set_in_transaction("TAG-1", true).await.unwrap();
        uow.meter_values()
            .append(vec![NewSampledValue {
                charge_point_id: "CP001".into(),
                connector_id: 1,
                transaction_id: Some(tx.id),
                timestamp: Utc::now(),
                reading: SampledReading::new("1.0"),
            }])
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert!(repos.transactions().find_by_id(tx.id).await.unwrap().is_some());
        assert!(repos.id_tags().find_by_id("TAG-1").await.unwrap().unwrap().in_transaction);
        assert_eq!(repos.meter_values().find_by_transaction(tx.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn second_unit_waits_for_first() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let first = repos.begin().await.unwrap();

        let waiting = {
            let repos = repos.clone();
            tokio::spawn(async move {
                let uow = repos.begin().await.unwrap();
                let tx = uow.transactions().insert(new_tx("B")).await.unwrap();
                uow.commit().await.unwrap();
                tx.id
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        let tx = first.transactions().insert(new_tx("A")).await.unwrap();
        first.commit().await.unwrap();

        let second_id = waiting.await.unwrap();
        assert!(second_id > tx.id);
        assert_eq!(repos.transactions().find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reservation_transition_wins_once() {
        let repos = InMemoryRepositoryProvider::new();
        let r = repos
            .reservations()
            .insert(NewReservation {
                charge_point_id: "CP001".into(),
                connector_id: 0,
                id_tag: "TAG-1".into(),
                expiry_date: Utc::now() + chrono::Duration::hours(1),
            })
            .await
            .unwrap();

        assert!(repos
            .reservations()
            .transition(r.id, ReservationStatus::Used, Some(3))
            .await
            .unwrap());
        assert!(!repos
            .reservations()
            .transition(r.id, ReservationStatus::Used, Some(4))
            .await
            .unwrap());

        let stored = repos.reservations().find_by_id(r.id).await.unwrap().unwrap();
        assert_eq!(stored.transaction_id, Some(3));
    }

    #[tokio::test]
    async fn meter_values_keep_arrival_order_across_batches() {
        let repos = InMemoryRepositoryProvider::new();
        for batch in [["3.0", "13.0"], ["23.0", "3.0"]] {
            let values = batch
                .iter()
                .map(|v| NewSampledValue {
                    charge_point_id: "CP001".into(),
                    connector_id: 1,
                    transaction_id: Some(1),
                    timestamp: Utc::now(),
                    reading: SampledReading::new(*v),
                })
                .collect();
            repos.meter_values().append(values).await.unwrap();
        }

        let stored = repos.meter_values().find_by_transaction(1).await.unwrap();
        let values: Vec<&str> = stored.iter().map(|r| r.reading.value.as_str()).collect();
        assert_eq!(values, vec!["3.0", "13.0", "23.0", "3.0"]);
        assert!(stored.windows(2).all(|w| w[0].id < w[1].id));
    }
}
