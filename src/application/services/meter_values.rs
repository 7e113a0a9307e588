//! Periodic MeterValues storage and retrieval

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::domain::{
    flatten_samples, DomainResult, MeterSample, RepositoryProvider, SampledValueRecord,
};

pub struct MeterValueStore {
    repos: Arc<dyn RepositoryProvider>,
    /// How long after a stop readings still attach to the transaction
    grace: Duration,
}

impl MeterValueStore {
    pub fn new(repos: Arc<dyn RepositoryProvider>, grace: Duration) -> Self {
        Self { repos, grace }
    }

    /// Store the readings of one MeterValues message; returns how many were
    /// written. Readings referencing a transaction that is unknown, belongs
    /// to another charge point, or closed too long ago are kept unassociated.
    pub async fn record_periodic(
        &self,
        charge_point_id: &str,
        connector_id: u32,
        transaction_id: Option<i32>,
        samples: Vec<MeterSample>,
    ) -> DomainResult<usize> {
        let association = match transaction_id {
            Some(id) => {
                let tx = self.repos.transactions().find_by_id(id).await?;
                let live = tx.as_ref().is_some_and(|tx| {
                    tx.charge_point_id == charge_point_id
                        && tx.accepts_readings(Utc::now(), self.grace)
                });
                if !live {
                    warn!(
                        charge_point_id,
                        connector_id,
                        transaction_id = id,
                        known = tx.is_some(),
                        "Meter values for a transaction that is not live, storing unassociated"
                    );
                }
                live.then_some(id)
            }
            None => None,
        };

        let readings = flatten_samples(charge_point_id, connector_id, association, samples);
        let count = readings.len();
        self.repos.meter_values().append(readings).await?;

        debug!(
            charge_point_id,
            connector_id,
            transaction_id = ?association,
            count,
            "Meter values stored"
        );
        Ok(count)
    }

    /// Periodic and final readings of a transaction, in arrival order
    pub async fn for_transaction(&self, transaction_id: i32) -> DomainResult<Vec<SampledValueRecord>> {
        self.repos.meter_values().find_by_transaction(transaction_id).await
    }

    pub async fn for_charge_point(&self, charge_point_id: &str) -> DomainResult<Vec<SampledValueRecord>> {
        self.repos.meter_values().find_by_charge_point(charge_point_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTransaction, SampledReading, TransactionStop};
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn sample(values: &[&str]) -> MeterSample {
        MeterSample {
            timestamp: Utc::now(),
            sampled_value: values.iter().copied().map(SampledReading::new).collect(),
        }
    }

    async fn open_tx(repos: &InMemoryRepositoryProvider, cp: &str) -> i32 {
        repos
            .transactions()
            .insert(NewTransaction {
                charge_point_id: cp.into(),
                connector_id: 1,
                id_tag: "TAG".into(),
                start_timestamp: Utc::now(),
                meter_start: 0,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn readings_keep_order_and_duplicates() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let tx = open_tx(&repos, "CP001").await;
        let store = MeterValueStore::new(repos.clone(), Duration::minutes(5));

        let n = store
            .record_periodic(
                "CP001",
                1,
                Some(tx),
                vec![sample(&["3.0", "13.0"]), sample(&["13.0", "23.0"])],
            )
            .await
            .unwrap();
        assert_eq!(n, 4);

        let values: Vec<_> = store
            .for_transaction(tx)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.reading.value)
            .collect();
        assert_eq!(values, ["3.0", "13.0", "13.0", "23.0"]);
    }

    #[tokio::test]
    async fn unknown_or_foreign_transaction_is_stored_unassociated() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let foreign = open_tx(&repos, "CP002").await;
        let store = MeterValueStore::new(repos.clone(), Duration::minutes(5));

        store
            .record_periodic("CP001", 1, Some(777), vec![sample(&["1.0"])])
            .await
            .unwrap();
        store
            .record_periodic("CP001", 1, Some(foreign), vec![sample(&["2.0"])])
            .await
            .unwrap();

        assert!(store.for_transaction(777).await.unwrap().is_empty());
        assert!(store.for_transaction(foreign).await.unwrap().is_empty());
        let stored = store.for_charge_point("CP001").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|r| r.transaction_id.is_none()));
    }

    #[tokio::test]
    async fn late_readings_respect_grace_window() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let recent = open_tx(&repos, "CP001").await;
        let old = open_tx(&repos, "CP001").await;
        for (id, ago) in [(recent, Duration::seconds(10)), (old, Duration::hours(1))] {
            repos
                .transactions()
                .close(
                    id,
                    TransactionStop {
                        timestamp: Utc::now() - ago,
                        meter_value: 10,
                        reason: None,
                        id_tag: None,
                    },
                )
                .await
                .unwrap();
        }

        let store = MeterValueStore::new(repos.clone(), Duration::minutes(5));
        store
            .record_periodic("CP001", 1, Some(recent), vec![sample(&["9.0"])])
            .await
            .unwrap();
        store
            .record_periodic("CP001", 1, Some(old), vec![sample(&["9.0"])])
            .await
            .unwrap();

        assert_eq!(store.for_transaction(recent).await.unwrap().len(), 1);
        assert!(store.for_transaction(old).await.unwrap().is_empty());
    }
}
