//! Application services
//!
//! Business managers built over a [`RepositoryProvider`]. None of them cache
//! persisted state; every call re-reads what it needs.

pub mod authorization;
pub mod charge_point;
pub mod connector_status;
pub mod locks;
pub mod meter_values;
pub mod reservation;
pub mod reservation_expiry;
pub mod transaction;

use std::sync::Arc;

pub use authorization::AuthorizationService;
pub use charge_point::ChargePointService;
pub use connector_status::ConnectorStatusTracker;
pub use locks::{KeyGuard, KeyedLocks};
pub use meter_values::MeterValueStore;
pub use reservation::{ReservationClaim, ReservationManager};
pub use reservation_expiry::start_reservation_expiry_task;
pub use transaction::{
    StartOutcome, StartTransactionInput, StopOutcome, StopTransactionInput,
    TransactionLifecycleManager,
};

use crate::config::OcppSection;
use crate::domain::RepositoryProvider;

/// All managers sharing one repository provider and one lock table
#[derive(Clone)]
pub struct CoreServices {
    pub charge_points: Arc<ChargePointService>,
    pub authorization: Arc<AuthorizationService>,
    pub connectors: Arc<ConnectorStatusTracker>,
    pub transactions: Arc<TransactionLifecycleManager>,
    pub reservations: Arc<ReservationManager>,
    pub meter_values: Arc<MeterValueStore>,
}

impl CoreServices {
    pub fn new(repos: Arc<dyn RepositoryProvider>, ocpp: &OcppSection) -> Self {
        let locks = Arc::new(KeyedLocks::new());
        Self {
            charge_points: Arc::new(ChargePointService::new(repos.clone())),
            authorization: Arc::new(AuthorizationService::new(repos.clone())),
            connectors: Arc::new(ConnectorStatusTracker::new(repos.clone())),
            transactions: Arc::new(TransactionLifecycleManager::new(
                repos.clone(),
                locks.clone(),
            )),
            reservations: Arc::new(ReservationManager::new(repos.clone(), locks)),
            meter_values: Arc::new(MeterValueStore::new(repos, ocpp.meter_value_grace())),
        }
    }
}
