//! Application layer: business managers, OCPP 1.6 handlers and the
//! per-charge-point dispatcher

pub mod handlers;
pub mod services;
pub mod session;

pub use handlers::{OcppHandlerV16, OcppRequest, OcppResponse};
pub use services::{
    start_reservation_expiry_task, AuthorizationService, ChargePointService,
    ConnectorStatusTracker, CoreServices, KeyedLocks, MeterValueStore, ReservationClaim,
    ReservationManager, StartOutcome, StartTransactionInput, StopOutcome, StopTransactionInput,
    TransactionLifecycleManager,
};
pub use session::MessageDispatcher;
