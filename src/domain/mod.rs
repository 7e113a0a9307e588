//! Domain layer: aggregates, their repository interfaces, and storage access

pub mod charge_point;
pub mod connector;
pub mod id_tag;
pub mod meter_value;
pub mod ocpp;
pub mod repositories;
pub mod reservation;
pub mod transaction;

// Re-export commonly used types
pub use charge_point::{BootOutcome, ChargePoint, ChargePointRepository};
pub use connector::{
    ChargePointErrorCode, ConnectorStatus, ConnectorStatusRecord, ConnectorStatusRepository,
};
pub use id_tag::{Authorization, IdTagRepository, IdTagStatus, OcppTag};
pub use meter_value::{
    flatten_samples, MeterSample, MeterValueRepository, NewSampledValue, SampledReading,
    SampledValueRecord,
};
pub use ocpp::OcppVersion;
pub use repositories::{RepositoryProvider, UnitOfWork};
pub use reservation::{NewReservation, Reservation, ReservationRepository, ReservationStatus};
pub use transaction::{NewTransaction, Transaction, TransactionRepository, TransactionStop};

pub use crate::shared::errors::{DomainError, DomainResult};
