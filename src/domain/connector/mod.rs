//! Connector aggregate
//!
//! Current status projection per (charge point, connector).

pub mod model;
pub mod repository;

pub use model::{ChargePointErrorCode, ConnectorStatus, ConnectorStatusRecord};
pub use repository::ConnectorStatusRepository;
