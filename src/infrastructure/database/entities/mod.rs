//! Database entities module

pub mod charge_point;
pub mod connector_status;
pub mod meter_value;
pub mod ocpp_tag;
pub mod reservation;
pub mod transaction;

pub use charge_point::Entity as ChargePoint;
pub use connector_status::Entity as ConnectorStatus;
pub use meter_value::Entity as MeterValue;
pub use ocpp_tag::Entity as OcppTag;
pub use reservation::Entity as Reservation;
pub use transaction::Entity as Transaction;
