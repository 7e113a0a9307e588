//! OCPP 1.6 action handlers
//!
//! Each handler maps a `rust_ocpp::v1_6` request onto the domain services and
//! builds the response. Business outcomes (unknown charge point, rejected
//! tag, unusable reservation) are response values; only integrity
//! violations and storage failures come back as errors.

mod handle_authorize;
mod handle_boot_notification;
mod handle_heartbeat;
mod handle_meter_values;
mod handle_start_transaction;
mod handle_status_notification;
mod handle_stop_transaction;

pub use handle_authorize::handle_authorize;
pub use handle_boot_notification::handle_boot_notification;
pub use handle_heartbeat::handle_heartbeat;
pub use handle_meter_values::handle_meter_values;
pub use handle_start_transaction::handle_start_transaction;
pub use handle_status_notification::handle_status_notification;
pub use handle_stop_transaction::handle_stop_transaction;

use rust_ocpp::v1_6::types::{AuthorizationStatus, IdTagInfo, MeterValue};
use serde::Serialize;

use crate::domain::{Authorization, DomainError, DomainResult, IdTagStatus, MeterSample};

pub(crate) fn id_tag_info(auth: &Authorization) -> IdTagInfo {
    let status = match auth.status {
        IdTagStatus::Accepted => AuthorizationStatus::Accepted,
        IdTagStatus::Blocked => AuthorizationStatus::Blocked,
        IdTagStatus::Expired => AuthorizationStatus::Expired,
        IdTagStatus::Invalid => AuthorizationStatus::Invalid,
        IdTagStatus::ConcurrentTx => AuthorizationStatus::ConcurrentTx,
    };
    IdTagInfo {
        status,
        expiry_date: auth.expiry_date,
        parent_id_tag: auth.parent_id_tag.clone(),
    }
}

/// Wire name of a `rust_ocpp` enum value, e.g. `"SuspendedEVSE"`
pub(crate) fn wire_name<T: Serialize>(value: &T) -> DomainResult<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Err(DomainError::Validation(format!(
            "expected an enumeration value, got {}",
            other
        ))),
        Err(e) => Err(DomainError::Validation(e.to_string())),
    }
}

/// Re-read `rust_ocpp` meter values as domain samples. Values stay verbatim.
pub(crate) fn meter_samples(values: &[MeterValue]) -> DomainResult<Vec<MeterSample>> {
    serde_json::to_value(values)
        .and_then(serde_json::from_value)
        .map_err(|e| DomainError::Validation(format!("malformed meter values: {}", e)))
}

pub(crate) fn to_i32<T: TryInto<i32>>(value: T, field: &str) -> DomainResult<i32> {
    value
        .try_into()
        .map_err(|_| DomainError::Validation(format!("{} out of range", field)))
}

pub(crate) fn to_u32<T: TryInto<u32>>(value: T, field: &str) -> DomainResult<u32> {
    value
        .try_into()
        .map_err(|_| DomainError::Validation(format!("{} out of range", field)))
}
