//! Typed OCPP 1.6 CP→CS messages
//!
//! Wraps the `rust_ocpp::v1_6` request and response structs handled by the
//! central system. Conversion from and to the JSON payload of an OCPP-J
//! frame lives here; frame parsing itself belongs to the transport.

use rust_ocpp::v1_6::messages::authorize::{AuthorizeRequest, AuthorizeResponse};
use rust_ocpp::v1_6::messages::boot_notification::{
    BootNotificationRequest, BootNotificationResponse,
};
use rust_ocpp::v1_6::messages::heart_beat::{HeartbeatRequest, HeartbeatResponse};
use rust_ocpp::v1_6::messages::meter_values::{MeterValuesRequest, MeterValuesResponse};
use rust_ocpp::v1_6::messages::start_transaction::{
    StartTransactionRequest, StartTransactionResponse,
};
use rust_ocpp::v1_6::messages::status_notification::{
    StatusNotificationRequest, StatusNotificationResponse,
};
use rust_ocpp::v1_6::messages::stop_transaction::{
    StopTransactionRequest, StopTransactionResponse,
};
use serde_json::Value;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub enum OcppRequest {
    Authorize(AuthorizeRequest),
    BootNotification(BootNotificationRequest),
    Heartbeat(HeartbeatRequest),
    MeterValues(MeterValuesRequest),
    StartTransaction(StartTransactionRequest),
    StatusNotification(StatusNotificationRequest),
    StopTransaction(StopTransactionRequest),
}

#[derive(Debug, Clone)]
pub enum OcppResponse {
    Authorize(AuthorizeResponse),
    BootNotification(BootNotificationResponse),
    Heartbeat(HeartbeatResponse),
    MeterValues(MeterValuesResponse),
    StartTransaction(StartTransactionResponse),
    StatusNotification(StatusNotificationResponse),
    StopTransaction(StopTransactionResponse),
}

impl OcppRequest {
    /// Action name as it appears in an OCPP-J Call frame
    pub fn action(&self) -> &'static str {
        match self {
            Self::Authorize(_) => "Authorize",
            Self::BootNotification(_) => "BootNotification",
            Self::Heartbeat(_) => "Heartbeat",
            Self::MeterValues(_) => "MeterValues",
            Self::StartTransaction(_) => "StartTransaction",
            Self::StatusNotification(_) => "StatusNotification",
            Self::StopTransaction(_) => "StopTransaction",
        }
    }

    /// Decode the payload of a Call frame for `action`
    pub fn from_payload(action: &str, payload: Value) -> DomainResult<Self> {
        let request = match action {
            "Authorize" => Self::Authorize(decode(action, payload)?),
            "BootNotification" => Self::BootNotification(decode(action, payload)?),
            "Heartbeat" => Self::Heartbeat(decode(action, payload)?),
            "MeterValues" => Self::MeterValues(decode(action, payload)?),
            "StartTransaction" => Self::StartTransaction(decode(action, payload)?),
            "StatusNotification" => Self::StatusNotification(decode(action, payload)?),
            "StopTransaction" => Self::StopTransaction(decode(action, payload)?),
            other => {
                return Err(DomainError::Validation(format!(
                    "unsupported OCPP 1.6 action: {}",
                    other
                )))
            }
        };
        Ok(request)
    }
}

impl OcppResponse {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Authorize(_) => "Authorize",
            Self::BootNotification(_) => "BootNotification",
            Self::Heartbeat(_) => "Heartbeat",
            Self::MeterValues(_) => "MeterValues",
            Self::StartTransaction(_) => "StartTransaction",
            Self::StatusNotification(_) => "StatusNotification",
            Self::StopTransaction(_) => "StopTransaction",
        }
    }

    /// Encode as the payload of a CallResult frame
    pub fn to_payload(&self) -> serde_json::Result<Value> {
        match self {
            Self::Authorize(r) => serde_json::to_value(r),
            Self::BootNotification(r) => serde_json::to_value(r),
            Self::Heartbeat(r) => serde_json::to_value(r),
            Self::MeterValues(r) => serde_json::to_value(r),
            Self::StartTransaction(r) => serde_json::to_value(r),
            Self::StatusNotification(r) => serde_json::to_value(r),
            Self::StopTransaction(r) => serde_json::to_value(r),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(action: &str, payload: Value) -> DomainResult<T> {
    serde_json::from_value(payload)
        .map_err(|e| DomainError::Validation(format!("malformed {} payload: {}", action, e)))
}
