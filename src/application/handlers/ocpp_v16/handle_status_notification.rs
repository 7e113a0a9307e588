//! StatusNotification handler

use chrono::Utc;
use rust_ocpp::v1_6::messages::status_notification::{
    StatusNotificationRequest, StatusNotificationResponse,
};
use tracing::info;

use super::{to_u32, wire_name};
use crate::application::handlers::OcppHandlerV16;
use crate::domain::{
    ChargePointErrorCode, ConnectorStatus, ConnectorStatusRecord, DomainError, DomainResult,
};

pub async fn handle_status_notification(
    handler: &OcppHandlerV16,
    req: StatusNotificationRequest,
) -> DomainResult<StatusNotificationResponse> {
    let status: ConnectorStatus = wire_name(&req.status)?
        .parse()
        .map_err(DomainError::Validation)?;
    let error_code: ChargePointErrorCode = wire_name(&req.error_code)?
        .parse()
        .map_err(DomainError::Validation)?;
    let connector_id = to_u32(req.connector_id, "connectorId")?;

    info!(
        charge_point_id = handler.charge_point_id.as_str(),
        connector_id,
        status = %status,
        error_code = %error_code,
        "StatusNotification"
    );

    handler
        .services
        .connectors
        .record(ConnectorStatusRecord {
            charge_point_id: handler.charge_point_id.clone(),
            connector_id,
            status,
            error_code,
            info: req.info,
            timestamp: req.timestamp.unwrap_or_else(Utc::now),
        })
        .await?;

    Ok(StatusNotificationResponse {})
}
