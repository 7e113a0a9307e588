//! BootNotification handler

use chrono::Utc;
use rust_ocpp::v1_6::messages::boot_notification::{
    BootNotificationRequest, BootNotificationResponse,
};
use rust_ocpp::v1_6::types::RegistrationStatus;

use crate::application::handlers::OcppHandlerV16;
use crate::domain::{BootOutcome, DomainResult, OcppVersion};

pub async fn handle_boot_notification(
    handler: &OcppHandlerV16,
    protocol: OcppVersion,
    req: BootNotificationRequest,
) -> DomainResult<BootNotificationResponse> {
    let outcome = handler
        .services
        .charge_points
        .boot(
            &handler.charge_point_id,
            protocol,
            &req.charge_point_vendor,
            &req.charge_point_model,
        )
        .await?;

    let status = match outcome {
        BootOutcome::Accepted => RegistrationStatus::Accepted,
        BootOutcome::Rejected => RegistrationStatus::Rejected,
    };

    Ok(BootNotificationResponse {
        current_time: Utc::now(),
        interval: handler.heartbeat_interval.min(i32::MAX as u32),
        status,
    })
}
