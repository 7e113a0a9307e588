//! Heartbeat handler

use rust_ocpp::v1_6::messages::heart_beat::{HeartbeatRequest, HeartbeatResponse};
use tracing::debug;

use crate::application::handlers::OcppHandlerV16;
use crate::domain::DomainResult;

pub async fn handle_heartbeat(
    handler: &OcppHandlerV16,
    _req: HeartbeatRequest,
) -> DomainResult<HeartbeatResponse> {
    let current_time = handler
        .services
        .charge_points
        .heartbeat(&handler.charge_point_id)
        .await?;
    debug!(charge_point_id = handler.charge_point_id.as_str(), "Heartbeat");
    Ok(HeartbeatResponse { current_time })
}
