//! MeterValues handler

use rust_ocpp::v1_6::messages::meter_values::{MeterValuesRequest, MeterValuesResponse};
use tracing::info;

use super::{meter_samples, to_i32, to_u32};
use crate::application::handlers::OcppHandlerV16;
use crate::domain::DomainResult;

pub async fn handle_meter_values(
    handler: &OcppHandlerV16,
    req: MeterValuesRequest,
) -> DomainResult<MeterValuesResponse> {
    let connector_id = to_u32(req.connector_id, "connectorId")?;
    let transaction_id = req
        .transaction_id
        .map(|id| to_i32(id, "transactionId"))
        .transpose()?;
    let samples = meter_samples(&req.meter_value)?;

    info!(
        charge_point_id = handler.charge_point_id.as_str(),
        connector_id,
        transaction_id = ?transaction_id,
        samples = samples.len(),
        "MeterValues"
    );

    handler
        .services
        .meter_values
        .record_periodic(&handler.charge_point_id, connector_id, transaction_id, samples)
        .await?;

    Ok(MeterValuesResponse {})
}
