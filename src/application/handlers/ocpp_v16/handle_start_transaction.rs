//! StartTransaction handler

use rust_ocpp::v1_6::messages::start_transaction::{
    StartTransactionRequest, StartTransactionResponse,
};
use tracing::info;

use super::{id_tag_info, to_i32, to_u32};
use crate::application::handlers::OcppHandlerV16;
use crate::application::services::StartTransactionInput;
use crate::domain::DomainResult;

pub async fn handle_start_transaction(
    handler: &OcppHandlerV16,
    req: StartTransactionRequest,
) -> DomainResult<StartTransactionResponse> {
    let input = StartTransactionInput {
        charge_point_id: handler.charge_point_id.clone(),
        connector_id: to_u32(req.connector_id, "connectorId")?,
        id_tag: req.id_tag,
        timestamp: req.timestamp,
        meter_start: to_i32(req.meter_start, "meterStart")?,
        reservation_id: req
            .reservation_id
            .map(|id| to_i32(id, "reservationId"))
            .transpose()?,
    };

    info!(
        charge_point_id = handler.charge_point_id.as_str(),
        connector_id = input.connector_id,
        id_tag = input.id_tag.as_str(),
        meter_start = input.meter_start,
        reservation_id = ?input.reservation_id,
        "StartTransaction"
    );

    let outcome = handler.services.transactions.start(input).await?;

    Ok(StartTransactionResponse {
        transaction_id: outcome.transaction_id,
        id_tag_info: id_tag_info(&outcome.id_tag_info),
    })
}
