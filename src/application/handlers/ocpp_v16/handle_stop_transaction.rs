//! StopTransaction handler

use rust_ocpp::v1_6::messages::stop_transaction::{
    StopTransactionRequest, StopTransactionResponse,
};
use tracing::info;

use super::{id_tag_info, meter_samples, to_i32, wire_name};
use crate::application::handlers::OcppHandlerV16;
use crate::application::services::StopTransactionInput;
use crate::domain::DomainResult;

pub async fn handle_stop_transaction(
    handler: &OcppHandlerV16,
    req: StopTransactionRequest,
) -> DomainResult<StopTransactionResponse> {
    let transaction_data = match req.transaction_data.as_deref() {
        Some(values) => meter_samples(values)?,
        None => Vec::new(),
    };
    let reason = req.reason.as_ref().map(wire_name).transpose()?;

    let input = StopTransactionInput {
        charge_point_id: handler.charge_point_id.clone(),
        transaction_id: to_i32(req.transaction_id, "transactionId")?,
        timestamp: req.timestamp,
        meter_stop: to_i32(req.meter_stop, "meterStop")?,
        id_tag: req.id_tag,
        reason,
        transaction_data,
    };

    info!(
        charge_point_id = handler.charge_point_id.as_str(),
        transaction_id = input.transaction_id,
        meter_stop = input.meter_stop,
        reason = ?input.reason,
        "StopTransaction"
    );

    let outcome = handler.services.transactions.stop(input).await?;

    Ok(StopTransactionResponse {
        id_tag_info: outcome.id_tag_info.as_ref().map(id_tag_info),
    })
}
