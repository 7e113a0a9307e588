//! Authorize handler

use rust_ocpp::v1_6::messages::authorize::{AuthorizeRequest, AuthorizeResponse};
use tracing::info;

use super::id_tag_info;
use crate::application::handlers::OcppHandlerV16;
use crate::domain::DomainResult;

pub async fn handle_authorize(
    handler: &OcppHandlerV16,
    req: AuthorizeRequest,
) -> DomainResult<AuthorizeResponse> {
    let auth = handler.services.authorization.authorize(&req.id_tag).await?;

    info!(
        charge_point_id = handler.charge_point_id.as_str(),
        id_tag = req.id_tag.as_str(),
        status = %auth.status,
        "Authorize"
    );

    Ok(AuthorizeResponse {
        id_tag_info: id_tag_info(&auth),
    })
}
