//! Inbound OCPP message handling

pub mod messages;
pub mod ocpp_v16;
mod ocpp_v16_handler;

pub use messages::{OcppRequest, OcppResponse};
pub use ocpp_v16_handler::OcppHandlerV16;
