//! OCPP 1.6 message handler
//!
//! One handler per charge point session. Routes typed requests to the
//! action handlers in [`super::ocpp_v16`].

use tracing::debug;

use super::messages::{OcppRequest, OcppResponse};
use super::ocpp_v16;
use crate::application::services::CoreServices;
use crate::domain::{DomainResult, OcppVersion};

/// Handler for OCPP 1.6 messages of one charge point
pub struct OcppHandlerV16 {
    pub charge_point_id: String,
    pub services: CoreServices,
    /// Seconds returned as the heartbeat interval on boot
    pub heartbeat_interval: u32,
}

impl OcppHandlerV16 {
    pub fn new(
        charge_point_id: impl Into<String>,
        services: CoreServices,
        heartbeat_interval: u32,
    ) -> Self {
        Self {
            charge_point_id: charge_point_id.into(),
            services,
            heartbeat_interval,
        }
    }

    /// Handle one request. `protocol` is the version negotiated by the
    /// transport for this session.
    pub async fn handle(
        &self,
        protocol: OcppVersion,
        request: OcppRequest,
    ) -> DomainResult<OcppResponse> {
        debug!(
            charge_point_id = self.charge_point_id.as_str(),
            action = request.action(),
            "Handling request"
        );

        let response = match request {
            OcppRequest::Authorize(req) => {
                OcppResponse::Authorize(ocpp_v16::handle_authorize(self, req).await?)
            }
            OcppRequest::BootNotification(req) => OcppResponse::BootNotification(
                ocpp_v16::handle_boot_notification(self, protocol, req).await?,
            ),
            OcppRequest::Heartbeat(req) => {
                OcppResponse::Heartbeat(ocpp_v16::handle_heartbeat(self, req).await?)
            }
            OcppRequest::MeterValues(req) => {
                OcppResponse::MeterValues(ocpp_v16::handle_meter_values(self, req).await?)
            }
            OcppRequest::StartTransaction(req) => OcppResponse::StartTransaction(
                ocpp_v16::handle_start_transaction(self, req).await?,
            ),
            OcppRequest::StatusNotification(req) => OcppResponse::StatusNotification(
                ocpp_v16::handle_status_notification(self, req).await?,
            ),
            OcppRequest::StopTransaction(req) => OcppResponse::StopTransaction(
                ocpp_v16::handle_stop_transaction(self, req).await?,
            ),
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};

    use super::*;
    use crate::config::OcppSection;
    use crate::domain::{ChargePoint, ConnectorStatus, DomainError, OcppTag, RepositoryProvider};
    use crate::infrastructure::InMemoryRepositoryProvider;

    const CONNECTORS: u32 = 5;

    async fn handler(charge_point_id: &str) -> (Arc<InMemoryRepositoryProvider>, OcppHandlerV16) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.charge_points().save(ChargePoint::new("CP001")).await.unwrap();
        repos.id_tags().save(OcppTag::new("TAG-1")).await.unwrap();
        let services = CoreServices::new(repos.clone(), &OcppSection::default());
        (repos, OcppHandlerV16::new(charge_point_id, services, 300))
    }

    async fn call(handler: &OcppHandlerV16, action: &str, payload: Value) -> DomainResult<Value> {
        let request = OcppRequest::from_payload(action, payload)?;
        let response = handler.handle(OcppVersion::V16, request).await?;
        assert_eq!(response.action(), action);
        Ok(response.to_payload().unwrap())
    }

    fn meter_value(at: DateTime<Utc>, values: &[&str]) -> Value {
        let sampled: Vec<Value> = values
            .iter()
            .map(|v| json!({ "value": v, "measurand": "Energy.Active.Import.Register", "unit": "Wh" }))
            .collect();
        json!({ "timestamp": at.to_rfc3339(), "sampledValue": sampled })
    }

    #[tokio::test]
    async fn boot_of_unregistered_charge_point_is_rejected() {
        let (repos, h) = handler("GHOST").await;
        let resp = call(
            &h,
            "BootNotification",
            json!({ "chargePointVendor": "Acme", "chargePointModel": "X1" }),
        )
        .await
        .unwrap();
        assert_eq!(resp["status"], "Rejected");
        assert!(repos.charge_points().find_by_id("GHOST").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn boot_of_registered_charge_point_records_protocol() {
        let (repos, h) = handler("CP001").await;
        let resp = call(
            &h,
            "BootNotification",
            json!({ "chargePointVendor": "Acme", "chargePointModel": "X1" }),
        )
        .await
        .unwrap();
        assert_eq!(resp["status"], "Accepted");
        assert_eq!(resp["interval"], 300);
        assert!(resp["currentTime"].is_string());

        let cp = repos.charge_points().find_by_id("CP001").await.unwrap().unwrap();
        assert!(cp.ocpp_protocol.unwrap().as_str().contains("ocpp1.6"));
    }

    #[tokio::test]
    async fn authorize_known_and_unknown_tags() {
        let (_, h) = handler("CP001").await;
        let resp = call(&h, "Authorize", json!({ "idTag": "TAG-1" })).await.unwrap();
        assert_eq!(resp["idTagInfo"]["status"], "Accepted");

        let resp = call(&h, "Authorize", json!({ "idTag": "R4ND0M" })).await.unwrap();
        assert_eq!(resp["idTagInfo"]["status"], "Invalid");
    }

    #[tokio::test]
    async fn status_sweep_over_all_connectors() {
        let (repos, h) = handler("CP001").await;

        for status in ConnectorStatus::ALL {
            for connector_id in 0..=CONNECTORS {
                call(
                    &h,
                    "StatusNotification",
                    json!({
                        "connectorId": connector_id,
                        "status": status.as_str(),
                        "errorCode": "NoError"
                    }),
                )
                .await
                .unwrap();
            }
            let all = repos.connectors().find_by_charge_point("CP001").await.unwrap();
            assert_eq!(all.len(), (CONNECTORS + 1) as usize);
            assert!(all.iter().all(|r| r.status == status));
        }

        for connector_id in 0..=CONNECTORS {
            call(
                &h,
                "StatusNotification",
                json!({ "connectorId": connector_id, "status": "Available", "errorCode": "NoError" }),
            )
            .await
            .unwrap();
        }
        call(
            &h,
            "StatusNotification",
            json!({ "connectorId": 1, "status": "Faulted", "errorCode": "HighTemperature" }),
        )
        .await
        .unwrap();
        for r in repos.connectors().find_by_charge_point("CP001").await.unwrap() {
            if r.connector_id == 1 {
                assert_eq!(r.status, ConnectorStatus::Faulted);
                assert_eq!(r.error_code.as_str(), "HighTemperature");
            } else {
                assert_eq!(r.status, ConnectorStatus::Available);
                assert_eq!(r.error_code.as_str(), "NoError");
            }
        }
    }

    #[tokio::test]
    async fn stop_of_unknown_transaction_is_an_error() {
        let (_, h) = handler("CP001").await;
        let err = call(
            &h,
            "StopTransaction",
            json!({ "transactionId": 4242, "meterStop": 1, "timestamp": Utc::now().to_rfc3339() }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::IntegrityViolation(_)));
    }

    /// Full charging session with optional periodic readings and optional
    /// final readings on stop.
    async fn charging_session(with_meter_values: bool, with_transaction_data: bool) {
        let (repos, h) = handler("CP001").await;

        let boot = call(
            &h,
            "BootNotification",
            json!({ "chargePointVendor": "Acme", "chargePointModel": "X1" }),
        )
        .await
        .unwrap();
        assert_eq!(boot["status"], "Accepted");

        for connector_id in 0..=CONNECTORS {
            call(
                &h,
                "StatusNotification",
                json!({ "connectorId": connector_id, "status": "Available", "errorCode": "NoError" }),
            )
            .await
            .unwrap();
        }

        let beat = call(&h, "Heartbeat", json!({})).await.unwrap();
        assert!(beat["currentTime"].is_string());

        let auth = call(&h, "Authorize", json!({ "idTag": "TAG-1" })).await.unwrap();
        assert_eq!(auth["idTagInfo"]["status"], "Accepted");

        let start = call(
            &h,
            "StartTransaction",
            json!({
                "connectorId": 2,
                "idTag": "TAG-1",
                "meterStart": 0,
                "timestamp": Utc::now().to_rfc3339()
            }),
        )
        .await
        .unwrap();
        assert_eq!(start["idTagInfo"]["status"], "Accepted");
        let transaction_id = start["transactionId"].as_i64().unwrap() as i32;
        assert!(repos.id_tags().find_by_id("TAG-1").await.unwrap().unwrap().in_transaction);

        call(
            &h,
            "StatusNotification",
            json!({ "connectorId": 2, "status": "Charging", "errorCode": "NoError" }),
        )
        .await
        .unwrap();

        let periodic = ["3.0", "13.0", "23.0"];
        if with_meter_values {
            call(
                &h,
                "MeterValues",
                json!({
                    "connectorId": 2,
                    "transactionId": transaction_id,
                    "meterValue": [meter_value(Utc::now(), &periodic)]
                }),
            )
            .await
            .unwrap();
        }

        let final_readings = ["0.0", "10.0", "20.0", "30.0"];
        let stop_at = Utc::now();
        let mut stop = json!({
            "transactionId": transaction_id,
            "idTag": "TAG-1",
            "meterStop": 30,
            "timestamp": stop_at.to_rfc3339(),
            "reason": "Local"
        });
        if with_transaction_data {
            stop["transactionData"] = json!([meter_value(stop_at, &final_readings)]);
        }
        let stopped = call(&h, "StopTransaction", stop).await.unwrap();
        assert_eq!(stopped["idTagInfo"]["status"], "Accepted");

        call(
            &h,
            "StatusNotification",
            json!({ "connectorId": 2, "status": "Available", "errorCode": "NoError" }),
        )
        .await
        .unwrap();

        let tx = repos.transactions().find_by_id(transaction_id).await.unwrap().unwrap();
        let tx_stop = tx.stop.unwrap();
        assert_eq!(tx_stop.timestamp, stop_at);
        assert_eq!(tx_stop.meter_value, 30);
        assert_eq!(tx_stop.reason.as_deref(), Some("Local"));
        assert!(!repos.id_tags().find_by_id("TAG-1").await.unwrap().unwrap().in_transaction);

        let mut expected: Vec<&str> = Vec::new();
        if with_meter_values {
            expected.extend(periodic);
        }
        if with_transaction_data {
            expected.extend(final_readings);
        }
        let stored: Vec<String> = repos
            .meter_values()
            .find_by_transaction(transaction_id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.reading.value)
            .collect();
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn session_without_readings() {
        charging_session(false, false).await;
    }

    #[tokio::test]
    async fn session_with_periodic_readings() {
        charging_session(true, false).await;
    }

    #[tokio::test]
    async fn session_with_final_readings() {
        charging_session(false, true).await;
    }

    #[tokio::test]
    async fn session_with_periodic_and_final_readings() {
        charging_session(true, true).await;
    }
}
