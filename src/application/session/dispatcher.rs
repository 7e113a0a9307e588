//! Per-charge-point message dispatcher
//!
//! Every charge box gets one worker task fed by an unbounded queue, so its
//! messages are handled strictly in arrival order while different charge
//! boxes run in parallel. The dispatcher holds no business state.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::application::handlers::{OcppHandlerV16, OcppRequest, OcppResponse};
use crate::application::services::CoreServices;
use crate::config::OcppSection;
use crate::domain::{DomainError, DomainResult, OcppVersion};

struct Envelope {
    protocol: OcppVersion,
    request: OcppRequest,
    reply: oneshot::Sender<DomainResult<OcppResponse>>,
}

pub struct MessageDispatcher {
    services: CoreServices,
    heartbeat_interval: u32,
    request_timeout: Duration,
    sessions: DashMap<String, mpsc::UnboundedSender<Envelope>>,
}

impl MessageDispatcher {
    pub fn new(services: CoreServices, ocpp: &OcppSection) -> Self {
        Self {
            services,
            heartbeat_interval: ocpp.heartbeat_interval_secs,
            request_timeout: ocpp.request_timeout(),
            sessions: DashMap::new(),
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Queue a request on the charge box's session and wait for its response.
    /// The session is created on first use.
    pub async fn dispatch(
        &self,
        charge_point_id: &str,
        protocol: OcppVersion,
        request: OcppRequest,
    ) -> DomainResult<OcppResponse> {
        let (reply, response) = oneshot::channel();
        let mut envelope = Envelope {
            protocol,
            request,
            reply,
        };

        // A worker that exited leaves a closed sender behind; replace it once.
        for _ in 0..2 {
            let sender = self
                .sessions
                .entry(charge_point_id.to_string())
                .or_insert_with(|| self.spawn_session(charge_point_id))
                .clone();
            match sender.send(envelope) {
                Ok(()) => {
                    return response
                        .await
                        .map_err(|_| DomainError::SessionClosed(charge_point_id.to_string()))?;
                }
                Err(mpsc::error::SendError(returned)) => {
                    envelope = returned;
                    self.sessions
                        .remove_if(charge_point_id, |_, s| s.same_channel(&sender));
                }
            }
        }

        Err(DomainError::SessionClosed(charge_point_id.to_string()))
    }

    /// Close a charge box's session. Messages already queued are still
    /// handled before the worker exits.
    pub fn close_session(&self, charge_point_id: &str) {
        if self.sessions.remove(charge_point_id).is_some() {
            info!(charge_point_id, "Session closed");
        } else {
            debug!(charge_point_id, "No session to close");
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_active(&self, charge_point_id: &str) -> bool {
        self.sessions.contains_key(charge_point_id)
    }

    fn spawn_session(&self, charge_point_id: &str) -> mpsc::UnboundedSender<Envelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = OcppHandlerV16::new(
            charge_point_id,
            self.services.clone(),
            self.heartbeat_interval,
        );
        info!(charge_point_id, "Session opened");
        tokio::spawn(run_session(handler, rx, self.request_timeout));
        tx
    }
}

async fn run_session(
    handler: OcppHandlerV16,
    mut queue: mpsc::UnboundedReceiver<Envelope>,
    request_timeout: Duration,
) {
    while let Some(Envelope {
        protocol,
        request,
        reply,
    }) = queue.recv().await
    {
        let action = request.action();
        let started = Instant::now();

        // Dropping the timed-out future rolls back its unit of work
        let result =
            match tokio::time::timeout(request_timeout, handler.handle(protocol, request)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        charge_point_id = handler.charge_point_id.as_str(),
                        action,
                        timeout_ms = request_timeout.as_millis() as u64,
                        "Request timed out"
                    );
                    Err(DomainError::StorageTimeout(request_timeout))
                }
            };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) if e.is_transient() => "transient",
            Err(_) => "error",
        };
        metrics::histogram!("ocpp_inbound_latency_seconds", "action" => action)
            .record(started.elapsed().as_secs_f64());
        metrics::counter!("ocpp_inbound_total", "action" => action, "outcome" => outcome)
            .increment(1);

        if let Err(e) = &result {
            warn!(
                charge_point_id = handler.charge_point_id.as_str(),
                action,
                error = %e,
                "Request failed"
            );
        }

        if reply.send(result).is_err() {
            debug!(
                charge_point_id = handler.charge_point_id.as_str(),
                action,
                "Caller went away before the response"
            );
        }
    }

    debug!(charge_point_id = handler.charge_point_id.as_str(), "Session worker stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::{ChargePoint, OcppTag, RepositoryProvider};
    use crate::infrastructure::InMemoryRepositoryProvider;

    async fn dispatcher() -> (Arc<InMemoryRepositoryProvider>, MessageDispatcher) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        for id in ["CP001", "CP002"] {
            repos.charge_points().save(ChargePoint::new(id)).await.unwrap();
        }
        repos.id_tags().save(OcppTag::new("TAG-1")).await.unwrap();
        let ocpp = OcppSection::default();
        let services = CoreServices::new(repos.clone(), &ocpp);
        (repos, MessageDispatcher::new(services, &ocpp))
    }

    fn request(action: &str, payload: Value) -> OcppRequest {
        OcppRequest::from_payload(action, payload).unwrap()
    }

    #[tokio::test]
    async fn messages_of_one_charge_point_are_handled_in_order() {
        let (repos, d) = dispatcher().await;
        let now = Utc::now().to_rfc3339();

        // The first transaction of a fresh store gets id 1
        let start = d.dispatch(
            "CP001",
            OcppVersion::V16,
            request(
                "StartTransaction",
                json!({ "connectorId": 1, "idTag": "TAG-1", "meterStart": 0, "timestamp": now }),
            ),
        );
        let meter = d.dispatch(
            "CP001",
            OcppVersion::V16,
            request(
                "MeterValues",
                json!({
                    "connectorId": 1,
                    "transactionId": 1,
                    "meterValue": [{ "timestamp": now, "sampledValue": [{ "value": "5.0" }] }]
                }),
            ),
        );
        let stop = d.dispatch(
            "CP001",
            OcppVersion::V16,
            request(
                "StopTransaction",
                json!({ "transactionId": 1, "meterStop": 5, "timestamp": now }),
            ),
        );

        let (start, meter, stop) = tokio::join!(start, meter, stop);
        assert!(matches!(start.unwrap(), OcppResponse::StartTransaction(r) if r.transaction_id == 1));
        meter.unwrap();
        stop.unwrap();

        let readings = repos.meter_values().find_by_transaction(1).await.unwrap();
        assert_eq!(readings.len(), 1);
        assert!(!repos.transactions().find_by_id(1).await.unwrap().unwrap().is_open());
    }

    #[tokio::test]
    async fn sessions_are_created_lazily_and_closed() {
        let (_, d) = dispatcher().await;
        assert_eq!(d.session_count(), 0);

        for cp in ["CP001", "CP002"] {
            d.dispatch(cp, OcppVersion::V16, request("Heartbeat", json!({})))
                .await
                .unwrap();
        }
        assert_eq!(d.session_count(), 2);

        d.close_session("CP001");
        assert!(!d.is_active("CP001"));
        assert_eq!(d.session_count(), 1);

        // A new message reopens the session
        d.dispatch("CP001", OcppVersion::V16, request("Heartbeat", json!({})))
            .await
            .unwrap();
        assert!(d.is_active("CP001"));
    }

    #[tokio::test]
    async fn business_errors_are_returned_to_the_caller() {
        let (_, d) = dispatcher().await;
        let err = d
            .dispatch(
                "CP001",
                OcppVersion::V16,
                request(
                    "StopTransaction",
                    json!({ "transactionId": 99, "meterStop": 5, "timestamp": Utc::now().to_rfc3339() }),
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::IntegrityViolation(_)));

        // The session keeps working afterwards
        d.dispatch("CP001", OcppVersion::V16, request("Heartbeat", json!({})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn timeout_is_transient_and_rolls_back() {
        let (repos, d) = dispatcher().await;
        let d = d.with_request_timeout(Duration::from_millis(100));

        // An open unit of work blocks every other writer
        let blocker = repos.begin().await.unwrap();
        let err = d
            .dispatch(
                "CP001",
                OcppVersion::V16,
                request(
                    "StartTransaction",
                    json!({
                        "connectorId": 1,
                        "idTag": "TAG-1",
                        "meterStart": 0,
                        "timestamp": Utc::now().to_rfc3339()
                    }),
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StorageTimeout(_)));
        assert!(err.is_transient());
        drop(blocker);

        assert!(repos.transactions().find_all().await.unwrap().is_empty());
        assert!(!repos.id_tags().find_by_id("TAG-1").await.unwrap().unwrap().in_transaction);
    }
}
