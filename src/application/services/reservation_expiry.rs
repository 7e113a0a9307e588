//! Background task that periodically expires overdue reservations.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use super::reservation::ReservationManager;
use crate::shared::shutdown::ShutdownSignal;

/// Start the reservation expiry loop. Every `check_interval_secs` it moves
/// `Accepted` reservations past their expiry date to `Expired`. Exits when
/// `shutdown` fires.
pub fn start_reservation_expiry_task(
    manager: Arc<ReservationManager>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(check_interval = check_interval_secs, "Reservation expiry task started");

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = manager.expire_overdue(Utc::now()).await {
                        warn!(error = %e, transient = e.is_transient(), "Reservation expiry check error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Reservation expiry task shutting down");
                    break;
                }
            }
        }

        info!("Reservation expiry task stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::locks::KeyedLocks;
    use crate::domain::{ChargePoint, RepositoryProvider, ReservationStatus};
    use crate::infrastructure::InMemoryRepositoryProvider;

    #[tokio::test]
    async fn task_expires_and_stops_on_shutdown() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.charge_points().save(ChargePoint::new("CP001")).await.unwrap();
        let manager = Arc::new(ReservationManager::new(repos.clone(), Arc::new(KeyedLocks::new())));

        let r = manager
            .reserve("CP001", 1, "TAG", Utc::now() + chrono::Duration::milliseconds(50))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let shutdown = ShutdownSignal::new();
        let handle = start_reservation_expiry_task(manager.clone(), shutdown.clone(), 1);

        // The first tick fires immediately
        let mut status = ReservationStatus::Accepted;
        for _ in 0..50 {
            status = manager.find(r.id).await.unwrap().unwrap().status;
            if status == ReservationStatus::Expired {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(status, ReservationStatus::Expired);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("task did not stop")
            .unwrap();
    }
}
