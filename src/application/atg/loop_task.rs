//! Per-connector ATG loop (spec.md §4.6 pseudocode, §9 "Coroutine control flow").

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::atg::{AtgConfig, AtgStatus};
use crate::support::shutdown::ShutdownSignal;

use super::id_tag::IdTagPicker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTransactionStatus {
    Accepted,
    Rejected,
}

/// Callbacks the ATG loop needs from the owning station runtime — a trait
/// boundary so the loop is unit-testable without a real WebSocket
/// connection (spec.md §9 "Global async locks": explicit collaborators
/// instead of ambient singletons).
#[async_trait]
pub trait AtgHost: Send + Sync {
    fn is_station_accepted(&self) -> bool;
    fn connector_available(&self, connector_id: u32) -> bool;
    fn has_active_transaction(&self, connector_id: u32) -> bool;
    async fn authorize(&self, id_tag: &str) -> bool;
    async fn start_transaction(&self, connector_id: u32, id_tag: &str) -> StartTransactionStatus;
    async fn stop_transaction(&self, connector_id: u32);
}

fn uniform_duration(rng: &mut impl Rng, min_secs: u64, max_secs: u64) -> Duration {
    if max_secs <= min_secs {
        Duration::from_secs(min_secs)
    } else {
        Duration::from_secs(rng.gen_range(min_secs..=max_secs))
    }
}

/// Sleeps for `duration`, cancellable by `shutdown`. Returns `false` if the
/// sleep was interrupted by shutdown rather than completing.
async fn sleep_cancellable(duration: Duration, shutdown: &ShutdownSignal) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = shutdown.notified().wait() => false,
    }
}

/// Runs one connector's start/stop cycle until shutdown or its planned stop
/// date is reached (spec.md §4.6).
pub async fn run_connector_loop(
    connector_id: u32,
    config: AtgConfig,
    status: Arc<Mutex<AtgStatus>>,
    host: Arc<dyn AtgHost>,
    id_tag: Arc<IdTagPicker>,
    shutdown: ShutdownSignal,
) {
    if !config.enable {
        return;
    }

    let start_date = chrono::Utc::now();
    let planned_stop_date = if config.stop_absolute_duration {
        config
            .stop_after_hours
            .map(|hours| start_date + chrono::Duration::seconds((hours * 3600.0) as i64))
    } else {
        None
    };

    {
        let mut status = status.lock().await;
        status.running = true;
        status.start_date = Some(start_date);
        status.planned_stop_date = planned_stop_date;
    }

    let mut rng = rand::thread_rng();

    while !shutdown.is_triggered() {
        if !host.is_station_accepted() || !host.connector_available(connector_id) || host.has_active_transaction(connector_id) {
            if !sleep_cancellable(Duration::from_secs(1), &shutdown).await {
                break;
            }
            continue;
        }

        if let Some(stop_date) = planned_stop_date {
            if chrono::Utc::now() > stop_date {
                break;
            }
        }

        let delay = uniform_duration(&mut rng, config.min_delay_secs, config.max_delay_secs);
        if !sleep_cancellable(delay, &shutdown).await {
            break;
        }

        run_one_iteration(connector_id, &config, &status, &host, &id_tag, &shutdown, &mut rng).await;
        status.lock().await.last_run_date = Some(chrono::Utc::now());
    }

    let mut status = status.lock().await;
    status.running = false;
    status.actual_stopped_date = Some(chrono::Utc::now());
    info!(connector_id, "ATG loop stopped");
}

async fn run_one_iteration(
    connector_id: u32,
    config: &AtgConfig,
    status: &Arc<Mutex<AtgStatus>>,
    host: &Arc<dyn AtgHost>,
    id_tag: &Arc<IdTagPicker>,
    shutdown: &ShutdownSignal,
    rng: &mut impl Rng,
) {
    let draw: f64 = rng.gen();
    if draw >= config.probability_of_start {
        let mut status = status.lock().await;
        status.skipped_consecutive += 1;
        status.skipped_total += 1;
        return;
    }

    let Some(tag) = id_tag.pick(connector_id) else {
        let mut status = status.lock().await;
        status.skipped_consecutive += 1;
        status.skipped_total += 1;
        return;
    };

    if config.require_authorize {
        let authorized = host.authorize(&tag).await;
        let mut status = status.lock().await;
        if authorized {
            status.authorize_requests_accepted += 1;
        } else {
            status.authorize_requests_rejected += 1;
            return;
        }
    }

    status.lock().await.skipped_consecutive = 0;

    match host.start_transaction(connector_id, &tag).await {
        StartTransactionStatus::Accepted => {
            status.lock().await.start_requests_accepted += 1;
            let duration = uniform_duration(rng, config.min_duration_secs, config.max_duration_secs);
            if sleep_cancellable(duration, shutdown).await {
                host.stop_transaction(connector_id).await;
                status.lock().await.stop_requests_accepted += 1;
            }
        }
        StartTransactionStatus::Rejected => {
            status.lock().await.start_requests_rejected += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct AlwaysAcceptHost {
        active: std::sync::atomic::AtomicBool,
        starts: AtomicU32,
        stops: AtomicU32,
    }

    #[async_trait]
    impl AtgHost for AlwaysAcceptHost {
        fn is_station_accepted(&self) -> bool {
            true
        }
        fn connector_available(&self, _connector_id: u32) -> bool {
            true
        }
        fn has_active_transaction(&self, _connector_id: u32) -> bool {
            self.active.load(Ordering::SeqCst)
        }
        async fn authorize(&self, _id_tag: &str) -> bool {
            true
        }
        async fn start_transaction(&self, _connector_id: u32, _id_tag: &str) -> StartTransactionStatus {
            self.active.store(true, Ordering::SeqCst);
            self.starts.fetch_add(1, Ordering::SeqCst);
            StartTransactionStatus::Accepted
        }
        async fn stop_transaction(&self, _connector_id: u32) {
            self.active.store(false, Ordering::SeqCst);
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn s3_scenario_start_then_stop_within_ten_seconds() {
        let host = Arc::new(AlwaysAcceptHost {
            active: std::sync::atomic::AtomicBool::new(false),
            starts: AtomicU32::new(0),
            stops: AtomicU32::new(0),
        });
        let config = AtgConfig {
            enable: true,
            min_duration_secs: 2,
            max_duration_secs: 2,
            min_delay_secs: 1,
            max_delay_secs: 1,
            probability_of_start: 1.0,
            stop_after_hours: None,
            stop_absolute_duration: false,
            require_authorize: false,
            id_tag_distribution: crate::domain::atg::IdTagDistribution::Random,
        };
        let status = Arc::new(Mutex::new(AtgStatus::new(1)));
        let id_tag = Arc::new(IdTagPicker::new(vec!["TAG1".into()], crate::domain::atg::IdTagDistribution::Random));
        let shutdown = ShutdownSignal::new();

        let shutdown_for_task = shutdown.clone();
        let host_for_loop = host.clone();
        let status_for_loop = status.clone();
        let handle = tokio::spawn(async move {
            run_connector_loop(1, config, status_for_loop, host_for_loop, id_tag, shutdown_for_task).await;
        });

        tokio::time::advance(Duration::from_secs(4)).await;
        shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;

        assert!(host.starts.load(Ordering::SeqCst) >= 1);
        assert!(host.stops.load(Ordering::SeqCst) >= 1);
        let status = status.lock().await;
        assert_eq!(status.start_requests_total(), status.start_requests_accepted + status.start_requests_rejected);
    }
}
