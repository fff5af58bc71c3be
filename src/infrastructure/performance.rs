//! Logging-only `PerformanceRecorder` (SPEC_FULL.md §F: observability is
//! ambient, not excluded by the admin-front-end Non-goal).

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{CollaboratorResult, PerformanceRecorder, PerformanceStatistics};

/// Records performance statistics as structured `tracing` events rather than
/// to a storage backend — the storage backend itself is out of scope (§1).
pub struct LoggingPerformanceRecorder;

#[async_trait]
impl PerformanceRecorder for LoggingPerformanceRecorder {
    async fn store_performance_statistics(&self, stats: PerformanceStatistics) -> CollaboratorResult<()> {
        debug!(
            station_id = %stats.station_id,
            connector_id = ?stats.connector_id,
            metric = %stats.metric,
            value = stats.value,
            "performance statistic recorded"
        );
        metrics::histogram!("ocpp_station_sim_performance_statistic", "metric" => stats.metric.clone()).record(stats.value);
        Ok(())
    }
}
