//! External collaborator interfaces (spec.md §6 "Configuration callbacks").
//!
//! §1 scopes configuration-file loading, station-template JSON parsing,
//! and on-disk performance-record storage out of the core as concrete
//! subsystems; the core only depends on these trait boundaries. Default
//! filesystem-based adapters live in [`crate::infrastructure`].

use async_trait::async_trait;
use thiserror::Error;

use super::station::StationSnapshot;
use super::template::StationTemplate;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("template load failed: {0}")]
    TemplateLoad(String),
    #[error("id-tag source failed: {0}")]
    IdTagSource(String),
    #[error("persistence failed: {0}")]
    Persistence(String),
    #[error("performance recorder failed: {0}")]
    PerformanceRecorder(String),
}

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// `getTemplate(path) → template`
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn get_template(&self, path: &str) -> CollaboratorResult<StationTemplate>;
}

/// `getIdTags(file) → string[]`
#[async_trait]
pub trait IdTagSource: Send + Sync {
    async fn get_id_tags(&self, file: &str) -> CollaboratorResult<Vec<String>>;
}

/// `persistStation(stationId, snapshot)` / `loadStation(stationId) → snapshot?`
#[async_trait]
pub trait StationPersistence: Send + Sync {
    async fn persist_station(&self, station_id: &str, snapshot: &StationSnapshot) -> CollaboratorResult<()>;
    async fn load_station(&self, station_id: &str) -> CollaboratorResult<Option<StationSnapshot>>;
}

/// A single performance observation handed to `storePerformanceStatistics`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PerformanceStatistics {
    pub station_id: String,
    pub connector_id: Option<u32>,
    pub metric: String,
    pub value: f64,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// `storePerformanceStatistics(stats)`
#[async_trait]
pub trait PerformanceRecorder: Send + Sync {
    async fn store_performance_statistics(&self, stats: PerformanceStatistics) -> CollaboratorResult<()>;
}
