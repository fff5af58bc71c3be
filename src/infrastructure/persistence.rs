//! JSON-file `StationPersistence` (spec.md §6 "persistStation" / "loadStation").
//!
//! Writes to disk are serialised through a single named exclusive lock
//! (spec.md §5 "Shared resource policy"), keyed by resource kind — here just
//! `configuration`, since this adapter only persists station snapshots.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{CollaboratorError, CollaboratorResult, StationPersistence};
use crate::domain::station::StationSnapshot;

pub struct JsonFileStationPersistence {
    root: std::path::PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStationPersistence {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn snapshot_path(&self, station_id: &str) -> std::path::PathBuf {
        self.root.join(format!("{station_id}.json"))
    }
}

#[async_trait]
impl StationPersistence for JsonFileStationPersistence {
    async fn persist_station(&self, station_id: &str, snapshot: &StationSnapshot) -> CollaboratorResult<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.snapshot_path(station_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CollaboratorError::Persistence(e.to_string()))?;
        }
        let text = serde_json::to_string_pretty(snapshot).map_err(|e| CollaboratorError::Persistence(e.to_string()))?;
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| CollaboratorError::Persistence(format!("{}: {}", path.display(), e)))
    }

    async fn load_station(&self, station_id: &str) -> CollaboratorResult<Option<StationSnapshot>> {
        let path = self.snapshot_path(station_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| CollaboratorError::Persistence(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CollaboratorError::Persistence(format!("{}: {}", path.display(), e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::station::StationInfo;
    use chrono::Utc;
    use std::collections::HashMap;

    #[tokio::test]
    async fn round_trips_a_snapshot() {
        let dir = std::env::temp_dir().join(format!("station-persist-test-{}", uuid::Uuid::new_v4()));
        let persistence = JsonFileStationPersistence::new(&dir);

        let snapshot = StationSnapshot {
            station_id: "CP1".to_string(),
            info: StationInfo {
                charge_point_vendor: "Acme".to_string(),
                charge_point_model: "Model-X".to_string(),
                firmware_version: None,
                charge_point_serial_number: None,
                charge_box_serial_number: None,
                iccid: None,
                imsi: None,
                meter_type: None,
                meter_serial_number: None,
            },
            configuration: HashMap::new(),
            atg_statuses: HashMap::new(),
            saved_at: Utc::now(),
        };

        persistence.persist_station("CP1", &snapshot).await.unwrap();
        let loaded = persistence.load_station("CP1").await.unwrap().unwrap();
        assert_eq!(loaded.station_id, "CP1");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_snapshot_returns_none() {
        let dir = std::env::temp_dir().join(format!("station-persist-missing-{}", uuid::Uuid::new_v4()));
        let persistence = JsonFileStationPersistence::new(&dir);
        assert!(persistence.load_station("ghost").await.unwrap().is_none());
    }
}
