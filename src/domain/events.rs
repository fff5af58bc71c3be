//! Events emitted upward from a station runtime (spec.md §6: "Events emitted upward").
//!
//! `{started, stopped, accepted, rejected, pending, disconnected,
//! connectorStatusChanged, updated}` carrying station identity and the
//! relevant payload. Broadcast via [`crate::application::events::EventBus`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::connector::ConnectorStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    Started(StationLifecycleEvent),
    Stopped(StationLifecycleEvent),
    Accepted(RegistrationEvent),
    Rejected(RegistrationEvent),
    Pending(RegistrationEvent),
    Disconnected(StationLifecycleEvent),
    ConnectorStatusChanged(ConnectorStatusChangedEvent),
    Updated(StationUpdatedEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Started(_) => "started",
            Event::Stopped(_) => "stopped",
            Event::Accepted(_) => "accepted",
            Event::Rejected(_) => "rejected",
            Event::Pending(_) => "pending",
            Event::Disconnected(_) => "disconnected",
            Event::ConnectorStatusChanged(_) => "connector_status_changed",
            Event::Updated(_) => "updated",
        }
    }

    pub fn station_id(&self) -> &str {
        match self {
            Event::Started(e) | Event::Stopped(e) | Event::Disconnected(e) => &e.station_id,
            Event::Accepted(e) | Event::Rejected(e) | Event::Pending(e) => &e.station_id,
            Event::ConnectorStatusChanged(e) => &e.station_id,
            Event::Updated(e) => &e.station_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationLifecycleEvent {
    pub station_id: String,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationEvent {
    pub station_id: String,
    pub interval: i32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorStatusChangedEvent {
    pub station_id: String,
    pub connector_id: u32,
    pub status: ConnectorStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationUpdatedEvent {
    pub station_id: String,
    pub field: String,
    pub timestamp: DateTime<Utc>,
}
