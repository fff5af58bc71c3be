//! Station identity, registration lifecycle, and the persistent/volatile
//! split described in spec.md §3 ("Station").

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::configuration_key::ConfigurationKey;

/// Negotiated OCPP protocol version for a station's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OcppVersion {
    #[serde(rename = "1.6")]
    V16,
    #[serde(rename = "2.0.1")]
    V201,
}

impl fmt::Display for OcppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V16 => write!(f, "1.6"),
            Self::V201 => write!(f, "2.0.1"),
        }
    }
}

impl OcppVersion {
    /// The `Sec-WebSocket-Protocol` subprotocol token for this version.
    pub fn subprotocol(&self) -> &'static str {
        match self {
            Self::V16 => "ocpp1.6",
            Self::V201 => "ocpp2.0.1",
        }
    }
}

/// Registration lifecycle, per spec.md §4.3.
///
/// `Disconnected → Connecting → Booting → {Accepted | Pending | Rejected} → …`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationState {
    Disconnected,
    Connecting,
    Booting,
    Accepted,
    Pending,
    Rejected,
    Unknown,
    Reconnecting,
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Vendor/model/firmware info reported in BootNotification, mutable across reboots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationInfo {
    pub charge_point_vendor: String,
    pub charge_point_model: String,
    pub firmware_version: Option<String>,
    pub charge_point_serial_number: Option<String>,
    pub charge_box_serial_number: Option<String>,
    pub iccid: Option<String>,
    pub imsi: Option<String>,
    pub meter_type: Option<String>,
    pub meter_serial_number: Option<String>,
}

/// Fields that survive a restart (serialised on shutdown, restored on boot).
///
/// See spec.md §3: "Persistent fields (station info, OCPP configuration,
/// ATG statuses) are serialised on shutdown and restored on restart;
/// volatile fields are re-derived."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub station_id: String,
    pub info: StationInfo,
    pub configuration: HashMap<String, ConfigurationKey>,
    pub atg_statuses: HashMap<u32, super::atg::AtgStatus>,
    pub saved_at: DateTime<Utc>,
}

/// A single simulated station's identity and connection endpoint.
///
/// Volatile runtime state (registration state, OCPP version in use,
/// connector/transaction state, pending request map) lives in
/// [`crate::application::station::StationRuntime`], not here — this type
/// is the stable identity plus persisted business fields.
#[derive(Debug, Clone)]
pub struct Station {
    pub station_id: String,
    /// Hash of the stable template fields, used as a short correlation id in logs.
    pub hash_id: String,
    pub info: StationInfo,
    pub ocpp_version: OcppVersion,
    /// `ws://` or `wss://` endpoint, with the station id appended as a path suffix.
    pub endpoint: String,
    pub configuration: HashMap<String, ConfigurationKey>,
}

impl Station {
    pub fn new(
        station_id: impl Into<String>,
        info: StationInfo,
        ocpp_version: OcppVersion,
        endpoint: impl Into<String>,
    ) -> Self {
        let station_id = station_id.into();
        let hash_id = derive_hash_id(&station_id, &info);
        Self {
            station_id,
            hash_id,
            info,
            ocpp_version,
            endpoint: endpoint.into(),
            configuration: HashMap::new(),
        }
    }

    /// The URL charging-station sessions connect to: endpoint + `/` + station id.
    pub fn connection_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.station_id)
    }
}

/// Deterministic short hash of the stable template fields.
///
/// Not cryptographic — just stable enough that the same template always
/// produces the same hashId across restarts, for log correlation.
fn derive_hash_id(station_id: &str, info: &StationInfo) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    station_id.hash(&mut hasher);
    info.charge_point_vendor.hash(&mut hasher);
    info.charge_point_model.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}
