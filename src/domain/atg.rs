//! Automatic Transaction Generator data model (spec.md §3 "ATG Status", §4.6).
//!
//! This module only holds configuration and accounting state; the loop
//! itself lives in [`crate::application::atg`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdTagDistribution {
    Random,
    RoundRobin,
    ConnectorAffinity,
}

impl Default for IdTagDistribution {
    fn default() -> Self {
        Self::Random
    }
}

/// Per-station ATG configuration (spec.md §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtgConfig {
    pub enable: bool,
    pub min_duration_secs: u64,
    pub max_duration_secs: u64,
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
    pub probability_of_start: f64,
    pub stop_after_hours: Option<f64>,
    pub stop_absolute_duration: bool,
    pub require_authorize: bool,
    #[serde(default)]
    pub id_tag_distribution: IdTagDistribution,
}

impl Default for AtgConfig {
    fn default() -> Self {
        Self {
            enable: true,
            min_duration_secs: 60,
            max_duration_secs: 300,
            min_delay_secs: 15,
            max_delay_secs: 30,
            probability_of_start: 1.0,
            stop_after_hours: None,
            stop_absolute_duration: false,
            require_authorize: false,
            id_tag_distribution: IdTagDistribution::Random,
        }
    }
}

/// Per-connector ATG counters and scheduling state (spec.md §3 "ATG Status").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtgStatus {
    pub connector_id: u32,
    pub authorize_requests_accepted: u64,
    pub authorize_requests_rejected: u64,
    pub start_requests_accepted: u64,
    pub start_requests_rejected: u64,
    pub stop_requests_accepted: u64,
    pub stop_requests_rejected: u64,
    pub skipped_consecutive: u64,
    pub skipped_total: u64,
    pub running: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub planned_stop_date: Option<DateTime<Utc>>,
    pub last_run_date: Option<DateTime<Utc>>,
    pub actual_stopped_date: Option<DateTime<Utc>>,
}

impl AtgStatus {
    pub fn new(connector_id: u32) -> Self {
        Self {
            connector_id,
            authorize_requests_accepted: 0,
            authorize_requests_rejected: 0,
            start_requests_accepted: 0,
            start_requests_rejected: 0,
            stop_requests_accepted: 0,
            stop_requests_rejected: 0,
            skipped_consecutive: 0,
            skipped_total: 0,
            running: false,
            start_date: None,
            planned_stop_date: None,
            last_run_date: None,
            actual_stopped_date: None,
        }
    }

    /// spec.md §8 testable property #3: accepted + rejected == total requests.
    pub fn start_requests_total(&self) -> u64 {
        self.start_requests_accepted + self.start_requests_rejected
    }
}
