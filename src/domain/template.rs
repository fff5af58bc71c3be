//! Station template — the input document a configuration loader hands the
//! core (spec.md §6 "Station template"). Parsing the JSON itself is an
//! external collaborator's job (§1); this module only describes the shape
//! the core consumes once parsed.

use serde::{Deserialize, Serialize};

use super::atg::AtgConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorTemplate {
    pub id: u32,
    #[serde(default)]
    pub meter_value_sample_interval_secs: Option<u64>,
    #[serde(default)]
    pub tx_updated_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvseTemplate {
    pub id: u32,
    pub connector_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationTemplate {
    pub base_name: String,
    pub charge_point_model: String,
    pub charge_point_vendor: String,
    #[serde(default)]
    pub firmware_version: Option<String>,
    pub ocpp_version: String,
    #[serde(default = "default_ocpp_protocol")]
    pub ocpp_protocol: String,
    pub supervision_urls: Vec<String>,
    #[serde(default)]
    pub number_of_connectors: Option<u32>,
    #[serde(default, rename = "Connectors")]
    pub connectors: Vec<ConnectorTemplate>,
    #[serde(default, rename = "Evses")]
    pub evses: Vec<EvseTemplate>,
    #[serde(default, rename = "Configuration")]
    pub configuration: Vec<TemplateConfigurationEntry>,
    #[serde(rename = "AutomaticTransactionGenerator")]
    pub automatic_transaction_generator: AtgConfig,
    #[serde(default = "default_true")]
    pub auto_start: bool,
    #[serde(default = "default_true")]
    pub auto_register: bool,
    #[serde(default)]
    pub ocpp_strict_compliance: bool,
    #[serde(default)]
    pub remote_authorization: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfigurationEntry {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub readonly: bool,
}

fn default_ocpp_protocol() -> String {
    "json".to_string()
}

fn default_true() -> bool {
    true
}

impl StationTemplate {
    /// Number of connectors this template describes, whichever field was used.
    pub fn effective_connector_count(&self) -> u32 {
        if !self.connectors.is_empty() {
            self.connectors.len() as u32
        } else {
            self.number_of_connectors.unwrap_or(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_template() {
        let json = r#"{
            "baseName": "CP",
            "chargePointModel": "Model-X",
            "chargePointVendor": "Acme",
            "ocppVersion": "1.6",
            "supervisionUrls": ["ws://localhost:9000"],
            "numberOfConnectors": 2,
            "AutomaticTransactionGenerator": {
                "enable": true,
                "minDurationSecs": 60,
                "maxDurationSecs": 120,
                "minDelaySecs": 10,
                "maxDelaySecs": 20,
                "probabilityOfStart": 1.0,
                "stopAbsoluteDuration": false,
                "requireAuthorize": false
            }
        }"#;
        let template: StationTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.effective_connector_count(), 2);
        assert!(template.auto_start);
    }
}
