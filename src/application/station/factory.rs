//! Builds a [`StationRuntime`] from a parsed [`StationTemplate`] (spec.md §6
//! "Station template"). The CLI is the only caller — this is the seam that
//! keeps `cli/src/main.rs` a thin wiring layer.

use std::sync::Arc;

use crate::application::events::EventBus;
use crate::application::station::{RuntimeConfig, StationRuntime};
use crate::application::variable_registry::VariableRegistry;
use crate::domain::configuration_key::{ConfigurationKey, ConfigurationStore};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ports::{PerformanceRecorder, StationPersistence};
use crate::domain::station::{OcppVersion, Station, StationInfo};
use crate::domain::template::StationTemplate;

/// Builds the connector id list a template implies: explicit `Connectors`
/// entries win, falling back to `1..=numberOfConnectors`, per
/// [`StationTemplate::effective_connector_count`]. Connector `0` (the
/// station-level "connector" some CSMS implementations expect) is always
/// present.
fn connector_ids(template: &StationTemplate) -> Vec<u32> {
    let mut ids = vec![0u32];
    if !template.connectors.is_empty() {
        ids.extend(template.connectors.iter().map(|c| c.id));
    } else {
        ids.extend(1..=template.effective_connector_count());
    }
    ids
}

fn parse_ocpp_version(raw: &str) -> DomainResult<OcppVersion> {
    match raw {
        "1.6" => Ok(OcppVersion::V16),
        "2.0.1" => Ok(OcppVersion::V201),
        other => Err(DomainError::Other(format!("unsupported ocppVersion: {other}"))),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn build_runtime(
    station_id: &str,
    template: &StationTemplate,
    registry: Arc<VariableRegistry>,
    id_tags: Vec<String>,
    events: Arc<EventBus>,
    persistence: Arc<dyn StationPersistence>,
    performance: Arc<dyn PerformanceRecorder>,
    runtime_config: RuntimeConfig,
) -> DomainResult<Arc<StationRuntime>> {
    let ocpp_version = parse_ocpp_version(&template.ocpp_version)?;
    let endpoint = template
        .supervision_urls
        .first()
        .ok_or_else(|| DomainError::Other("template has no supervisionUrls".to_string()))?
        .clone();

    let info = StationInfo {
        charge_point_vendor: template.charge_point_vendor.clone(),
        charge_point_model: template.charge_point_model.clone(),
        firmware_version: template.firmware_version.clone(),
        charge_point_serial_number: None,
        charge_box_serial_number: None,
        iccid: None,
        imsi: None,
        meter_type: None,
        meter_serial_number: None,
    };

    let station = Station::new(station_id, info, ocpp_version, endpoint);

    let mut configuration = ConfigurationStore::new();
    for entry in &template.configuration {
        configuration.add(ConfigurationKey::new(&entry.key, &entry.value, entry.readonly), true);
    }

    let has_evses = !template.evses.is_empty();
    let runtime = StationRuntime::new(
        station,
        connector_ids(template),
        has_evses,
        configuration,
        registry,
        template.automatic_transaction_generator.clone(),
        id_tags,
        events,
        persistence,
        performance,
        runtime_config,
    );
    Ok(runtime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> StationTemplate {
        serde_json::from_str(
            r#"{
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
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn connector_ids_includes_connector_zero() {
        let ids = connector_ids(&template());
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn rejects_unknown_ocpp_version() {
        assert!(parse_ocpp_version("1.5").is_err());
        assert!(parse_ocpp_version("2.0.1").is_ok());
    }
}
