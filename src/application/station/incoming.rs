//! Routes one inbound Call to the right version-specific handler (C4,
//! spec.md §4.4), after the registration-state guards pass.

use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::application::protocol::dispatch::{guard_incoming, internal_error_response, is_known_action};
use crate::application::protocol::state_machine::RegistrationStateMachine;
use crate::application::protocol::v16;
use crate::application::protocol::v201;
use crate::application::variable_registry::{VariableOverlay, VariableRegistry};
use crate::domain::configuration_key::ConfigurationStore;
use crate::domain::connector::Connector;
use crate::domain::station::OcppVersion;

/// Everything an incoming-Call handler might need to read or mutate.
pub struct IncomingContext<'a> {
    pub version: OcppVersion,
    pub strict: bool,
    pub registration: &'a Mutex<RegistrationStateMachine>,
    pub connectors: &'a Mutex<std::collections::HashMap<u32, Connector>>,
    pub configuration: &'a Mutex<ConfigurationStore>,
    pub overlay: &'a Mutex<VariableOverlay>,
    pub registry: &'a VariableRegistry,
    pub station_id: &'a str,
    pub has_evses: bool,
}

/// A CallError `(code, description)` pair.
pub type CallErrorTuple = (String, String);

/// Work a handler produces that the station runtime must carry out after the
/// CallResult for the triggering Call has gone out (spec.md §4.4).
pub enum FollowUp {
    /// GetBaseReport accepted: the chunked NotifyReport sequence to send.
    NotifyReport {
        request_id: Value,
        items: Vec<v201::ReportDatum>,
    },
    /// Reset accepted or scheduled: what the runtime should do about it.
    Reset(v201::ResetDecision),
}

pub async fn dispatch_incoming_call(
    action: &str,
    payload: Value,
    ctx: &IncomingContext<'_>,
) -> Result<(Value, Option<FollowUp>), CallErrorTuple> {
    let known = is_known_action(ctx.version, action);
    {
        let registration = ctx.registration.lock().await;
        if let Err(err) = guard_incoming(&registration, ctx.strict, action, known) {
            return Err((
                match &err {
                    crate::application::protocol::ProtocolError::UnsupportedAction(_) => "NotImplemented".to_string(),
                    crate::application::protocol::ProtocolError::SecurityError => "SecurityError".to_string(),
                    _ => "InternalError".to_string(),
                },
                err.to_string(),
            ));
        }
    }

    let result: Result<(Value, Option<FollowUp>), String> = match action {
        "GetVariables" => handle_get_variables(payload, ctx).await.map(|v| (v, None)),
        "SetVariables" => handle_set_variables(payload, ctx).await.map(|v| (v, None)),
        "GetBaseReport" => handle_get_base_report(payload, ctx)
            .await
            .map(|(v, request_id, items)| (v, Some(FollowUp::NotifyReport { request_id, items }))),
        "Reset" => handle_reset(payload, ctx)
            .await
            .map(|(v, decision)| (v, Some(FollowUp::Reset(decision)))),
        "ClearCache" => Ok((json!({ "status": format!("{:?}", v16::handle_clear_cache()) }), None)),
        "ChangeAvailability" => handle_change_availability(payload, ctx).await.map(|v| (v, None)),
        "UnlockConnector" => handle_unlock_connector(payload, ctx).await.map(|v| (v, None)),
        "GetConfiguration" => handle_get_configuration(payload, ctx).await.map(|v| (v, None)),
        "ChangeConfiguration" => handle_change_configuration(payload, ctx).await.map(|v| (v, None)),
        "RemoteStartTransaction" | "RequestStartTransaction" => Ok((json!({ "status": "Accepted" }), None)),
        "RemoteStopTransaction" | "RequestStopTransaction" => Ok((json!({ "status": "Accepted" }), None)),
        other => Err(format!("no handler registered for {other}")),
    };

    result.map_err(|description| internal_error_response(action, description))
}

async fn handle_get_variables(payload: Value, ctx: &IncomingContext<'_>) -> Result<Value, String> {
    let data: Vec<v201::GetVariableDatum> =
        serde_json::from_value(payload["getVariableData"].clone()).map_err(|e| e.to_string())?;
    let overlay = ctx.overlay.lock().await;
    let results = v201::handle_get_variables(ctx.station_id, ctx.registry, &overlay, 2500, &data);
    Ok(json!({ "getVariableResult": results }))
}

async fn handle_set_variables(payload: Value, ctx: &IncomingContext<'_>) -> Result<Value, String> {
    let data: Vec<v201::SetVariableDatum> =
        serde_json::from_value(payload["setVariableData"].clone()).map_err(|e| e.to_string())?;
    let mut overlay = ctx.overlay.lock().await;
    let results = v201::handle_set_variables(ctx.station_id, ctx.registry, &mut overlay, &data);
    Ok(json!({ "setVariableResult": results }))
}

async fn handle_get_base_report(
    payload: Value,
    ctx: &IncomingContext<'_>,
) -> Result<(Value, Value, Vec<v201::ReportDatum>), String> {
    let request_id = payload["requestId"].clone();
    let report_base = payload["reportBase"].as_str().and_then(v201::ReportBase::parse);
    let configuration = ctx.configuration.lock().await;
    let config_items: Vec<v201::ReportDatum> = configuration
        .all()
        .map(|entry| v201::ReportDatum {
            component: "ConfigurationCtrlr".to_string(),
            variable: entry.key.clone(),
            value: Some(entry.value.clone()),
        })
        .collect();
    let connectors = ctx.connectors.lock().await;
    let availability_items: Vec<v201::ReportDatum> = connectors
        .values()
        .map(|c| v201::ReportDatum {
            component: "Connector".to_string(),
            variable: format!("Availability#{}", c.id),
            value: Some(format!("{:?}", c.availability)),
        })
        .collect();
    let identity_items = vec![v201::ReportDatum {
        component: "ChargingStation".to_string(),
        variable: "StationId".to_string(),
        value: Some(ctx.station_id.to_string()),
    }];

    let (status, items) = v201::collect_report_items(report_base, &identity_items, &config_items, &availability_items);
    let status_str = match status {
        v201::GetBaseReportStatus::Accepted => "Accepted",
        v201::GetBaseReportStatus::NotSupported => "NotSupported",
        v201::GetBaseReportStatus::EmptyResultSet => "EmptyResultSet",
    };
    // The NotifyReport chunk sequence is sent asynchronously by the station
    // runtime after this response goes out (spec.md §4.4).
    let items = if status == v201::GetBaseReportStatus::Accepted { items } else { Vec::new() };
    Ok((json!({ "status": status_str }), request_id, items))
}

async fn handle_reset(payload: Value, ctx: &IncomingContext<'_>) -> Result<(Value, v201::ResetDecision), String> {
    let reset_type = payload["type"].as_str().and_then(v201::ResetType::parse).ok_or("missing/invalid type")?;
    let evse_id = payload["evseId"].as_u64().map(|v| v as u32);
    let connectors = ctx.connectors.lock().await;
    let has_active_transaction = connectors.values().any(|c| c.has_active_transaction());
    let scope = evse_id.map(v201::ResetScope::Evse);
    let evse_exists = evse_id.map(|id| connectors.contains_key(&id)).unwrap_or(true);
    let decision = v201::decide_reset(reset_type, scope, ctx.has_evses, evse_exists, has_active_transaction);
    let status = match decision {
        v201::ResetDecision::AcceptedNow | v201::ResetDecision::AcceptedIdleNow => "Accepted",
        v201::ResetDecision::Scheduled => "Scheduled",
        v201::ResetDecision::UnsupportedRequest => "Rejected",
        v201::ResetDecision::UnknownEvse => "Rejected",
    };
    Ok((json!({ "status": status }), decision))
}

async fn handle_change_availability(payload: Value, ctx: &IncomingContext<'_>) -> Result<Value, String> {
    let connector_id = payload["connectorId"].as_u64().ok_or("missing connectorId")? as u32;
    let kind = payload["type"].as_str().ok_or("missing type")?;
    let requested = if kind == "Inoperative" {
        v16::AvailabilityType::Inoperative
    } else {
        v16::AvailabilityType::Operative
    };
    let connectors = ctx.connectors.lock().await;
    let exists = connectors.contains_key(&connector_id);
    let has_active_transaction = connectors.get(&connector_id).is_some_and(|c| c.has_active_transaction());
    let status = v16::handle_change_availability(exists, requested, has_active_transaction);
    Ok(json!({ "status": format!("{:?}", status) }))
}

async fn handle_unlock_connector(payload: Value, ctx: &IncomingContext<'_>) -> Result<Value, String> {
    let connector_id = payload["connectorId"].as_u64().ok_or("missing connectorId")? as u32;
    let connectors = ctx.connectors.lock().await;
    let status = v16::handle_unlock_connector(connector_id, connectors.contains_key(&connector_id));
    Ok(json!({ "status": format!("{:?}", status) }))
}

async fn handle_get_configuration(payload: Value, ctx: &IncomingContext<'_>) -> Result<Value, String> {
    let keys: Option<Vec<String>> = payload.get("key").and_then(|v| serde_json::from_value(v.clone()).ok());
    let configuration = ctx.configuration.lock().await;
    let (found, unknown) = v16::handle_get_configuration(&configuration, keys.as_deref());
    Ok(json!({ "configurationKey": found, "unknownKey": unknown }))
}

async fn handle_change_configuration(payload: Value, ctx: &IncomingContext<'_>) -> Result<Value, String> {
    let key = payload["key"].as_str().ok_or("missing key")?;
    let value = payload["value"].as_str().ok_or("missing value")?;
    let mut configuration = ctx.configuration.lock().await;
    let status = v16::handle_change_configuration(&mut configuration, key, value);
    Ok(json!({ "status": format!("{:?}", status) }))
}
