//! GetVariables / SetVariables (spec.md §4.4, OCPP 2.0.1).

use serde::{Deserialize, Serialize};

use crate::application::variable_registry::{validate_value, Rejection, ValidationOutcome, VariableOverlay, VariableRegistry};
use crate::domain::variable::VariableKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    pub name: String,
    #[serde(default)]
    pub instance: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRef {
    pub name: String,
    #[serde(default)]
    pub instance: Option<String>,
}

fn variable_key(component: &ComponentRef, variable: &VariableRef) -> VariableKey {
    let key = VariableKey::new(component.name.clone(), variable.name.clone());
    match component.instance.as_ref().or(variable.instance.as_ref()) {
        Some(instance) => key.with_instance(instance.clone()),
        None => key,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVariableDatum {
    pub component: ComponentRef,
    pub variable: VariableRef,
    #[serde(default)]
    pub attribute_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeStatus {
    Accepted,
    Rejected,
    UnknownComponent,
    UnknownVariable,
    NotSupportedAttributeType,
    RebootRequired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVariableResult {
    pub component: ComponentRef,
    pub variable: VariableRef,
    pub attribute_status: AttributeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
}

/// `GetVariables.req` → `GetVariables.conf` (spec.md §4.4 "GetVariables (2.0)").
pub fn handle_get_variables(
    station_id: &str,
    registry: &VariableRegistry,
    overlay: &VariableOverlay,
    reporting_value_size_limit: usize,
    data: &[GetVariableDatum],
) -> Vec<GetVariableResult> {
    data.iter()
        .map(|datum| {
            let key = variable_key(&datum.component, &datum.variable);
            let metadata = match registry.lookup(&key) {
                Some(metadata) => metadata,
                None => {
                    return GetVariableResult {
                        component: datum.component.clone(),
                        variable: datum.variable.clone(),
                        attribute_status: AttributeStatus::UnknownVariable,
                        attribute_value: None,
                    }
                }
            };

            if VariableRegistry::is_write_only(metadata) {
                return GetVariableResult {
                    component: datum.component.clone(),
                    variable: datum.variable.clone(),
                    attribute_status: AttributeStatus::Rejected,
                    attribute_value: None,
                };
            }

            let overlay_value = overlay.get(&key);
            let resolved = registry.resolve_value(station_id, metadata, overlay_value);
            if let Some(value) = &resolved {
                registry.apply_post_process(metadata, station_id, value);
            }
            let truncated = resolved.map(|v| VariableRegistry::enforce_reporting_value_size(&v, reporting_value_size_limit));

            GetVariableResult {
                component: datum.component.clone(),
                variable: datum.variable.clone(),
                attribute_status: AttributeStatus::Accepted,
                attribute_value: truncated,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetVariableDatum {
    pub component: ComponentRef,
    pub variable: VariableRef,
    pub attribute_value: String,
    #[serde(default)]
    pub attribute_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetVariableResult {
    pub component: ComponentRef,
    pub variable: VariableRef,
    pub attribute_status: AttributeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_status_info: Option<String>,
}

fn rejection_reason(rejection: Rejection) -> &'static str {
    match rejection {
        Rejection::InvalidValue => "InvalidValue",
        Rejection::ValueTooLow => "ValueTooLow",
        Rejection::ValueTooHigh => "ValueTooHigh",
        Rejection::ValuePositiveOnly => "ValuePositiveOnly",
        Rejection::ValueZeroNotAllowed => "ValueZeroNotAllowed",
        Rejection::InvalidURL => "InvalidURL",
        Rejection::ReadOnly => "ReadOnly",
        Rejection::RebootRequired => "RebootRequired",
    }
}

/// `SetVariables.req` → `SetVariables.conf` (spec.md §4.4 "SetVariables (2.0)").
pub fn handle_set_variables(
    station_id: &str,
    registry: &VariableRegistry,
    overlay: &mut VariableOverlay,
    data: &[SetVariableDatum],
) -> Vec<SetVariableResult> {
    data.iter()
        .map(|datum| {
            let key = variable_key(&datum.component, &datum.variable);
            let metadata = match registry.lookup(&key) {
                Some(metadata) => metadata,
                None => {
                    return SetVariableResult {
                        component: datum.component.clone(),
                        variable: datum.variable.clone(),
                        attribute_status: AttributeStatus::UnknownVariable,
                        attribute_status_info: None,
                    }
                }
            };

            match validate_value(metadata, &datum.attribute_value) {
                ValidationOutcome::Rejected(Rejection::ReadOnly) => SetVariableResult {
                    component: datum.component.clone(),
                    variable: datum.variable.clone(),
                    attribute_status: AttributeStatus::Rejected,
                    attribute_status_info: Some(rejection_reason(Rejection::ReadOnly).to_string()),
                },
                ValidationOutcome::Rejected(Rejection::RebootRequired) => {
                    overlay.set(&key, metadata.persistence, &datum.attribute_value);
                    registry.apply_post_process(metadata, station_id, &datum.attribute_value);
                    SetVariableResult {
                        component: datum.component.clone(),
                        variable: datum.variable.clone(),
                        attribute_status: AttributeStatus::RebootRequired,
                        attribute_status_info: None,
                    }
                }
                ValidationOutcome::Rejected(reason) => SetVariableResult {
                    component: datum.component.clone(),
                    variable: datum.variable.clone(),
                    attribute_status: AttributeStatus::Rejected,
                    attribute_status_info: Some(rejection_reason(reason).to_string()),
                },
                ValidationOutcome::Accepted => {
                    overlay.set(&key, metadata.persistence, &datum.attribute_value);
                    registry.apply_post_process(metadata, station_id, &datum.attribute_value);
                    SetVariableResult {
                        component: datum.component.clone(),
                        variable: datum.variable.clone(),
                        attribute_status: AttributeStatus::Accepted,
                        attribute_status_info: None,
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::variable::{DataType, Mutability, VariableMetadataBuilder};

    fn registry() -> VariableRegistry {
        VariableRegistry::new(vec![
            VariableMetadataBuilder::new(VariableKey::new("OCPPCommCtrlr", "HeartbeatInterval"), DataType::Integer)
                .bounds(Some(1.0), Some(86400.0))
                .positive(true)
                .allow_zero(false)
                .persistent()
                .default_value("300")
                .build(),
            VariableMetadataBuilder::new(VariableKey::new("DeviceDataCtrlr", "ItemsPerMessage"), DataType::Integer)
                .mutability(Mutability::ReadOnly)
                .default_value("100")
                .build(),
        ])
    }

    fn datum(component: &str, variable: &str, value: &str) -> SetVariableDatum {
        SetVariableDatum {
            component: ComponentRef {
                name: component.into(),
                instance: None,
            },
            variable: VariableRef {
                name: variable.into(),
                instance: None,
            },
            attribute_value: value.into(),
            attribute_type: None,
        }
    }

    #[test]
    fn set_variables_s5_scenario() {
        let registry = registry();
        let mut overlay = VariableOverlay::new();

        let results = handle_set_variables(
            "CP1",
            &registry,
            &mut overlay,
            &[datum("OCPPCommCtrlr", "HeartbeatInterval", "0")],
        );
        assert_eq!(results[0].attribute_status, AttributeStatus::Rejected);
        assert_eq!(results[0].attribute_status_info.as_deref(), Some("ValuePositiveOnly"));

        let results = handle_set_variables(
            "CP1",
            &registry,
            &mut overlay,
            &[datum("OCPPCommCtrlr", "HeartbeatInterval", "86401")],
        );
        assert_eq!(results[0].attribute_status_info.as_deref(), Some("ValueTooHigh"));

        let results = handle_set_variables(
            "CP1",
            &registry,
            &mut overlay,
            &[datum("OCPPCommCtrlr", "HeartbeatInterval", "abc")],
        );
        assert_eq!(results[0].attribute_status_info.as_deref(), Some("InvalidValue"));

        let results = handle_set_variables(
            "CP1",
            &registry,
            &mut overlay,
            &[datum("OCPPCommCtrlr", "HeartbeatInterval", "60")],
        );
        assert_eq!(results[0].attribute_status, AttributeStatus::Accepted);

        let get_results = handle_get_variables(
            "CP1",
            &registry,
            &overlay,
            512,
            &[GetVariableDatum {
                component: ComponentRef {
                    name: "OCPPCommCtrlr".into(),
                    instance: None,
                },
                variable: VariableRef {
                    name: "HeartbeatInterval".into(),
                    instance: None,
                },
                attribute_type: None,
            }],
        );
        assert_eq!(get_results[0].attribute_value.as_deref(), Some("60"));
    }

    #[test]
    fn set_variables_rejects_readonly() {
        let registry = registry();
        let mut overlay = VariableOverlay::new();
        let results = handle_set_variables(
            "CP1",
            &registry,
            &mut overlay,
            &[datum("DeviceDataCtrlr", "ItemsPerMessage", "50")],
        );
        assert_eq!(results[0].attribute_status_info.as_deref(), Some("ReadOnly"));
    }

    #[test]
    fn get_variables_unknown_variable() {
        let registry = registry();
        let overlay = VariableOverlay::new();
        let results = handle_get_variables(
            "CP1",
            &registry,
            &overlay,
            512,
            &[GetVariableDatum {
                component: ComponentRef {
                    name: "Nope".into(),
                    instance: None,
                },
                variable: VariableRef {
                    name: "Nope".into(),
                    instance: None,
                },
                attribute_type: None,
            }],
        );
        assert_eq!(results[0].attribute_status, AttributeStatus::UnknownVariable);
    }
}
