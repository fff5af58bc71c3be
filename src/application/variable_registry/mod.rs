//! Variable Registry & Validator (spec.md §4.1, C1).

mod overlay;
mod validator;

pub use overlay::VariableOverlay;
pub use validator::{validate_value, Rejection, ValidationOutcome};

use std::collections::HashMap;

use crate::domain::variable::{Mutability, Persistence, VariableKey, VariableMetadata};

/// Immutable, process-wide table of variable metadata — "Build once at
/// process start as an immutable table; share by reference across
/// stations" (spec.md §9).
#[derive(Clone)]
pub struct VariableRegistry {
    entries: HashMap<(String, Option<String>, String), VariableMetadata>,
}

impl VariableRegistry {
    pub fn new(entries: Vec<VariableMetadata>) -> Self {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            map.insert(entry.key.canonical(), entry);
        }
        Self { entries: map }
    }

    /// Case-insensitive metadata lookup with fallback: tries the exact
    /// instance first, then falls back to the instance-less entry.
    pub fn lookup(&self, key: &VariableKey) -> Option<&VariableMetadata> {
        if let Some(found) = self.entries.get(&key.canonical()) {
            return Some(found);
        }
        if key.instance.is_some() {
            let fallback = VariableKey::new(key.component.clone(), key.variable.clone());
            return self.entries.get(&fallback.canonical());
        }
        None
    }

    pub fn is_read_only(metadata: &VariableMetadata) -> bool {
        matches!(metadata.mutability, Mutability::ReadOnly)
    }

    pub fn is_write_only(metadata: &VariableMetadata) -> bool {
        matches!(metadata.mutability, Mutability::WriteOnly)
    }

    pub fn is_persistent(metadata: &VariableMetadata) -> bool {
        matches!(metadata.persistence, Persistence::Persistent)
    }

    /// `resolveValue(station, metadata) → string` — dynamic resolver wins
    /// over an overlay value, which wins over `default_value`.
    pub fn resolve_value(
        &self,
        station_id: &str,
        metadata: &VariableMetadata,
        overlay_value: Option<&str>,
    ) -> Option<String> {
        if let Some(resolver) = &metadata.dynamic_resolver {
            if let Some(resolved) = resolver(station_id) {
                return Some(resolved);
            }
        }
        if let Some(value) = overlay_value {
            return Some(value.to_string());
        }
        metadata.default_value.clone()
    }

    pub fn apply_post_process(&self, metadata: &VariableMetadata, station_id: &str, value: &str) {
        if let Some(hook) = &metadata.post_process {
            hook(station_id, value);
        }
    }

    /// `enforceReportingValueSize(value, limit) → possiblyTruncated`
    pub fn enforce_reporting_value_size(value: &str, limit: usize) -> String {
        if value.len() <= limit {
            value.to_string()
        } else {
            value.chars().take(limit).collect()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableMetadata> {
        self.entries.values()
    }

    /// The baseline OCPP 2.0.1 variable set the CLI installs when no
    /// overriding registry is supplied — enough for GetVariables,
    /// SetVariables, and GetBaseReport to have something real to report.
    /// Not exhaustive; spec.md §9 leaves "the concrete registry contents"
    /// as a deployment concern (§1, station template is the input, not the
    /// registry itself).
    pub fn builtin() -> Self {
        use crate::domain::variable::{DataType, Mutability, VariableMetadataBuilder};

        Self::new(vec![
            VariableMetadataBuilder::new(VariableKey::new("OCPPCommCtrlr", "HeartbeatInterval"), DataType::Integer)
                .bounds(Some(1.0), Some(86400.0))
                .positive(true)
                .allow_zero(false)
                .persistent()
                .default_value("300")
                .build(),
            VariableMetadataBuilder::new(VariableKey::new("OCPPCommCtrlr", "MessageTimeout"), DataType::Integer)
                .bounds(Some(1.0), Some(3600.0))
                .positive(true)
                .persistent()
                .default_value("30")
                .build(),
            VariableMetadataBuilder::new(VariableKey::new("DeviceDataCtrlr", "ItemsPerMessage"), DataType::Integer)
                .mutability(Mutability::ReadOnly)
                .default_value("100")
                .build(),
            VariableMetadataBuilder::new(VariableKey::new("DeviceDataCtrlr", "BytesPerMessage"), DataType::Integer)
                .mutability(Mutability::ReadOnly)
                .default_value("8192")
                .build(),
            VariableMetadataBuilder::new(VariableKey::new("SecurityCtrlr", "Identity"), DataType::String)
                .mutability(Mutability::ReadOnly)
                .build(),
            VariableMetadataBuilder::new(VariableKey::new("SampledDataCtrlr", "TxUpdatedInterval"), DataType::Integer)
                .bounds(Some(0.0), None)
                .persistent()
                .default_value("60")
                .build(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::variable::{DataType, VariableMetadataBuilder};

    fn registry() -> VariableRegistry {
        VariableRegistry::new(vec![VariableMetadataBuilder::new(
            VariableKey::new("OCPPCommCtrlr", "HeartbeatInterval"),
            DataType::Integer,
        )
        .bounds(Some(1.0), Some(86400.0))
        .positive(true)
        .default_value("300")
        .build()])
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let reg = registry();
        let key = VariableKey::new("ocppcommctrlr", "heartbeatinterval");
        assert!(reg.lookup(&key).is_some());
    }

    #[test]
    fn lookup_falls_back_without_instance() {
        let reg = registry();
        let key = VariableKey::new("OCPPCommCtrlr", "HeartbeatInterval").with_instance("1");
        assert!(reg.lookup(&key).is_some());
    }

    #[test]
    fn resolve_value_prefers_overlay_over_default() {
        let reg = registry();
        let key = VariableKey::new("OCPPCommCtrlr", "HeartbeatInterval");
        let metadata = reg.lookup(&key).unwrap();
        assert_eq!(
            reg.resolve_value("CP1", metadata, Some("60")),
            Some("60".to_string())
        );
        assert_eq!(reg.resolve_value("CP1", metadata, None), Some("300".to_string()));
    }

    #[test]
    fn truncates_oversized_reporting_value() {
        let truncated = VariableRegistry::enforce_reporting_value_size("abcdefgh", 4);
        assert_eq!(truncated, "abcd");
    }
}
