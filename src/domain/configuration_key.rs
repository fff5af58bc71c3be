//! OCPP 1.6 configuration keys (spec.md §3 "ConfigurationKey").

use serde::{Deserialize, Serialize};

use super::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationKey {
    pub key: String,
    pub value: String,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reboot_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl ConfigurationKey {
    pub fn new(key: impl Into<String>, value: impl Into<String>, readonly: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            readonly,
            reboot_required: None,
            visible: None,
        }
    }
}

/// Status returned by [`ConfigurationStore::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetConfigurationStatus {
    Accepted,
    RebootRequired,
}

/// Outcome of [`ConfigurationStore::add`] when the key already exists.
///
/// Resolves the Open Question in spec.md §9: on add of an existing key with
/// `overwrite=false`, the existing entry is returned unchanged and the
/// conflict is reported — no silent metadata update.
#[derive(Debug)]
pub enum AddConfigurationOutcome {
    Inserted,
    Conflict(ConfigurationKey),
}

/// Case-insensitive-lookup store of configuration keys, uniqueness on `key`.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationStore {
    entries: std::collections::HashMap<String, ConfigurationKey>,
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn canonical(key: &str) -> String {
        key.to_ascii_lowercase()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigurationKey> {
        self.entries.get(&Self::canonical(key))
    }

    /// Add a new key. If it already exists and `overwrite` is false, the
    /// existing entry is left untouched and `Conflict` is reported.
    pub fn add(&mut self, entry: ConfigurationKey, overwrite: bool) -> AddConfigurationOutcome {
        let canonical = Self::canonical(&entry.key);
        if let Some(existing) = self.entries.get(&canonical) {
            if !overwrite {
                return AddConfigurationOutcome::Conflict(existing.clone());
            }
        }
        self.entries.insert(canonical, entry);
        AddConfigurationOutcome::Inserted
    }

    pub fn set(&mut self, key: &str, value: &str) -> DomainResult<SetConfigurationStatus> {
        let canonical = Self::canonical(key);
        let entry = self
            .entries
            .get_mut(&canonical)
            .ok_or_else(|| DomainError::UnknownConfigurationKey(key.to_string()))?;
        if entry.readonly {
            return Err(DomainError::ReadOnlyConfigurationKey(key.to_string()));
        }
        entry.value = value.to_string();
        if entry.reboot_required.unwrap_or(false) {
            Ok(SetConfigurationStatus::RebootRequired)
        } else {
            Ok(SetConfigurationStatus::Accepted)
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &ConfigurationKey> {
        self.entries.values()
    }

    pub fn filtered(&self, keys: &[String]) -> (Vec<ConfigurationKey>, Vec<String>) {
        let mut found = Vec::new();
        let mut unknown = Vec::new();
        for key in keys {
            match self.get(key) {
                Some(entry) => found.push(entry.clone()),
                None => unknown.push(key.clone()),
            }
        }
        (found, unknown)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_existing_without_overwrite_reports_conflict_and_leaves_value() {
        let mut store = ConfigurationStore::new();
        store.add(ConfigurationKey::new("HeartbeatInterval", "300", false), false);

        match store.add(ConfigurationKey::new("HeartbeatInterval", "60", false), false) {
            AddConfigurationOutcome::Conflict(existing) => {
                assert_eq!(existing.value, "300");
            }
            AddConfigurationOutcome::Inserted => panic!("expected conflict"),
        }
        assert_eq!(store.get("HeartbeatInterval").unwrap().value, "300");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut store = ConfigurationStore::new();
        store.add(ConfigurationKey::new("HeartbeatInterval", "300", false), false);
        assert_eq!(store.get("heartbeatinterval").unwrap().value, "300");
    }

    #[test]
    fn set_readonly_key_fails() {
        let mut store = ConfigurationStore::new();
        store.add(ConfigurationKey::new("NumberOfConnectors", "2", true), false);
        assert!(matches!(
            store.set("NumberOfConnectors", "3"),
            Err(DomainError::ReadOnlyConfigurationKey(_))
        ));
    }
}
