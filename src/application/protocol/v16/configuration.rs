//! GetConfiguration / ChangeConfiguration (spec.md §4.4, OCPP 1.6).

use crate::domain::configuration_key::{ConfigurationStore, SetConfigurationStatus};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeConfigurationStatus {
    Accepted,
    RebootRequired,
    Rejected,
    NotSupported,
}

/// `GetConfiguration.req({key?})` → `(knownKeys, unknownKeys)` (spec.md §4.4).
/// An absent/empty `keys` list returns every known key.
pub fn handle_get_configuration(
    store: &ConfigurationStore,
    keys: Option<&[String]>,
) -> (Vec<crate::domain::configuration_key::ConfigurationKey>, Vec<String>) {
    match keys {
        None | Some([]) => (store.all().cloned().collect(), Vec::new()),
        Some(keys) => store.filtered(keys),
    }
}

/// `ChangeConfiguration.req(key, value)` → status (spec.md §4.4).
pub fn handle_change_configuration(store: &mut ConfigurationStore, key: &str, value: &str) -> ChangeConfigurationStatus {
    match store.set(key, value) {
        Ok(SetConfigurationStatus::Accepted) => ChangeConfigurationStatus::Accepted,
        Ok(SetConfigurationStatus::RebootRequired) => ChangeConfigurationStatus::RebootRequired,
        Err(DomainError::ReadOnlyConfigurationKey(_)) => ChangeConfigurationStatus::Rejected,
        Err(DomainError::UnknownConfigurationKey(_)) => ChangeConfigurationStatus::NotSupported,
        Err(_) => ChangeConfigurationStatus::Rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::configuration_key::ConfigurationKey;

    fn store() -> ConfigurationStore {
        let mut store = ConfigurationStore::new();
        store.add(ConfigurationKey::new("HeartbeatInterval", "300", false), false);
        store.add(ConfigurationKey::new("NumberOfConnectors", "2", true), false);
        store
    }

    #[test]
    fn get_configuration_with_no_keys_returns_everything() {
        let (found, unknown) = handle_get_configuration(&store(), None);
        assert_eq!(found.len(), 2);
        assert!(unknown.is_empty());
    }

    #[test]
    fn get_configuration_reports_unknown_keys() {
        let (found, unknown) = handle_get_configuration(&store(), Some(&["HeartbeatInterval".to_string(), "Bogus".to_string()]));
        assert_eq!(found.len(), 1);
        assert_eq!(unknown, vec!["Bogus".to_string()]);
    }

    #[test]
    fn change_configuration_rejects_readonly() {
        let mut store = store();
        assert_eq!(
            handle_change_configuration(&mut store, "NumberOfConnectors", "3"),
            ChangeConfigurationStatus::Rejected
        );
    }

    #[test]
    fn change_configuration_not_supported_for_unknown_key() {
        let mut store = store();
        assert_eq!(
            handle_change_configuration(&mut store, "Bogus", "x"),
            ChangeConfigurationStatus::NotSupported
        );
    }

    #[test]
    fn change_configuration_accepted() {
        let mut store = store();
        assert_eq!(
            handle_change_configuration(&mut store, "HeartbeatInterval", "60"),
            ChangeConfigurationStatus::Accepted
        );
        assert_eq!(store.get("HeartbeatInterval").unwrap().value, "60");
    }
}
