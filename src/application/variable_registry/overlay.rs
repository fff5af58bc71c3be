//! Per-station variable value overlay (spec.md §3 "per-station value
//! overlay stores only Persistent writes").

use std::collections::HashMap;

use crate::domain::variable::{Persistence, VariableKey};

/// Station-local storage for SetVariables writes. Persistent writes survive
/// a `StationSnapshot` round-trip; volatile writes are re-derived on boot.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct VariableOverlay {
    persistent: HashMap<String, String>,
    #[serde(skip)]
    volatile: HashMap<String, String>,
}

impl VariableOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn canonical(key: &VariableKey) -> String {
        let (component, instance, variable) = key.canonical();
        match instance {
            Some(instance) => format!("{component}\u{0}{instance}\u{0}{variable}"),
            None => format!("{component}\u{0}\u{0}{variable}"),
        }
    }

    pub fn get(&self, key: &VariableKey) -> Option<&str> {
        let canonical = Self::canonical(key);
        self.persistent
            .get(&canonical)
            .or_else(|| self.volatile.get(&canonical))
            .map(String::as_str)
    }

    pub fn set(&mut self, key: &VariableKey, persistence: Persistence, value: impl Into<String>) {
        let canonical = Self::canonical(key);
        match persistence {
            Persistence::Persistent => {
                self.volatile.remove(&canonical);
                self.persistent.insert(canonical, value.into());
            }
            Persistence::Volatile => {
                self.persistent.remove(&canonical);
                self.volatile.insert(canonical, value.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistent_write_is_retrievable() {
        let mut overlay = VariableOverlay::new();
        let key = VariableKey::new("OCPPCommCtrlr", "HeartbeatInterval");
        overlay.set(&key, Persistence::Persistent, "60");
        assert_eq!(overlay.get(&key), Some("60"));
    }

    #[test]
    fn volatile_write_does_not_leak_into_persistent_serialisation() {
        let mut overlay = VariableOverlay::new();
        let key = VariableKey::new("A", "B");
        overlay.set(&key, Persistence::Volatile, "x");
        let serialised = serde_json::to_string(&overlay).unwrap();
        assert!(!serialised.contains('x'));
    }

    #[test]
    fn switching_persistence_removes_the_other_slot() {
        let mut overlay = VariableOverlay::new();
        let key = VariableKey::new("A", "B");
        overlay.set(&key, Persistence::Volatile, "first");
        overlay.set(&key, Persistence::Persistent, "second");
        assert_eq!(overlay.get(&key), Some("second"));
    }
}
