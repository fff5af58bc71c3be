//! Domain errors

use std::fmt;

/// Domain-level error types — entity invariant violations, not transport failures.
#[derive(Debug, Clone)]
pub enum DomainError {
    /// Connector id is not known to the station.
    ConnectorNotFound(u32),
    /// EVSE id is not known to the station.
    EvseNotFound(u32),
    /// Attempted to start a transaction on a connector that already has one.
    TransactionAlreadyActive(u32),
    /// Attempted to stop a transaction on a connector that has none.
    NoActiveTransaction(u32),
    /// Configuration key is not known.
    UnknownConfigurationKey(String),
    /// Attempted write to a readonly configuration key.
    ReadOnlyConfigurationKey(String),
    /// Variable (component, variable[, instance]) is not known to the registry.
    UnknownVariable { component: String, variable: String },
    /// Generic error with a message, for cases not worth a dedicated variant.
    Other(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectorNotFound(id) => write!(f, "connector not found: {}", id),
            Self::EvseNotFound(id) => write!(f, "EVSE not found: {}", id),
            Self::TransactionAlreadyActive(id) => {
                write!(f, "connector {} already has an active transaction", id)
            }
            Self::NoActiveTransaction(id) => {
                write!(f, "connector {} has no active transaction", id)
            }
            Self::UnknownConfigurationKey(key) => write!(f, "unknown configuration key: {}", key),
            Self::ReadOnlyConfigurationKey(key) => {
                write!(f, "configuration key is readonly: {}", key)
            }
            Self::UnknownVariable { component, variable } => {
                write!(f, "unknown variable: {}.{}", component, variable)
            }
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
