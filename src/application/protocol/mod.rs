//! Protocol State Machine (C3) and Incoming Request Handler (C4).

pub mod dispatch;
pub mod outbound;
pub mod pending;
pub mod state_machine;
pub mod v16;
pub mod v201;

use thiserror::Error;

/// Rust-native shape of spec.md §7's protocol error taxonomy.
#[derive(Debug, Error, Clone)]
pub enum ProtocolError {
    #[error("request timed out waiting for a response")]
    Timeout,
    #[error("socket disconnected before a response arrived")]
    Disconnected,
    #[error("CallError {code}: {description}")]
    CallError { code: String, description: String },
    #[error("action {0} is not supported by this station's OCPP version")]
    UnsupportedAction(String),
    #[error("payload failed schema validation: {0}")]
    ValidationError(String),
    #[error("request rejected: station is not in an accepting registration state")]
    SecurityError,
    #[error("internal error: {0}")]
    InternalError(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
