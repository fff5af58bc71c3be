//! Incoming Request Handler (C4, spec.md §4.4).
//!
//! A dispatch table keyed by action name, guarded by the station's current
//! registration state. Per-version handlers (`v16`, `v201`) build the
//! `serde_json::Value` response; this module only owns the guard logic and
//! the unknown-action fallback, keeping the resolve-then-delegate shape
//! separate from each version's own handlers.

use serde_json::Value;
use tracing::warn;

use crate::domain::station::OcppVersion;

use super::state_machine::RegistrationStateMachine;
use super::ProtocolError;

/// Actions that are refused in `Pending` registration state even though
/// `Pending` otherwise admits incoming requests (spec.md §4.4).
const PENDING_FORBIDDEN_ACTIONS: &[&str] = &["RequestStartTransaction", "RequestStopTransaction"];

/// Evaluates the admission guards for an incoming Call before handing it to
/// a version-specific handler. Returns `Err` with the CallError this action
/// should be rejected with.
pub fn guard_incoming(
    state_machine: &RegistrationStateMachine,
    strict: bool,
    action: &str,
    is_known_action: bool,
) -> Result<(), ProtocolError> {
    if !is_known_action {
        return Err(ProtocolError::UnsupportedAction(action.to_string()));
    }

    if strict && PENDING_FORBIDDEN_ACTIONS.contains(&action) && state_machine.state() == crate::domain::station::RegistrationState::Pending
    {
        return Err(ProtocolError::SecurityError);
    }

    if !state_machine.admits_incoming(strict) {
        return Err(ProtocolError::SecurityError);
    }

    Ok(())
}

/// Builds the `InternalError` CallError payload used when a handler panics
/// or returns an unexpected error (spec.md §7 "Propagation policy").
pub fn internal_error_response(action: &str, message: impl std::fmt::Display) -> (String, String) {
    warn!(action, %message, "incoming handler failed, responding InternalError");
    ("InternalError".to_string(), message.to_string())
}

/// Looks up whether `action` is recognised for `version`, independent of
/// registration-state guards.
pub fn is_known_action(version: OcppVersion, action: &str) -> bool {
    match version {
        OcppVersion::V16 => super::v16::SUPPORTED_ACTIONS.contains(&action),
        OcppVersion::V201 => super::v201::SUPPORTED_ACTIONS.contains(&action),
    }
}

/// A handler's JSON response payload, ready to be wrapped in a CallResult.
pub type HandlerResponse = Value;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::protocol::state_machine::{BootStatus, RegistrationStateMachine};

    #[test]
    fn unknown_action_rejected_regardless_of_state() {
        let sm = RegistrationStateMachine::new(None);
        let result = guard_incoming(&sm, true, "FooBar", false);
        assert!(matches!(result, Err(ProtocolError::UnsupportedAction(_))));
    }

    #[test]
    fn pending_forbids_remote_start_under_strict_mode() {
        let mut sm = RegistrationStateMachine::new(None);
        sm.on_socket_open();
        sm.on_boot_response(BootStatus::Pending, 5);
        let result = guard_incoming(&sm, true, "RequestStartTransaction", true);
        assert!(matches!(result, Err(ProtocolError::SecurityError)));
    }

    #[test]
    fn pending_allows_other_actions() {
        let mut sm = RegistrationStateMachine::new(None);
        sm.on_socket_open();
        sm.on_boot_response(BootStatus::Pending, 5);
        assert!(guard_incoming(&sm, true, "GetVariables", true).is_ok());
    }

    #[test]
    fn disconnected_state_rejects_everything() {
        let sm = RegistrationStateMachine::new(None);
        assert!(matches!(
            guard_incoming(&sm, true, "GetVariables", true),
            Err(ProtocolError::SecurityError)
        ));
    }
}
