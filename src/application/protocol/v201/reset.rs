//! Reset (spec.md §4.4 "Reset (2.0)" decision table).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetType {
    Immediate,
    OnIdle,
}

impl ResetType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Immediate" => Some(Self::Immediate),
            "OnIdle" => Some(Self::OnIdle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    Station,
    Evse(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetDecision {
    /// Reset immediately; response is `Accepted`.
    AcceptedNow,
    /// No active transaction blocks an immediate reset, but the request
    /// targeted an idle point that happens to already be idle.
    AcceptedIdleNow,
    /// Active transaction(s) exist; reset deferred until they end, response
    /// is `Scheduled` and the caller must poll every 5s (spec.md §4.4).
    Scheduled,
    UnsupportedRequest,
    UnknownEvse,
}

/// Implements the decision table in spec.md §4.4 "Reset (2.0)".
pub fn decide_reset(
    reset_type: ResetType,
    scope: Option<ResetScope>,
    station_has_evses: bool,
    evse_exists: bool,
    has_active_transaction: bool,
) -> ResetDecision {
    if let Some(ResetScope::Evse(_)) = scope {
        if !station_has_evses {
            return ResetDecision::UnsupportedRequest;
        }
        if !evse_exists {
            return ResetDecision::UnknownEvse;
        }
    }

    match (reset_type, has_active_transaction) {
        (ResetType::Immediate, _) => ResetDecision::AcceptedNow,
        (ResetType::OnIdle, false) => ResetDecision::AcceptedIdleNow,
        (ResetType::OnIdle, true) => ResetDecision::Scheduled,
    }
}

/// Poll interval for a `Scheduled` OnIdle reset (spec.md §4.4: "poll every 5 s").
pub const ONIDLE_POLL_INTERVAL_SECS: u64 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_station_reset_always_accepted_now() {
        assert_eq!(
            decide_reset(ResetType::Immediate, None, false, false, true),
            ResetDecision::AcceptedNow
        );
    }

    #[test]
    fn onidle_with_no_active_tx_resets_now() {
        assert_eq!(
            decide_reset(ResetType::OnIdle, None, false, false, false),
            ResetDecision::AcceptedIdleNow
        );
    }

    #[test]
    fn s4_onidle_with_running_tx_is_scheduled() {
        assert_eq!(
            decide_reset(ResetType::OnIdle, None, false, false, true),
            ResetDecision::Scheduled
        );
    }

    #[test]
    fn evse_reset_on_non_evse_station_unsupported() {
        assert_eq!(
            decide_reset(ResetType::Immediate, Some(ResetScope::Evse(1)), false, false, false),
            ResetDecision::UnsupportedRequest
        );
    }

    #[test]
    fn evse_reset_on_unknown_evse() {
        assert_eq!(
            decide_reset(ResetType::Immediate, Some(ResetScope::Evse(9)), true, false, false),
            ResetDecision::UnknownEvse
        );
    }

    #[test]
    fn evse_reset_onidle_with_tx_is_scheduled() {
        assert_eq!(
            decide_reset(ResetType::OnIdle, Some(ResetScope::Evse(1)), true, true, true),
            ResetDecision::Scheduled
        );
    }
}
