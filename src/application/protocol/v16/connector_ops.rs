//! ClearCache / ChangeAvailability / UnlockConnector (spec.md §4.4, OCPP 1.6).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearCacheStatus {
    Accepted,
    Rejected,
}

/// Nothing in this simulator maintains an authorization cache to clear, so
/// the handler always succeeds — mirroring how a real station with an
/// empty/no-op cache still answers `Accepted`.
pub fn handle_clear_cache() -> ClearCacheStatus {
    ClearCacheStatus::Accepted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityType {
    Inoperative,
    Operative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAvailabilityStatus {
    Accepted,
    /// Deferred until the connector's active transaction ends.
    Scheduled,
    Rejected,
}

/// `ChangeAvailability.req(connectorId, type)` (spec.md §4.4). A connector
/// with a running transaction can't go Inoperative immediately; the change
/// is scheduled for when the transaction ends, same shape as Reset/OnIdle.
pub fn handle_change_availability(
    connector_exists: bool,
    requested: AvailabilityType,
    has_active_transaction: bool,
) -> ChangeAvailabilityStatus {
    if !connector_exists {
        return ChangeAvailabilityStatus::Rejected;
    }
    match (requested, has_active_transaction) {
        (AvailabilityType::Inoperative, true) => ChangeAvailabilityStatus::Scheduled,
        _ => ChangeAvailabilityStatus::Accepted,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockStatus {
    Unlocked,
    UnlockFailed,
    NotSupported,
}

/// `UnlockConnector.req(connectorId)` (spec.md §4.4). Connector id 0 (the
/// station as a whole) has no physical lock.
pub fn handle_unlock_connector(connector_id: u32, connector_exists: bool) -> UnlockStatus {
    if connector_id == 0 {
        return UnlockStatus::NotSupported;
    }
    if !connector_exists {
        return UnlockStatus::UnlockFailed;
    }
    UnlockStatus::Unlocked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_cache_always_accepted() {
        assert_eq!(handle_clear_cache(), ClearCacheStatus::Accepted);
    }

    #[test]
    fn change_availability_defers_when_transaction_active() {
        assert_eq!(
            handle_change_availability(true, AvailabilityType::Inoperative, true),
            ChangeAvailabilityStatus::Scheduled
        );
    }

    #[test]
    fn change_availability_accepted_for_operative() {
        assert_eq!(
            handle_change_availability(true, AvailabilityType::Operative, true),
            ChangeAvailabilityStatus::Accepted
        );
    }

    #[test]
    fn change_availability_rejects_unknown_connector() {
        assert_eq!(
            handle_change_availability(false, AvailabilityType::Inoperative, false),
            ChangeAvailabilityStatus::Rejected
        );
    }

    #[test]
    fn unlock_connector_zero_not_supported() {
        assert_eq!(handle_unlock_connector(0, true), UnlockStatus::NotSupported);
    }

    #[test]
    fn unlock_missing_connector_fails() {
        assert_eq!(handle_unlock_connector(1, false), UnlockStatus::UnlockFailed);
    }
}
