//! OCPP 1.6 adapter table (spec.md §9).

pub mod configuration;
pub mod connector_ops;

pub use configuration::{handle_change_configuration, handle_get_configuration, ChangeConfigurationStatus};
pub use connector_ops::{
    handle_change_availability, handle_clear_cache, handle_unlock_connector, AvailabilityType, ChangeAvailabilityStatus,
    ClearCacheStatus, UnlockStatus,
};

pub const SUPPORTED_ACTIONS: &[&str] = &[
    "BootNotification",
    "Heartbeat",
    "StatusNotification",
    "Authorize",
    "StartTransaction",
    "StopTransaction",
    "MeterValues",
    "ClearCache",
    "ChangeAvailability",
    "UnlockConnector",
    "GetConfiguration",
    "ChangeConfiguration",
    "RemoteStartTransaction",
    "RemoteStopTransaction",
    "Reset",
];
