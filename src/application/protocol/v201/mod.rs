//! OCPP 2.0.1 adapter table (spec.md §9 "tagged union Version = V16 | V201
//! with per-version adapter tables").

pub mod base_report;
pub mod reset;
pub mod variables;

pub use base_report::{build_notify_report_chunks, collect_report_items, GetBaseReportStatus, ReportBase, ReportDatum};
pub use reset::{decide_reset, ResetDecision, ResetScope, ResetType};
pub use variables::{handle_get_variables, handle_set_variables, AttributeStatus, ComponentRef, GetVariableDatum, SetVariableDatum, VariableRef};

pub const SUPPORTED_ACTIONS: &[&str] = &[
    "BootNotification",
    "Heartbeat",
    "StatusNotification",
    "Authorize",
    "TransactionEvent",
    "GetVariables",
    "SetVariables",
    "GetBaseReport",
    "NotifyReport",
    "Reset",
    "RequestStartTransaction",
    "RequestStopTransaction",
];
