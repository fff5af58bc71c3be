//! Application layer: use-case orchestration over the domain model (C1, C3,
//! C4, C6, C7, C8).

pub mod atg;
pub mod events;
pub mod protocol;
pub mod station;
pub mod variable_registry;
pub mod worker_host;
