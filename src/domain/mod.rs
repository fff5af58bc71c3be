//! Core entities and value objects — no I/O, no async runtime dependency
//! beyond the trait signatures in [`ports`].

pub mod atg;
pub mod configuration_key;
pub mod connector;
pub mod error;
pub mod events;
pub mod ports;
pub mod station;
pub mod template;
pub mod variable;

pub use error::{DomainError, DomainResult};
pub use events::Event;
pub use station::{OcppVersion, RegistrationState, Station, StationInfo, StationSnapshot};
