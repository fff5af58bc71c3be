//! Fleet simulator of EV charging stations speaking OCPP 1.6 / 2.0.1 to a CSMS.
//!
//! See `domain` for entities, `application` for the C1–C8 use-case layer,
//! `infrastructure` for default filesystem adapters, and `config` for
//! process-level configuration.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod support;

pub use config::{default_config_path, init_tracing, AppConfig};
pub use domain::{DomainError, DomainResult, Event, OcppVersion, RegistrationState, Station, StationInfo, StationSnapshot};
