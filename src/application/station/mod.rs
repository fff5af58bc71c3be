//! Station runtime and its collaborators (C5/C7, spec.md §4.5/§4.7).

pub mod factory;
pub mod incoming;
pub mod meter;
pub mod runtime;

pub use factory::build_runtime;
pub use runtime::{RuntimeConfig, StationRuntime};
