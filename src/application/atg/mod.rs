//! Automatic Transaction Generator (C6, spec.md §4.6).

pub mod id_tag;
pub mod loop_task;

pub use id_tag::IdTagPicker;
pub use loop_task::{run_connector_loop, AtgHost, StartTransactionStatus};
