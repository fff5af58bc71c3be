//! Default filesystem-backed adapters implementing `domain::ports` (SPEC_FULL.md §A).
//!
//! These are minimal "external collaborator" concretions behind the
//! `domain::ports` trait boundary — swappable without touching core logic.

pub mod id_tag_source;
pub mod performance;
pub mod persistence;
pub mod template_source;

pub use id_tag_source::FileIdTagSource;
pub use performance::LoggingPerformanceRecorder;
pub use persistence::JsonFileStationPersistence;
pub use template_source::FilesystemTemplateSource;
