//! Cross-cutting utilities shared across the application layer.

pub mod ids;
pub mod ocpp_frame;
pub mod shutdown;
