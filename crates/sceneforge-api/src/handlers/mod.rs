//! HTTP handlers, organized by concern.

pub mod convert;
pub mod health;
pub mod status;
