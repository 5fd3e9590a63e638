//! # sceneforge-core
//!
//! Core crate for SceneForge. Contains configuration schemas, scene format
//! constants, and the unified error system.
//!
//! This crate has **no** internal dependencies on other SceneForge crates.

pub mod config;
pub mod error;
pub mod formats;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
