//! # sceneforge-engine
//!
//! Conversion pipeline for SceneForge. Contains the per-job workspace
//! manager, the sandboxed environment builder, the Blender export script
//! generator, the converter invoker (behind the [`ConverterEngine`]
//! trait so tests can substitute a fake), and the job orchestrator.

pub mod error;
pub mod invoker;
pub mod pipeline;
pub mod sandbox;
pub mod scripting;
pub mod workspace;

pub use error::ConversionError;
pub use invoker::{BlenderEngine, ConverterEngine, EngineOutput, InvokeSpec};
pub use pipeline::{ConversionPipeline, ConversionRequest, ConvertedScene};
pub use workspace::JobWorkspace;
