//! Conversion orchestration: validation, staging, engine invocation,
//! verification, and workspace lifecycle.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use sceneforge_core::config::EngineConfig;
use sceneforge_core::formats;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use sceneforge_realtime::{StatusHub, milestone};

use crate::error::ConversionError;
use crate::invoker::{ConverterEngine, InvokeSpec};
use crate::scripting::ScriptingEngine;
use crate::workspace::JobWorkspace;

/// A single conversion job as received from the API layer.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Optional opaque correlation id supplied by the client.
    pub job_id: Option<String>,
    /// Original filename of the uploaded scene.
    pub file_name: String,
    /// Raw upload bytes.
    pub data: Bytes,
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertedScene {
    /// Download filename, extension swapped to the target format.
    pub file_name: String,
    /// The produced binary glTF payload.
    pub data: Bytes,
}

/// Drives one upload through staging, Blender invocation and
/// verification, publishing milestone events along the way.
///
/// Workspace directories are removed on every exit path, including
/// validation failures, engine errors and timeouts.
#[derive(Debug)]
pub struct ConversionPipeline {
    engine: Arc<dyn ConverterEngine>,
    status: Arc<StatusHub>,
    config: EngineConfig,
    limiter: Arc<Semaphore>,
    temp_root: PathBuf,
}

impl ConversionPipeline {
    /// Build a pipeline, creating the temp root eagerly so the first job
    /// does not race directory creation.
    pub fn new(
        engine: Arc<dyn ConverterEngine>,
        status: Arc<StatusHub>,
        config: EngineConfig,
    ) -> std::io::Result<Self> {
        let temp_root = config.effective_temp_root();
        std::fs::create_dir_all(&temp_root)?;
        let limiter = Arc::new(Semaphore::new(config.max_concurrency));
        Ok(Self {
            engine,
            status,
            config,
            limiter,
            temp_root,
        })
    }

    /// Run one conversion end to end.
    #[instrument(skip(self, request), fields(job_id = request.job_id.as_deref(), file = %request.file_name))]
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConvertedScene, ConversionError> {
        let job_id = request.job_id.as_deref();
        self.status.publish(
            job_id,
            "Connecting to conversion engine…",
            Some(milestone::RECEIVED),
        );

        let result = self.try_convert(&request).await;

        // Subscribers get end-of-stream whichever way the job finished.
        self.status.close(job_id);
        result
    }

    async fn try_convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConvertedScene, ConversionError> {
        // Validation happens before any disk or permit allocation.
        validate_filename(&request.file_name)?;

        let _permit = self
            .limiter
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| ConversionError::SemaphoreClosed {
                reason: e.to_string(),
            })?;

        let workspace = JobWorkspace::acquire(&self.temp_root, &request.file_name).await?;
        debug!(workspace = %workspace.root().display(), "Job workspace created");

        let result = self.run_stages(request, &workspace).await;

        // Cleanup runs on every path; the permit drops with this frame.
        workspace.release().await;
        result
    }

    async fn run_stages(
        &self,
        request: &ConversionRequest,
        workspace: &JobWorkspace,
    ) -> Result<ConvertedScene, ConversionError> {
        let job_id = request.job_id.as_deref();

        tokio::fs::write(&workspace.source_path, &request.data).await?;
        let kb = request.data.len() / 1024;
        self.status.publish(
            job_id,
            format!("Upload received ({kb} KB)"),
            Some(milestone::STAGED),
        );

        ScriptingEngine::write_export_script(&workspace.script_path).await?;

        self.status.publish(
            job_id,
            "Converting via Blender CLI…",
            Some(milestone::CONVERTING),
        );

        let spec = InvokeSpec {
            script_path: workspace.script_path.clone(),
            source_path: workspace.source_path.clone(),
            output_path: workspace.output_path.clone(),
            sandbox_dir: workspace.sandbox_dir.clone(),
            timeout_seconds: self.config.timeout_seconds,
        };
        let output = self.engine.invoke(&spec).await?;

        if output.exit_code != 0 {
            warn!(exit_code = output.exit_code, "Converter exited non-zero");
            return Err(ConversionError::BlenderFailed {
                code: output.exit_code,
                stderr: output.stderr,
                stdout: output.stdout,
            });
        }

        if !workspace.output_path.exists() {
            warn!("Converter exited zero but produced no output file");
            return Err(ConversionError::OutputNotCreated {
                path: workspace.output_path.clone(),
                stderr: output.stderr,
                stdout: output.stdout,
            });
        }

        self.status.publish(
            job_id,
            "Optimizing and preparing the .glb file…",
            Some(milestone::VERIFYING),
        );

        let data = Bytes::from(tokio::fs::read(&workspace.output_path).await?);
        info!(bytes = data.len(), "Conversion produced output");

        self.status
            .publish(job_id, "Conversion complete", Some(milestone::DONE));

        Ok(ConvertedScene {
            file_name: formats::output_filename(&request.file_name),
            data,
        })
    }
}

/// Reject empty names and anything that is not a `.blend` file.
fn validate_filename(file_name: &str) -> Result<(), ConversionError> {
    if file_name.trim().is_empty() {
        return Err(ConversionError::EmptyFilename);
    }
    if !formats::is_source_filename(file_name) {
        return Err(ConversionError::UnsupportedExtension {
            filename: file_name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sceneforge_realtime::StatusEvent;

    /// Scripted stand-in for the Blender subprocess.
    #[derive(Debug)]
    enum FakeEngine {
        /// Write `glTF` bytes to the output path and exit zero.
        Succeed,
        /// Exit with the given code without writing output.
        Fail(i32),
        /// Exit zero without writing output.
        SilentlyOmitOutput,
        /// Report a timeout.
        TimeOut,
    }

    #[async_trait]
    impl ConverterEngine for FakeEngine {
        async fn invoke(
            &self,
            spec: &InvokeSpec,
        ) -> Result<crate::invoker::EngineOutput, ConversionError> {
            match self {
                FakeEngine::Succeed => {
                    tokio::fs::write(&spec.output_path, b"glTF\x02fake").await?;
                    Ok(crate::invoker::EngineOutput {
                        exit_code: 0,
                        stdout: "Conversion successful!".into(),
                        stderr: String::new(),
                    })
                }
                FakeEngine::Fail(code) => Ok(crate::invoker::EngineOutput {
                    exit_code: *code,
                    stdout: String::new(),
                    stderr: "segfault in exporter".into(),
                }),
                FakeEngine::SilentlyOmitOutput => Ok(crate::invoker::EngineOutput {
                    exit_code: 0,
                    stdout: String::new(),
                    stderr: String::new(),
                }),
                FakeEngine::TimeOut => Err(ConversionError::BlenderTimeout {
                    timeout_seconds: spec.timeout_seconds,
                }),
            }
        }
    }

    fn pipeline_with(engine: FakeEngine) -> (ConversionPipeline, Arc<StatusHub>) {
        let status = Arc::new(StatusHub::new());
        let mut config = EngineConfig::default();
        config.temp_root = Some(std::env::temp_dir().join(format!(
            "sceneforge-test-{}",
            uuid::Uuid::new_v4().simple()
        )));
        let pipeline =
            ConversionPipeline::new(Arc::new(engine), status.clone(), config).expect("pipeline");
        (pipeline, status)
    }

    fn request(job_id: Option<&str>, file_name: &str) -> ConversionRequest {
        ConversionRequest {
            job_id: job_id.map(String::from),
            file_name: file_name.to_string(),
            data: Bytes::from_static(b"BLENDER-v404fakefile"),
        }
    }

    #[tokio::test]
    async fn test_successful_conversion_returns_renamed_output() {
        let (pipeline, _) = pipeline_with(FakeEngine::Succeed);
        let scene = pipeline
            .convert(request(None, "castle.blend"))
            .await
            .expect("convert");
        assert_eq!(scene.file_name, "castle.glb");
        assert!(scene.data.starts_with(b"glTF"));
    }

    #[tokio::test]
    async fn test_status_events_are_ordered_and_terminal() {
        let (pipeline, status) = pipeline_with(FakeEngine::Succeed);
        let mut sub = status.subscribe("job-42");

        pipeline
            .convert(request(Some("job-42"), "castle.blend"))
            .await
            .expect("convert");

        let mut progresses = Vec::new();
        while let Some(event) = sub.recv().await {
            let StatusEvent::Status { progress, .. } = event;
            progresses.push(progress.expect("progress set"));
        }
        assert_eq!(progresses, vec![5, 20, 60, 85, 100]);
    }

    #[tokio::test]
    async fn test_no_job_id_publishes_nothing_but_converts() {
        let (pipeline, status) = pipeline_with(FakeEngine::Succeed);
        pipeline
            .convert(request(None, "castle.blend"))
            .await
            .expect("convert");
        assert_eq!(status.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_stops_stream_at_converting() {
        let (pipeline, status) = pipeline_with(FakeEngine::Fail(11));
        let mut sub = status.subscribe("job-f");

        let err = pipeline
            .convert(request(Some("job-f"), "broken.blend"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, ConversionError::BlenderFailed { code: 11, .. }));

        let mut progresses = Vec::new();
        while let Some(event) = sub.recv().await {
            let StatusEvent::Status { progress, .. } = event;
            progresses.push(progress.expect("progress set"));
        }
        // Nothing past the converting milestone.
        assert_eq!(progresses, vec![5, 20, 60]);
    }

    #[tokio::test]
    async fn test_missing_output_is_its_own_error() {
        let (pipeline, _) = pipeline_with(FakeEngine::SilentlyOmitOutput);
        let err = pipeline
            .convert(request(None, "empty.blend"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, ConversionError::OutputNotCreated { .. }));
    }

    #[tokio::test]
    async fn test_timeout_propagates() {
        let (pipeline, _) = pipeline_with(FakeEngine::TimeOut);
        let err = pipeline
            .convert(request(None, "slow.blend"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, ConversionError::BlenderTimeout { .. }));
    }

    #[tokio::test]
    async fn test_validation_rejects_before_staging() {
        let (pipeline, _) = pipeline_with(FakeEngine::Succeed);

        let err = pipeline
            .convert(request(None, ""))
            .await
            .expect_err("empty name");
        assert!(matches!(err, ConversionError::EmptyFilename));

        let err = pipeline
            .convert(request(None, "model.fbx"))
            .await
            .expect_err("wrong extension");
        assert!(matches!(err, ConversionError::UnsupportedExtension { .. }));
    }

    #[tokio::test]
    async fn test_validation_failure_still_ends_stream() {
        let (pipeline, status) = pipeline_with(FakeEngine::Succeed);
        let mut sub = status.subscribe("job-v");

        let _ = pipeline
            .convert(request(Some("job-v"), "model.fbx"))
            .await
            .expect_err("wrong extension");

        let mut progresses = Vec::new();
        while let Some(event) = sub.recv().await {
            let StatusEvent::Status { progress, .. } = event;
            progresses.push(progress.expect("progress set"));
        }
        assert_eq!(progresses, vec![5]);
    }

    #[tokio::test]
    async fn test_workspace_removed_after_success_and_failure() {
        let (pipeline, _) = pipeline_with(FakeEngine::Succeed);
        let temp_root = pipeline.temp_root.clone();
        pipeline
            .convert(request(None, "castle.blend"))
            .await
            .expect("convert");
        assert_no_job_dirs(&temp_root);

        let (pipeline, _) = pipeline_with(FakeEngine::Fail(1));
        let temp_root = pipeline.temp_root.clone();
        let _ = pipeline.convert(request(None, "castle.blend")).await;
        assert_no_job_dirs(&temp_root);
    }

    fn assert_no_job_dirs(temp_root: &std::path::Path) {
        let leftover: Vec<_> = std::fs::read_dir(temp_root)
            .map(|it| it.filter_map(Result::ok).collect())
            .unwrap_or_default();
        assert!(leftover.is_empty(), "workspace dirs left behind: {leftover:?}");
    }

    #[tokio::test]
    async fn test_concurrent_jobs_do_not_interfere() {
        let (pipeline, _) = pipeline_with(FakeEngine::Succeed);
        let pipeline = Arc::new(pipeline);

        let mut handles = Vec::new();
        for i in 0..6 {
            let p = pipeline.clone();
            handles.push(tokio::spawn(async move {
                p.convert(request(None, &format!("scene-{i}.blend"))).await
            }));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            let scene = handle.await.expect("join").expect("convert");
            assert_eq!(scene.file_name, format!("scene-{i}.glb"));
        }
    }
}
