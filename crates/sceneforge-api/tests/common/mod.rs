//! Shared test harness: an app wired to a scripted fake engine.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use sceneforge_api::{AppState, build_app};
use sceneforge_core::config::AppConfig;
use sceneforge_engine::{
    ConversionError, ConversionPipeline, ConverterEngine, EngineOutput, InvokeSpec,
};
use sceneforge_realtime::StatusHub;

pub const BOUNDARY: &str = "sceneforge-test-boundary";

/// What the fake engine should do when invoked.
#[derive(Debug, Clone, Copy)]
pub enum EngineScript {
    /// Write output bytes and exit zero.
    Succeed,
    /// Exit with the given code without writing output.
    Fail(i32),
    /// Exit zero without writing output.
    OmitOutput,
    /// Report a timeout.
    TimeOut,
}

#[derive(Debug)]
struct ScriptedEngine(EngineScript);

#[async_trait]
impl ConverterEngine for ScriptedEngine {
    async fn invoke(&self, spec: &InvokeSpec) -> Result<EngineOutput, ConversionError> {
        match self.0 {
            EngineScript::Succeed => {
                tokio::fs::write(&spec.output_path, b"glTF\x02converted").await?;
                Ok(EngineOutput {
                    exit_code: 0,
                    stdout: "Conversion successful!".into(),
                    stderr: String::new(),
                })
            }
            EngineScript::Fail(code) => Ok(EngineOutput {
                exit_code: code,
                stdout: String::new(),
                stderr: "Traceback: export crashed".into(),
            }),
            EngineScript::OmitOutput => Ok(EngineOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            }),
            EngineScript::TimeOut => Err(ConversionError::BlenderTimeout {
                timeout_seconds: spec.timeout_seconds,
            }),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub status: Arc<StatusHub>,
    // Held so per-test workspace roots are removed on drop.
    _temp: tempfile::TempDir,
}

impl TestApp {
    pub fn new(script: EngineScript) -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut config = AppConfig::default();
        config.engine.temp_root = Some(temp.path().join("jobs"));

        let status = Arc::new(StatusHub::new());
        let pipeline = ConversionPipeline::new(
            Arc::new(ScriptedEngine(script)),
            status.clone(),
            config.engine.clone(),
        )
        .expect("pipeline");

        let state = AppState {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            status: status.clone(),
        };

        Self {
            router: build_app(state),
            status,
            _temp: temp,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible service")
    }
}

/// Build a raw multipart body with an optional jobId field.
pub fn multipart_body(
    file: Option<(&str, &[u8])>,
    job_id: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(job_id) = job_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"jobId\"\r\n\r\n{job_id}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn convert_request(file: Option<(&str, &[u8])>, job_id: Option<&str>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(file, job_id)))
        .expect("request")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}
