//! Blender subprocess invocation with timeout management and bounded
//! output capture.
//!
//! The external engine is modeled as a capability behind the
//! [`ConverterEngine`] trait so orchestration logic can be exercised with
//! a fake that never spawns a process.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::error::ConversionError;
use crate::sandbox::sandboxed_env;

/// One invocation of the external converter.
#[derive(Debug, Clone)]
pub struct InvokeSpec {
    /// Path to the generated export script.
    pub script_path: PathBuf,
    /// Path to the staged source file.
    pub source_path: PathBuf,
    /// Path where the engine must write its output.
    pub output_path: PathBuf,
    /// Directory the engine's user/system/temp state is redirected into.
    pub sandbox_dir: PathBuf,
    /// Wall-clock budget in seconds.
    pub timeout_seconds: u64,
}

/// Captured result of a converter invocation that ran to completion.
///
/// A non-zero exit code is data, not an error: the orchestrator observes
/// the code and classifies the outcome. Only timeouts and spawn failures
/// surface as `Err`.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Process exit code (-1 when terminated by signal).
    pub exit_code: i32,
    /// Standard output, truncated for diagnostics.
    pub stdout: String,
    /// Standard error, truncated for diagnostics.
    pub stderr: String,
}

/// The external converter as a swappable capability.
#[async_trait]
pub trait ConverterEngine: Send + Sync + std::fmt::Debug {
    /// Run one conversion, enforcing the wall-clock budget.
    async fn invoke(&self, spec: &InvokeSpec) -> Result<EngineOutput, ConversionError>;
}

/// Invokes Blender in headless background mode.
#[derive(Debug, Clone)]
pub struct BlenderEngine {
    /// Path to (or bare command name of) the Blender executable.
    blender_path: PathBuf,
    /// Maximum characters of stdout/stderr retained.
    capture_chars: usize,
}

impl BlenderEngine {
    /// Create a new Blender engine.
    pub fn new(blender_path: PathBuf, capture_chars: usize) -> Self {
        Self {
            blender_path,
            capture_chars,
        }
    }
}

#[async_trait]
impl ConverterEngine for BlenderEngine {
    async fn invoke(&self, spec: &InvokeSpec) -> Result<EngineOutput, ConversionError> {
        let base: HashMap<String, String> = std::env::vars().collect();
        let env = sandboxed_env(&base, &spec.sandbox_dir);

        let mut cmd = Command::new(&self.blender_path);
        cmd.arg("--background")
            .arg("-noaudio")
            .arg("--factory-startup")
            .arg("--enable-autoexec")
            .arg("--python-use-system-env")
            .arg("--python")
            .arg(&spec.script_path)
            .arg("--")
            .arg(&spec.source_path)
            .arg(&spec.output_path)
            .env_clear()
            .envs(&env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            blender = %self.blender_path.display(),
            script = %spec.script_path.display(),
            timeout_s = spec.timeout_seconds,
            "Spawning Blender process"
        );

        let start = Instant::now();
        let mut child = cmd.spawn()?;

        // Drain both pipes concurrently so a chatty engine can never fill
        // the pipe buffer and stall against our wait().
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_task = tokio::spawn(drain_pipe(stdout));
        let stderr_task = tokio::spawn(drain_pipe(stderr));

        let timeout = Duration::from_secs(spec.timeout_seconds);

        tokio::select! {
            result = child.wait() => {
                let status = result?;
                let elapsed = start.elapsed();

                let stdout_str = truncate_chars(
                    stdout_task.await.unwrap_or_default(),
                    self.capture_chars,
                );
                let stderr_str = truncate_chars(
                    stderr_task.await.unwrap_or_default(),
                    self.capture_chars,
                );

                info!(stdout = %stdout_str, "Blender stdout");
                if !stderr_str.is_empty() {
                    warn!(stderr = %stderr_str, "Blender stderr");
                }

                let exit_code = status.code().unwrap_or(-1);
                info!(
                    exit_code = exit_code,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Blender process finished"
                );

                Ok(EngineOutput {
                    exit_code,
                    stdout: stdout_str,
                    stderr: stderr_str,
                })
            }
            _ = tokio::time::sleep(timeout) => {
                error!(
                    timeout_s = spec.timeout_seconds,
                    "Blender process timed out, killing"
                );
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                Err(ConversionError::BlenderTimeout {
                    timeout_seconds: spec.timeout_seconds,
                })
            }
        }
    }
}

/// Read a child pipe to the end.
async fn drain_pipe(pipe: Option<impl tokio::io::AsyncRead + Unpin + Send + 'static>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Keep at most `max` characters of diagnostic output.
fn truncate_chars(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        text
    } else {
        text.chars().take(max).collect()
    }
}
