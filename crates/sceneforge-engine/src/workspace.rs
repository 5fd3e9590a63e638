//! Per-job workspace lifecycle.
//!
//! Every conversion job owns a uniquely-named directory holding its staged
//! source file, the generated export script, the expected output file, and
//! a sandbox directory for the engine's redirected state. Acquisition is
//! scoped: the pipeline releases the workspace on every exit path, and a
//! `Drop` backstop covers panics.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::error::ConversionError;

/// Maximum characters kept from a sanitized filename stem.
const MAX_STEM_CHARS: usize = 120;

/// The temporary filesystem locations owned by one conversion job.
#[derive(Debug)]
pub struct JobWorkspace {
    /// Per-job root directory; everything below it is private to this job.
    root: PathBuf,
    /// Where the uploaded `.blend` bytes are staged.
    pub source_path: PathBuf,
    /// Where the generated Blender export script is written.
    pub script_path: PathBuf,
    /// Where the engine is expected to write the `.glb` artifact.
    pub output_path: PathBuf,
    /// Directory the engine's user/system/temp state is redirected into.
    pub sandbox_dir: PathBuf,
    released: bool,
}

impl JobWorkspace {
    /// Allocate a fresh workspace for one job.
    ///
    /// The directory name carries a UUIDv7 so concurrent jobs can never
    /// collide. The output path is the source path with its extension
    /// swapped.
    pub async fn acquire(
        temp_root: &Path,
        original_name: &str,
    ) -> Result<Self, ConversionError> {
        let root = temp_root.join(format!("job__{}", Uuid::now_v7().simple()));
        let sandbox_dir = root.join("sandbox");
        tokio::fs::create_dir_all(&sandbox_dir).await?;

        let stem = sanitize_stem(original_name);
        let source_path = root.join(format!("{stem}.blend"));
        let output_path = source_path.with_extension("glb");
        let script_path = root.join("export_glb.py");

        Ok(Self {
            root,
            source_path,
            script_path,
            output_path,
            sandbox_dir,
            released: false,
        })
    }

    /// Remove every path owned by this job (best-effort).
    ///
    /// Deletion errors are logged, not propagated: a leftover directory
    /// must never turn a successful conversion into a failure.
    pub async fn release(mut self) {
        self.released = true;
        if let Err(e) = tokio::fs::remove_dir_all(&self.root).await {
            warn!(
                workspace = %self.root.display(),
                error = %e,
                "Failed to clean up job workspace"
            );
        }
    }

    /// The per-job root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        // Backstop for panic/early-return paths that skipped release().
        if !self.released {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }
}

/// Sanitize a filename stem for safe filesystem usage.
pub fn sanitize_stem(filename: &str) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else if c.is_whitespace() {
                '_'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .take(MAX_STEM_CHARS)
        .collect();

    if sanitized.is_empty() {
        "scene".to_string()
    } else {
        sanitized
    }
}
