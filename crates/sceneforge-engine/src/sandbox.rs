//! Sandboxed environment construction for the Blender subprocess.
//!
//! Blender reads user preferences, system datafiles, and scratch space
//! from well-known environment variables. Every one of them is redirected
//! into the job's private sandbox directory so the engine cannot read or
//! write user/system state outside the workspace.

use std::collections::HashMap;
use std::path::Path;

/// Environment variables redirected into the sandbox directory.
pub const SANDBOXED_VARS: &[&str] = &[
    "BLENDER_USER_CONFIG",
    "BLENDER_SYSTEM_SCRIPTS",
    "BLENDER_SYSTEM_DATAFILES",
    "HOME",
    "TMPDIR",
    "TEMP",
    "TMP",
];

/// Overlay the sandbox redirections onto a base environment.
///
/// Pure function: the base map (normally the process environment) is
/// copied and every variable in [`SANDBOXED_VARS`] is pointed at
/// `sandbox_dir`. Everything else (`PATH`, locale, ...) passes through.
pub fn sandboxed_env(
    base: &HashMap<String, String>,
    sandbox_dir: &Path,
) -> HashMap<String, String> {
    let sandbox = sandbox_dir.to_string_lossy().to_string();

    let mut env = base.clone();
    for var in SANDBOXED_VARS {
        env.insert((*var).to_string(), sandbox.clone());
    }
    env
}
