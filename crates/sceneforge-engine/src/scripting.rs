//! Blender Python script generation.
//!
//! The engine is driven by a small embedded export script rather than by
//! command-line export flags: Blender receives the script via `--python`
//! and the source/output paths as trailing positional arguments after the
//! `--` separator, which the script reads from `sys.argv`.

use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::ConversionError;

/// Export script run inside Blender: open the staged `.blend`, export a
/// binary glTF with transforms applied.
const EXPORT_SCRIPT: &str = r#"import bpy
import sys

blend_file = sys.argv[-2]
output_file = sys.argv[-1]

print(f"Opening {blend_file}...")
bpy.ops.wm.open_mainfile(filepath=blend_file)

print(f"Exporting to {output_file}...")
bpy.ops.export_scene.gltf(
    filepath=output_file,
    export_format='GLB',
    export_apply=True
)

print("Conversion successful!")
"#;

/// Generates per-job Blender scripts.
pub struct ScriptingEngine;

impl ScriptingEngine {
    /// Write the export script into the job workspace.
    pub async fn write_export_script(script_path: &Path) -> Result<(), ConversionError> {
        let mut file = tokio::fs::File::create(script_path).await?;
        file.write_all(EXPORT_SCRIPT.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// The embedded export script source.
    pub fn export_script() -> &'static str {
        EXPORT_SCRIPT
    }
}
