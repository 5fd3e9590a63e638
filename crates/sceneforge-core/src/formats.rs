//! Scene format constants and filename derivation.
//!
//! SceneForge handles exactly one conversion pair: Blender `.blend`
//! scenes in, binary glTF `.glb` scenes out.

use std::path::Path;

/// Accepted upload extension.
pub const SOURCE_EXT: &str = ".blend";

/// Produced output extension.
pub const TARGET_EXT: &str = ".glb";

/// MIME type of the binary glTF output.
pub const GLB_MIME: &str = "model/gltf-binary";

/// Returns whether a filename carries the expected source extension.
pub fn is_source_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(SOURCE_EXT)
}

/// Derive the output filename by swapping the source extension for the
/// target extension: `scene.blend` → `scene.glb`.
///
/// The input must already be a validated source filename.
pub fn output_filename(source_filename: &str) -> String {
    let stem = Path::new(source_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source_filename);
    format!("{}{}", stem, TARGET_EXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_source_filename() {
        assert!(is_source_filename("scene.blend"));
        assert!(is_source_filename("SCENE.BLEND"));
        assert!(!is_source_filename("model.obj"));
        assert!(!is_source_filename(""));
        assert!(!is_source_filename("blend"));
    }

    #[test]
    fn test_output_filename_swaps_extension() {
        assert_eq!(output_filename("scene.blend"), "scene.glb");
        assert_eq!(output_filename("my scene v2.blend"), "my scene v2.glb");
    }

    #[test]
    fn test_output_filename_keeps_inner_dots() {
        assert_eq!(output_filename("a.b.blend"), "a.b.glb");
    }
}
