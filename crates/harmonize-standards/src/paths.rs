//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "HARMONIZE_STANDARDS_DIR";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `HARMONIZE_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to the workspace root
pub fn default_standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}
