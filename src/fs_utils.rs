use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};

pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Appended to the input's file stem to name the artifact.
pub const RESULT_SUFFIX: &str = "_result";
pub const RESULT_EXTENSION: &str = "png";

pub fn is_supported_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ref ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str())
    )
}

pub fn default_output_dir() -> PathBuf {
    std::env::temp_dir()
}

/// `<dir>/<stem>_result.png`. The stem keeps its case; an existing artifact
/// with the same name is overwritten on the next run.
pub fn artifact_path(input: &Path, dir: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| anyhow!("{} has no file name", input.display()))?;
    let mut name = stem.to_os_string();
    name.push(RESULT_SUFFIX);
    name.push(".");
    name.push(RESULT_EXTENSION);
    Ok(dir.join(name))
}

pub fn read_image_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Unable to read {}", path.display()))
}

pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Unable to create {}", dir.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Unable to write {}", path.display()))
}
