use std::path::{Path, PathBuf};
use tracing::info;

use super::error::WatermarkError;
use super::types::OutputFormat;

/// Check that `path` is an existing directory we may write into
pub fn ensure_writable_dir(path: &Path) -> Result<(), WatermarkError> {
    let not_writable = |reason: &str| WatermarkError::PathNotWritable {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let metadata = std::fs::metadata(path).map_err(|_| not_writable("does not exist"))?;
    if !metadata.is_dir() {
        return Err(not_writable("not a directory"));
    }
    if metadata.permissions().readonly() {
        return Err(not_writable("read-only"));
    }
    Ok(())
}

/// Directory holding `original`; `.` for bare file names
pub fn original_directory(original: &Path) -> PathBuf {
    match original.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Where the watermarked image is written:
/// `{destination_path or original dir}/{destination_filename or original stem}.{ext}`
pub fn output_path(
    original: &Path,
    destination_path: Option<&Path>,
    destination_filename: Option<&str>,
    format: OutputFormat,
) -> PathBuf {
    let directory = destination_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| original_directory(original));

    let stem = destination_filename
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            original
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "watermarked".to_string());

    directory.join(format!("{}.{}", stem, format.extension()))
}

/// Whether two directory paths name the same place on disk
pub fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Copy the untouched original into `backup_dir`, keeping its file name
pub fn backup_original(original: &Path, backup_dir: &Path) -> Result<PathBuf, WatermarkError> {
    let file_name = original
        .file_name()
        .ok_or_else(|| WatermarkError::NotFound(original.to_path_buf()))?;
    let target = backup_dir.join(file_name);

    std::fs::copy(original, &target).map_err(|source| WatermarkError::IoFailure {
        from: original.to_path_buf(),
        to: target.clone(),
        source,
    })?;

    info!("Backed up {:?} to {:?}", original, target);
    Ok(target)
}
