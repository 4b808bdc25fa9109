//! Writing downloaded files to disk.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// File name for a generated filing: the filing name with a single `.pdf`.
#[must_use]
pub fn pdf_file_name(filing_name: &str) -> String {
    let stem = filing_name.trim();
    let stem = stem
        .strip_suffix(".pdf")
        .or_else(|| stem.strip_suffix(".PDF"))
        .unwrap_or(stem);
    let stem = stem.rsplit('/').next().unwrap_or(stem);
    format!("{stem}.pdf")
}

/// Write `bytes` to `dir/file_name`, creating `dir` if needed.
///
/// An existing file of the same name is replaced.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub async fn save(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() && !tokio::fs::try_exists(dir).await? {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| Error::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;
    }

    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    info!(path = %path.display(), bytes = bytes.len(), "Saved download");
    Ok(path)
}
