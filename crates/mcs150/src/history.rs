//! The signed-in user's filing history.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{info, warn};

use crate::api::{Backend, FilingHistoryRecord};
use crate::download;
use crate::error::{Error, Result};
use crate::notice::Action;
use crate::session;
use crate::storage::Store;

/// Fetch every filing of the signed-in user.
///
/// # Errors
///
/// Returns [`Error::NotAuthenticated`] without a session and an
/// [`Action::LoadHistory`] failure when the backend call fails.
pub async fn list(store: &Store, backend: &dyn Backend) -> Result<Vec<FilingHistoryRecord>> {
    session::gate(store)?;
    backend
        .filing_history()
        .await
        .map_err(|e| Error::action_failed(Action::LoadHistory, e))
}

/// Rows whose USDOT number contains `term`, or whose email contains it
/// ignoring case. An empty term keeps everything.
#[must_use]
pub fn search<'a>(records: &'a [FilingHistoryRecord], term: &str) -> Vec<&'a FilingHistoryRecord> {
    let lowered = term.to_lowercase();
    records
        .iter()
        .filter(|r| r.usdot_number.contains(term) || r.carrier_email.to_lowercase().contains(&lowered))
        .collect()
}

/// `Completed` for status 1, `Pending` otherwise.
#[must_use]
pub fn status_label(status: i64) -> &'static str {
    if status == 1 {
        "Completed"
    } else {
        "Pending"
    }
}

/// Render a backend timestamp as `MM/DD/YYYY, hh:mm AM`.
///
/// RFC 3339, RFC 2822 (`Tue, 15 Oct 2024 10:00:00 GMT`) and plain
/// `YYYY-MM-DD HH:MM:SS` are understood; anything else is shown unchanged.
#[must_use]
pub fn display_date(raw: &str) -> String {
    const OUT: &str = "%m/%d/%Y, %I:%M %p";
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(OUT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.format(OUT).to_string();
    }
    for layout in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return dt.format(OUT).to_string();
        }
    }
    raw.to_string()
}

/// Download a previously generated file into `dir`.
///
/// The file keeps the last segment of its backend path as its name.
///
/// # Errors
///
/// Returns an [`Action::DownloadPdf`] failure when the file cannot be fetched
/// or written.
pub async fn download(store: &Store, backend: &dyn Backend, filing_path: &str, dir: &Path) -> Result<PathBuf> {
    session::gate(store)?;
    let file_name = download::pdf_file_name(filing_path);
    let result = async {
        let bytes = backend.download_generated(filing_path).await?;
        download::save(dir, &file_name, &bytes).await
    }
    .await;

    result.map_err(|e| {
        warn!(path = filing_path, error = %e, "History download failed");
        Error::action_failed(Action::DownloadPdf, e)
    })
}

/// Check that a generated file still exists on the backend.
///
/// # Errors
///
/// Returns an [`Action::ViewFile`] failure ("This file does not exist.") when
/// it does not.
pub async fn view(store: &Store, backend: &dyn Backend, filing_path: &str) -> Result<()> {
    session::gate(store)?;
    backend
        .check_generated(filing_path)
        .await
        .map_err(|e| Error::action_failed(Action::ViewFile, e))
}

/// Export file name for a given moment.
#[must_use]
pub fn export_file_name(at: DateTime<Local>) -> String {
    format!("Filing-history-{}.csv", at.format("%Y%m%d%H%M%S"))
}

/// Export the whole history as CSV into `dir`.
///
/// # Errors
///
/// Returns an [`Action::ExportHistory`] failure when the export cannot be
/// fetched or written.
pub async fn export(store: &Store, backend: &dyn Backend, dir: &Path) -> Result<PathBuf> {
    session::gate(store)?;
    let file_name = export_file_name(Local::now());
    let result = async {
        let bytes = backend.export_history().await?;
        download::save(dir, &file_name, &bytes).await
    }
    .await;

    match result {
        Ok(path) => {
            info!(path = %path.display(), "History exported");
            Ok(path)
        }
        Err(e) => Err(Error::action_failed(Action::ExportHistory, e)),
    }
}
