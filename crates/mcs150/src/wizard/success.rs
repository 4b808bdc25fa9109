//! Step 6: download the generated PDF or start over.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{Advance, Step};
use crate::api::Backend;
use crate::download;
use crate::error::{Error, Result};
use crate::notice::{Action, Notice};
use crate::session;
use crate::storage::{Slot, Store};

/// The finished filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessPage {
    /// USDOT number the filing was made for.
    pub usdot: String,
    /// Name the backend gave the generated PDF.
    pub filing_name: String,
}

impl SuccessPage {
    /// Open the step.
    ///
    /// # Errors
    ///
    /// Redirects to the lookup step without a USDOT number or filing name.
    pub fn open(store: &Store) -> Result<Self> {
        Step::Success.enter(store)?;
        Ok(Self {
            usdot: store.get(Slot::UsdotNumber)?.unwrap_or_default(),
            filing_name: store.get(Slot::FilingName)?.unwrap_or_default(),
        })
    }

    /// Local file name the PDF is saved under.
    #[must_use]
    pub fn file_name(&self) -> String {
        download::pdf_file_name(&self.filing_name)
    }

    /// Fetch the PDF and write it into `dir`.
    ///
    /// Can be repeated; each call overwrites the previous copy.
    ///
    /// # Errors
    ///
    /// Returns an [`Action::DownloadPdf`] failure when the backend call or the
    /// write fails.
    pub async fn download(&self, backend: &dyn Backend, dir: &Path) -> Result<(PathBuf, Notice)> {
        let result = async {
            let bytes = backend.download_generated(&self.filing_name).await?;
            download::save(dir, &self.file_name(), &bytes).await
        }
        .await;

        match result {
            Ok(path) => Ok((
                path,
                Notice::success("Download Complete", "Thank you for downloading the PDF."),
            )),
            Err(e) => {
                warn!(filing = %self.filing_name, error = %e, "PDF download failed");
                Err(Error::action_failed(Action::DownloadPdf, e))
            }
        }
    }
}

/// Clear every wizard slot and go back to the lookup step.
///
/// The credential is kept.
///
/// # Errors
///
/// Returns [`Error::NotAuthenticated`] without a session.
pub fn start_over(store: &Store) -> Result<Advance> {
    session::gate(store)?;
    store.clear_wizard()?;
    info!("Wizard state cleared");
    Ok(Advance::to(Step::New))
}
