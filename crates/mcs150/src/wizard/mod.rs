//! The filing wizard.
//!
//! New -> Carrier Info -> Form Preview -> (Changes -> Edit Changes)* -> Success.
//!
//! Steps share state only through the [`Store`] slots. Entering a step checks
//! the session and the slots that step reads; when a slot is missing the step
//! fails with [`Error::MissingPrerequisite`] naming the step to restart at.

pub mod carrier_info;
pub mod changes;
pub mod edit;
pub mod lookup;
pub mod preview;
pub mod success;

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::notice::Notice;
use crate::session::{self, Session};
use crate::storage::{Slot, Store};

pub use carrier_info::CarrierInfo;
pub use changes::{ChangeSelection, Section};
pub use edit::{EditSession, TextField};
pub use lookup::lookup;
pub use preview::FormPreview;
pub use success::{start_over, SuccessPage};

/// A wizard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    /// USDOT lookup.
    New,
    /// Mileage and employer number.
    CarrierInfo,
    /// Read-only form and PDF generation.
    FormPreview,
    /// Pick sections to change.
    Changes,
    /// Edit the picked sections.
    EditChanges,
    /// Download the generated PDF.
    Success,
}

impl Step {
    /// All steps in wizard order.
    pub const ALL: [Step; 6] = [
        Step::New,
        Step::CarrierInfo,
        Step::FormPreview,
        Step::Changes,
        Step::EditChanges,
        Step::Success,
    ];

    /// Route path of the step.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::New => "/filing/new",
            Self::CarrierInfo => "/filing/carrier-info",
            Self::FormPreview => "/filing/form-preview",
            Self::Changes => "/filing/changes",
            Self::EditChanges => "/filing/edit-changes",
            Self::Success => "/filing/success",
        }
    }

    /// Slots that must be present to enter the step.
    #[must_use]
    pub const fn prerequisites(self) -> &'static [Slot] {
        match self {
            Self::New => &[],
            Self::CarrierInfo => &[Slot::UsdotNumber],
            Self::FormPreview => &[
                Slot::UsdotNumber,
                Slot::CarrierEmail,
                Slot::CarrierMileage,
                Slot::CarrierData,
                Slot::EmployerNumber,
            ],
            Self::Changes => &[Slot::CarrierData],
            Self::EditChanges => &[
                Slot::SelectedChanges,
                Slot::CarrierData,
                Slot::EmployerNumber,
            ],
            Self::Success => &[Slot::UsdotNumber, Slot::FilingName],
        }
    }

    /// Where to send the user when a prerequisite is missing.
    #[must_use]
    pub const fn fallback(self) -> Step {
        match self {
            Self::EditChanges => Self::Changes,
            _ => Self::New,
        }
    }

    /// Check the session and this step's prerequisites.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] without a usable session and
    /// [`Error::MissingPrerequisite`] when a required slot is absent or empty.
    pub fn enter(self, store: &Store) -> Result<Session> {
        let session = session::gate(store)?;
        for slot in self.prerequisites() {
            if !store.is_present(*slot)? {
                debug!(step = %self, slot = %slot, "Missing wizard state");
                return Err(Error::MissingPrerequisite {
                    redirect: self.fallback(),
                });
            }
        }
        Ok(session)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

/// Result of a step action: where to go next and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Next step.
    pub to: Step,
    /// Notice to show, if any.
    pub notice: Option<Notice>,
}

impl Advance {
    /// Move on silently.
    #[must_use]
    pub fn to(step: Step) -> Self {
        Self {
            to: step,
            notice: None,
        }
    }

    /// Move on and show a notice.
    #[must_use]
    pub fn with_notice(step: Step, notice: Notice) -> Self {
        Self {
            to: step,
            notice: Some(notice),
        }
    }
}

/// Current state of every wizard slot, for `filing status`.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn status(store: &Store) -> Result<Vec<(Slot, bool)>> {
    store.slot_status()
}

/// The first step the stored state allows, walking backwards from Success.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn resume_point(store: &Store) -> Result<Step> {
    for step in [Step::Success, Step::FormPreview, Step::CarrierInfo] {
        let mut ready = true;
        for slot in step.prerequisites() {
            ready &= store.is_present(*slot)?;
        }
        if ready {
            return Ok(step);
        }
    }
    Ok(Step::New)
}
