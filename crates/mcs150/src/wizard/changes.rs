//! Step 4: choose which form sections to change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Advance, Step};
use crate::error::{Error, Result};
use crate::storage::{Slot, Store};

/// A group of form fields that can be edited together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Lines 1-2.
    Name,
    /// Lines 3-12.
    Address,
    /// Lines 13-15.
    Phone,
    /// Line 19, via the employer-number slot.
    Ein,
    /// Line 22.
    Operations,
    /// Line 23.
    Classification,
    /// Line 24.
    Cargo,
    /// Line 26.
    Trucks,
    /// Line 27.
    Drivers,
}

impl Section {
    /// All sections in form order.
    pub const ALL: [Section; 9] = [
        Section::Name,
        Section::Address,
        Section::Phone,
        Section::Ein,
        Section::Operations,
        Section::Classification,
        Section::Cargo,
        Section::Trucks,
        Section::Drivers,
    ];

    /// Stable identifier, as stored.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Ein => "ein",
            Self::Operations => "operations",
            Self::Classification => "classification",
            Self::Cargo => "cargo",
            Self::Trucks => "trucks",
            Self::Drivers => "drivers",
        }
    }

    /// Checkbox label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name (Legal, DBA, or both)",
            Self::Address => "Address (Physical, Mailing, or both)",
            Self::Phone => "Phone Number",
            Self::Ein => "EIN Number",
            Self::Operations => "Company Operations",
            Self::Classification => "Operation Classifications",
            Self::Cargo => "Cargo Classifications",
            Self::Trucks => "Number of Trucks",
            Self::Drivers => "Number of Drivers",
        }
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.id() == wanted)
            .ok_or_else(|| Error::validation(format!("unknown section '{s}'")))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The sections picked so far, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSelection {
    sections: Vec<Section>,
}

impl ChangeSelection {
    /// Open the step with nothing selected.
    ///
    /// # Errors
    ///
    /// Redirects to the lookup step when there is no carrier data.
    pub fn open(store: &Store) -> Result<Self> {
        Step::Changes.enter(store)?;
        Ok(Self::default())
    }

    /// Select `section`, or deselect it if already selected.
    pub fn toggle(&mut self, section: Section) {
        if let Some(pos) = self.sections.iter().position(|s| *s == section) {
            self.sections.remove(pos);
        } else {
            self.sections.push(section);
        }
    }

    /// Whether `section` is selected.
    #[must_use]
    pub fn is_selected(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    /// Selected sections in pick order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Persist the selection and move on to editing.
    ///
    /// Any half-finished edit from an earlier pass is discarded.
    ///
    /// # Errors
    ///
    /// Returns a validation error when nothing is selected.
    pub fn confirm(self, store: &Store) -> Result<Advance> {
        if self.sections.is_empty() {
            return Err(Error::validation_titled(
                "No changes selected",
                "Please select at least one change to make or go back to the preview.",
            ));
        }
        store.set_json(Slot::SelectedChanges, &self.sections)?;
        store.remove(Slot::EditDraft)?;
        store.remove(Slot::EditCursor)?;
        debug!(sections = ?self.sections, "Changes selected");
        Ok(Advance::to(Step::EditChanges))
    }
}
