//! Step 2: mileage and employer number.

use tracing::{debug, info};

use super::{Advance, Step};
use crate::error::{Error, Result};
use crate::storage::{Slot, Store};

/// What the carrier-info step shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierInfo {
    /// USDOT number from the lookup.
    pub usdot: String,
    /// Mileage entered so far.
    pub mileage: String,
    /// Employer number entered so far, or from the lookup.
    pub employer: String,
    /// The employer number was already known and cannot be changed here.
    pub employer_locked: bool,
}

impl CarrierInfo {
    /// Load the step.
    ///
    /// # Errors
    ///
    /// Redirects to the lookup step when no USDOT number is stored.
    pub fn load(store: &Store) -> Result<Self> {
        Step::CarrierInfo.enter(store)?;
        let employer = store.get_present(Slot::EmployerNumber)?;
        Ok(Self {
            usdot: store.get(Slot::UsdotNumber)?.unwrap_or_default(),
            mileage: store.get(Slot::CarrierMileage)?.unwrap_or_default(),
            employer_locked: employer.is_some(),
            employer: employer.unwrap_or_default(),
        })
    }

    /// Save mileage and employer number and move on to the preview.
    ///
    /// A locked employer number wins over `employer`; corrections go through
    /// the "EIN" section of the changes flow.
    ///
    /// # Errors
    ///
    /// Returns a validation error when either value ends up blank.
    pub fn submit(mut self, store: &Store, mileage: &str, employer: Option<&str>) -> Result<Advance> {
        if !self.employer_locked {
            self.employer = employer.unwrap_or_default().trim().to_string();
        } else if employer.is_some_and(|e| e.trim() != self.employer) {
            debug!("Ignoring employer number, already set");
        }
        self.mileage = mileage.trim().to_string();

        if self.mileage.is_empty() || self.employer.is_empty() {
            return Err(Error::validation("Please fill in all required fields"));
        }

        store.set(Slot::CarrierMileage, &self.mileage)?;
        store.set(Slot::EmployerNumber, &self.employer)?;
        info!(usdot = %self.usdot, "Carrier info saved");
        Ok(Advance::to(Step::FormPreview))
    }
}
