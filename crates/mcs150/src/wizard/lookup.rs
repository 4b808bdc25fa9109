//! Step 1: resolve a USDOT number to a carrier record.

use tracing::info;

use super::{Advance, Step};
use crate::api::Backend;
use crate::carrier::sources::{employer_number, resolve_carrier_data, LookupRecord};
use crate::error::{Error, Result};
use crate::notice::Action;
use crate::storage::{Slot, Store};

/// Start a new filing for `usdot`.
///
/// Every wizard slot is cleared before the lookup, so a failed lookup leaves
/// only the USDOT number and email behind.
///
/// # Errors
///
/// Returns a validation error when either input is blank, and an
/// [`Action::Lookup`] failure when the backend has no record for the number.
pub async fn lookup(
    store: &Store,
    backend: &dyn Backend,
    usdot: &str,
    email: &str,
) -> Result<Advance> {
    Step::New.enter(store)?;

    let usdot = usdot.trim();
    let email = email.trim();
    if usdot.is_empty() || email.is_empty() {
        return Err(Error::validation(
            "Please enter the USDOT number and email address.",
        ));
    }

    store.clear_wizard()?;
    store.set(Slot::UsdotNumber, usdot)?;
    store.set(Slot::CarrierEmail, email)?;

    let body = backend
        .lookup_carrier(usdot)
        .await
        .map_err(|e| Error::action_failed(Action::Lookup, e))?;

    let record = LookupRecord::from_response(&body);
    if record.is_empty() {
        return Err(Error::action_failed(
            Action::Lookup,
            Error::UnexpectedResponse(format!("no carrier record for USDOT {usdot}")),
        ));
    }

    let data = resolve_carrier_data(&record);
    store.set_json(Slot::CarrierData, &data)?;
    if let Some(ein) = employer_number(&record) {
        store.set(Slot::EmployerNumber, &ein)?;
    }

    info!(usdot, legal_name = %data.legal_name, "Carrier record loaded");
    Ok(Advance::to(Step::CarrierInfo))
}
