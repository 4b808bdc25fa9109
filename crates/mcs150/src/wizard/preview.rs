//! Step 3: the read-only form and PDF generation.

use std::fmt;

use tracing::{info, warn};

use super::{Advance, Step};
use crate::api::Backend;
use crate::carrier::catalog::{self, CodeEntry};
use crate::carrier::{class9_marks, CarrierData, DriverField, Ownership, VehicleClass};
use crate::config::FormConfig;
use crate::error::{Error, Result};
use crate::notice::{Action, Notice};
use crate::storage::{Slot, Store};

/// The accumulated filing, ready to render or generate.
#[derive(Debug, Clone)]
pub struct FormPreview {
    usdot: String,
    email: String,
    mileage: String,
    employer: String,
    data: CarrierData,
    derive_class9: bool,
    generating: bool,
}

impl FormPreview {
    /// Load the step.
    ///
    /// # Errors
    ///
    /// Redirects to the lookup step when any of USDOT number, email, mileage,
    /// carrier data or employer number is missing.
    pub fn load(store: &Store, form: &FormConfig) -> Result<Self> {
        Step::FormPreview.enter(store)?;
        let data = store
            .get_json::<CarrierData>(Slot::CarrierData)?
            .ok_or(Error::MissingPrerequisite {
                redirect: Step::New,
            })?;
        Ok(Self {
            usdot: store.get(Slot::UsdotNumber)?.unwrap_or_default(),
            email: store.get(Slot::CarrierEmail)?.unwrap_or_default(),
            mileage: store.get(Slot::CarrierMileage)?.unwrap_or_default(),
            employer: store.get(Slot::EmployerNumber)?.unwrap_or_default(),
            data,
            derive_class9: form.derive_class9_hazmat,
            generating: false,
        })
    }

    /// The carrier-data record being previewed.
    #[must_use]
    pub fn data(&self) -> &CarrierData {
        &self.data
    }

    /// Whether the generate action is available (no request in flight).
    #[must_use]
    pub fn can_generate(&self) -> bool {
        !self.generating
    }

    /// The line-numbered text rendering of the form.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Ask the backend to render the PDF.
    ///
    /// On success the generated file name is stored and the wizard moves to
    /// Success. On failure nothing in the store changes and generation can be
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns an [`Action::GeneratePdf`] failure when the backend call fails.
    pub async fn generate(&mut self, store: &Store, backend: &dyn Backend) -> Result<Advance> {
        if self.generating {
            return Err(Error::validation("A PDF is already being generated."));
        }
        let payload = self
            .data
            .generation_payload(&self.email, &self.mileage, &self.employer)?;

        self.generating = true;
        let result = backend.generate_pdf(&payload).await;
        self.generating = false;

        match result {
            Ok(generated) => {
                store.set(Slot::FilingName, &generated.filing_name)?;
                info!(usdot = %self.usdot, filing = %generated.filing_name, "PDF generated");
                Ok(Advance::with_notice(
                    Step::Success,
                    Notice::info(
                        "PDF Generated",
                        format!("{} has been generated successfully.", generated.filing_name),
                    ),
                ))
            }
            Err(e) => {
                warn!(usdot = %self.usdot, error = %e, "PDF generation failed");
                Err(Error::action_failed(Action::GeneratePdf, e))
            }
        }
    }

    /// Go to change selection. No backend call is made.
    #[must_use]
    pub fn request_changes(&self) -> Advance {
        Advance::to(Step::Changes)
    }
}

fn check(checked: bool) -> &'static str {
    if checked {
        "[X]"
    } else {
        "[ ]"
    }
}

fn value(s: &str) -> &str {
    let s = s.trim();
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

fn write_group(
    f: &mut fmt::Formatter<'_>,
    entries: &[CodeEntry],
    is_checked: impl Fn(&CodeEntry) -> bool,
) -> fmt::Result {
    for entry in entries {
        writeln!(f, "      {} {}. {}", check(is_checked(entry)), entry.letter, entry.label)?;
    }
    Ok(())
}

impl fmt::Display for FormPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data;
        writeln!(f, "MCS-150 MOTOR CARRIER IDENTIFICATION REPORT")?;
        writeln!(f)?;
        writeln!(f, "  1. Legal business name:   {}", value(&d.legal_name))?;
        writeln!(f, "  2. Doing business as:     {}", value(&d.dba_name))?;
        writeln!(f, "  3. Principal street:      {}", value(&d.physical.street))?;
        writeln!(f, "  4. City:                  {}", value(&d.physical.city))?;
        writeln!(f, "  5. State:                 {}", value(&d.physical.state))?;
        writeln!(f, "  6. Zip code:              {}", value(&d.physical.zip))?;
        writeln!(f, "  7. Colonia:               {}", value(&d.physical.colonia))?;
        writeln!(
            f,
            "     {} Mailing address same as principal address",
            check(d.mailing.is_same)
        )?;
        writeln!(f, "  8. Mailing street:        {}", value(&d.mailing.street))?;
        writeln!(f, "  9. City:                  {}", value(&d.mailing.city))?;
        writeln!(f, " 10. State:                 {}", value(&d.mailing.state))?;
        writeln!(f, " 11. Zip code:              {}", value(&d.mailing.zip))?;
        writeln!(f, " 12. Colonia:               {}", value(&d.mailing.colonia))?;
        writeln!(f, " 13. Principal phone:       {}", value(&d.phones.principal))?;
        writeln!(f, " 14. Cell phone:            {}", value(&d.phones.cell))?;
        writeln!(f, " 15. Fax:                   {}", value(&d.phones.fax))?;
        writeln!(f, " 16. USDOT number:          {}", value(&self.usdot))?;
        writeln!(f, " 17. MC/MX number:          {}", value(&d.identifiers.mc_mx_number))?;
        writeln!(f, " 18. DUNS number:           {}", value(&d.identifiers.duns))?;
        writeln!(f, " 19. Employer ID number:    {}", value(&self.employer))?;
        writeln!(f, " 20. Email:                 {}", value(&self.email))?;
        writeln!(f, " 21. Mileage (last year):   {}", value(&self.mileage))?;

        writeln!(f, " 22. Company operations:")?;
        write_group(f, &catalog::OPERATIONS, |e| {
            d.operation.eq_ignore_ascii_case(e.letter)
        })?;

        writeln!(f, " 23. Operation classification:")?;
        write_group(f, &catalog::CLASSIFICATIONS, |e| {
            d.classifications.iter().any(|c| c == e.label)
        })?;

        writeln!(f, " 24. Cargo classifications:")?;
        write_group(f, &catalog::CARGO, |e| d.cargo.iter().any(|c| c == e.label))?;
        writeln!(
            f,
            "      {} {}. {}: {}",
            check(d.other_cargo_checked()),
            catalog::OTHER_CARGO.letter,
            catalog::OTHER_CARGO.label,
            value(&d.other_cargo)
        )?;

        writeln!(f, " 25. Hazardous materials:   {}", value(&d.hazardous_materials))?;
        if self.derive_class9 {
            let marks = class9_marks(d);
            writeln!(
                f,
                "      GG. CLASS 9   C {}  S {}  B {}  NB {}",
                check(marks.carrier),
                check(marks.shipper),
                check(marks.bulk),
                check(marks.non_bulk)
            )?;
        }

        writeln!(f, " 26. Vehicles:")?;
        write!(f, "      {:<28}", "")?;
        for ownership in Ownership::ALL {
            write!(f, "{:>13}", ownership.label())?;
        }
        writeln!(f)?;
        for class in VehicleClass::ALL {
            write!(f, "      {:<28}", class.label())?;
            for ownership in Ownership::ALL {
                write!(f, "{:>13}", value(d.vehicles.get(ownership, class)))?;
            }
            writeln!(f)?;
        }

        writeln!(f, " 27. Drivers:")?;
        for field in DriverField::ALL {
            writeln!(f, "      {:<30} {}", field.key(), value(d.drivers.get(field)))?;
        }
        Ok(())
    }
}
