//! Step 5: edit the selected sections.
//!
//! The working copy of the carrier data and the current section are kept in
//! the `editDraft` and `editCursor` slots so an edit can span several
//! invocations. Nothing reaches `carrierData` until [`EditSession::save`].

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use super::{Advance, Section, Step};
use crate::carrier::catalog;
use crate::carrier::{toggle, CarrierData, DriverField, Ownership, VehicleClass};
use crate::error::{Error, Result};
use crate::notice::Notice;
use crate::storage::{Slot, Store};

/// Free-text fields of the form, by section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// Line 1.
    LegalName,
    /// Line 2.
    DbaName,
    /// Line 3.
    PhysicalStreet,
    /// Line 4.
    PhysicalCity,
    /// Line 5.
    PhysicalState,
    /// Line 6.
    PhysicalZip,
    /// Line 7.
    PhysicalColonia,
    /// Line 8.
    MailingStreet,
    /// Line 9.
    MailingCity,
    /// Line 10.
    MailingState,
    /// Line 11.
    MailingZip,
    /// Line 12.
    MailingColonia,
    /// Line 13.
    PrincipalPhone,
    /// Line 14.
    CellPhone,
    /// Line 15.
    Fax,
    /// Line 24, "Other" text.
    OtherCargo,
}

impl TextField {
    /// Every field.
    pub const ALL: [TextField; 16] = [
        TextField::LegalName,
        TextField::DbaName,
        TextField::PhysicalStreet,
        TextField::PhysicalCity,
        TextField::PhysicalState,
        TextField::PhysicalZip,
        TextField::PhysicalColonia,
        TextField::MailingStreet,
        TextField::MailingCity,
        TextField::MailingState,
        TextField::MailingZip,
        TextField::MailingColonia,
        TextField::PrincipalPhone,
        TextField::CellPhone,
        TextField::Fax,
        TextField::OtherCargo,
    ];

    /// Command-line name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LegalName => "legal-name",
            Self::DbaName => "dba-name",
            Self::PhysicalStreet => "physical-street",
            Self::PhysicalCity => "physical-city",
            Self::PhysicalState => "physical-state",
            Self::PhysicalZip => "physical-zip",
            Self::PhysicalColonia => "physical-colonia",
            Self::MailingStreet => "mailing-street",
            Self::MailingCity => "mailing-city",
            Self::MailingState => "mailing-state",
            Self::MailingZip => "mailing-zip",
            Self::MailingColonia => "mailing-colonia",
            Self::PrincipalPhone => "phone",
            Self::CellPhone => "cell-phone",
            Self::Fax => "fax",
            Self::OtherCargo => "other-cargo",
        }
    }

    /// The section a field belongs to.
    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Self::LegalName | Self::DbaName => Section::Name,
            Self::PhysicalStreet
            | Self::PhysicalCity
            | Self::PhysicalState
            | Self::PhysicalZip
            | Self::PhysicalColonia
            | Self::MailingStreet
            | Self::MailingCity
            | Self::MailingState
            | Self::MailingZip
            | Self::MailingColonia => Section::Address,
            Self::PrincipalPhone | Self::CellPhone | Self::Fax => Section::Phone,
            Self::OtherCargo => Section::Cargo,
        }
    }

    /// Current value of the field in `data`.
    #[must_use]
    pub fn value(self, data: &CarrierData) -> &str {
        match self {
            Self::LegalName => &data.legal_name,
            Self::DbaName => &data.dba_name,
            Self::PhysicalStreet => &data.physical.street,
            Self::PhysicalCity => &data.physical.city,
            Self::PhysicalState => &data.physical.state,
            Self::PhysicalZip => &data.physical.zip,
            Self::PhysicalColonia => &data.physical.colonia,
            Self::MailingStreet => &data.mailing.street,
            Self::MailingCity => &data.mailing.city,
            Self::MailingState => &data.mailing.state,
            Self::MailingZip => &data.mailing.zip,
            Self::MailingColonia => &data.mailing.colonia,
            Self::PrincipalPhone => &data.phones.principal,
            Self::CellPhone => &data.phones.cell,
            Self::Fax => &data.phones.fax,
            Self::OtherCargo => &data.other_cargo,
        }
    }

    fn slot(self, data: &mut CarrierData) -> &mut String {
        match self {
            Self::LegalName => &mut data.legal_name,
            Self::DbaName => &mut data.dba_name,
            Self::PhysicalStreet => &mut data.physical.street,
            Self::PhysicalCity => &mut data.physical.city,
            Self::PhysicalState => &mut data.physical.state,
            Self::PhysicalZip => &mut data.physical.zip,
            Self::PhysicalColonia => &mut data.physical.colonia,
            Self::MailingStreet => &mut data.mailing.street,
            Self::MailingCity => &mut data.mailing.city,
            Self::MailingState => &mut data.mailing.state,
            Self::MailingZip => &mut data.mailing.zip,
            Self::MailingColonia => &mut data.mailing.colonia,
            Self::PrincipalPhone => &mut data.phones.principal,
            Self::CellPhone => &mut data.phones.cell,
            Self::Fax => &mut data.phones.fax,
            Self::OtherCargo => &mut data.other_cargo,
        }
    }
}

impl FromStr for TextField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| Error::validation(format!("unknown field '{s}'")))
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// An edit in progress.
#[derive(Debug)]
pub struct EditSession<'a> {
    store: &'a Store,
    sections: Vec<Section>,
    cursor: usize,
    draft: CarrierData,
    employer: String,
}

impl<'a> EditSession<'a> {
    /// Resume (or start) editing the selected sections.
    ///
    /// # Errors
    ///
    /// Redirects to change selection when the selection, carrier data or
    /// employer number is missing.
    pub fn open(store: &'a Store) -> Result<Self> {
        Step::EditChanges.enter(store)?;
        let back = || Error::MissingPrerequisite {
            redirect: Step::Changes,
        };

        let sections: Vec<Section> = store
            .get_json(Slot::SelectedChanges)
            .ok()
            .flatten()
            .filter(|s: &Vec<Section>| !s.is_empty())
            .ok_or_else(back)?;

        let draft = match store.get_json::<CarrierData>(Slot::EditDraft)? {
            Some(draft) => draft,
            None => store.get_json(Slot::CarrierData)?.ok_or_else(back)?,
        };

        let cursor = store
            .get_present(Slot::EditCursor)?
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(0)
            .min(sections.len() - 1);

        Ok(Self {
            store,
            sections,
            cursor,
            draft,
            employer: store.get(Slot::EmployerNumber)?.unwrap_or_default(),
        })
    }

    /// Sections being edited, in order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The section currently shown.
    #[must_use]
    pub fn current(&self) -> Section {
        self.sections[self.cursor]
    }

    /// Zero-based index of the current section.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Whether there is a previous section.
    #[must_use]
    pub fn can_prev(&self) -> bool {
        self.cursor > 0
    }

    /// Whether there is a next section.
    #[must_use]
    pub fn can_next(&self) -> bool {
        self.cursor + 1 < self.sections.len()
    }

    /// Move to the next section. Does nothing on the last one.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor cannot be persisted.
    pub fn next(&mut self) -> Result<Section> {
        if self.can_next() {
            self.move_to(self.cursor + 1)?;
        }
        Ok(self.current())
    }

    /// Move to the previous section. Does nothing on the first one.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor cannot be persisted.
    pub fn prev(&mut self) -> Result<Section> {
        if self.can_prev() {
            self.move_to(self.cursor - 1)?;
        }
        Ok(self.current())
    }

    /// Jump to a selected section.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `section` was not selected.
    pub fn goto(&mut self, section: Section) -> Result<()> {
        let index = self
            .sections
            .iter()
            .position(|s| *s == section)
            .ok_or_else(|| not_selected(section))?;
        self.move_to(index)
    }

    fn move_to(&mut self, index: usize) -> Result<()> {
        self.cursor = index;
        self.store.set(Slot::EditCursor, &index.to_string())?;
        debug!(section = %self.current(), "Edit cursor moved");
        Ok(())
    }

    /// The working copy.
    #[must_use]
    pub fn draft(&self) -> &CarrierData {
        &self.draft
    }

    /// The employer number as it currently stands.
    #[must_use]
    pub fn employer(&self) -> &str {
        &self.employer
    }

    fn require(&self, section: Section) -> Result<()> {
        if self.sections.contains(&section) {
            Ok(())
        } else {
            Err(not_selected(section))
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.set_json(Slot::EditDraft, &self.draft)
    }

    /// Set a free-text field.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the field's section was not selected.
    pub fn set_text(&mut self, field: TextField, value: &str) -> Result<()> {
        self.require(field.section())?;
        *field.slot(&mut self.draft) = value.to_string();
        self.persist()
    }

    /// Set the "mailing same as principal" flag.
    ///
    /// The mailing fields are copied when the edit is saved, not now.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the address section was not selected.
    pub fn set_mailing_same(&mut self, same: bool) -> Result<()> {
        self.require(Section::Address)?;
        self.draft.mailing.is_same = same;
        self.persist()
    }

    /// Replace the employer number. Written straight to its slot.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the EIN section was not selected or the
    /// value is blank.
    pub fn set_employer(&mut self, value: &str) -> Result<()> {
        self.require(Section::Ein)?;
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::validation("The employer number cannot be empty."));
        }
        self.store.set(Slot::EmployerNumber, value)?;
        self.employer = value.to_string();
        Ok(())
    }

    /// Select the company operation by letter or label; blank clears it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown operation or when the
    /// operations section was not selected.
    pub fn set_operation(&mut self, query: &str) -> Result<()> {
        self.require(Section::Operations)?;
        self.draft.operation = if query.trim().is_empty() {
            String::new()
        } else {
            catalog::operation(query)
                .ok_or_else(|| Error::validation(format!("unknown operation '{query}'")))?
                .letter
                .to_string()
        };
        self.persist()
    }

    /// Check or uncheck one operation classification.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown classification or when the
    /// classification section was not selected.
    pub fn toggle_classification(&mut self, query: &str) -> Result<()> {
        self.require(Section::Classification)?;
        let entry = catalog::classification(query)
            .ok_or_else(|| Error::validation(format!("unknown classification '{query}'")))?;
        toggle(&mut self.draft.classifications, entry.label);
        self.persist()
    }

    /// Check or uncheck one cargo classification.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown cargo type or when the cargo
    /// section was not selected.
    pub fn toggle_cargo(&mut self, query: &str) -> Result<()> {
        self.require(Section::Cargo)?;
        let entry = catalog::cargo(query)
            .ok_or_else(|| Error::validation(format!("unknown cargo type '{query}'")))?;
        toggle(&mut self.draft.cargo, entry.label);
        self.persist()
    }

    /// Check or uncheck the "Other" cargo box.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the cargo section was not selected.
    pub fn set_other_cargo_checked(&mut self, checked: bool) -> Result<()> {
        self.require(Section::Cargo)?;
        self.draft.set_other_cargo_checked(checked);
        self.persist()
    }

    /// Set one vehicle count.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the trucks section was not selected.
    pub fn set_vehicle(&mut self, ownership: Ownership, class: VehicleClass, value: &str) -> Result<()> {
        self.require(Section::Trucks)?;
        self.draft.vehicles.set(ownership, class, value.trim());
        self.persist()
    }

    /// Set one driver count.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the drivers section was not selected.
    pub fn set_driver(&mut self, field: DriverField, value: &str) -> Result<()> {
        self.require(Section::Drivers)?;
        self.draft.drivers.set(field, value.trim());
        self.persist()
    }

    /// Merge the working copy into the carrier data.
    ///
    /// The mailing address is mirrored from the principal address here, once,
    /// when the flag is set. The selection and working slots are dropped.
    /// Returns to change selection when `more_changes`, otherwise to the
    /// preview.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save(mut self, more_changes: bool) -> Result<Advance> {
        if self.draft.apply_mailing_mirror() {
            debug!("Mailing address mirrored from principal address");
        }
        self.store.set_json(Slot::CarrierData, &self.draft)?;
        self.store.remove(Slot::SelectedChanges)?;
        self.store.remove(Slot::EditDraft)?;
        self.store.remove(Slot::EditCursor)?;
        info!(sections = ?self.sections, "Changes saved");

        let next = if more_changes {
            Step::Changes
        } else {
            Step::FormPreview
        };
        Ok(Advance::with_notice(
            next,
            Notice::info("Changes Saved", "Your changes have been saved successfully."),
        ))
    }
}

fn not_selected(section: Section) -> Error {
    Error::validation(format!(
        "The '{section}' section was not selected for changes."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::preview_ready_store;
    use pretty_assertions::assert_eq;

    fn select(store: &Store, sections: &[Section]) {
        store.set_json(Slot::SelectedChanges, sections).unwrap();
    }

    #[test]
    fn test_navigation_visits_exactly_the_selection() {
        let store = preview_ready_store();
        select(&store, &[Section::Name, Section::Phone]);

        let mut session = EditSession::open(&store).unwrap();
        assert_eq!(session.current(), Section::Name);
        assert!(!session.can_prev());
        assert!(session.can_next());

        assert_eq!(session.next().unwrap(), Section::Phone);
        assert!(session.can_prev());
        assert!(!session.can_next());
        assert_eq!(session.next().unwrap(), Section::Phone);

        assert_eq!(session.prev().unwrap(), Section::Name);
        assert_eq!(session.prev().unwrap(), Section::Name);
    }

    #[test]
    fn test_cursor_and_draft_survive_reopen() {
        let store = preview_ready_store();
        select(&store, &[Section::Name, Section::Phone]);

        {
            let mut session = EditSession::open(&store).unwrap();
            session.set_text(TextField::LegalName, "NEW NAME LLC").unwrap();
            session.next().unwrap();
        }

        let session = EditSession::open(&store).unwrap();
        assert_eq!(session.current(), Section::Phone);
        assert_eq!(session.draft().legal_name, "NEW NAME LLC");

        let stored: CarrierData = store.get_json(Slot::CarrierData).unwrap().unwrap();
        assert_eq!(stored.legal_name, "GULF COAST FREIGHT LLC");
    }

    #[test]
    fn test_edits_outside_selection_are_rejected() {
        let store = preview_ready_store();
        select(&store, &[Section::Name]);
        let mut session = EditSession::open(&store).unwrap();

        assert!(session.set_text(TextField::Fax, "1").unwrap_err().is_validation());
        assert!(session.toggle_cargo("A").is_err());
        assert!(session.goto(Section::Drivers).is_err());
    }

    #[test]
    fn test_save_mirrors_mailing_address() {
        let store = preview_ready_store();
        select(&store, &[Section::Address]);
        let mut session = EditSession::open(&store).unwrap();

        session.set_text(TextField::PhysicalStreet, "9 PIER ST").unwrap();
        session.set_text(TextField::MailingStreet, "something else").unwrap();
        session.set_mailing_same(true).unwrap();
        let advance = session.save(false).unwrap();

        assert_eq!(advance.to, Step::FormPreview);
        assert_eq!(advance.notice.unwrap().title, "Changes Saved");

        let saved: CarrierData = store.get_json(Slot::CarrierData).unwrap().unwrap();
        assert_eq!(saved.mailing.street, "9 PIER ST");
        assert_eq!(saved.mailing.city, saved.physical.city);
        assert_eq!(saved.mailing.state, saved.physical.state);
        assert_eq!(saved.mailing.zip, saved.physical.zip);
        assert!(saved.mailing.is_same);

        assert!(store.get(Slot::SelectedChanges).unwrap().is_none());
        assert!(store.get(Slot::EditDraft).unwrap().is_none());
    }

    #[test]
    fn test_save_with_more_changes() {
        let store = preview_ready_store();
        select(&store, &[Section::Operations]);
        let mut session = EditSession::open(&store).unwrap();
        session.set_operation("Intrastate Hazmat Shipper").unwrap();

        assert_eq!(session.save(true).unwrap().to, Step::Changes);
        let saved: CarrierData = store.get_json(Slot::CarrierData).unwrap().unwrap();
        assert_eq!(saved.operation, "E");
    }

    #[test]
    fn test_classification_toggle_twice_is_identity() {
        let store = preview_ready_store();
        select(&store, &[Section::Classification, Section::Cargo]);
        let mut session = EditSession::open(&store).unwrap();
        let before = session.draft().clone();

        session.toggle_classification("Migrant").unwrap();
        session.toggle_classification("F").unwrap();
        session.toggle_cargo("Motor Vehicles").unwrap();
        session.toggle_cargo("D").unwrap();

        assert_eq!(session.draft(), &before);
    }

    #[test]
    fn test_other_cargo_checkbox() {
        let store = preview_ready_store();
        select(&store, &[Section::Cargo]);
        let mut session = EditSession::open(&store).unwrap();

        session.set_other_cargo_checked(true).unwrap();
        assert_eq!(session.draft().other_cargo, " ");
        session.set_text(TextField::OtherCargo, "Scrap").unwrap();
        session.set_other_cargo_checked(false).unwrap();
        assert_eq!(session.draft().other_cargo, "");
    }

    #[test]
    fn test_employer_correction() {
        let store = preview_ready_store();
        select(&store, &[Section::Ein]);
        let mut session = EditSession::open(&store).unwrap();

        assert!(session.set_employer("  ").is_err());
        session.set_employer("98-7654321").unwrap();
        assert_eq!(session.employer(), "98-7654321");
        assert_eq!(
            store.get(Slot::EmployerNumber).unwrap().as_deref(),
            Some("98-7654321")
        );
    }

    #[test]
    fn test_counts() {
        let store = preview_ready_store();
        select(&store, &[Section::Trucks, Section::Drivers]);
        let mut session = EditSession::open(&store).unwrap();

        session
            .set_vehicle(Ownership::Owned, VehicleClass::Tractor, " 4 ")
            .unwrap();
        session.set_driver(DriverField::TotalCdl, "6").unwrap();
        session.save(false).unwrap();

        let saved: CarrierData = store.get_json(Slot::CarrierData).unwrap().unwrap();
        assert_eq!(saved.vehicles.get(Ownership::Owned, VehicleClass::Tractor), "4");
        assert_eq!(saved.drivers.total_cdl, "6");
    }

    #[test]
    fn test_open_without_selection_redirects_to_changes() {
        let store = preview_ready_store();
        let err = EditSession::open(&store).unwrap_err();
        assert_eq!(err.redirect(), Some("/filing/changes"));

        store.set(Slot::SelectedChanges, "[]").unwrap();
        let err = EditSession::open(&store).unwrap_err();
        assert_eq!(err.redirect(), Some("/filing/changes"));
    }

    #[test]
    fn test_text_field_keys() {
        assert_eq!("legal_name".parse::<TextField>().unwrap(), TextField::LegalName);
        assert_eq!(TextField::Fax.section(), Section::Phone);
        assert!("nickname".parse::<TextField>().is_err());
    }

    #[test]
    fn test_text_field_value_follows_set_text() {
        let store = preview_ready_store();
        select(&store, &[Section::Phone]);
        let mut edit = EditSession::open(&store).unwrap();

        edit.set_text(TextField::CellPhone, "(251) 555-0100").unwrap();
        assert_eq!(TextField::CellPhone.value(edit.draft()), "(251) 555-0100");
        assert_eq!(TextField::LegalName.value(edit.draft()), "GULF COAST FREIGHT LLC");
    }
}
