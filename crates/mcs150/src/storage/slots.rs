//! Named wizard slots.

use std::fmt;

/// A named piece of wizard state.
///
/// Key names are stable: they are what is written to the `slots` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// USDOT number entered at lookup.
    UsdotNumber,
    /// Carrier contact email entered at lookup.
    CarrierEmail,
    /// Annual mileage entered at carrier info.
    CarrierMileage,
    /// Employer identification number.
    EmployerNumber,
    /// The carrier-data record, as JSON.
    CarrierData,
    /// Sections chosen for editing, as a JSON array.
    SelectedChanges,
    /// Name of the generated PDF.
    FilingName,
    /// Working copy of the carrier-data record while editing, as JSON.
    EditDraft,
    /// Index of the section being edited.
    EditCursor,
}

impl Slot {
    /// Every slot, in the order they are produced by the wizard.
    pub const ALL: [Slot; 9] = [
        Slot::UsdotNumber,
        Slot::CarrierEmail,
        Slot::CarrierMileage,
        Slot::EmployerNumber,
        Slot::CarrierData,
        Slot::SelectedChanges,
        Slot::FilingName,
        Slot::EditDraft,
        Slot::EditCursor,
    ];

    /// The key this slot is stored under.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::UsdotNumber => "usdotNumber",
            Self::CarrierEmail => "carrierEmail",
            Self::CarrierMileage => "carrierMileage",
            Self::EmployerNumber => "employerNumber",
            Self::CarrierData => "carrierData",
            Self::SelectedChanges => "selectedChanges",
            Self::FilingName => "filingName",
            Self::EditDraft => "editDraft",
            Self::EditCursor => "editCursor",
        }
    }

    /// Look a slot up by its key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = Slot::ALL.iter().map(|s| s.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Slot::ALL.len());
    }

    #[test]
    fn test_from_key_round_trips() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_key(slot.key()), Some(slot));
        }
        assert_eq!(Slot::from_key("accessToken"), None);
    }

    #[test]
    fn test_display_uses_key() {
        assert_eq!(Slot::SelectedChanges.to_string(), "selectedChanges");
    }
}
