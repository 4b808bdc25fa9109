//! Class 9 hazmat marks on the line 25 grid.
//!
//! The form's hazmat grid is otherwise left blank. Row GG (Class 9) can be
//! pre-marked from the cargo selection: carriers hauling "Motor Vehicles" or
//! "Drive/Tow away" get the Carrier and Non-Bulk columns checked. Whether that
//! is regulatory intent is unconfirmed, so rendering only applies it when
//! `form.derive_class9_hazmat` is enabled.

use serde::Serialize;

use super::record::CarrierData;

/// Cargo labels that trigger the Class 9 marks.
pub const CLASS9_TRIGGERS: [&str; 2] = ["Motor Vehicles", "Drive/Tow away"];

/// Checked columns of the Class 9 row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Class9Marks {
    /// "C" column (carrier).
    pub carrier: bool,
    /// "S" column (shipper).
    pub shipper: bool,
    /// "B" column (bulk).
    pub bulk: bool,
    /// "NB" column (non-bulk).
    pub non_bulk: bool,
}

impl Class9Marks {
    /// Whether any column is checked.
    #[must_use]
    pub fn any(&self) -> bool {
        self.carrier || self.shipper || self.bulk || self.non_bulk
    }
}

/// Derive the Class 9 row from the cargo selection.
#[must_use]
pub fn class9_marks(data: &CarrierData) -> Class9Marks {
    let triggered = data
        .cargo
        .iter()
        .any(|item| CLASS9_TRIGGERS.contains(&item.as_str()));
    Class9Marks {
        carrier: triggered,
        non_bulk: triggered,
        ..Class9Marks::default()
    }
}
