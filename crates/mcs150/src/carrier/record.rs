//! The carrier-data record.
//!
//! Field names follow the form's line numbering on the wire (`line1`,
//! `line3_7.line3`, ...) so the persisted JSON and the PDF generation payload
//! are the same document.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One carrier's form answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierData {
    /// Line 1: legal business name.
    #[serde(rename = "line1")]
    pub legal_name: String,
    /// Line 2: doing-business-as name.
    #[serde(rename = "line2")]
    pub dba_name: String,
    /// Lines 3-7: principal place of business.
    #[serde(rename = "line3_7")]
    pub physical: PhysicalAddress,
    /// Lines 8-12: mailing address.
    #[serde(rename = "line8_12")]
    pub mailing: MailingAddress,
    /// Lines 13-15: telephone numbers.
    #[serde(rename = "line13_15")]
    pub phones: Phones,
    /// Lines 16-19: identification numbers.
    #[serde(rename = "line16_19")]
    pub identifiers: Identifiers,
    /// Line 22: company operation letter.
    #[serde(rename = "line22")]
    pub operation: String,
    /// Line 23: operation classification labels.
    #[serde(rename = "line23", deserialize_with = "code_list")]
    pub classifications: Vec<String>,
    /// Line 24: cargo classification labels.
    #[serde(rename = "line24", deserialize_with = "code_list")]
    pub cargo: Vec<String>,
    /// Line 24, "Other" free text. Non-empty means the box is checked.
    #[serde(rename = "line24_other")]
    pub other_cargo: String,
    /// Line 25: hazardous materials carried.
    #[serde(rename = "line25")]
    pub hazardous_materials: String,
    /// Line 26: vehicle counts by ownership and class.
    #[serde(rename = "line26a")]
    pub vehicles: VehicleCounts,
    /// Line 27: driver counts.
    #[serde(rename = "line27")]
    pub drivers: DriverCounts,
}

/// Lines 3-7.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalAddress {
    /// Line 3.
    #[serde(rename = "line3")]
    pub street: String,
    /// Line 4.
    #[serde(rename = "line4")]
    pub city: String,
    /// Line 5.
    #[serde(rename = "line5")]
    pub state: String,
    /// Line 6.
    #[serde(rename = "line6")]
    pub zip: String,
    /// Line 7 (Mexico only).
    #[serde(rename = "line7")]
    pub colonia: String,
}

/// Lines 8-12.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailingAddress {
    /// Mailing address is the same as the principal address.
    #[serde(rename = "isSame")]
    pub is_same: bool,
    /// Line 8.
    #[serde(rename = "line8")]
    pub street: String,
    /// Line 9.
    #[serde(rename = "line9")]
    pub city: String,
    /// Line 10.
    #[serde(rename = "line10")]
    pub state: String,
    /// Line 11.
    #[serde(rename = "line11")]
    pub zip: String,
    /// Line 12 (Mexico only).
    #[serde(rename = "line12")]
    pub colonia: String,
}

/// Lines 13-15.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phones {
    /// Line 13.
    #[serde(rename = "line13")]
    pub principal: String,
    /// Line 14.
    #[serde(rename = "line14")]
    pub cell: String,
    /// Line 15.
    #[serde(rename = "line15")]
    pub fax: String,
}

/// Lines 16-19.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifiers {
    /// Line 16.
    #[serde(rename = "line16")]
    pub usdot: String,
    /// Line 17.
    #[serde(rename = "line17")]
    pub mc_mx_number: String,
    /// Line 18.
    #[serde(rename = "line18")]
    pub duns: String,
    /// Line 19.
    #[serde(rename = "line19")]
    pub ein: String,
}

/// Line 27.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverCounts {
    /// Interstate drivers, within a 100-mile radius.
    pub interstate_within_100_miles: String,
    /// Intrastate drivers, within a 100-mile radius.
    pub intrastate_within_100_miles: String,
    /// Interstate drivers, beyond a 100-mile radius.
    pub interstate_beyond_100_miles: String,
    /// Intrastate drivers, beyond a 100-mile radius.
    pub intrastate_beyond_100_miles: String,
    /// Total drivers.
    pub total_drivers: String,
    /// Total CDL holders.
    pub total_cdl: String,
}

/// Driver count columns, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverField {
    /// Interstate within 100 miles.
    InterstateWithin100,
    /// Intrastate within 100 miles.
    IntrastateWithin100,
    /// Interstate beyond 100 miles.
    InterstateBeyond100,
    /// Intrastate beyond 100 miles.
    IntrastateBeyond100,
    /// Total drivers.
    Total,
    /// Total CDL holders.
    TotalCdl,
}

impl DriverField {
    /// All columns in form order.
    pub const ALL: [DriverField; 6] = [
        DriverField::InterstateWithin100,
        DriverField::IntrastateWithin100,
        DriverField::InterstateBeyond100,
        DriverField::IntrastateBeyond100,
        DriverField::Total,
        DriverField::TotalCdl,
    ];

    /// Wire name of the column.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::InterstateWithin100 => "interstate_within_100_miles",
            Self::IntrastateWithin100 => "intrastate_within_100_miles",
            Self::InterstateBeyond100 => "interstate_beyond_100_miles",
            Self::IntrastateBeyond100 => "intrastate_beyond_100_miles",
            Self::Total => "total_drivers",
            Self::TotalCdl => "total_cdl",
        }
    }
}

impl FromStr for DriverField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| Error::validation(format!("unknown driver field '{s}'")))
    }
}

impl DriverCounts {
    /// Read one column.
    #[must_use]
    pub fn get(&self, field: DriverField) -> &str {
        match field {
            DriverField::InterstateWithin100 => &self.interstate_within_100_miles,
            DriverField::IntrastateWithin100 => &self.intrastate_within_100_miles,
            DriverField::InterstateBeyond100 => &self.interstate_beyond_100_miles,
            DriverField::IntrastateBeyond100 => &self.intrastate_beyond_100_miles,
            DriverField::Total => &self.total_drivers,
            DriverField::TotalCdl => &self.total_cdl,
        }
    }

    /// Write one column.
    pub fn set(&mut self, field: DriverField, value: impl Into<String>) {
        let slot = match field {
            DriverField::InterstateWithin100 => &mut self.interstate_within_100_miles,
            DriverField::IntrastateWithin100 => &mut self.intrastate_within_100_miles,
            DriverField::InterstateBeyond100 => &mut self.interstate_beyond_100_miles,
            DriverField::IntrastateBeyond100 => &mut self.intrastate_beyond_100_miles,
            DriverField::Total => &mut self.total_drivers,
            DriverField::TotalCdl => &mut self.total_cdl,
        };
        *slot = value.into();
    }
}

/// Vehicle ownership columns of line 26.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Owned.
    Owned,
    /// Term leased.
    TermLeased,
    /// Trip leased.
    TripLeased,
}

impl Ownership {
    /// All columns in form order.
    pub const ALL: [Ownership; 3] = [
        Ownership::Owned,
        Ownership::TermLeased,
        Ownership::TripLeased,
    ];

    const fn prefix(self) -> &'static str {
        match self {
            Self::Owned => "own",
            Self::TermLeased => "trm",
            Self::TripLeased => "trp",
        }
    }

    // The hazmat rows use spelled-out prefixes.
    const fn hazmat_prefix(self) -> &'static str {
        match self {
            Self::Owned => "own",
            Self::TermLeased => "term",
            Self::TripLeased => "trip",
        }
    }

    /// Column heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Owned => "Owned",
            Self::TermLeased => "Term Leased",
            Self::TripLeased => "Trip Leased",
        }
    }
}

impl FromStr for Ownership {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "own" | "owned" => Ok(Self::Owned),
            "trm" | "term" | "term-leased" => Ok(Self::TermLeased),
            "trp" | "trip" | "trip-leased" => Ok(Self::TripLeased),
            _ => Err(Error::validation(format!("unknown ownership '{s}'"))),
        }
    }
}

/// Vehicle rows of line 26.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    /// Straight trucks.
    Truck,
    /// Truck tractors.
    Tractor,
    /// Trailers.
    Trailer,
    /// Hazmat cargo tank trucks.
    HazmatTruck,
    /// Hazmat cargo tank trailers.
    HazmatTrailer,
    /// Motorcoaches.
    Coach,
    /// School bus, 1-8 passengers.
    School1To8,
    /// School bus, 9-15 passengers.
    School9To15,
    /// School bus, 16+ passengers.
    School16Plus,
    /// Bus, 16+ passengers.
    Bus16Plus,
    /// Van, 1-8 passengers.
    Van1To8,
    /// Van, 9-15 passengers.
    Van9To15,
    /// Limousine, 1-8 passengers.
    Limo1To8,
    /// Limousine, 9-15 passengers.
    Limo9To15,
    /// Limousine, 16+ passengers.
    Limo16Plus,
}

impl VehicleClass {
    /// All rows in form order.
    pub const ALL: [VehicleClass; 15] = [
        VehicleClass::Truck,
        VehicleClass::Tractor,
        VehicleClass::Trailer,
        VehicleClass::HazmatTruck,
        VehicleClass::HazmatTrailer,
        VehicleClass::Coach,
        VehicleClass::School1To8,
        VehicleClass::School9To15,
        VehicleClass::School16Plus,
        VehicleClass::Bus16Plus,
        VehicleClass::Van1To8,
        VehicleClass::Van9To15,
        VehicleClass::Limo1To8,
        VehicleClass::Limo9To15,
        VehicleClass::Limo16Plus,
    ];

    /// Key suffix; hazmat rows are `<prefix>_haz_<kind>`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Truck => "truck",
            Self::Tractor => "tract",
            Self::Trailer => "trail",
            Self::HazmatTruck => "_haz_truck",
            Self::HazmatTrailer => "_haz_trail",
            Self::Coach => "coach",
            Self::School1To8 => "school_1_8",
            Self::School9To15 => "school_9_15",
            Self::School16Plus => "school_16",
            Self::Bus16Plus => "bus_16",
            Self::Van1To8 => "van_1_8",
            Self::Van9To15 => "van_9_15",
            Self::Limo1To8 => "limo_1_8",
            Self::Limo9To15 => "limo_9_15",
            Self::Limo16Plus => "limo_16",
        }
    }

    /// Row heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Truck => "Straight Trucks",
            Self::Tractor => "Truck Tractors",
            Self::Trailer => "Trailers",
            Self::HazmatTruck => "Hazmat Cargo Tank Trucks",
            Self::HazmatTrailer => "Hazmat Cargo Tank Trailers",
            Self::Coach => "Motorcoach",
            Self::School1To8 => "School Bus 1-8",
            Self::School9To15 => "School Bus 9-15",
            Self::School16Plus => "School Bus 16+",
            Self::Bus16Plus => "Bus 16+",
            Self::Van1To8 => "Van 1-8",
            Self::Van9To15 => "Van 9-15",
            Self::Limo1To8 => "Limousine 1-8",
            Self::Limo9To15 => "Limousine 9-15",
            Self::Limo16Plus => "Limousine 16+",
        }
    }

    const fn is_hazmat(self) -> bool {
        matches!(self, Self::HazmatTruck | Self::HazmatTrailer)
    }

    /// Wire key for this row under the given ownership.
    #[must_use]
    pub fn key(self, ownership: Ownership) -> String {
        if self.is_hazmat() {
            format!("{}{}", ownership.hazmat_prefix(), self.suffix())
        } else {
            format!("{}{}", ownership.prefix(), self.suffix())
        }
    }
}

impl FromStr for VehicleClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim_start_matches('_').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|class| class.suffix().trim_start_matches('_') == wanted)
            .ok_or_else(|| Error::validation(format!("unknown vehicle class '{s}'")))
    }
}

/// Line 26 matrix, keyed by wire name (`owntruck`, `trm_haz...`).
///
/// Keys the backend sends that are not part of the fixed matrix are kept
/// as-is so they round-trip to the PDF generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleCounts(BTreeMap<String, String>);

impl Default for VehicleCounts {
    fn default() -> Self {
        let mut counts = BTreeMap::new();
        for ownership in Ownership::ALL {
            for class in VehicleClass::ALL {
                counts.insert(class.key(ownership), String::new());
            }
        }
        Self(counts)
    }
}

impl VehicleCounts {
    /// Read one cell; absent cells read as empty.
    #[must_use]
    pub fn get(&self, ownership: Ownership, class: VehicleClass) -> &str {
        self.0
            .get(&class.key(ownership))
            .map_or("", String::as_str)
    }

    /// Write one cell.
    pub fn set(&mut self, ownership: Ownership, class: VehicleClass, value: impl Into<String>) {
        self.0.insert(class.key(ownership), value.into());
    }

    /// Number of stored cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no cells are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Accept a code list as a JSON array or a `;`-separated string.
fn code_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(code_list_from_value(&value))
}

/// Normalize a code list value from storage or the backend.
#[must_use]
pub fn code_list_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Add `item` if absent, remove it if present.
///
/// Toggling twice restores the original list exactly.
pub fn toggle(list: &mut Vec<String>, item: &str) {
    if let Some(pos) = list.iter().position(|existing| existing == item) {
        list.remove(pos);
    } else {
        list.push(item.to_string());
    }
}

fn same_field(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl CarrierData {
    /// Compare mailing and physical street, city, state and zip, ignoring
    /// surrounding whitespace and case.
    #[must_use]
    pub fn mailing_matches_physical(&self) -> bool {
        same_field(&self.mailing.street, &self.physical.street)
            && same_field(&self.mailing.city, &self.physical.city)
            && same_field(&self.mailing.state, &self.physical.state)
            && same_field(&self.mailing.zip, &self.physical.zip)
    }

    /// Copy the physical street, city, state and zip over the mailing ones
    /// when the "same as physical" flag is set.
    ///
    /// Called once when an edit is saved; returns whether anything was copied.
    pub fn apply_mailing_mirror(&mut self) -> bool {
        if !self.mailing.is_same {
            return false;
        }
        self.mailing.street.clone_from(&self.physical.street);
        self.mailing.city.clone_from(&self.physical.city);
        self.mailing.state.clone_from(&self.physical.state);
        self.mailing.zip.clone_from(&self.physical.zip);
        true
    }

    /// Whether the line 24 "Other" box is checked.
    #[must_use]
    pub fn other_cargo_checked(&self) -> bool {
        !self.other_cargo.is_empty()
    }

    /// Check or uncheck the line 24 "Other" box.
    ///
    /// Checking an empty box stores a single space so that the box reads as
    /// checked until text is entered; unchecking clears the text.
    pub fn set_other_cargo_checked(&mut self, checked: bool) {
        if !checked {
            self.other_cargo.clear();
        } else if self.other_cargo.is_empty() {
            self.other_cargo = " ".to_string();
        }
    }

    /// Build the PDF generation payload.
    ///
    /// Adds line 20 (email) and line 21 (mileage) and takes line 19 from the
    /// wizard's employer number rather than from the looked-up record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn generation_payload(&self, email: &str, mileage: &str, employer: &str) -> Result<Value> {
        let mut record = self.clone();
        record.identifiers.ein = employer.to_string();
        let mut payload = serde_json::to_value(&record)?;
        let object = payload
            .as_object_mut()
            .ok_or_else(|| Error::internal("carrier data did not serialize to an object"))?;
        object.insert("line20".to_string(), Value::String(email.to_string()));
        object.insert("line21".to_string(), Value::String(mileage.to_string()));
        Ok(payload)
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_serializes_with_line_numbers() {
        let mut data = CarrierData {
            legal_name: "ACME HAULING LLC".to_string(),
            ..Default::default()
        };
        data.mailing.is_same = true;
        let value = serde_json::to_value(&data).unwrap();

        assert_eq!(value["line1"], "ACME HAULING LLC");
        assert_eq!(value["line8_12"]["isSame"], true);
        assert!(value["line3_7"].get("line7").is_some());
        assert!(value["line27"].get("total_cdl").is_some());
    }

    #[test]
    fn test_default_vehicle_matrix_is_complete() {
        let counts = VehicleCounts::default();
        assert_eq!(counts.len(), 45);
        let value = serde_json::to_value(&counts).unwrap();
        for key in ["owntruck", "trmtract", "trplimo_16", "own_haz_truck", "term_haz_trail", "trip_haz_truck"] {
            assert_eq!(value[key], "", "missing {key}");
        }
    }

    #[test]
    fn test_vehicle_keys() {
        assert_eq!(VehicleClass::Truck.key(Ownership::Owned), "owntruck");
        assert_eq!(VehicleClass::School9To15.key(Ownership::TermLeased), "trmschool_9_15");
        assert_eq!(VehicleClass::HazmatTrailer.key(Ownership::TermLeased), "term_haz_trail");
        assert_eq!(VehicleClass::HazmatTruck.key(Ownership::TripLeased), "trip_haz_truck");
    }

    #[test]
    fn test_vehicle_class_from_str() {
        assert_eq!("tract".parse::<VehicleClass>().unwrap(), VehicleClass::Tractor);
        assert_eq!("haz_trail".parse::<VehicleClass>().unwrap(), VehicleClass::HazmatTrailer);
        assert!("boat".parse::<VehicleClass>().is_err());
        assert_eq!("trip".parse::<Ownership>().unwrap(), Ownership::TripLeased);
    }

    #[test]
    fn test_vehicle_counts_get_set() {
        let mut counts = VehicleCounts::default();
        counts.set(Ownership::TermLeased, VehicleClass::Trailer, "4");
        assert_eq!(counts.get(Ownership::TermLeased, VehicleClass::Trailer), "4");
        assert_eq!(counts.get(Ownership::Owned, VehicleClass::Trailer), "");
    }

    #[test]
    fn test_deserialize_code_lists_from_string_or_array() {
        let data: CarrierData = serde_json::from_value(json!({
            "line23": "Auth. For Hire; Private(Property)",
            "line24": ["General Freight", "Metal: sheets, coils, rolls"],
        }))
        .unwrap();
        assert_eq!(data.classifications, vec!["Auth. For Hire", "Private(Property)"]);
        assert_eq!(data.cargo, vec!["General Freight", "Metal: sheets, coils, rolls"]);

        let empty: CarrierData = serde_json::from_value(json!({ "line23": "" })).unwrap();
        assert!(empty.classifications.is_empty());
    }

    #[test]
    fn test_toggle_is_an_add_remove_pair() {
        let original = vec!["Migrant".to_string(), "U.S. Mail".to_string()];
        let mut list = original.clone();

        toggle(&mut list, "Fed. Gov't");
        assert_eq!(list.len(), 3);
        toggle(&mut list, "Fed. Gov't");
        assert_eq!(list, original);
    }

    #[test]
    fn test_mailing_matches_physical_ignores_case_and_whitespace() {
        let mut data = CarrierData::default();
        data.physical.street = "123 MAIN ST".to_string();
        data.physical.city = "Mobile".to_string();
        data.physical.state = "AL".to_string();
        data.physical.zip = "36652".to_string();
        data.mailing.street = " 123 main st ".to_string();
        data.mailing.city = "MOBILE".to_string();
        data.mailing.state = "al".to_string();
        data.mailing.zip = "36652 ".to_string();

        assert!(data.mailing_matches_physical());

        data.mailing.zip = "36653".to_string();
        assert!(!data.mailing_matches_physical());
    }

    #[test]
    fn test_apply_mailing_mirror() {
        let mut data = CarrierData::default();
        data.physical.street = "1 DOCK RD".to_string();
        data.physical.city = "MOBILE".to_string();
        data.physical.state = "AL".to_string();
        data.physical.zip = "36602".to_string();
        data.mailing.street = "P.O. Box 2504".to_string();

        assert!(!data.apply_mailing_mirror());
        assert_eq!(data.mailing.street, "P.O. Box 2504");

        data.mailing.is_same = true;
        assert!(data.apply_mailing_mirror());
        assert_eq!(data.mailing.street, "1 DOCK RD");
        assert_eq!(data.mailing.zip, "36602");
    }

    #[test]
    fn test_other_cargo_checkbox() {
        let mut data = CarrierData::default();
        assert!(!data.other_cargo_checked());

        data.set_other_cargo_checked(true);
        assert!(data.other_cargo_checked());
        assert_eq!(data.other_cargo, " ");

        data.other_cargo = "Scrap metal".to_string();
        data.set_other_cargo_checked(true);
        assert_eq!(data.other_cargo, "Scrap metal");

        data.set_other_cargo_checked(false);
        assert!(!data.other_cargo_checked());
    }

    #[test]
    fn test_generation_payload() {
        let mut data = CarrierData::default();
        data.identifiers.ein = "from-lookup".to_string();

        let payload = data
            .generation_payload("ops@example.com", "120000", "12-3456789")
            .unwrap();

        assert_eq!(payload["line20"], "ops@example.com");
        assert_eq!(payload["line21"], "120000");
        assert_eq!(payload["line16_19"]["line19"], "12-3456789");
        assert_eq!(data.identifiers.ein, "from-lookup");
    }

    #[test]
    fn test_driver_counts_get_set() {
        let mut drivers = DriverCounts::default();
        drivers.set(DriverField::TotalCdl, "7");
        assert_eq!(drivers.get(DriverField::TotalCdl), "7");
        assert_eq!(drivers.total_cdl, "7");
        assert_eq!("total_drivers".parse::<DriverField>().unwrap(), DriverField::Total);
    }
}
