//! Field resolution from the lookup response.
//!
//! The lookup endpoint answers with up to three upstream records
//! (`safer_data`, `data_gov`, `mobile_fmcsa`) whose fields overlap. Each form
//! field names an ordered list of [`FieldSource`]s and [`first_non_empty`]
//! takes the first one that holds a value.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::address::parse_location;
use super::phone::format_phone;
use super::record::{
    code_list_from_value, CarrierData, DriverField, Ownership, VehicleClass,
};

/// Upstream record a field value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// SAFER company snapshot.
    Safer,
    /// data.gov census file.
    DataGov,
    /// FMCSA mobile API.
    MobileFmcsa,
    /// The SAFER mailing address, parsed into parts.
    ParsedMailing,
}

/// One place a field value can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSource<'a> {
    /// Which upstream record.
    pub origin: Origin,
    /// Dotted path inside that record.
    pub path: &'a str,
}

const fn src(origin: Origin, path: &str) -> FieldSource<'_> {
    FieldSource { origin, path }
}

use Origin::{DataGov, MobileFmcsa, ParsedMailing, Safer};

/// Line 1.
pub const LEGAL_NAME: &[FieldSource<'static>] =
    &[src(Safer, "legal_name"), src(MobileFmcsa, "legalName")];
/// Line 2.
pub const DBA_NAME: &[FieldSource<'static>] =
    &[src(Safer, "dba_name"), src(MobileFmcsa, "dbaName")];
/// Line 3.
pub const PHYSICAL_STREET: &[FieldSource<'static>] =
    &[src(DataGov, "phy_street"), src(MobileFmcsa, "phyStreet")];
/// Line 4.
pub const PHYSICAL_CITY: &[FieldSource<'static>] =
    &[src(DataGov, "phy_city"), src(MobileFmcsa, "phyCity")];
/// Line 5.
pub const PHYSICAL_STATE: &[FieldSource<'static>] =
    &[src(DataGov, "phy_state"), src(MobileFmcsa, "phyState")];
/// Line 6.
pub const PHYSICAL_ZIP: &[FieldSource<'static>] =
    &[src(DataGov, "phy_zip"), src(MobileFmcsa, "phyZipcode")];
/// Line 8.
pub const MAILING_STREET: &[FieldSource<'static>] = &[
    src(DataGov, "carrier_mailing_street"),
    src(ParsedMailing, "street"),
];
/// Line 9.
pub const MAILING_CITY: &[FieldSource<'static>] =
    &[src(DataGov, "carrier_mailing_city"), src(ParsedMailing, "city")];
/// Line 10.
pub const MAILING_STATE: &[FieldSource<'static>] = &[
    src(DataGov, "carrier_mailing_state"),
    src(ParsedMailing, "state"),
];
/// Line 11.
pub const MAILING_ZIP: &[FieldSource<'static>] =
    &[src(DataGov, "carrier_mailing_zip"), src(ParsedMailing, "zip")];
/// Line 13.
pub const PRINCIPAL_PHONE: &[FieldSource<'static>] =
    &[src(DataGov, "phone"), src(Safer, "phone")];
/// Line 14.
pub const CELL_PHONE: &[FieldSource<'static>] = &[src(DataGov, "cell_phone")];
/// Line 15.
pub const FAX: &[FieldSource<'static>] = &[src(DataGov, "fax")];
/// Line 16.
pub const USDOT: &[FieldSource<'static>] =
    &[src(Safer, "usdot"), src(MobileFmcsa, "dotNumber")];
/// Line 18.
pub const DUNS: &[FieldSource<'static>] = &[src(Safer, "duns_number")];
/// Line 19, also seeded into the employer-number slot.
pub const EIN: &[FieldSource<'static>] = &[src(MobileFmcsa, "ein")];
/// Line 22.
pub const OPERATION: &[FieldSource<'static>] = &[
    src(DataGov, "carrier_operation"),
    src(MobileFmcsa, "carrierOperation.carrierOperationCode"),
];
/// Line 23.
pub const CLASSIFICATIONS: &[FieldSource<'static>] = &[
    src(Safer, "operation_classification"),
    src(DataGov, "classdef"),
];
/// Line 24.
pub const CARGO: &[FieldSource<'static>] = &[src(Safer, "cargo_carried")];
/// Line 24, "Other".
pub const OTHER_CARGO: &[FieldSource<'static>] = &[src(DataGov, "crgo_cargoothr_desc")];
/// Line 27, total drivers. The other driver columns come from data.gov only.
pub const TOTAL_DRIVERS: &[FieldSource<'static>] = &[
    src(DataGov, "total_drivers"),
    src(MobileFmcsa, "totalDrivers"),
];
/// Raw one-line mailing address.
pub const RAW_MAILING: &[FieldSource<'static>] = &[src(Safer, "mailing_address")];

/// The upstream records of one lookup response.
#[derive(Debug, Clone, Default)]
pub struct LookupRecord {
    safer: Value,
    data_gov: Value,
    mobile: Value,
    mailing: Value,
}

impl LookupRecord {
    /// Split a lookup response body into its upstream records and parse the
    /// raw mailing address.
    #[must_use]
    pub fn from_response(body: &Value) -> Self {
        let mut record = Self {
            safer: body.get("safer_data").cloned().unwrap_or(Value::Null),
            data_gov: body.get("data_gov").cloned().unwrap_or(Value::Null),
            mobile: body.get("mobile_fmcsa").cloned().unwrap_or(Value::Null),
            mailing: Value::Null,
        };

        let raw = first_non_empty(&record, RAW_MAILING);
        if let Some(parsed) = parse_location(&raw) {
            record.mailing = json!({
                "street": parsed.street_line(),
                "city": parsed.city,
                "state": parsed.state,
                "zip": parsed.zip,
            });
        } else if !raw.is_empty() {
            debug!(raw = %raw, "Mailing address could not be parsed");
        }
        record
    }

    /// Whether no upstream record holds any data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.safer, &self.data_gov, &self.mobile]
            .iter()
            .all(|value| is_blank_record(value))
    }

    fn origin(&self, origin: Origin) -> &Value {
        match origin {
            Origin::Safer => &self.safer,
            Origin::DataGov => &self.data_gov,
            Origin::MobileFmcsa => &self.mobile,
            Origin::ParsedMailing => &self.mailing,
        }
    }

    /// Read the value at one source, if it holds something.
    #[must_use]
    pub fn value_at(&self, source: &FieldSource<'_>) -> Option<&Value> {
        let value = source
            .path
            .split('.')
            .try_fold(self.origin(source.origin), |value, key| value.get(key))?;
        (!is_blank(value)).then_some(value)
    }

    /// First non-blank value along `sources`.
    #[must_use]
    pub fn first_value(&self, sources: &[FieldSource<'_>]) -> Option<&Value> {
        sources.iter().find_map(|source| self.value_at(source))
    }
}

/// A numeric zero is blank, so a `0` count falls through to the next source
/// and resolves to an empty cell. The string `"0"` is a value.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::Bool(true) => false,
    }
}

fn is_blank_record(value: &Value) -> bool {
    value
        .as_object()
        .map_or(true, |map: &Map<String, Value>| map.values().all(is_blank))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Resolve a field: the first non-blank source wins, else empty.
///
/// Numbers are stringified.
#[must_use]
pub fn first_non_empty(record: &LookupRecord, sources: &[FieldSource<'_>]) -> String {
    record.first_value(sources).map(stringify).unwrap_or_default()
}

/// Build the carrier-data record from a lookup response.
#[must_use]
pub fn resolve_carrier_data(record: &LookupRecord) -> CarrierData {
    let field = |sources: &[FieldSource<'_>]| first_non_empty(record, sources);

    let mut data = CarrierData {
        legal_name: field(LEGAL_NAME),
        dba_name: field(DBA_NAME),
        operation: field(OPERATION),
        classifications: record
            .first_value(CLASSIFICATIONS)
            .map(code_list_from_value)
            .unwrap_or_default(),
        cargo: record
            .first_value(CARGO)
            .map(code_list_from_value)
            .unwrap_or_default(),
        other_cargo: field(OTHER_CARGO),
        ..CarrierData::default()
    };

    data.physical.street = field(PHYSICAL_STREET);
    data.physical.city = field(PHYSICAL_CITY);
    data.physical.state = field(PHYSICAL_STATE);
    data.physical.zip = field(PHYSICAL_ZIP);

    data.mailing.street = field(MAILING_STREET);
    data.mailing.city = field(MAILING_CITY);
    data.mailing.state = field(MAILING_STATE);
    data.mailing.zip = field(MAILING_ZIP);

    data.phones.principal = format_phone(&field(PRINCIPAL_PHONE));
    data.phones.cell = format_phone(&field(CELL_PHONE));
    data.phones.fax = format_phone(&field(FAX));

    data.identifiers.usdot = field(USDOT);
    data.identifiers.duns = field(DUNS);
    data.identifiers.ein = field(EIN);

    for ownership in Ownership::ALL {
        for class in VehicleClass::ALL {
            let key = class.key(ownership);
            // Hazmat cells have no upstream source and stay empty.
            let value = first_non_empty(record, &[src(DataGov, &key)]);
            data.vehicles.set(ownership, class, value);
        }
    }

    for driver in DriverField::ALL {
        let value = match driver {
            DriverField::Total => field(TOTAL_DRIVERS),
            other => first_non_empty(record, &[src(DataGov, other.key())]),
        };
        data.drivers.set(driver, value);
    }

    data.mailing.is_same = data.mailing_matches_physical();
    data
}

/// The employer number the lookup provides, if any.
#[must_use]
pub fn employer_number(record: &LookupRecord) -> Option<String> {
    let ein = first_non_empty(record, EIN);
    (!ein.is_empty()).then_some(ein)
}
