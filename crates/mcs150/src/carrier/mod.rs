//! The carrier-data record and how it is built from a lookup.

pub mod address;
pub mod catalog;
pub mod hazmat;
pub mod phone;
pub mod record;
pub mod sources;

pub use address::{parse_location, ParsedAddress};
pub use hazmat::{class9_marks, Class9Marks};
pub use phone::format_phone;
pub use record::{
    toggle, CarrierData, DriverCounts, DriverField, Identifiers, MailingAddress, Ownership,
    Phones, PhysicalAddress, VehicleClass, VehicleCounts,
};
pub use sources::{first_non_empty, resolve_carrier_data, FieldSource, LookupRecord, Origin};
