//! Fixed code lists printed on the MCS-150.
//!
//! Lines 22, 23 and 24 are checkbox groups. The carrier-data record stores
//! the operation as its letter and the classification and cargo selections
//! as their labels, exactly as the backend expects them.

/// One checkbox on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    /// Letter printed beside the checkbox.
    pub letter: &'static str,
    /// Label printed beside the checkbox.
    pub label: &'static str,
}

const fn entry(letter: &'static str, label: &'static str) -> CodeEntry {
    CodeEntry { letter, label }
}

/// Line 22, company operations. Exactly one is selected.
pub const OPERATIONS: [CodeEntry; 5] = [
    entry("A", "Interstate Carrier"),
    entry("B", "Intrastate Hazmat Carrier"),
    entry("C", "Intrastate Non-Hazmat Carrier"),
    entry("D", "Interstate Hazmat Shipper"),
    entry("E", "Intrastate Hazmat Shipper"),
];

/// Line 23, operation classification. Any number may be selected.
pub const CLASSIFICATIONS: [CodeEntry; 11] = [
    entry("A", "Auth. For Hire"),
    entry("B", "Exempt For Hire"),
    entry("C", "Private(Property)"),
    entry("D", "Priv. Pass. (Business)"),
    entry("E", "Priv. Pass.(Non-business)"),
    entry("F", "Migrant"),
    entry("G", "U.S. Mail"),
    entry("H", "Fed. Gov't"),
    entry("I", "State Gov't"),
    entry("J", "Local Gov't"),
    entry("K", "Indian Nation"),
];

/// Line 24, cargo classifications. Any number may be selected; "Other"
/// ([`OTHER_CARGO`]) is carried separately as free text.
pub const CARGO: [CodeEntry; 29] = [
    entry("A", "General Freight"),
    entry("B", "Household Goods"),
    entry("C", "Metal: sheets, coils, rolls"),
    entry("D", "Motor Vehicles"),
    entry("E", "Drive/Tow away"),
    entry("F", "Logs, Poles, Beams, Lumber"),
    entry("G", "Building Materials"),
    entry("H", "Mobile Homes"),
    entry("I", "Machinery, Large Objects"),
    entry("J", "Fresh Produce"),
    entry("K", "Liquids/Gases"),
    entry("L", "Intermodal Cont."),
    entry("M", "Passengers"),
    entry("N", "Oilfield Equipment"),
    entry("O", "Livestock"),
    entry("P", "Grain, Feed, Hay"),
    entry("Q", "Coal/Coke"),
    entry("R", "Meat"),
    entry("S", "Garbage/Refuse"),
    entry("T", "US Mail"),
    entry("U", "Chemicals"),
    entry("V", "Commodities Dry Bulk"),
    entry("W", "Refrigerated Food"),
    entry("X", "Beverages"),
    entry("Y", "Paper Products"),
    entry("Z", "Utilities"),
    entry("AA", "Agricultural/Farm Supplies"),
    entry("BB", "Construction"),
    entry("CC", "Water Well"),
];

/// Line 24 free-text "Other" checkbox.
pub const OTHER_CARGO: CodeEntry = entry("DD", "Other");

fn find(list: &'static [CodeEntry], query: &str) -> Option<&'static CodeEntry> {
    let query = query.trim();
    list.iter().find(|e| {
        e.letter.eq_ignore_ascii_case(query) || e.label.eq_ignore_ascii_case(query)
    })
}

/// Look up an operation by letter or label.
#[must_use]
pub fn operation(query: &str) -> Option<&'static CodeEntry> {
    find(&OPERATIONS, query)
}

/// Look up a classification by letter or label.
#[must_use]
pub fn classification(query: &str) -> Option<&'static CodeEntry> {
    find(&CLASSIFICATIONS, query)
}

/// Look up a cargo class by letter or label.
#[must_use]
pub fn cargo(query: &str) -> Option<&'static CodeEntry> {
    find(&CARGO, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_sizes() {
        assert_eq!(OPERATIONS.len(), 5);
        assert_eq!(CLASSIFICATIONS.len(), 11);
        assert_eq!(CARGO.len(), 29);
    }

    #[test]
    fn test_letters_are_unique() {
        for list in [&OPERATIONS[..], &CLASSIFICATIONS[..], &CARGO[..]] {
            let mut letters: Vec<_> = list.iter().map(|e| e.letter).collect();
            letters.sort_unstable();
            letters.dedup();
            assert_eq!(letters.len(), list.len());
        }
    }

    #[test]
    fn test_lookup_by_letter_or_label() {
        assert_eq!(classification("a").unwrap().label, "Auth. For Hire");
        assert_eq!(classification("migrant").unwrap().letter, "F");
        assert_eq!(cargo("AA").unwrap().label, "Agricultural/Farm Supplies");
        assert_eq!(cargo("Drive/Tow away").unwrap().letter, "E");
        assert_eq!(operation("c").unwrap().label, "Intrastate Non-Hazmat Carrier");
    }

    #[test]
    fn test_lookup_misses() {
        assert!(classification("Z").is_none());
        assert!(cargo("DD").is_none());
        assert!(operation("F").is_none());
    }
}
