//! One-line US mailing address parsing.
//!
//! The lookup backend returns the SAFER mailing address as a single string
//! (`"P O BOX 2504 MOBILE AL 36652"`, `"500 W HARBOR DR STE 210, SAN DIEGO,
//! CA 92101"`). This module splits it into the parts the form needs and
//! reassembles the street line.
//!
//! Parsing works from the right: zip, then state, then (if the string has
//! commas) the last comma-separated segment is the city. The street is read
//! left to right as house number, directional prefix, street name, street
//! type, directional suffix and secondary unit. Without commas, whatever
//! follows the street is the city.

use std::sync::OnceLock;

use regex::Regex;

/// Parts of a parsed address. Empty strings mean "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    /// House number.
    pub number: String,
    /// Directional prefix (`N`, `SW`, ...).
    pub prefix: String,
    /// Street name.
    pub street: String,
    /// Street type (`ST`, `AVE`, ...).
    pub street_type: String,
    /// Directional suffix.
    pub suffix: String,
    /// Secondary unit designator (`APT`, `STE`, `#`, ...).
    pub sec_unit_type: String,
    /// Secondary unit number.
    pub sec_unit_num: String,
    /// Post office box number.
    pub po_box: String,
    /// City.
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    /// ZIP or ZIP+4.
    pub zip: String,
}

impl ParsedAddress {
    /// The street line for the form.
    ///
    /// A PO box wins over any street parts; otherwise the street parts are
    /// joined with single spaces and uppercased.
    #[must_use]
    pub fn street_line(&self) -> String {
        if !self.po_box.is_empty() {
            return format!("P.O. Box {}", self.po_box);
        }
        [
            &self.number,
            &self.prefix,
            &self.street,
            &self.street_type,
            &self.suffix,
            &self.sec_unit_type,
            &self.sec_unit_num,
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
    }
}

struct Patterns {
    zip: Regex,
    house_number: Regex,
    po_box: Regex,
    hash_unit: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        zip: Regex::new(r"^\d{5}(?:-\d{4})?$").expect("valid zip pattern"),
        house_number: Regex::new(r"^\d+[A-Z]?(?:[-/]\d+[A-Z]?)?$")
            .expect("valid house number pattern"),
        po_box: Regex::new(r"^(?:P\.?\s*O\.?|POST\s+OFFICE)\s*BOX\s+(\S+)(?:\s+(.*))?$")
            .expect("valid po box pattern"),
        hash_unit: Regex::new(r"^#(\w+)$").expect("valid unit pattern"),
    })
}

const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY", "PR", "VI", "GU", "AS", "MP", "AA", "AE", "AP",
];

/// Street types and their USPS abbreviations.
const STREET_TYPES: &[(&str, &str)] = &[
    ("ALLEY", "ALY"),
    ("ALY", "ALY"),
    ("AV", "AVE"),
    ("AVE", "AVE"),
    ("AVENUE", "AVE"),
    ("BLVD", "BLVD"),
    ("BOULEVARD", "BLVD"),
    ("CIR", "CIR"),
    ("CIRCLE", "CIR"),
    ("COURT", "CT"),
    ("CT", "CT"),
    ("DR", "DR"),
    ("DRIVE", "DR"),
    ("EXPRESSWAY", "EXPY"),
    ("EXPY", "EXPY"),
    ("FREEWAY", "FWY"),
    ("FWY", "FWY"),
    ("HIGHWAY", "HWY"),
    ("HWY", "HWY"),
    ("LANE", "LN"),
    ("LN", "LN"),
    ("LOOP", "LOOP"),
    ("PARKWAY", "PKWY"),
    ("PIKE", "PIKE"),
    ("PKWY", "PKWY"),
    ("PL", "PL"),
    ("PLACE", "PL"),
    ("RD", "RD"),
    ("ROAD", "RD"),
    ("SQ", "SQ"),
    ("SQUARE", "SQ"),
    ("ST", "ST"),
    ("STREET", "ST"),
    ("TER", "TER"),
    ("TERRACE", "TER"),
    ("TRAIL", "TRL"),
    ("TRL", "TRL"),
    ("WAY", "WAY"),
];

const DIRECTIONALS: &[(&str, &str)] = &[
    ("N", "N"),
    ("S", "S"),
    ("E", "E"),
    ("W", "W"),
    ("NE", "NE"),
    ("NW", "NW"),
    ("SE", "SE"),
    ("SW", "SW"),
    ("NORTH", "N"),
    ("SOUTH", "S"),
    ("EAST", "E"),
    ("WEST", "W"),
    ("NORTHEAST", "NE"),
    ("NORTHWEST", "NW"),
    ("SOUTHEAST", "SE"),
    ("SOUTHWEST", "SW"),
];

const UNIT_TYPES: &[(&str, &str)] = &[
    ("APARTMENT", "APT"),
    ("APT", "APT"),
    ("BLDG", "BLDG"),
    ("BUILDING", "BLDG"),
    ("DEPT", "DEPT"),
    ("FL", "FL"),
    ("FLOOR", "FL"),
    ("LOT", "LOT"),
    ("RM", "RM"),
    ("ROOM", "RM"),
    ("SPC", "SPC"),
    ("STE", "STE"),
    ("SUITE", "STE"),
    ("TRLR", "TRLR"),
    ("UNIT", "UNIT"),
    ("#", "#"),
];

fn normalize(token: &str) -> String {
    token.trim_end_matches('.').to_uppercase()
}

fn lookup(table: &[(&str, &'static str)], token: &str) -> Option<&'static str> {
    let token = normalize(token);
    table
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, abbr)| *abbr)
}

fn is_state(token: &str) -> bool {
    let token = normalize(token);
    STATES.contains(&token.as_str())
}

/// Split on whitespace, keeping commas as their own tokens.
fn tokenize(raw: &str) -> Vec<String> {
    raw.replace(',', " , ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn pop_commas(tokens: &mut Vec<String>) {
    while tokens.last().is_some_and(|t| t == ",") {
        tokens.pop();
    }
}

/// Parse a one-line US address.
///
/// Returns `None` for blank input or when no state code can be found.
#[must_use]
pub fn parse_location(raw: &str) -> Option<ParsedAddress> {
    let mut tokens = tokenize(raw.trim());
    let mut parsed = ParsedAddress::default();

    pop_commas(&mut tokens);
    if let Some(last) = tokens.last() {
        if patterns().zip.is_match(last) {
            parsed.zip.clone_from(last);
            tokens.pop();
        }
    }

    pop_commas(&mut tokens);
    match tokens.last() {
        Some(last) if is_state(last) => {
            parsed.state = normalize(last);
            tokens.pop();
        }
        _ => return None,
    }
    pop_commas(&mut tokens);

    let segments: Vec<Vec<String>> = tokens
        .split(|t| t == ",")
        .filter(|segment| !segment.is_empty())
        .map(<[String]>::to_vec)
        .collect();

    let (street_tokens, has_city_segment) = match segments.split_last() {
        Some((city, street)) if !street.is_empty() => {
            parsed.city = city.join(" ");
            (street.concat(), true)
        }
        Some((only, _)) => (only.clone(), false),
        None => return Some(parsed),
    };

    let joined = street_tokens.join(" ");
    if let Some(caps) = patterns().po_box.captures(&joined.to_uppercase()) {
        parsed.po_box = caps[1].to_string();
        if !has_city_segment {
            // Recover the city in its original case from the unmatched tail.
            let tail_len = caps.get(2).map_or(0, |m| m.as_str().split_whitespace().count());
            parsed.city = street_tokens[street_tokens.len() - tail_len..].join(" ");
        }
        return Some(parsed);
    }

    let leftover = parse_street(&street_tokens, &mut parsed, has_city_segment);
    if has_city_segment {
        if !leftover.is_empty() {
            parsed.street = [parsed.street.as_str(), &leftover.join(" ")]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
        }
    } else {
        parsed.city = leftover.join(" ");
    }

    Some(parsed)
}

/// Read the street parts off the front of `tokens`, returning what is left.
fn parse_street(tokens: &[String], parsed: &mut ParsedAddress, whole: bool) -> Vec<String> {
    let mut i = 0;

    if let Some(first) = tokens.first() {
        if patterns().house_number.is_match(&first.to_uppercase()) {
            parsed.number = first.to_uppercase();
            i = 1;
        }
    }

    if i + 1 < tokens.len() {
        if let Some(dir) = lookup(DIRECTIONALS, &tokens[i]) {
            parsed.prefix = dir.to_string();
            i += 1;
        }
    }

    // The street type is the first type word after at least one name word.
    let name_start = i;
    let type_at = (name_start + 1..tokens.len()).find(|&j| lookup(STREET_TYPES, &tokens[j]).is_some());

    let Some(type_at) = type_at else {
        // No type word: with a separate city segment everything is street,
        // otherwise the last word is taken as the city.
        let name_end = if whole || tokens.len() <= name_start + 1 {
            tokens.len()
        } else {
            tokens.len() - 1
        };
        parsed.street = tokens[name_start..name_end].join(" ").to_uppercase();
        return tokens[name_end..].to_vec();
    };

    parsed.street = tokens[name_start..type_at].join(" ").to_uppercase();
    parsed.street_type = lookup(STREET_TYPES, &tokens[type_at])
        .unwrap_or_default()
        .to_string();
    i = type_at + 1;

    if let Some(token) = tokens.get(i) {
        let short = normalize(token);
        let is_abbrev = short.len() <= 2;
        if let Some(dir) = lookup(DIRECTIONALS, token) {
            if whole || is_abbrev {
                parsed.suffix = dir.to_string();
                i += 1;
            }
        }
    }

    if let Some(token) = tokens.get(i) {
        if let Some(caps) = patterns().hash_unit.captures(token) {
            parsed.sec_unit_type = "#".to_string();
            parsed.sec_unit_num = caps[1].to_uppercase();
            i += 1;
        } else if let (Some(unit), Some(num)) = (lookup(UNIT_TYPES, token), tokens.get(i + 1)) {
            parsed.sec_unit_type = unit.to_string();
            parsed.sec_unit_num = num.to_uppercase();
            i += 2;
        }
    }

    tokens[i..].to_vec()
}
