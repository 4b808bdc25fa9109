//! Telephone number formatting.

/// Format a US telephone number as `(XXX) XXX-XXXX`.
///
/// Non-digits are stripped first; anything that is not exactly ten digits
/// afterwards is returned unchanged.
#[must_use]
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_ten_digits() {
        assert_eq!(format_phone("2515550123"), "(251) 555-0123");
        assert_eq!(format_phone("251-555-0123"), "(251) 555-0123");
        assert_eq!(format_phone("(251) 555.0123"), "(251) 555-0123");
    }

    #[test]
    fn test_leaves_other_lengths_alone() {
        assert_eq!(format_phone("12515550123"), "12515550123");
        assert_eq!(format_phone("555-0123"), "555-0123");
    }

    #[test]
    fn test_empty_stays_empty() {
        assert_eq!(format_phone(""), "");
    }
}
