//! Country code table
//!
//! Maps the small integer country ids stored in the range table to
//! ISO-3166 alpha-2 codes. Id 0 is reserved for "unknown" and maps to the
//! empty string. A few non-standard codes are part of the table: `AP`
//! (Asia/Pacific), `EU` (Europe), `A1` (anonymous proxy), `O1` (other)
//! and `XK` (Kosovo).
//!
//! The order is fixed by the database format and must never change.

/// Number of entries in the country table, including the reserved id 0
pub const COUNTRY_COUNT: usize = COUNTRY_CODES.len();

/// Country codes indexed by country id
pub static COUNTRY_CODES: [&str; 255] = [
    "", "AP", "EU", "AD", "AE", "AF", "AG", "AI", "AL", "AM", "CW", "AO", "AQ", "AR", "AS", "AT",
    "AU", "AW", "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BM", "BN", "BO", "BR",
    "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM",
    "CN", "CO", "CR", "CU", "CV", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "SX", "GA", "GB", "GD", "GE",
    "GF", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IN", "IO", "IQ", "IR", "IS", "IT", "JM", "JO", "JP",
    "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK",
    "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "MG", "MH", "MK", "ML", "MM", "MN", "MO",
    "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG",
    "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RU", "RW", "SA", "SB", "SC", "SD", "SE",
    "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "ST", "SV", "SY", "SZ", "TC", "TD",
    "TF", "TG", "TH", "TJ", "TK", "TM", "TN", "TO", "TL", "TR", "TT", "TV", "TW", "TZ", "UA", "UG",
    "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI", "VN", "VU", "WF", "WS", "YE", "YT", "RS",
    "ZA", "ZM", "ME", "ZW", "A1", "XK", "O1", "AX", "GG", "IM", "JE", "BL", "MF", "BQ", "SS",
];

/// Resolve a country id to its alpha-2 code.
///
/// Returns `Some("")` for the reserved id 0 and `None` for ids outside
/// the table.
///
/// ```
/// use sxgeo::country::country_code;
///
/// assert_eq!(country_code(225), Some("US"));
/// assert_eq!(country_code(0), Some(""));
/// assert_eq!(country_code(255), None);
/// ```
#[inline]
pub fn country_code(id: usize) -> Option<&'static str> {
    COUNTRY_CODES.get(id).copied()
}

/// Reverse lookup: find the id of an alpha-2 code (case-insensitive).
///
/// The empty string is not a code and returns `None`.
pub fn country_id(code: &str) -> Option<u8> {
    if code.is_empty() {
        return None;
    }
    COUNTRY_CODES
        .iter()
        .position(|c| c.eq_ignore_ascii_case(code))
        .and_then(|pos| u8::try_from(pos).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_id() {
        assert_eq!(country_code(0), Some(""));
        assert_eq!(country_id(""), None);
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(country_code(1), Some("AP"));
        assert_eq!(country_code(2), Some("EU"));
        assert_eq!(country_code(56), Some("DE"));
        assert_eq!(country_code(185), Some("RU"));
        assert_eq!(country_code(222), Some("UA"));
        assert_eq!(country_code(225), Some("US"));
        assert_eq!(country_code(254), Some("SS"));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(COUNTRY_COUNT, 255);
        assert_eq!(country_code(COUNTRY_COUNT), None);
        assert_eq!(country_code(usize::MAX), None);
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(country_id("US"), Some(225));
        assert_eq!(country_id("ua"), Some(222));
        assert_eq!(country_id("ZZ"), None);

        for (id, code) in COUNTRY_CODES.iter().enumerate().skip(1) {
            assert_eq!(country_id(code), Some(id as u8), "code {}", code);
        }
    }
}
