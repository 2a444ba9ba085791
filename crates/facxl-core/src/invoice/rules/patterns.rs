//! Common regex patterns for supplier invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // French vehicle registration (SIV format: GH-304-CK, GH304CK)
    pub static ref REGISTRATION: Regex = Regex::new(
        r"[A-Z]{2}-?[0-9]{3}-?[A-Z]{2}"
    ).unwrap();

    // Vroomly detail line with leading vehicle/part text:
    // "SKF VKBA 6786 GH-304-CK 2 70,12 20% 140,24"
    pub static ref VROOMLY_VEHICLE_DETAIL: Regex = Regex::new(
        r"^(?P<vehicle>.+?)\s+(?P<qty>[0-9]+)\s+(?P<price>[0-9]+[.,][0-9]+)\s+[0-9]+%\s+(?P<total>[0-9]+[.,][0-9]+)$"
    ).unwrap();

    // Vroomly detail line without leading text: "2 32,20 20% 64,40"
    pub static ref VROOMLY_PLAIN_DETAIL: Regex = Regex::new(
        r"^(?P<qty>[0-9]+)\s+(?P<price>[0-9]+[.,][0-9]+)\s+[0-9]+%\s+(?P<total>[0-9]+[.,][0-9]+)$"
    ).unwrap();

    // Sopartex detail line: "12345 3 Filtre à huile 15,50 46,50 P"
    pub static ref SOPARTEX_DETAIL: Regex = Regex::new(
        r"^(?P<reference>[0-9]+)\s+(?P<qty>[0-9]+)\s+(?P<description>.+?)\s+(?P<price>[0-9]+[.,][0-9]+)\s+(?P<total>[0-9]+[.,][0-9]+)(?:\s+P)?$"
    ).unwrap();
}

/// Markers identifying the Vroomly line-item table header.
pub const VROOMLY_HEADER_MARKERS: [&str; 2] = ["DESCRIPTION", "QTÉ"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_detail_is_not_a_vehicle_detail() {
        let line = "2 32,20 20% 64,40";
        assert!(VROOMLY_PLAIN_DETAIL.is_match(line));
        assert!(!VROOMLY_VEHICLE_DETAIL.is_match(line));
    }

    #[test]
    fn test_vehicle_detail_groups() {
        let caps = VROOMLY_VEHICLE_DETAIL
            .captures("SKF VKBA 6786 GH-304-CK 2 70,12 20% 140,24")
            .unwrap();

        assert_eq!(&caps["vehicle"], "SKF VKBA 6786 GH-304-CK");
        assert_eq!(&caps["qty"], "2");
        assert_eq!(&caps["price"], "70,12");
        assert_eq!(&caps["total"], "140,24");
    }

    #[test]
    fn test_sopartex_trailing_flag_is_optional() {
        let with_flag = SOPARTEX_DETAIL.captures("12345 3 Filtre à huile 15,50 46,50 P").unwrap();
        let without_flag = SOPARTEX_DETAIL.captures("12345 3 Filtre à huile 15,50 46,50").unwrap();

        assert_eq!(&with_flag["description"], "Filtre à huile");
        assert_eq!(&without_flag["description"], "Filtre à huile");
    }

    #[test]
    fn test_registration_variants() {
        assert!(REGISTRATION.is_match("GH-304-CK"));
        assert!(REGISTRATION.is_match("GH304CK"));
        assert!(!REGISTRATION.is_match("gh-304-ck"));
        assert!(!REGISTRATION.is_match("G-304-CK"));
    }
}
