//! Vendor detection from invoice text.

use tracing::debug;

use crate::models::record::Vendor;

/// Keywords identifying each vendor, in detection order.
///
/// Order matters: a document carrying both Vroomly and Sopartex markers is
/// classified as Vroomly.
const VENDOR_MARKERS: [(Vendor, &[&str]); 2] = [
    (Vendor::Vroomly, &["VROOMLY", "DOCAUTO"]),
    (Vendor::Sopartex, &["SOPARTEX"]),
];

/// Classify a document by the vendor markers present in its text.
pub fn detect_vendor(text: &str) -> Vendor {
    let upper = text.to_uppercase();

    let vendor = VENDOR_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| upper.contains(m)))
        .map(|(vendor, _)| *vendor)
        .unwrap_or(Vendor::Unknown);

    debug!("Detected vendor {} from {} characters", vendor, text.len());
    vendor
}
