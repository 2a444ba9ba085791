//! Line-item records and vendor identifiers.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Fallback reference used when none can be derived from the invoice text.
pub const UNKNOWN_REFERENCE: &str = "REF-INCONNUE";

/// Vendor whose invoice layout produced a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    /// Vroomly / Docauto vehicle parts invoices.
    Vroomly,
    /// Sopartex parts invoices.
    Sopartex,
    /// No known vendor marker found.
    #[default]
    Unknown,
}

impl Vendor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Vroomly => "vroomly",
            Vendor::Sopartex => "sopartex",
            Vendor::Unknown => "unknown",
        }
    }

    /// Prefix put in front of every designation produced for this vendor.
    pub fn designation_prefix(&self) -> Option<&'static str> {
        match self {
            Vendor::Vroomly => Some("Vroomly"),
            Vendor::Sopartex => Some("Sopartex"),
            Vendor::Unknown => None,
        }
    }

    /// Designation of an item described by `description`.
    pub fn designation(&self, description: &str) -> String {
        match self.designation_prefix() {
            Some(prefix) => format!("{} - {}", prefix, description),
            None => description.to_string(),
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single purchased item, normalized for the catalogue export.
///
/// Fields are private so that every record goes through [`LineItemRecord::new`],
/// which enforces the field invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRecord {
    /// Part or product reference.
    reference: String,

    /// Vendor-prefixed, human-readable description.
    designation: String,

    /// Number of units purchased.
    quantity: u32,

    /// Unit purchase price, excluding tax.
    unit_purchase_price: Decimal,
}

impl LineItemRecord {
    /// Build a record, rejecting empty designations, zero quantities and
    /// negative prices.
    pub fn new(
        reference: impl Into<String>,
        designation: impl Into<String>,
        quantity: u32,
        unit_purchase_price: Decimal,
    ) -> Result<Self, ExtractionError> {
        let designation = designation.into();

        if designation.trim().is_empty() {
            return Err(ExtractionError::validation("designation", "must not be empty"));
        }
        if quantity == 0 {
            return Err(ExtractionError::validation("quantity", "must be positive"));
        }
        if unit_purchase_price.is_sign_negative() && !unit_purchase_price.is_zero() {
            return Err(ExtractionError::validation(
                "unit_purchase_price",
                format!("must not be negative, got {}", unit_purchase_price),
            ));
        }

        let mut reference = reference.into();
        if reference.trim().is_empty() {
            reference = UNKNOWN_REFERENCE.to_string();
        }

        Ok(Self {
            reference,
            designation,
            quantity,
            unit_purchase_price,
        })
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_purchase_price(&self) -> Decimal {
        self.unit_purchase_price
    }
}
