//! Catalogue spreadsheet export.
//!
//! Every record becomes one row of a fixed 17-column (A to Q) layout that
//! downstream inventory tools import by position:
//!
//! | col | content                     |
//! |-----|-----------------------------|
//! | A   | reference                   |
//! | B   | designation                 |
//! | C   | supplier code, always `AUTO` |
//! | E   | discount rate, always `0`   |
//! | G   | unit purchase price         |
//! | I   | export date, `YYYYMMDD`     |
//! | K   | quantity                    |
//!
//! All other columns hold empty strings.

mod xlsx;

pub use xlsx::CatalogueExporter;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ExportError;
use crate::models::record::LineItemRecord;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Number of columns in a catalogue row.
pub const COLUMN_COUNT: usize = 17;

/// Supplier code written in column C.
pub const SUPPLIER_CODE: &str = "AUTO";

pub const COL_REFERENCE: usize = 0;
pub const COL_DESIGNATION: usize = 1;
pub const COL_SUPPLIER_CODE: usize = 2;
pub const COL_DISCOUNT_RATE: usize = 4;
pub const COL_UNIT_PRICE: usize = 6;
pub const COL_EXPORT_DATE: usize = 8;
pub const COL_QUANTITY: usize = 10;

/// A spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(Decimal),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn empty() -> Self {
        Cell::Text(String::new())
    }
}

/// Format the export date as written in column I.
pub fn format_export_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Lay out one record as a catalogue row.
pub fn catalogue_row(record: &LineItemRecord, export_date: &str) -> [Cell; COLUMN_COUNT] {
    std::array::from_fn(|col| match col {
        COL_REFERENCE => Cell::text(record.reference()),
        COL_DESIGNATION => Cell::text(record.designation()),
        COL_SUPPLIER_CODE => Cell::text(SUPPLIER_CODE),
        COL_DISCOUNT_RATE => Cell::Number(Decimal::ZERO),
        COL_UNIT_PRICE => Cell::Number(record.unit_purchase_price()),
        COL_EXPORT_DATE => Cell::text(export_date),
        COL_QUANTITY => Cell::Number(Decimal::from(record.quantity())),
        _ => Cell::empty(),
    })
}
