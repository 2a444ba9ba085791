//! Line-item parser for Sopartex invoices.
//!
//! One item per line: `<ref> <qty> <description> <unit price> <total> [P]`.
//! Every other line is a header, footer or noise and is ignored.

use tracing::{debug, warn};

use crate::models::record::{LineItemRecord, Vendor};

use super::rules::{parse_price, parse_quantity, SOPARTEX_DETAIL};
use super::{content_lines, LineItemParser, Result};

/// Sopartex line-item parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SopartexParser;

impl SopartexParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_line(&self, line: &str) -> Result<Option<LineItemRecord>> {
        let Some(caps) = SOPARTEX_DETAIL.captures(line) else {
            return Ok(None);
        };

        let reference = &caps["reference"];
        let description = caps["description"].trim();
        let quantity = parse_quantity(&caps["qty"])?;
        let unit_price = parse_price("unit_price", &caps["price"])?;

        if description.is_empty() {
            debug!("Skipping Sopartex line without description: {}", line);
            return Ok(None);
        }
        if quantity == 0 {
            warn!("Skipping Sopartex item {} with zero quantity", reference);
            return Ok(None);
        }

        let record = LineItemRecord::new(
            reference,
            Vendor::Sopartex.designation(description),
            quantity,
            unit_price,
        )?;

        debug!("Sopartex item: {} x{} @ {}", reference, quantity, unit_price);
        Ok(Some(record))
    }
}

impl LineItemParser for SopartexParser {
    fn vendor(&self) -> Vendor {
        Vendor::Sopartex
    }

    fn parse(&self, text: &str) -> Result<Vec<LineItemRecord>> {
        let mut records = Vec::new();

        for line in content_lines(text) {
            if let Some(record) = self.parse_line(line)? {
                records.push(record);
            }
        }

        Ok(records)
    }
}
