//! Line-item parser for Vroomly / Docauto invoices.
//!
//! Items span several lines: free-text description lines followed by one
//! detail line carrying quantity, unit price, discount and total. Two detail
//! shapes exist:
//!
//! ```text
//! Kit de roulements de roue
//! SKF VKBA 6786 GH-304-CK 2 70,12 20% 140,24     <- vehicle/part text + figures
//!
//! Pneus
//! LING LONG Grnmaxxas
//! 175/65R14 82T
//! 2 32,20 20% 64,40                               <- figures only
//! ```
//!
//! Parsing is a fold over the lines: each line is classified once, description
//! lines accumulate in a [`PendingDescription`], and a detail line turns the
//! accumulated text into a record and resets the accumulator. Description
//! lines left over at the end of the document are dropped.

use regex::Captures;
use tracing::{debug, trace, warn};

use crate::models::record::{LineItemRecord, Vendor, UNKNOWN_REFERENCE};

use super::rules::{
    parse_price, parse_quantity, strip_registration, VROOMLY_HEADER_MARKERS,
    VROOMLY_PLAIN_DETAIL, VROOMLY_VEHICLE_DETAIL,
};
use super::{content_lines, LineItemParser, Result};

/// Description of a figures-only item with no buffered description lines.
pub const DEFAULT_DESCRIPTION: &str = "Article Vroomly";

/// Vroomly line-item parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct VroomlyParser;

impl VroomlyParser {
    pub fn new() -> Self {
        Self
    }

    fn build_record(
        &self,
        pending: &PendingDescription<'_>,
        detail: &DetailLine<'_>,
    ) -> Result<Option<LineItemRecord>> {
        let quantity = parse_quantity(detail.quantity)?;
        let unit_price = parse_price("unit_price", detail.price)?;

        if quantity == 0 {
            warn!("Skipping Vroomly item with zero quantity: {}", detail.source);
            return Ok(None);
        }

        let record = match detail.vehicle {
            Some(vehicle) => {
                let stripped = strip_registration(vehicle);
                let description = join_description(&pending.joined(), &stripped.text);

                let mut designation = Vendor::Vroomly.designation(&description);
                if let Some(registration) = &stripped.registration {
                    designation.push_str(" - ");
                    designation.push_str(registration);
                }

                LineItemRecord::new(stripped.text, designation, quantity, unit_price)?
            }
            None => {
                let mut description = pending.joined();
                if description.is_empty() {
                    description = DEFAULT_DESCRIPTION.to_string();
                }
                let reference = pending.last().unwrap_or(UNKNOWN_REFERENCE);

                LineItemRecord::new(reference, Vendor::Vroomly.designation(&description), quantity, unit_price)?
            }
        };

        debug!(
            "Vroomly item: {} x{} @ {}",
            record.reference(),
            record.quantity(),
            record.unit_purchase_price()
        );
        Ok(Some(record))
    }
}

impl LineItemParser for VroomlyParser {
    fn vendor(&self) -> Vendor {
        Vendor::Vroomly
    }

    fn parse(&self, text: &str) -> Result<Vec<LineItemRecord>> {
        let lines = content_lines(text);
        let start = table_start(&lines);

        let mut pending = PendingDescription::default();
        let mut records = Vec::new();

        for line in &lines[start..] {
            match VroomlyLine::classify(line) {
                VroomlyLine::Description(text) => {
                    trace!("Buffering description line: {}", text);
                    pending.push(text);
                }
                VroomlyLine::Detail(detail) => {
                    if let Some(record) = self.build_record(&pending, &detail)? {
                        records.push(record);
                    }
                    pending.clear();
                }
            }
        }

        if !pending.is_empty() {
            debug!("Dropping {} trailing description lines", pending.len());
        }

        Ok(records)
    }
}

/// Index of the first line after the item table header, or 0 without header.
fn table_start(lines: &[&str]) -> usize {
    lines
        .iter()
        .position(|line| {
            let upper = line.to_uppercase();
            VROOMLY_HEADER_MARKERS.iter().all(|m| upper.contains(m))
        })
        .map(|i| i + 1)
        .unwrap_or(0)
}

fn join_description(pending: &str, leading: &str) -> String {
    format!("{} {}", pending, leading).trim().to_string()
}

/// A Vroomly line, classified once.
#[derive(Debug, PartialEq, Eq)]
enum VroomlyLine<'a> {
    /// Closes the current item.
    Detail(DetailLine<'a>),
    /// Free text belonging to the next item.
    Description(&'a str),
}

/// The figures of a detail line.
#[derive(Debug, PartialEq, Eq)]
struct DetailLine<'a> {
    /// Leading vehicle/part text, absent on figures-only lines.
    vehicle: Option<&'a str>,
    quantity: &'a str,
    price: &'a str,
    source: &'a str,
}

impl<'a> VroomlyLine<'a> {
    /// A figures-only line has four tokens while a vehicle line needs at
    /// least five, so at most one detail pattern can match.
    fn classify(line: &'a str) -> Self {
        if let Some(caps) = VROOMLY_VEHICLE_DETAIL.captures(line) {
            return VroomlyLine::Detail(DetailLine {
                vehicle: Some(group(&caps, "vehicle").trim()),
                quantity: group(&caps, "qty"),
                price: group(&caps, "price"),
                source: line,
            });
        }

        if let Some(caps) = VROOMLY_PLAIN_DETAIL.captures(line) {
            return VroomlyLine::Detail(DetailLine {
                vehicle: None,
                quantity: group(&caps, "qty"),
                price: group(&caps, "price"),
                source: line,
            });
        }

        VroomlyLine::Description(line)
    }
}

fn group<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
    caps.name(name).map_or("", |m| m.as_str())
}

/// Description lines waiting for their detail line.
#[derive(Debug, Default)]
struct PendingDescription<'a> {
    lines: Vec<&'a str>,
}

impl<'a> PendingDescription<'a> {
    fn push(&mut self, line: &'a str) {
        self.lines.push(line);
    }

    fn clear(&mut self) {
        self.lines.clear();
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    fn last(&self) -> Option<&'a str> {
        self.lines.last().copied()
    }

    fn joined(&self) -> String {
        self.lines.join(" ").trim().to_string()
    }
}
