//! Minimal XLSX (SpreadsheetML) writer for the catalogue sheet.
//!
//! The workbook holds a single worksheet. Strings are written inline so no
//! shared-string table is needed.

use std::io::{Cursor, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{catalogue_row, format_export_date, Cell, Result, COLUMN_COUNT};
use crate::error::ExportError;
use crate::models::config::ExportConfig;
use crate::models::record::LineItemRecord;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Characters Excel refuses in worksheet names.
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
const MAX_SHEET_NAME_LEN: usize = 31;

/// Writes line items to a single-sheet catalogue workbook.
#[derive(Debug, Clone)]
pub struct CatalogueExporter {
    sheet_name: String,
    export_date: Option<NaiveDate>,
}

impl CatalogueExporter {
    /// Create an exporter writing a sheet named `Catalogue`.
    pub fn new() -> Self {
        Self {
            sheet_name: ExportConfig::default().sheet_name,
            export_date: None,
        }
    }

    /// Create an exporter from configuration.
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        Self::new().with_sheet_name(&config.sheet_name)
    }

    /// Set the worksheet name.
    pub fn with_sheet_name(mut self, name: &str) -> Result<Self> {
        validate_sheet_name(name)?;
        self.sheet_name = name.to_string();
        Ok(self)
    }

    /// Stamp rows with a fixed date instead of today's.
    pub fn with_export_date(mut self, date: NaiveDate) -> Self {
        self.export_date = Some(date);
        self
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Build the workbook in memory.
    pub fn to_bytes(&self, records: &[LineItemRecord]) -> Result<Vec<u8>> {
        // One date for the whole export, even across midnight.
        let export_date =
            format_export_date(self.export_date.unwrap_or_else(|| Local::now().date_naive()));

        let rows: Vec<[Cell; COLUMN_COUNT]> = records
            .iter()
            .map(|record| catalogue_row(record, &export_date))
            .collect();

        let workbook_xml = workbook_xml(&self.sheet_name)?;
        let sheet_xml = worksheet_xml(&rows)?;

        let parts: [(&str, &[u8]); 6] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
            ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
            ("xl/workbook.xml", &workbook_xml),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.as_bytes()),
            ("xl/styles.xml", STYLES_XML.as_bytes()),
            ("xl/worksheets/sheet1.xml", &sheet_xml),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in parts {
            zip.start_file(name, options)?;
            zip.write_all(data)?;
        }

        let cursor = zip.finish()?;
        let bytes = cursor.into_inner();

        debug!("Built workbook: {} rows, {} bytes", rows.len(), bytes.len());
        Ok(bytes)
    }

    /// Write the workbook to `destination` in a single write.
    ///
    /// On failure any partially written file is removed.
    pub fn export(&self, records: &[LineItemRecord], destination: &Path) -> Result<()> {
        let bytes = self.to_bytes(records)?;

        // Staged beside the destination and renamed into place; on failure the
        // destination is untouched.
        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&bytes)?;
        staged.persist(destination).map_err(|e| e.error)?;

        info!("Exported {} records to {}", records.len(), destination.display());
        Ok(())
    }
}

impl Default for CatalogueExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_sheet_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("must not be empty")
    } else if name.chars().count() > MAX_SHEET_NAME_LEN {
        Some("must be at most 31 characters")
    } else if name.contains(INVALID_SHEET_CHARS) {
        Some("must not contain any of [ ] : * ? / \\")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ExportError::InvalidSheetName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    write(
        &mut writer,
        Event::Start(
            BytesStart::new("workbook")
                .with_attributes([("xmlns", SPREADSHEET_NS), ("xmlns:r", RELATIONSHIPS_NS)]),
        ),
    )?;
    write(&mut writer, Event::Start(BytesStart::new("sheets")))?;
    write(
        &mut writer,
        Event::Empty(BytesStart::new("sheet").with_attributes([
            ("name", sheet_name),
            ("sheetId", "1"),
            ("r:id", "rId1"),
        ])),
    )?;
    write(&mut writer, Event::End(BytesEnd::new("sheets")))?;
    write(&mut writer, Event::End(BytesEnd::new("workbook")))?;

    Ok(writer.into_inner())
}

fn worksheet_xml(rows: &[[Cell; COLUMN_COUNT]]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    write(
        &mut writer,
        Event::Start(BytesStart::new("worksheet").with_attributes([("xmlns", SPREADSHEET_NS)])),
    )?;
    write(&mut writer, Event::Start(BytesStart::new("sheetData")))?;

    for (index, row) in rows.iter().enumerate() {
        let row_number = (index + 1).to_string();
        write(
            &mut writer,
            Event::Start(BytesStart::new("row").with_attributes([("r", row_number.as_str())])),
        )?;

        for (col, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", column_name(col), row_number);
            write_cell(&mut writer, &cell_ref, cell)?;
        }

        write(&mut writer, Event::End(BytesEnd::new("row")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("sheetData")))?;
    write(&mut writer, Event::End(BytesEnd::new("worksheet")))?;

    Ok(writer.into_inner())
}

fn write_cell(writer: &mut Writer<Vec<u8>>, cell_ref: &str, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Text(text) => {
            write(
                writer,
                Event::Start(
                    BytesStart::new("c").with_attributes([("r", cell_ref), ("t", "inlineStr")]),
                ),
            )?;
            write(writer, Event::Start(BytesStart::new("is")))?;
            write(
                writer,
                Event::Start(BytesStart::new("t").with_attributes([("xml:space", "preserve")])),
            )?;
            write(writer, Event::Text(BytesText::new(text)))?;
            write(writer, Event::End(BytesEnd::new("t")))?;
            write(writer, Event::End(BytesEnd::new("is")))?;
        }
        Cell::Number(value) => {
            write(
                writer,
                Event::Start(BytesStart::new("c").with_attributes([("r", cell_ref)])),
            )?;
            let value = value.to_string();
            write(writer, Event::Start(BytesStart::new("v")))?;
            write(writer, Event::Text(BytesText::new(&value)))?;
            write(writer, Event::End(BytesEnd::new("v")))?;
        }
    }

    write(writer, Event::End(BytesEnd::new("c")))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::Xml(e.to_string()))
}

/// Spreadsheet column name for a 0-based index (0 -> A, 26 -> AA).
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use rust_decimal::Decimal;
    use std::io::Read;
    use std::str::FromStr;

    fn sample_records() -> Vec<LineItemRecord> {
        vec![
            LineItemRecord::new(
                "SKF VKBA 6786",
                "Vroomly - Kit de roulements de roue SKF VKBA 6786 - GH-304-CK",
                2,
                Decimal::from_str("70.12").unwrap(),
            )
            .unwrap(),
            LineItemRecord::new(
                "12345",
                "Sopartex - Filtre à huile & joint <neuf>",
                3,
                Decimal::from_str("15.50").unwrap(),
            )
            .unwrap(),
        ]
    }

    fn export_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_column_name() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(16), "Q");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
    }

    #[test]
    fn test_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.xlsx");

        CatalogueExporter::new()
            .with_export_date(export_date())
            .export(&sample_records(), &path)
            .unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Catalogue".to_string()]);

        let range = workbook.worksheet_range("Catalogue").unwrap();
        assert_eq!(range.height(), 2);

        assert_eq!(range.get((0, 0)), Some(&Data::String("SKF VKBA 6786".to_string())));
        assert_eq!(
            range.get((0, 1)),
            Some(&Data::String(
                "Vroomly - Kit de roulements de roue SKF VKBA 6786 - GH-304-CK".to_string()
            ))
        );
        assert_eq!(range.get((0, 6)), Some(&Data::Float(70.12)));
        assert_eq!(range.get((0, 8)), Some(&Data::String("20240115".to_string())));
        assert_eq!(range.get((0, 10)), Some(&Data::Float(2.0)));
        assert_eq!(
            range.get((1, 1)),
            Some(&Data::String("Sopartex - Filtre à huile & joint <neuf>".to_string()))
        );

        for row in 0..2 {
            assert_eq!(range.get((row, 2)), Some(&Data::String("AUTO".to_string())));
            assert_eq!(range.get((row, 4)), Some(&Data::Float(0.0)));
        }
    }

    #[test]
    fn test_every_row_has_seventeen_cells() {
        let bytes = CatalogueExporter::new()
            .with_export_date(export_date())
            .to_bytes(&sample_records())
            .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut sheet = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut sheet)
            .unwrap();

        assert_eq!(sheet.matches("<row ").count(), 2);
        assert_eq!(sheet.matches("<c ").count(), 2 * COLUMN_COUNT);
        assert!(sheet.contains(r#"<c r="Q2" t="inlineStr">"#));
        assert!(sheet.contains("&amp; joint &lt;neuf&gt;"));
    }

    #[test]
    fn test_empty_export_produces_empty_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        CatalogueExporter::new().export(&[], &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Catalogue").unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn test_custom_sheet_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("achats.xlsx");

        let config = ExportConfig {
            sheet_name: "Achats & pièces".to_string(),
            ..ExportConfig::default()
        };
        CatalogueExporter::from_config(&config)
            .unwrap()
            .export(&sample_records(), &path)
            .unwrap();

        let workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Achats & pièces".to_string()]);
    }

    #[test]
    fn test_invalid_sheet_names() {
        for name in ["", "Achats/2024", "A name that is far too long for Excel"] {
            assert!(
                matches!(
                    CatalogueExporter::new().with_sheet_name(name),
                    Err(ExportError::InvalidSheetName { .. })
                ),
                "name: {}",
                name
            );
        }
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("export.xlsx");

        let err = CatalogueExporter::new().export(&sample_records(), &path).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_export_keeps_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("previous.xlsx");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), "kept").unwrap();

        let err = CatalogueExporter::new().export(&sample_records(), &path).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));

        assert_eq!(std::fs::read_to_string(path.join("keep.txt")).unwrap(), "kept");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_export_replaces_existing_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.xlsx");
        std::fs::write(&path, b"old contents").unwrap();

        CatalogueExporter::new()
            .with_export_date(export_date())
            .export(&sample_records(), &path)
            .unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Catalogue").unwrap();
        assert_eq!(range.height(), 2);
    }
}
