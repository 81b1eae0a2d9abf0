//! XLSX workbook writer for canonical records.
//!
//! Office Open XML spreadsheets are a zip container of small XML parts.
//! The parts we need are fixed and tiny, so they are built here as strings
//! with inline-string cells rather than through a spreadsheet library.

use std::fmt::Write as _;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use centris_core::{CanonicalRecord, ExtractionError, COLUMNS};

/// Headers of the error sheet, mirroring [`ExtractionError`]'s JSON names.
const ERROR_COLUMNS: [&str; 3] = ["NomFichier", "Centris #", "MessageErreur"];

/// Column widths grow with content up to this many characters.
const MAX_COLUMN_WIDTH: usize = 60;

#[derive(Debug, thiserror::Error)]
pub enum XlsxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Build a complete workbook in memory.
///
/// Sheet 1 (`Sheet1`) holds the header row followed by one row per record,
/// in the canonical column order. When `errors` is non-empty a second sheet
/// (`Erreurs`) lists them; when it is empty the workbook has one sheet.
pub fn workbook_bytes(
    records: &[CanonicalRecord],
    errors: &[ExtractionError],
) -> Result<Vec<u8>, XlsxError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let with_errors = !errors.is_empty();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(content_types(with_errors).as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_part(with_errors).as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(workbook_rels(with_errors).as_bytes())?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(records_sheet(records).as_bytes())?;

    if with_errors {
        zip.start_file("xl/worksheets/sheet2.xml", options)?;
        zip.write_all(errors_sheet(errors).as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Write the workbook to `path`. Same layout as [`workbook_bytes`].
pub fn write_workbook(
    records: &[CanonicalRecord],
    errors: &[ExtractionError],
    path: &Path,
) -> Result<(), XlsxError> {
    let bytes = workbook_bytes(records, errors)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn content_types(with_errors: bool) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
"#,
    );
    if with_errors {
        out.push_str(
            r#"<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
"#,
        );
    }
    out.push_str("</Types>");
    out
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

fn workbook_part(with_errors: bool) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="Sheet1" sheetId="1" r:id="rId1"/>
"#,
    );
    if with_errors {
        out.push_str(r#"<sheet name="Erreurs" sheetId="2" r:id="rId2"/>"#);
        out.push('\n');
    }
    out.push_str("</sheets>\n</workbook>");
    out
}

fn workbook_rels(with_errors: bool) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
"#,
    );
    if with_errors {
        out.push_str(
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
"#,
        );
    }
    out.push_str("</Relationships>");
    out
}

fn records_sheet(records: &[CanonicalRecord]) -> String {
    let mut rows: Vec<Vec<&str>> = Vec::with_capacity(records.len() + 1);
    rows.push(COLUMNS.to_vec());
    for rec in records {
        rows.push(rec.to_row().to_vec());
    }
    sheet_part(&rows)
}

fn errors_sheet(errors: &[ExtractionError]) -> String {
    let mut rows: Vec<Vec<&str>> = Vec::with_capacity(errors.len() + 1);
    rows.push(ERROR_COLUMNS.to_vec());
    for err in errors {
        rows.push(vec![
            &err.filename,
            err.centris_no.as_deref().unwrap_or(""),
            &err.message,
        ]);
    }
    sheet_part(&rows)
}

/// Render one worksheet part: a `<cols>` block with per-column widths, then
/// every row as inline-string cells. Rows are assumed rectangular (same
/// length as the first, the header).
fn sheet_part(rows: &[Vec<&str>]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
"#,
    );

    let ncols = rows.first().map_or(0, Vec::len);
    if ncols > 0 {
        out.push_str("<cols>\n");
        for col in 0..ncols {
            let width = column_width(rows, col);
            let _ = writeln!(
                out,
                r#"<col min="{n}" max="{n}" width="{width}" customWidth="1"/>"#,
                n = col + 1,
            );
        }
        out.push_str("</cols>\n");
    }

    out.push_str("<sheetData>\n");
    for (row_ix, row) in rows.iter().enumerate() {
        let _ = write!(out, r#"<row r="{}">"#, row_ix + 1);
        for (col_ix, cell) in row.iter().enumerate() {
            let _ = write!(
                out,
                r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                column_letters(col_ix),
                row_ix + 1,
                xml_escape(cell),
            );
        }
        out.push_str("</row>\n");
    }
    out.push_str("</sheetData>\n</worksheet>");
    out
}

/// Width of one column in characters: longest cell plus a little padding,
/// capped so a runaway owner-address cell does not stretch the sheet.
fn column_width(rows: &[Vec<&str>], col: usize) -> usize {
    let longest = rows
        .iter()
        .filter_map(|row| row.get(col))
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0);
    (longest + 2).min(MAX_COLUMN_WIDTH)
}

/// Spreadsheet column reference for a zero-based index: 0 -> "A", 25 -> "Z",
/// 26 -> "AA".
fn column_letters(mut ix: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (ix % 26) as u8);
        if ix < 26 {
            break;
        }
        ix = ix / 26 - 1;
    }
    letters.reverse();
    // Only ASCII uppercase letters were pushed.
    String::from_utf8(letters).unwrap_or_default()
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use centris_core::RawRecord;

    fn sample_record(centris_no: &str, address: &str) -> CanonicalRecord {
        CanonicalRecord::from_raw(&RawRecord {
            centris_no: centris_no.to_string(),
            address: address.to_string(),
            current_price: "450000".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_bytes_are_a_zip_container() {
        let bytes = workbook_bytes(&[sample_record("12345678", "1 rue A")], &[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_single_sheet_without_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_workbook(&[sample_record("12345678", "1 rue A")], &[], &path).unwrap();

        let workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_string()]);
    }

    #[test]
    fn test_header_row_matches_declared_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_workbook(
            &[sample_record("12345678", "123 rue Principale, Montréal")],
            &[],
            &path,
        )
        .unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        let header: Vec<String> = range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(|c| match c {
                Data::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        assert_eq!(header, COLUMNS.to_vec());

        // Data row follows the same order, with prices normalized upstream.
        let row: Vec<String> = range
            .rows()
            .nth(1)
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(row[0], "12345678");
        assert_eq!(row[1], "123 rue Principale, Montréal");
        assert_eq!(row[4], "450 000 $");
    }

    #[test]
    fn test_error_sheet_present_with_one_row_per_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let errors = vec![
            ExtractionError::document("report.pdf", "document vide"),
            ExtractionError::record("report.pdf", "99999999", "aucune donnée de fiche reconnue"),
        ];
        write_workbook(&[sample_record("12345678", "1 rue A")], &errors, &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec!["Sheet1".to_string(), "Erreurs".to_string()]
        );

        let range = workbook.worksheet_range("Erreurs").unwrap();
        assert_eq!(range.height(), errors.len() + 1);

        let header: Vec<String> = range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(header, ERROR_COLUMNS.to_vec());

        // Document-level error has no Centris number; the cell stays empty.
        let first: Vec<String> = range
            .rows()
            .nth(1)
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(first[0], "report.pdf");
        assert_eq!(first[1], "");
        assert_eq!(first[2], "document vide");
    }

    #[test]
    fn test_special_characters_survive_the_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let rec = CanonicalRecord::from_raw(&RawRecord {
            owner: "Dubois & Fils <succession>".to_string(),
            ..Default::default()
        });
        write_workbook(&[rec], &[], &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        let row: Vec<String> = range
            .rows()
            .nth(1)
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(row[6], "Dubois & Fils <succession>");
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(10), "K");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
    }

    #[test]
    fn test_column_width_is_capped() {
        let long = "x".repeat(200);
        let rows = vec![vec!["header"], vec![long.as_str()]];
        assert_eq!(column_width(&rows, 0), MAX_COLUMN_WIDTH);
        let rows = vec![vec!["abc"], vec!["abcdef"]];
        assert_eq!(column_width(&rows, 0), 8);
    }
}
