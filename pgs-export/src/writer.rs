//! Serializers for tables: CSV files, the workbook and tar.gz archives.
//!
//! Every file is written to a `.tmp` sibling and renamed into place, so a
//! failed run never leaves a truncated artifact under its final name.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use flate2::write::GzEncoder;
use flate2::Compression;
use rust_xlsxwriter::{ColNum, DocProperties, ExcelDateTime, Format, RowNum, Workbook, Worksheet, XlsxError};

use crate::error::{io_err, ExportError};
use crate::table::{Cell, Table};

/// Title of the summary sheet of catalog-wide workbooks.
pub const README_SHEET: &str = "Readme";

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Render `table` as CSV: one header line of column labels, then one line
/// per row. Fields are quoted only when needed.
pub fn table_to_csv(table: &Table) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(table.labels())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

pub fn write_csv(path: &Path, table: &Table) -> Result<(), ExportError> {
    let bytes = table_to_csv(table).map_err(|e| ExportError::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_atomic(path, &bytes)
}

// ---------------------------------------------------------------------------
// Workbook
// ---------------------------------------------------------------------------

/// Write one sheet per table, preceded by an optional two-column summary
/// sheet. The document creation time is pinned to `created` so identical
/// tables always produce identical workbook bytes.
pub fn write_workbook(
    path: &Path,
    tables: &[Table],
    readme: Option<&[(&str, String)]>,
    created: NaiveDate,
) -> Result<(), ExportError> {
    let xlsx_err = |source: XlsxError| ExportError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(
        created.year() as u16,
        created.month() as u8,
        created.day() as u8,
    )
    .map_err(xlsx_err)?;
    let properties = DocProperties::new().set_creation_datetime(&created);
    workbook.set_properties(&properties);

    let header = Format::new().set_bold();

    if let Some(rows) = readme {
        let sheet = workbook.add_worksheet();
        sheet.set_name(README_SHEET).map_err(xlsx_err)?;
        for (i, (label, value)) in rows.iter().enumerate() {
            let row = i as RowNum;
            sheet
                .write_string_with_format(row, 0, *label, &header)
                .map_err(xlsx_err)?;
            sheet.write_string(row, 1, value).map_err(xlsx_err)?;
        }
    }

    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet.set_name(table.kind().sheet_label()).map_err(xlsx_err)?;
        write_sheet(sheet, table, &header).map_err(xlsx_err)?;
    }

    let tmp = tmp_path(path);
    workbook.save(&tmp).map_err(xlsx_err)?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))
}

fn write_sheet(sheet: &mut Worksheet, table: &Table, header: &Format) -> Result<(), XlsxError> {
    for (col, column) in table.columns().iter().enumerate() {
        let col = col as ColNum;
        sheet.write_string_with_format(0, col, column.label, header)?;
        for (i, cell) in column.cells.iter().enumerate() {
            let row = (i + 1) as RowNum;
            match cell {
                Cell::Empty => {}
                Cell::Text(text) if text.is_empty() => {}
                Cell::Text(text) => {
                    sheet.write_string(row, col, text)?;
                }
                Cell::Number(number) => match number.as_f64() {
                    Some(value) => {
                        sheet.write_number(row, col, value)?;
                    }
                    None => {
                        sheet.write_string(row, col, number.to_string())?;
                    }
                },
                Cell::Bool(value) => {
                    sheet.write_boolean(row, col, *value)?;
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// Gzip-compressed tar of `source_dir`, stored under its base name.
pub fn write_archive(output: &Path, source_dir: &Path) -> Result<(), ExportError> {
    let arcname = source_dir
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let tmp = tmp_path(output);
    let file = File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder
        .append_dir_all(&arcname, source_dir)
        .map_err(|e| io_err(source_dir, e))?;
    let encoder = builder.into_inner().map_err(|e| io_err(&tmp, e))?;
    encoder.finish().map_err(|e| io_err(&tmp, e))?;

    std::fs::rename(&tmp, output).map_err(|e| io_err(output, e))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let tmp = tmp_path(path);
    std::fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))
}

/// `<name>.tmp` in the same directory as `path`.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
