// Excel import (xlsx, xls) via calamine

use std::collections::BTreeSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use datalens_engine::table::DATETIME_FORMAT;
use datalens_engine::{Column, ColumnData, Table};
use log::debug;

use crate::error::LoadError;
use crate::infer::{parse_datetime, unique_header_names};
use crate::options::LoadOptions;

/// Largest serial Excel can display (9999-12-31).
const MAX_DATE_SERIAL: f64 = 2_958_465.0;

#[derive(Debug)]
pub struct XlsxImport {
    pub table: Table,
    pub sheet: String,
}

/// One cell after mapping calamine's data model onto ours.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Datetime(NaiveDateTime),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
    Int,
    Float,
    Bool,
    Datetime,
    Text,
}

impl Cell {
    fn from_data(data: &Data, options: &LoadOptions) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Null,
            Data::String(s) if options.is_null_token(s) => Cell::Null,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(n) => Cell::Int(*n),
            Data::Float(n) if n.is_nan() => Cell::Null,
            Data::Float(n) => Cell::Float(*n),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) if dt.is_duration() => Cell::Text(duration_text(dt.as_f64())),
            // Serials assume the 1900 date system; calamine does not expose the 1904 flag.
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                serial_to_datetime(serial).map_or(Cell::Float(serial), Cell::Datetime)
            }
            Data::DateTimeIso(s) => parse_datetime(s).map_or_else(|| Cell::Text(s.clone()), Cell::Datetime),
            Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }

    fn kind(&self) -> Option<Kind> {
        match self {
            Cell::Null => None,
            Cell::Int(_) => Some(Kind::Int),
            Cell::Float(_) => Some(Kind::Float),
            Cell::Bool(_) => Some(Kind::Bool),
            Cell::Datetime(_) => Some(Kind::Datetime),
            Cell::Text(_) => Some(Kind::Text),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(n) => Some(*n as f64),
            Cell::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Display string used when a column mixes kinds.
    fn into_text(self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Int(n) => Some(n.to_string()),
            // Whole floats print without decimals
            Cell::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", n as i64)),
            Cell::Float(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Datetime(dt) => Some(dt.format(DATETIME_FORMAT).to_string()),
            Cell::Text(s) => Some(s),
        }
    }
}

/// Import the first worksheet. Its first row is the header.
pub fn import(path: &Path, options: &LoadOptions) -> Result<XlsxImport, LoadError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let Some(sheet) = sheet_names.first().cloned() else {
        return Err(LoadError::malformed("workbook contains no sheets"));
    };
    if sheet_names.len() > 1 {
        debug!("reading sheet '{sheet}', ignoring {} other(s)", sheet_names.len() - 1);
    }

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::Spreadsheet(format!("failed to read sheet '{sheet}': {e}")))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(LoadError::malformed(format!("sheet '{sheet}' has no columns to parse")));
    };
    let names = unique_header_names(header.iter().map(header_text));

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (col, column) in cells.iter_mut().enumerate() {
            let cell = row.get(col).map_or(Cell::Null, |d| Cell::from_data(d, options));
            column.push(cell);
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, build_column(values)))
        .collect();

    Ok(XlsxImport {
        table: Table::new(columns)?,
        sheet,
    })
}

fn header_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        other => other.to_string(),
    }
}

/// Single-kind columns keep their kind; int+float widens to float; anything
/// else mixed falls back to text.
fn build_column(cells: Vec<Cell>) -> ColumnData {
    let kinds: Vec<Kind> = cells
        .iter()
        .filter_map(Cell::kind)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    match kinds.as_slice() {
        [] => ColumnData::Float(vec![None; cells.len()]),
        [Kind::Int] => ColumnData::Integer(
            cells
                .iter()
                .map(|c| match c {
                    Cell::Int(n) => Some(*n),
                    _ => None,
                })
                .collect(),
        ),
        [Kind::Float] | [Kind::Int, Kind::Float] => {
            ColumnData::Float(cells.iter().map(Cell::as_f64).collect())
        }
        [Kind::Bool] => ColumnData::Boolean(
            cells
                .iter()
                .map(|c| match c {
                    Cell::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect(),
        ),
        [Kind::Datetime] => ColumnData::Datetime(
            cells
                .iter()
                .map(|c| match c {
                    Cell::Datetime(dt) => Some(*dt),
                    _ => None,
                })
                .collect(),
        ),
        _ => ColumnData::Text(cells.into_iter().map(Cell::into_text).collect()),
    }
}

/// Excel serial (days since 1899-12-30, fraction = time of day) to a datetime.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !(0.0..=MAX_DATE_SERIAL + 1.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::try_milliseconds(millis)?)
}

/// Elapsed-time serial (days) as `[-]h:mm:ss`, hours unbounded.
fn duration_text(days: f64) -> String {
    if !days.is_finite() {
        return days.to_string();
    }
    let total = (days * 86_400.0).round();
    let sign = if total < 0.0 { "-" } else { "" };
    let secs = total.abs().min(u64::MAX as f64) as u64;
    format!("{sign}{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datalens_engine::{StorageType, Value};
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook};
    use tempfile::tempdir;

    #[test]
    fn test_serial_to_datetime() {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(serial_to_datetime(45306.0), day(2024, 1, 15).and_hms_opt(0, 0, 0));
        assert_eq!(serial_to_datetime(45306.5), day(2024, 1, 15).and_hms_opt(12, 0, 0));
        assert_eq!(serial_to_datetime(61.0), day(1900, 3, 1).and_hms_opt(0, 0, 0));
        assert_eq!(serial_to_datetime(-1.0), None);
        assert_eq!(serial_to_datetime(f64::NAN), None);
    }

    #[test]
    fn test_duration_text() {
        assert_eq!(duration_text(1.5), "36:00:00");
        assert_eq!(duration_text(0.0), "0:00:00");
        assert_eq!(duration_text(1.0 / 86_400.0 * 3725.0), "1:02:05");
        assert_eq!(duration_text(-0.25), "-6:00:00");
    }

    #[test]
    fn test_import_duration_as_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("elapsed.xlsx");

        let mut workbook = XlsxWorkbook::new();
        let sheet = workbook.add_worksheet();
        let elapsed = Format::new().set_num_format("[h]:mm:ss");
        sheet.write_string(0, 0, "elapsed").unwrap();
        sheet.write_number_with_format(1, 0, 1.5, &elapsed).unwrap();
        sheet.write_number_with_format(2, 0, 0.25, &elapsed).unwrap();
        workbook.save(&path).unwrap();

        let table = import(&path, &LoadOptions::default()).unwrap().table;
        let column = table.column("elapsed").unwrap();
        assert_eq!(column.storage_type(), StorageType::Text);
        assert_eq!(column.value(0), Value::Text("36:00:00".into()));
        assert_eq!(column.value(1), Value::Text("6:00:00".into()));
    }

    #[test]
    fn test_mixed_kinds() {
        let column = build_column(vec![Cell::Int(1), Cell::Float(2.5), Cell::Null]);
        assert_eq!(column, ColumnData::Float(vec![Some(1.0), Some(2.5), None]));

        let column = build_column(vec![Cell::Float(3.0), Cell::Text("x".into()), Cell::Bool(true)]);
        assert_eq!(
            column,
            ColumnData::Text(vec![Some("3".into()), Some("x".into()), Some("true".into())])
        );

        assert_eq!(build_column(vec![Cell::Null]), ColumnData::Float(vec![None]));
    }

    #[test]
    fn test_import_typed_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.xlsx");

        let mut workbook = XlsxWorkbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        for (col, name) in ["name", "score", "ok", "day", "mixed", "", "name"].iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        sheet.write_string(1, 0, "alice").unwrap();
        sheet.write_number(1, 1, 90.0).unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        let jan15 = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        sheet.write_datetime_with_format(1, 3, &jan15, &date_format).unwrap();
        sheet.write_number(1, 4, 7.0).unwrap();

        sheet.write_string(2, 0, "NA").unwrap();
        sheet.write_number(2, 1, 72.5).unwrap();
        sheet.write_boolean(2, 2, false).unwrap();
        let feb1 = ExcelDateTime::from_ymd(2024, 2, 1).unwrap();
        sheet.write_datetime_with_format(2, 3, &feb1, &date_format).unwrap();
        sheet.write_string(2, 4, "seven").unwrap();
        workbook.save(&path).unwrap();

        let import = import(&path, &LoadOptions::default()).unwrap();
        let table = import.table;
        assert_eq!(
            table.column_names(),
            vec!["name", "score", "ok", "day", "mixed", "column_6", "name.1"]
        );
        assert_eq!(table.row_count(), 2);

        let storage = |name: &str| table.column(name).unwrap().storage_type();
        assert_eq!(storage("name"), StorageType::Text);
        assert_eq!(storage("score"), StorageType::Float);
        assert_eq!(storage("ok"), StorageType::Boolean);
        assert_eq!(storage("day"), StorageType::Datetime);
        assert_eq!(storage("mixed"), StorageType::Text);
        assert_eq!(storage("column_6"), StorageType::Float);

        let name = table.column("name").unwrap();
        assert_eq!(name.value(1), Value::Null);
        assert_eq!(
            table.column("mixed").unwrap().value(0),
            Value::Text("7".into())
        );
        assert_eq!(
            table.column("day").unwrap().value(0),
            Value::Datetime(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_sheet_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        let mut workbook = XlsxWorkbook::new();
        workbook.add_worksheet();
        workbook.save(&path).unwrap();

        let err = import(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }), "{err:?}");
    }

    #[test]
    fn test_not_a_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fake.xlsx");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let err = import(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)), "{err:?}");
    }
}
