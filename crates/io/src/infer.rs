// Storage-type inference for columns of raw text cells.
//
// Order: integer, float, boolean, datetime, text. The first type every
// non-null cell parses as wins. A column with no non-null cells is float.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use datalens_engine::ColumnData;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Build a typed column from cells already reduced to `None` for null tokens.
pub fn infer_column(cells: Vec<Option<String>>) -> ColumnData {
    if cells.iter().all(Option::is_none) {
        return ColumnData::Float(vec![None; cells.len()]);
    }

    if let Some(values) = parse_all(&cells, |s| s.parse::<i64>().ok()) {
        return ColumnData::Integer(values);
    }
    if let Some(values) = parse_all(&cells, parse_float) {
        // NaN spelled some way the null tokens missed is still a null.
        return ColumnData::Float(
            values
                .into_iter()
                .map(|v| v.filter(|f| !f.is_nan()))
                .collect(),
        );
    }
    if let Some(values) = parse_all(&cells, parse_bool) {
        return ColumnData::Boolean(values);
    }
    if let Some(values) = parse_all(&cells, parse_datetime) {
        return ColumnData::Datetime(values);
    }
    ColumnData::Text(cells)
}

/// Blank names become `column_<n>`; repeats get `.1`, `.2`, ... until unique.
pub fn unique_header_names<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let raw = raw.as_ref();
            let base = if raw.trim().is_empty() {
                format!("column_{}", i + 1)
            } else {
                raw.to_string()
            };
            let mut name = base.clone();
            let mut suffix = 0;
            while seen.contains(&name) {
                suffix += 1;
                name = format!("{base}.{suffix}");
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

/// Parse every non-null cell (trimmed), or give up on the first failure.
fn parse_all<T>(cells: &[Option<String>], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<Option<T>>> {
    cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(s) => parse(s.trim()).map(Some),
        })
        .collect()
}

fn parse_float(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}

pub fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// ISO-like date or datetime, fractional seconds optional.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use datalens_engine::StorageType;

    fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_integers() {
        let data = infer_column(cells(&[Some("1"), None, Some(" -7 "), Some("+3")]));
        assert_eq!(data, ColumnData::Integer(vec![Some(1), None, Some(-7), Some(3)]));
    }

    #[test]
    fn test_mixed_int_and_float_is_float() {
        let data = infer_column(cells(&[Some("1"), Some("2.5"), Some("1e3")]));
        assert_eq!(data, ColumnData::Float(vec![Some(1.0), Some(2.5), Some(1000.0)]));
    }

    #[test]
    fn test_float_nan_becomes_null() {
        let data = infer_column(cells(&[Some("1.5"), Some("NAN"), Some("inf")]));
        assert_eq!(data, ColumnData::Float(vec![Some(1.5), None, Some(f64::INFINITY)]));
    }

    #[test]
    fn test_booleans_any_case() {
        let data = infer_column(cells(&[Some("True"), Some("false"), None, Some("TRUE")]));
        assert_eq!(data, ColumnData::Boolean(vec![Some(true), Some(false), None, Some(true)]));
    }

    #[test]
    fn test_datetimes() {
        let data = infer_column(cells(&[
            Some("2024-01-15"),
            Some("2024/02/01"),
            Some("2024-03-01 12:30:00"),
            Some("2024-03-01T08:00:00.250"),
        ]));
        assert_eq!(data.storage_type(), StorageType::Datetime);
        if let ColumnData::Datetime(values) = data {
            assert_eq!(
                values[0],
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0)
            );
            assert_eq!(
                values[3],
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_milli_opt(8, 0, 0, 250)
            );
        }
    }

    #[test]
    fn test_anything_else_is_text() {
        let raw = cells(&[Some("12"), Some("twelve"), None]);
        assert_eq!(infer_column(raw.clone()), ColumnData::Text(raw));

        let not_a_date = cells(&[Some("2024-13-45")]);
        assert_eq!(infer_column(not_a_date).storage_type(), StorageType::Text);
    }

    #[test]
    fn test_header_names_are_unique() {
        let names = unique_header_names(["id", "", "id", " ", "id.1", "id"]);
        assert_eq!(names, vec!["id", "column_2", "id.1", "column_4", "id.1.1", "id.2"]);
    }

    #[test]
    fn test_all_null_is_float() {
        assert_eq!(infer_column(cells(&[None, None])), ColumnData::Float(vec![None, None]));
        assert_eq!(infer_column(vec![]), ColumnData::Float(vec![]));
    }
}
