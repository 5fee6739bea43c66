// Plain-text renderings of engine results.

use std::path::Path;

use datalens_engine::{
    BasicInfo, ColumnStats, ColumnTypes, CorrelationMatrix, CorrelationPair, DescriptiveStats, Preview,
    PreviewRow, Stat, Value,
};
use datalens_io::LoadReport;

use crate::util::render_table;

const MAX_CELL_WIDTH: usize = 24;

pub(crate) fn info(path: &Path, info: &BasicInfo, load: &LoadReport) -> String {
    let mut lines = vec![
        format!("file:      {}", path.display()),
        format!("format:    {}", load.format),
    ];
    if let (Some(encoding), Some(decode_path)) = (load.encoding, load.decode_path) {
        lines.push(format!("encoding:  {encoding} ({decode_path})"));
    }
    if let Some(delimiter) = load.delimiter {
        lines.push(format!("delimiter: {delimiter:?}"));
    }
    if let Some(sheet) = &load.sheet {
        lines.push(format!("sheet:     {sheet}"));
    }
    lines.push(format!("rows:      {}", info.row_count));
    lines.push(format!("columns:   {}", info.column_count));
    lines.push(format!("memory:    ~{} bytes", info.approx_memory_bytes));
    for name in &info.column_names {
        lines.push(format!("  {name}"));
    }
    lines.join("\n")
}

pub(crate) fn preview(preview: &Preview) -> String {
    let mut headers = vec![String::new()];
    headers.extend(preview.columns.iter().cloned());

    let row = |r: &PreviewRow| -> Vec<String> {
        let mut cells = vec![r.index.to_string()];
        cells.extend(r.values.iter().map(cell));
        cells
    };

    // Head and tail overlap on short tables; print each row once.
    let head_end = preview.head.last().map_or(0, |r| r.index + 1);
    let tail: Vec<&PreviewRow> = preview.tail.iter().filter(|r| r.index >= head_end).collect();

    let mut rows: Vec<Vec<String>> = preview.head.iter().map(row).collect();
    if tail.first().is_some_and(|r| r.index > head_end) {
        rows.push(vec!["...".to_string()]);
    }
    rows.extend(tail.into_iter().map(row));
    render_table(&headers, &rows, &[0], MAX_CELL_WIDTH)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn types(types: &ColumnTypes) -> String {
    let headers: Vec<String> = ["column", "type", "storage", "missing", "missing %"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<Vec<String>> = types
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.semantic_type.to_string(),
                c.storage_type.to_string(),
                c.missing_count.to_string(),
                format!("{:.2}", c.missing_percent),
            ]
        })
        .collect();
    render_table(&headers, &rows, &[3, 4], MAX_CELL_WIDTH)
}

pub(crate) fn stats(stats: &DescriptiveStats) -> String {
    let mut headers = vec![String::new()];
    headers.extend(stats.columns().iter().cloned());
    let rows: Vec<Vec<String>> = stats
        .rows()
        .iter()
        .map(|row| {
            let mut cells = vec![row.stat.to_string()];
            cells.extend(row.values.iter().map(Stat::to_string));
            cells
        })
        .collect();
    let right: Vec<usize> = (1..headers.len()).collect();
    render_table(&headers, &rows, &right, MAX_CELL_WIDTH)
}

pub(crate) fn column_stats(stats: &ColumnStats) -> String {
    let fields: [(&str, String); 16] = [
        ("column", stats.column.clone()),
        ("count", stats.count.to_string()),
        ("missing", stats.missing.to_string()),
        ("mean", stats.mean.to_string()),
        ("median", stats.median.to_string()),
        ("mode", stats.mode.to_string()),
        ("std", stats.std.to_string()),
        ("variance", stats.variance.to_string()),
        ("min", stats.min.to_string()),
        ("max", stats.max.to_string()),
        ("q1", stats.q1.to_string()),
        ("q3", stats.q3.to_string()),
        ("iqr", stats.iqr.to_string()),
        ("range", stats.range.to_string()),
        ("skewness", stats.skewness.to_string()),
        ("kurtosis", stats.kurtosis.to_string()),
    ];
    fields
        .iter()
        .map(|(name, value)| format!("{name:<9} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn matrix(matrix: &CorrelationMatrix) -> String {
    let mut headers = vec![String::new()];
    headers.extend(matrix.columns().iter().cloned());
    let rows: Vec<Vec<String>> = (0..matrix.len())
        .map(|i| {
            let mut cells = vec![matrix.columns()[i].clone()];
            cells.extend((0..matrix.len()).map(|j| match matrix.at(i, j) {
                Stat::Value(r) => format!("{r:.3}"),
                Stat::Unavailable => "n/a".to_string(),
            }));
            cells
        })
        .collect();
    let right: Vec<usize> = (1..headers.len()).collect();
    render_table(&headers, &rows, &right, MAX_CELL_WIDTH)
}

pub(crate) fn pairs(pairs: &[CorrelationPair]) -> String {
    if pairs.is_empty() {
        return "no pairs above threshold".to_string();
    }
    let headers: Vec<String> = ["column a", "column b", "r", "strength", "direction"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<Vec<String>> = pairs
        .iter()
        .map(|p| {
            vec![
                p.column_a.clone(),
                p.column_b.clone(),
                format!("{:.3}", p.correlation),
                format!("{:?}", p.strength).to_lowercase(),
                format!("{:?}", p.direction).to_lowercase(),
            ]
        })
        .collect();
    render_table(&headers, &rows, &[2], MAX_CELL_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datalens_engine::{
        classify, correlation_matrix, correlation_pairs, preview as make_preview, Column, ColumnData, Table,
    };

    fn table() -> Table {
        Table::new(vec![
            Column::new("x", ColumnData::Integer(vec![Some(1), Some(2), Some(3), Some(4)])),
            Column::new("y", ColumnData::Float(vec![Some(-2.0), Some(-4.0), Some(-6.0), None])),
            Column::new(
                "tag",
                ColumnData::Text(vec![Some("a".into()), None, Some("c".into()), Some("d".into())]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn preview_marks_gap_between_head_and_tail() {
        let out = preview(&make_preview(&table(), 1, 1));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("tag"));
        assert!(lines[2].trim_start().starts_with('0'));
        assert_eq!(lines[3].trim(), "...");
        assert!(lines[4].contains("null"));
    }

    #[test]
    fn preview_prints_overlapping_rows_once() {
        let out = preview(&make_preview(&table(), 3, 3));
        assert_eq!(out.lines().count(), 6);
        assert!(!out.contains("..."));
    }

    #[test]
    fn types_table_lists_every_column() {
        let out = types(&classify(&table()));
        assert_eq!(out.lines().count(), 5);
        assert!(out.contains("25.00"));
    }

    #[test]
    fn pairs_render_lowercase_labels() {
        let out = pairs(&correlation_pairs(&table(), 0.5));
        assert!(out.contains("strong"));
        assert!(out.contains("negative"));
        assert!(out.contains("-1.000"));
        assert_eq!(pairs(&[]), "no pairs above threshold");
    }

    #[test]
    fn matrix_has_unit_diagonal() {
        let out = matrix(&correlation_matrix(&table()).unwrap());
        // x and y are exact negatives.
        assert_eq!(out.matches("-1.000").count(), 2);
        assert_eq!(out.matches("1.000").count(), 4);
    }
}
