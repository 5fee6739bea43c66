// Table-level overview: shape, names, memory footprint, head/tail rows.

use serde::Serialize;

use crate::table::{Table, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicInfo {
    pub row_count: usize,
    pub column_count: usize,
    pub column_names: Vec<String>,
    pub approx_memory_bytes: usize,
}

pub fn basic_info(table: &Table) -> BasicInfo {
    BasicInfo {
        row_count: table.row_count(),
        column_count: table.column_count(),
        column_names: table.column_names(),
        approx_memory_bytes: table.approx_memory_bytes(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    /// 0-based row index in the source table.
    pub index: usize,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub head: Vec<PreviewRow>,
    pub tail: Vec<PreviewRow>,
}

/// First `head_n` and last `tail_n` rows. Both are clamped to the row count,
/// so on short tables head and tail may overlap.
pub fn preview(table: &Table, head_n: usize, tail_n: usize) -> Preview {
    let rows = table.row_count();
    let head_end = head_n.min(rows);
    let tail_start = rows - tail_n.min(rows);

    Preview {
        columns: table.column_names(),
        head: (0..head_end).map(|i| row(table, i)).collect(),
        tail: (tail_start..rows).map(|i| row(table, i)).collect(),
    }
}

fn row(table: &Table, index: usize) -> PreviewRow {
    PreviewRow {
        index,
        values: table.columns().iter().map(|c| c.value(index)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData};
    use std::mem::size_of;

    fn sample() -> Table {
        Table::new(vec![
            Column::new("id", ColumnData::Integer((0..10).map(Some).collect())),
            Column::new(
                "name",
                ColumnData::Text((0..10).map(|i| Some(format!("row{i}"))).collect()),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_basic_info() {
        let info = basic_info(&sample());
        assert_eq!(info.row_count, 10);
        assert_eq!(info.column_count, 2);
        assert_eq!(info.column_names, vec!["id", "name"]);
        assert!(info.approx_memory_bytes >= 10 * size_of::<Option<i64>>() + 10 * 4);
    }

    #[test]
    fn test_preview_head_and_tail() {
        let p = preview(&sample(), 3, 2);
        assert_eq!(p.head.len(), 3);
        assert_eq!(p.tail.len(), 2);
        assert_eq!(p.head[0].index, 0);
        assert_eq!(p.tail[0].index, 8);
        assert_eq!(p.tail[1].values[0], Value::Integer(9));
        assert_eq!(p.tail[1].values[1], Value::Text("row9".into()));
    }

    #[test]
    fn test_preview_clamps_to_row_count() {
        let p = preview(&sample(), 50, 50);
        assert_eq!(p.head.len(), 10);
        assert_eq!(p.tail.len(), 10);
        assert_eq!(p.tail[0].index, 0);

        let empty = preview(&Table::default(), 5, 5);
        assert!(empty.head.is_empty() && empty.tail.is_empty());
        assert!(empty.columns.is_empty());
    }

    #[test]
    fn test_preview_json_uses_nulls() {
        let table = Table::new(vec![Column::new(
            "x",
            ColumnData::Float(vec![Some(1.5), None]),
        )])
        .unwrap();
        let json = serde_json::to_value(preview(&table, 2, 0)).unwrap();
        assert_eq!(json["head"][0]["values"][0], 1.5);
        assert!(json["head"][1]["values"][0].is_null());
        assert_eq!(json["head"][1]["index"], 1);
    }
}
