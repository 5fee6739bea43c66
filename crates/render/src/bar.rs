// Value-count bar chart with an "Other" bucket for the long tail.

use std::collections::HashMap;

use datalens_engine::{Column, Table};
use log::debug;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;

use crate::artifact::ChartArtifact;
use crate::error::RenderError;
use crate::options::ChartOptions;
use crate::surface::{self, truncate_label, FONT};

pub const OTHER_LABEL: &str = "Other";

const MAX_LABEL_CHARS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Counts per distinct non-null value, most frequent first; ties keep first
/// appearance order. Beyond `max_categories`, the top `max_categories - 1`
/// are kept and the rest summed into one "Other" entry.
pub fn category_counts(column: &Column, max_categories: usize) -> Option<Vec<CategoryCount>> {
    if max_categories == 0 {
        return None;
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for row in 0..column.len() {
        let value = column.value(row);
        if value.is_null() {
            continue;
        }
        let label = value.to_string();
        match index.get(&label) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push(CategoryCount { label, count: 1 });
            }
        }
    }
    if counts.is_empty() {
        return None;
    }

    // Stable: equal counts stay in first-appearance order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    if counts.len() > max_categories {
        let tail = counts.split_off(max_categories - 1);
        counts.push(CategoryCount {
            label: OTHER_LABEL.to_string(),
            count: tail.iter().map(|c| c.count).sum(),
        });
    }
    Some(counts)
}

pub fn bar_chart(
    table: &Table,
    column: &str,
    max_categories: usize,
) -> Result<Option<ChartArtifact>, RenderError> {
    let options = ChartOptions {
        max_categories,
        ..ChartOptions::default()
    };
    bar_chart_with(table, column, &options)
}

/// `Ok(None)` when the column is missing or has no non-null value.
pub fn bar_chart_with(
    table: &Table,
    column: &str,
    options: &ChartOptions,
) -> Result<Option<ChartArtifact>, RenderError> {
    let Some(categories) = table
        .column(column)
        .and_then(|c| category_counts(c, options.max_categories))
    else {
        debug!("bar chart unavailable: '{column}' is missing, empty, or max_categories is 0");
        return Ok(None);
    };

    let labels: Vec<String> = categories.iter().map(|c| truncate_label(&c.label, MAX_LABEL_CHARS)).collect();
    let n = categories.len();
    let peak = categories.iter().map(|c| c.count).max().unwrap_or(0);
    let y_max = peak + peak / 10 + 1;

    let artifact = surface::render(options.width, options.height, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(format!("Value counts of {column}"), (FONT, 20))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(50)
            .build_cartesian_2d((0..n).into_segmented(), 0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(column)
            .y_desc("Count")
            .draw()?;

        chart.draw_series(categories.iter().enumerate().map(|(i, c)| {
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), c.count)],
                BLUE.mix(0.7).filled(),
            );
            bar.set_margin(0, 0, 4, 4);
            bar
        }))?;

        let label_style = TextStyle::from((FONT, 12).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(categories.iter().enumerate().map(|(i, c)| {
            Text::new(
                c.count.to_string(),
                (SegmentValue::CenterOf(i), c.count),
                label_style.clone(),
            )
        }))?;
        Ok(())
    })?;

    Ok(Some(artifact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use datalens_engine::ColumnData;

    fn text(values: &[Option<&str>]) -> Column {
        Column::new(
            "c",
            ColumnData::Text(values.iter().map(|v| v.map(str::to_string)).collect()),
        )
    }

    fn labels(counts: &[CategoryCount]) -> Vec<(&str, usize)> {
        counts.iter().map(|c| (c.label.as_str(), c.count)).collect()
    }

    #[test]
    fn test_counts_rank_with_stable_ties() {
        let column = text(&[Some("b"), Some("a"), Some("a"), None, Some("c"), Some("b"), Some("d")]);
        let counts = category_counts(&column, 20).unwrap();
        assert_eq!(labels(&counts), vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }

    #[test]
    fn test_tail_collapses_into_other() {
        // 25 distinct values; value i appears 30 - i times.
        let mut cells = Vec::new();
        for i in 0..25 {
            for _ in 0..(30 - i) {
                cells.push(Some(format!("v{i:02}")));
            }
        }
        let column = Column::new("c", ColumnData::Text(cells));
        let counts = category_counts(&column, 20).unwrap();

        assert_eq!(counts.len(), 20);
        assert_eq!(counts[0], CategoryCount { label: "v00".into(), count: 30 });
        assert_eq!(counts[18].label, "v18");
        // v19..v24 -> 11 + 10 + 9 + 8 + 7 + 6
        assert_eq!(counts[19], CategoryCount { label: OTHER_LABEL.into(), count: 51 });
    }

    #[test]
    fn test_exact_limit_has_no_other() {
        let column = text(&[Some("x"), Some("y")]);
        let counts = category_counts(&column, 2).unwrap();
        assert_eq!(labels(&counts), vec![("x", 1), ("y", 1)]);
    }

    #[test]
    fn test_unavailable_cases() {
        assert!(category_counts(&text(&[None, None]), 20).is_none());
        assert!(category_counts(&text(&[Some("x")]), 0).is_none());
    }

    #[test]
    fn test_numeric_values_use_display_labels() {
        let column = Column::new("n", ColumnData::Integer(vec![Some(3), Some(3), Some(1)]));
        let counts = category_counts(&column, 5).unwrap();
        assert_eq!(labels(&counts), vec![("3", 2), ("1", 1)]);
    }
}
