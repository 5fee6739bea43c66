// Correlation heatmap: lower triangle plus diagonal, annotated cells.

use datalens_engine::{correlation_matrix, Stat, Table};
use log::debug;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::artifact::ChartArtifact;
use crate::error::RenderError;
use crate::options::ChartOptions;
use crate::surface::{self, truncate_label, FONT};

const TITLE_HEIGHT: i32 = 40;
const ROW_LABEL_WIDTH: i32 = 120;
const COLUMN_LABEL_HEIGHT: i32 = 40;
const PADDING: i32 = 10;
const MAX_LABEL_CHARS: usize = 14;

const COLD: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (247, 247, 247);
const HOT: (u8, u8, u8) = (180, 4, 38);
const UNAVAILABLE: RGBColor = RGBColor(200, 200, 200);

/// Diverging blue-white-red over [-1, 1].
pub fn diverging_color(r: f64) -> RGBColor {
    let r = r.clamp(-1.0, 1.0);
    let (from, to, t) = if r < 0.0 { (NEUTRAL, COLD, -r) } else { (NEUTRAL, HOT, r) };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Cell annotation: two decimals, or "n/a".
pub fn annotation(cell: Stat) -> String {
    match cell {
        Stat::Value(r) => format!("{r:.2}"),
        Stat::Unavailable => "n/a".to_string(),
    }
}

pub fn heatmap(table: &Table) -> Result<Option<ChartArtifact>, RenderError> {
    heatmap_with(table, &ChartOptions::default())
}

/// `Ok(None)` when the table has fewer than two numeric columns.
pub fn heatmap_with(table: &Table, options: &ChartOptions) -> Result<Option<ChartArtifact>, RenderError> {
    let Some(matrix) = correlation_matrix(table) else {
        debug!("heatmap unavailable: fewer than two numeric columns");
        return Ok(None);
    };

    let n = matrix.len() as i32;
    let width = options.width as i32;
    let height = options.height as i32;
    let grid_w = width - ROW_LABEL_WIDTH - 2 * PADDING;
    let grid_h = height - TITLE_HEIGHT - COLUMN_LABEL_HEIGHT - 2 * PADDING;
    let cell = (grid_w.min(grid_h) / n).max(1);
    let left = ROW_LABEL_WIDTH + PADDING;
    let top = TITLE_HEIGHT + PADDING;

    let labels: Vec<String> = matrix.columns().iter().map(|c| truncate_label(c, MAX_LABEL_CHARS)).collect();

    let artifact = surface::render(options.width, options.height, |root| {
        let title_style = TextStyle::from((FONT, 20).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
        root.draw(&Text::new("Correlation matrix", (width / 2, PADDING), title_style))?;

        let row_style = TextStyle::from((FONT, 12).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
        let col_style = TextStyle::from((FONT, 12).into_font()).pos(Pos::new(HPos::Center, VPos::Top));

        for i in 0..n {
            let y0 = top + i * cell;
            root.draw(&Text::new(
                labels[i as usize].clone(),
                (left - 6, y0 + cell / 2),
                row_style.clone(),
            ))?;

            // j > i is the mirror image of j < i; only the lower triangle is drawn.
            for j in 0..=i {
                let x0 = left + j * cell;
                let value = matrix.at(i as usize, j as usize);
                let fill = match value {
                    Stat::Value(r) => diverging_color(r),
                    Stat::Unavailable => UNAVAILABLE,
                };
                root.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], fill.filled()))?;
                root.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], WHITE.stroke_width(1)))?;

                let ink = match value {
                    Stat::Value(r) if r.abs() > 0.6 => WHITE,
                    _ => BLACK,
                };
                let cell_style = TextStyle::from((FONT, 12).into_font())
                    .pos(Pos::new(HPos::Center, VPos::Center))
                    .color(&ink);
                root.draw(&Text::new(annotation(value), (x0 + cell / 2, y0 + cell / 2), cell_style))?;
            }
        }

        let bottom = top + n * cell + 6;
        for (j, label) in labels.iter().enumerate() {
            let cx = left + j as i32 * cell + cell / 2;
            root.draw(&Text::new(label.clone(), (cx, bottom), col_style.clone()))?;
        }
        Ok(())
    })?;

    Ok(Some(artifact))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(c: RGBColor) -> (u8, u8, u8) {
        (c.0, c.1, c.2)
    }

    #[test]
    fn test_diverging_color_endpoints() {
        assert_eq!(rgb(diverging_color(-1.0)), COLD);
        assert_eq!(rgb(diverging_color(0.0)), NEUTRAL);
        assert_eq!(rgb(diverging_color(1.0)), HOT);
        assert_eq!(rgb(diverging_color(7.0)), HOT);
        assert_eq!(rgb(diverging_color(0.5)), (214, 126, 143));
    }

    #[test]
    fn test_annotation() {
        assert_eq!(annotation(Stat::Value(0.8567)), "0.86");
        assert_eq!(annotation(Stat::Value(-1.0)), "-1.00");
        assert_eq!(annotation(Stat::Unavailable), "n/a");
    }
}
