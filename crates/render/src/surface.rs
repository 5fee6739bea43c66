// Per-call drawing surface.
//
// Each render owns a fresh SVG backend writing into its own String. The
// backend is presented and dropped before the document is returned, on the
// error path as well, so nothing outlives the call.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::artifact::ChartArtifact;
use crate::error::RenderError;

pub(crate) type Surface<'a> = DrawingArea<SVGBackend<'a>, Shift>;

pub(crate) const FONT: &str = "sans-serif";

pub(crate) fn render<F>(width: u32, height: u32, draw: F) -> Result<ChartArtifact, RenderError>
where
    F: FnOnce(&Surface<'_>) -> Result<(), RenderError>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(ChartArtifact::from_svg(&svg, width, height))
}

/// Shorten to `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let head: String = label.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
