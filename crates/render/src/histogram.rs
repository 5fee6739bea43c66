// Histogram with a Gaussian KDE overlay.

use datalens_engine::series;
use datalens_engine::Table;
use log::debug;
use plotters::prelude::*;

use crate::artifact::ChartArtifact;
use crate::error::RenderError;
use crate::options::ChartOptions;
use crate::surface::{self, FONT};

const KDE_POINTS: usize = 200;

/// Upper bound on histogram buckets; larger requests are not drawn.
pub const MAX_BINS: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width buckets over `[min, max]`, last bucket closed. A constant
/// series is spread over `[v - 0.5, v + 0.5]`. Empty when `bins` is 0 or
/// above [`MAX_BINS`].
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 || bins > MAX_BINS {
        return Vec::new();
    }
    let (lo, hi) = bin_range(values);
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = ((v - lo) / width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

fn bin_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

/// KDE with Scott's bandwidth, scaled to histogram counts. `None` when the
/// bandwidth is undefined (fewer than 2 values or zero spread).
pub fn density_curve(values: &[f64], lo: f64, hi: f64, bin_width: f64) -> Option<Vec<(f64, f64)>> {
    let sigma = series::sample_std(values)?;
    if sigma == 0.0 {
        return None;
    }
    let n = values.len() as f64;
    let bandwidth = sigma * n.powf(-0.2);
    let norm = bin_width / (bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let step = (hi - lo) / (KDE_POINTS - 1) as f64;
    let points = (0..KDE_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            let sum: f64 = values
                .iter()
                .map(|xi| {
                    let u = (x - xi) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum();
            (x, sum * norm)
        })
        .collect();
    Some(points)
}

pub fn histogram(table: &Table, column: &str, bins: usize) -> Result<Option<ChartArtifact>, RenderError> {
    let options = ChartOptions {
        bins,
        ..ChartOptions::default()
    };
    histogram_with(table, column, &options)
}

/// `Ok(None)` when the column is missing, non-numeric or entirely null, or
/// when `bins` is 0 or above [`MAX_BINS`].
pub fn histogram_with(
    table: &Table,
    column: &str,
    options: &ChartOptions,
) -> Result<Option<ChartArtifact>, RenderError> {
    let Some(mut values) = table.column(column).and_then(|c| c.clean_numeric()) else {
        debug!("histogram unavailable: '{column}' is missing or not numeric");
        return Ok(None);
    };
    values.retain(|v| v.is_finite());
    if values.is_empty() || options.bins == 0 || options.bins > MAX_BINS {
        debug!(
            "histogram unavailable: '{column}' has no values or {} bins is outside 1..={MAX_BINS}",
            options.bins
        );
        return Ok(None);
    }

    let bins = histogram_bins(&values, options.bins);
    let (lo, hi) = bin_range(&values);
    let bin_width = (hi - lo) / options.bins as f64;
    let curve = density_curve(&values, lo, hi, bin_width);

    let peak_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let peak_curve = curve
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(0.0, f64::max);
    let y_max = peak_count.max(peak_curve).max(1.0) * 1.1;

    let artifact = surface::render(options.width, options.height, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(format!("Distribution of {column}"), (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(lo..hi, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(column)
            .y_desc("Count")
            .draw()?;

        chart.draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLUE.mix(0.6).filled())
        }))?;

        if let Some(points) = &curve {
            chart.draw_series(LineSeries::new(points.iter().copied(), RED.stroke_width(2)))?;
        }
        Ok(())
    })?;

    Ok(Some(artifact))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_last_is_closed() {
        let bins = histogram_bins(&[0.0, 1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(bins.len(), 2);
        assert_eq!((bins[0].start, bins[0].end, bins[0].count), (0.0, 2.0, 2));
        assert_eq!((bins[1].start, bins[1].end, bins[1].count), (2.0, 4.0, 3));
    }

    #[test]
    fn test_bins_constant_series() {
        let bins = histogram_bins(&[5.0, 5.0, 5.0], 4);
        assert_eq!(bins[0].start, 4.5);
        assert_eq!(bins[3].end, 5.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(bins[2].count, 3);
    }

    #[test]
    fn test_bins_degenerate_inputs() {
        assert!(histogram_bins(&[], 10).is_empty());
        assert!(histogram_bins(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_bins_bounded() {
        assert_eq!(histogram_bins(&[1.0, 2.0], MAX_BINS).len(), MAX_BINS);
        assert!(histogram_bins(&[1.0, 2.0], MAX_BINS + 1).is_empty());
        assert!(histogram_bins(&[1.0, 2.0], usize::MAX / 4).is_empty());
    }

    #[test]
    fn test_density_integrates_to_count() {
        let values: Vec<f64> = (0..50).map(|i| (i % 10) as f64).collect();
        let (lo, hi) = (-10.0, 20.0);
        let bin_width = 1.0;
        let curve = density_curve(&values, lo, hi, bin_width).unwrap();
        assert_eq!(curve.len(), KDE_POINTS);

        // Trapezoid area over a wide window ≈ n * bin_width.
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum();
        assert!((area - 50.0).abs() < 1.0, "area = {area}");
    }

    #[test]
    fn test_density_undefined_for_flat_or_single() {
        assert!(density_curve(&[3.0, 3.0], 2.5, 3.5, 0.1).is_none());
        assert!(density_curve(&[3.0], 2.5, 3.5, 0.1).is_none());
    }
}
