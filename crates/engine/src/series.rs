// Closed-form estimators over a clean series (no nulls, no NaN).
//
// Every function returns `None` when the estimator is undefined for the
// input; callers turn that into an unavailable cell.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n - 1 denominator).
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Linear-interpolated quantile of an ascending series.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Adjusted Fisher-Pearson skewness. Undefined below 3 values or for a constant series.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 || is_constant(values) {
        return None;
    }
    let mean = mean(values)?;
    let nf = n as f64;
    let (s2, s3) = values.iter().fold((0.0, 0.0), |(s2, s3), x| {
        let d = x - mean;
        (s2 + d * d, s3 + d * d * d)
    });
    let m2 = s2 / nf;
    let m3 = s3 / nf;
    Some((nf * (nf - 1.0)).sqrt() / (nf - 2.0) * m3 / m2.powf(1.5))
}

/// Bias-corrected excess kurtosis. Undefined below 4 values or for a constant series.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 || is_constant(values) {
        return None;
    }
    let mean = mean(values)?;
    let nf = n as f64;
    let (s2, s4) = values.iter().fold((0.0, 0.0), |(s2, s4), x| {
        let d2 = (x - mean).powi(2);
        (s2 + d2, s4 + d2 * d2)
    });
    let adj = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    let numerator = (nf + 1.0) * nf * (nf - 1.0) * s4;
    let denominator = (nf - 2.0) * (nf - 3.0) * s2 * s2;
    Some(numerator / denominator - adj)
}

/// Smallest of the most frequent values, provided some value repeats.
pub fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: BTreeMap<OrderedFloat<f64>, usize> = BTreeMap::new();
    for &v in values {
        *counts.entry(OrderedFloat(v)).or_default() += 1;
    }
    let best = counts.values().copied().max()?;
    if best < 2 {
        return None;
    }
    // BTreeMap iterates ascending, so the first hit is the smallest modal value.
    counts
        .into_iter()
        .find(|(_, count)| *count == best)
        .map(|(value, _)| value.into_inner())
}

/// Pearson correlation over paired observations.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 || is_constant(xs) || is_constant(ys) {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let r = sxy / (sxx * syy).sqrt();
    Some(r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
