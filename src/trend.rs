// Least-squares trend over the most recent points of a series.
use crate::types::AlignedPoint;

/// Points used for the fit, counted from the end of the series.
pub const TREND_WINDOW: usize = 6;
/// Fewer valid points than this and no trend is reported.
pub const MIN_TREND_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    /// Change per step of the series index.
    pub slope: f64,
    pub intercept: f64,
    /// Index of the first point that went into the fit.
    pub start: usize,
}

impl TrendLine {
    pub fn value_at(&self, index: usize) -> f64 {
        self.slope * index as f64 + self.intercept
    }
}

/// Fit a line through the last [`TREND_WINDOW`] finite values, keeping each
/// value at its original index so gaps stretch the x axis.
pub fn fit_trend(values: &[Option<f64>]) -> Option<TrendLine> {
    let valid: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| x.is_finite()).map(|x| (i as f64, x)))
        .collect();
    if valid.len() < MIN_TREND_POINTS {
        return None;
    }
    let recent = &valid[valid.len().saturating_sub(TREND_WINDOW)..];

    let n = recent.len() as f64;
    let mean_x = recent.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = recent.iter().map(|(_, y)| y).sum::<f64>() / n;
    let sxx: f64 = recent.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = recent.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let slope = sxy / sxx;
    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
        start: recent[0].0 as usize,
    })
}

/// Trend value for every index from the start of the fit onwards, `None`
/// before it or when no trend could be fitted.
pub fn trend_values(values: &[Option<f64>]) -> Vec<Option<f64>> {
    match fit_trend(values) {
        Some(line) => (0..values.len())
            .map(|i| (i >= line.start).then(|| line.value_at(i)))
            .collect(),
        None => vec![None; values.len()],
    }
}

/// Trend of the all-homes metric over a date-sorted region series.
pub fn series_trend(series: &[AlignedPoint]) -> Option<TrendLine> {
    let values: Vec<Option<f64>> = series.iter().map(|p| Some(p.primary)).collect();
    fit_trend(&values)
}
