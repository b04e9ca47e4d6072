// Percentage-range projection over a region's date-sorted series.
use crate::types::AlignedPoint;

fn axis_index(pct: f64, axis_len: usize) -> usize {
    let last = axis_len - 1;
    let idx = (pct.clamp(0.0, 100.0) / 100.0 * last as f64).round();
    (idx as usize).min(last)
}

/// Points of `series` whose dates fall within `[lo, hi]` percent of `axis`,
/// bounds inclusive. With fewer than two axis entries there is nothing to
/// window and the series is returned as-is.
pub fn select_window(
    series: &[AlignedPoint],
    axis: &[String],
    lo: f64,
    hi: f64,
) -> Vec<AlignedPoint> {
    if axis.len() < 2 {
        return series.to_vec();
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let start = &axis[axis_index(lo, axis.len())];
    let end = &axis[axis_index(hi, axis.len())];

    series
        .iter()
        .filter(|p| p.date >= *start && p.date <= *end)
        .cloned()
        .collect()
}
