//! Pairs the two parallel tables into one chartable series.
//!
//! Rows are matched by position, not by key: both exports are expected to
//! list the same regions in the same order. When the secondary row names a
//! different region the pair is still used, but a `RegionMismatch` is
//! recorded so callers can see the assumption broke.
use crate::config::REGION_NAME;
use crate::types::{AlignedPoint, DecodedTable, Diagnostics, SkipReason};
use crate::util::parse_positive;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Emit a point for every (row, date) where both tables hold a finite,
/// strictly positive value. A bad cell skips only that date.
pub fn align_series(
    primary: &DecodedTable,
    secondary: &DecodedTable,
    date_columns: &[String],
) -> (Vec<AlignedPoint>, Diagnostics) {
    let mut points = Vec::new();
    let mut diag = Diagnostics::default();

    for (row, rec) in primary.records.iter().enumerate() {
        let region = match rec.get(REGION_NAME).map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => {
                diag.record(SkipReason::MissingRegion { row });
                continue;
            }
        };
        let Some(other) = secondary.records.get(row) else {
            diag.record(SkipReason::MissingSecondaryRow { row });
            continue;
        };
        if let Some(other_region) = other.get(REGION_NAME).map(str::trim) {
            if !other_region.is_empty() && other_region != region {
                warn!(
                    row,
                    primary = region,
                    secondary = other_region,
                    "row order differs between tables"
                );
                diag.record(SkipReason::RegionMismatch {
                    row,
                    primary: region.to_string(),
                    secondary: other_region.to_string(),
                });
            }
        }

        for date in date_columns {
            match (parse_positive(rec.get(date)), parse_positive(other.get(date))) {
                (Some(p), Some(s)) => points.push(AlignedPoint {
                    date: date.clone(),
                    region: region.to_string(),
                    primary: p,
                    secondary: s,
                }),
                _ => diag.record(SkipReason::InvalidValue {
                    row,
                    region: region.to_string(),
                    column: date.clone(),
                }),
            }
        }
    }

    debug!(points = points.len(), skipped = diag.skips.len(), "aligned series");
    (points, diag)
}

/// Sorted distinct dates present anywhere in the series.
pub fn date_axis(points: &[AlignedPoint]) -> Vec<String> {
    points
        .iter()
        .map(|p| p.date.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct region names, for a region picker.
pub fn regions(points: &[AlignedPoint]) -> Vec<String> {
    points
        .iter()
        .map(|p| p.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One region's points in date order.
pub fn region_series(points: &[AlignedPoint], region: &str) -> Vec<AlignedPoint> {
    let mut series: Vec<AlignedPoint> = points
        .iter()
        .filter(|p| p.region == region)
        .cloned()
        .collect();
    series.sort_by(|a, b| a.date.cmp(&b.date));
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::resolve_date_columns;
    use crate::loader::decode_table;

    fn tables(primary: &str, secondary: &str) -> (DecodedTable, DecodedTable, Vec<String>) {
        let (p, _) = decode_table(primary);
        let (s, _) = decode_table(secondary);
        let dates = resolve_date_columns(&p.headers);
        (p, s, dates)
    }

    #[test]
    fn zero_secondary_value_skips_only_that_date() {
        let header = "RegionID,RegionName,2024-09-30,2024-10-31,2024-11-30\n";
        let mut primary = header.to_string();
        let mut secondary = header.to_string();
        for i in 0..5 {
            primary.push_str(&format!("{i},Region {i},100,110,120\n"));
            secondary.push_str(&format!("{i},Region {i},90,95,99\n"));
        }
        primary.push_str("5,\"Miami, FL\",340000,350000,360000\n");
        secondary.push_str("5,\"Miami, FL\",300000,0,310000\n");

        let (p, s, dates) = tables(&primary, &secondary);
        let (points, diag) = align_series(&p, &s, &dates);

        let miami = region_series(&points, "Miami, FL");
        let miami_dates: Vec<&str> = miami.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(miami_dates, vec!["2024-09-30", "2024-11-30"]);
        assert_eq!(points.len(), 5 * 3 + 2);
        assert_eq!(
            diag.skips,
            vec![SkipReason::InvalidValue {
                row: 5,
                region: "Miami, FL".into(),
                column: "2024-10-31".into()
            }]
        );
    }

    #[test]
    fn never_emits_non_positive_or_textual_values() {
        let (p, s, dates) = tables(
            "RegionName,2024-01-31,2024-02-29,2024-03-31,2024-04-30\nBoise,-1,NaN,,5\n",
            "RegionName,2024-01-31,2024-02-29,2024-03-31,2024-04-30\nBoise,4,4,4,inf\n",
        );
        let (points, diag) = align_series(&p, &s, &dates);
        assert!(points.is_empty());
        assert_eq!(diag.skips.len(), 4);
        assert!(points.iter().all(|p| p.primary > 0.0 && p.secondary.is_finite()));
    }

    #[test]
    fn rows_without_region_or_partner_are_skipped() {
        let (p, s, dates) = tables(
            "RegionName,2024-01-31\n,10\nBoise,20\nReno,30\n",
            "RegionName,2024-01-31\nX,1\nBoise,2\n",
        );
        let (points, diag) = align_series(&p, &s, &dates);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].region, "Boise");
        assert!(diag.skips.contains(&SkipReason::MissingRegion { row: 0 }));
        assert!(diag.skips.contains(&SkipReason::MissingSecondaryRow { row: 2 }));
    }

    #[test]
    fn mismatched_row_order_is_flagged_but_paired() {
        let (p, s, dates) = tables(
            "RegionName,2024-01-31\nBoise,20\n",
            "RegionName,2024-01-31\nReno,2\n",
        );
        let (points, diag) = align_series(&p, &s, &dates);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].secondary, 2.0);
        assert_eq!(
            diag.count(|s| matches!(s, SkipReason::RegionMismatch { .. })),
            1
        );
    }

    #[test]
    fn axis_and_regions_are_sorted_and_distinct() {
        let (p, s, dates) = tables(
            "RegionName,2024-02-29,2024-01-31\nReno,1,2\nBoise,3,4\n",
            "RegionName,2024-02-29,2024-01-31\nReno,1,2\nBoise,3,4\n",
        );
        let (points, _) = align_series(&p, &s, &dates);
        assert_eq!(date_axis(&points), vec!["2024-01-31", "2024-02-29"]);
        assert_eq!(regions(&points), vec!["Boise", "Reno"]);
    }
}
