//! Homeowner vs renter affordability gap at the latest month.
//!
//! Unlike the price series, the two affordability exports are joined by
//! `RegionName`, so a renter row in a different position still matches.
use crate::config::REGION_NAME;
use crate::dates::resolve_date_columns;
use crate::types::{AffordabilityGap, AffordabilityRow, DecodedTable, Diagnostics, SkipReason};
use crate::util::{format_number, parse_positive};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AffordabilityReport {
    /// Month the gaps were read from; `None` when the homeowner table has
    /// no month columns.
    pub latest: Option<String>,
    /// Valid gaps largest first, then regions whose homeowner value was
    /// unusable.
    pub gaps: Vec<AffordabilityGap>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AffordabilitySummary {
    pub least_affordable: Vec<AffordabilityGap>,
    pub most_affordable: Vec<AffordabilityGap>,
}

/// Gap per region at the homeowner table's latest month.
///
/// A region is skipped when the renter table has no row for it or its
/// renter value is missing or non-positive. A bad homeowner value keeps the
/// region with `gap: None`.
pub fn affordability_gaps(
    homeowner: &DecodedTable,
    renter: &DecodedTable,
) -> (AffordabilityReport, Diagnostics) {
    let mut diag = Diagnostics::default();
    let Some(latest) = resolve_date_columns(&homeowner.headers).pop() else {
        return (AffordabilityReport::default(), diag);
    };

    let mut renter_by_region = HashMap::new();
    for rec in &renter.records {
        if let Some(region) = rec.get(REGION_NAME).map(str::trim) {
            renter_by_region.entry(region).or_insert(rec);
        }
    }

    let mut valid = Vec::new();
    let mut partial = Vec::new();
    for (row, rec) in homeowner.records.iter().enumerate() {
        let region = match rec.get(REGION_NAME).map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => {
                diag.record(SkipReason::MissingRegion { row });
                continue;
            }
        };
        let Some(renter_rec) = renter_by_region.get(region) else {
            diag.record(SkipReason::MissingCounterpart { region: region.to_string() });
            continue;
        };
        let Some(renter_value) = parse_positive(renter_rec.get(&latest)) else {
            diag.record(SkipReason::InvalidValue {
                row,
                region: region.to_string(),
                column: latest.clone(),
            });
            continue;
        };
        let homeowner_value = parse_positive(rec.get(&latest));
        let entry = AffordabilityGap {
            region: region.to_string(),
            homeowner: homeowner_value,
            renter: renter_value,
            gap: homeowner_value.map(|h| h - renter_value),
        };
        if entry.gap.is_some() {
            valid.push(entry);
        } else {
            partial.push(entry);
        }
    }

    valid.sort_by(|a, b| b.gap.partial_cmp(&a.gap).unwrap_or(Ordering::Equal));
    debug!(latest = %latest, valid = valid.len(), partial = partial.len(), "affordability gaps");
    valid.extend(partial);
    (
        AffordabilityReport {
            latest: Some(latest),
            gaps: valid,
        },
        diag,
    )
}

/// Least affordable: the first `n` of the sorted report, partial entries
/// included when fewer than `n` are valid. Most affordable: the `n` smallest
/// valid gaps, smallest first.
pub fn affordability_summary(report: &AffordabilityReport, n: usize) -> AffordabilitySummary {
    let least_affordable = report.gaps.iter().take(n).cloned().collect();
    let most_affordable = report
        .gaps
        .iter()
        .filter(|g| g.gap.is_some())
        .rev()
        .take(n)
        .cloned()
        .collect();
    AffordabilitySummary {
        least_affordable,
        most_affordable,
    }
}

pub fn affordability_rows(gaps: &[AffordabilityGap]) -> Vec<AffordabilityRow> {
    let na = || "n/a".to_string();
    gaps.iter()
        .enumerate()
        .map(|(idx, g)| AffordabilityRow {
            rank: idx + 1,
            region: g.region.clone(),
            homeowner: g.homeowner.map(|v| format_number(v, 2)).unwrap_or_else(na),
            renter: format_number(g.renter, 2),
            gap: g.gap.map(|v| format_number(v, 2)).unwrap_or_else(na),
        })
        .collect()
}
