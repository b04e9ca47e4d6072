use crate::config::{RankConfig, REGION_NAME};
use crate::dates::year_ago_column;
use crate::types::{
    AlignedPoint, DecodedTable, Diagnostics, RankDirection, RankingRow, RegionChange, SeriesRow,
    SkipReason,
};
use crate::util::{format_number, parse_positive};
use std::cmp::Ordering;
use tracing::debug;

/// Result of a year-over-year ranking. The empty conditions are kept apart
/// so a consumer can explain which one happened.
#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome {
    Ranked {
        current: String,
        prior_year: String,
        entries: Vec<RegionChange>,
    },
    /// The source table had no rows to rank.
    NoData,
    InsufficientDateRange,
    NoYearAgoComparison { current: String },
}

impl RankOutcome {
    pub fn entries(&self) -> &[RegionChange] {
        match self {
            RankOutcome::Ranked { entries, .. } => entries,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rankings {
    pub increase: RankOutcome,
    pub decrease: RankOutcome,
}

/// Comparison columns plus every region that survived the filters, in
/// table order.
struct Candidates {
    current: String,
    prior_year: String,
    changes: Vec<RegionChange>,
}

fn collect_candidates(
    table: &DecodedTable,
    date_columns: &[String],
    cfg: &RankConfig,
    diag: &mut Diagnostics,
) -> Result<Candidates, RankOutcome> {
    let Some(current) = date_columns.last() else {
        return Err(RankOutcome::InsufficientDateRange);
    };
    let Some(prior_year) = year_ago_column(date_columns, current) else {
        return Err(RankOutcome::NoYearAgoComparison { current: current.clone() });
    };

    let mut changes = Vec::new();
    for (row, rec) in table.records.iter().enumerate() {
        let region = match rec.get(REGION_NAME).map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => {
                diag.record(SkipReason::MissingRegion { row });
                continue;
            }
        };
        if region == cfg.excluded_region {
            diag.record(SkipReason::AggregateRegion { row });
            continue;
        }
        let (cur, prior) = match (
            parse_positive(rec.get(current)),
            parse_positive(rec.get(prior_year)),
        ) {
            (Some(c), Some(p)) => (c, p),
            (None, _) => {
                diag.record(SkipReason::InvalidValue {
                    row,
                    region: region.to_string(),
                    column: current.clone(),
                });
                continue;
            }
            (_, None) => {
                diag.record(SkipReason::InvalidValue {
                    row,
                    region: region.to_string(),
                    column: prior_year.clone(),
                });
                continue;
            }
        };

        let change = (cur - prior) / prior * 100.0;
        if !change.is_finite() || change == 0.0 || change.abs() <= cfg.min_abs_change_pct {
            diag.record(SkipReason::NegligibleChange {
                region: region.to_string(),
                change_percent: change,
            });
            continue;
        }
        changes.push(RegionChange {
            region: region.to_string(),
            change_percent: change,
            current_value: cur,
            prior_year_value: prior,
        });
    }

    Ok(Candidates {
        current: current.clone(),
        prior_year: prior_year.clone(),
        changes,
    })
}

/// Each direction only lists changes of its own sign, so a falling market
/// never shows up among the gainers.
fn top_n(changes: Vec<RegionChange>, direction: RankDirection, n: usize) -> Vec<RegionChange> {
    let mut changes: Vec<RegionChange> = changes
        .into_iter()
        .filter(|c| match direction {
            RankDirection::Increase => c.change_percent > 0.0,
            RankDirection::Decrease => c.change_percent < 0.0,
        })
        .collect();
    changes.sort_by(|a, b| {
        let ord = a
            .change_percent
            .partial_cmp(&b.change_percent)
            .unwrap_or(Ordering::Equal);
        match direction {
            RankDirection::Increase => ord.reverse(),
            RankDirection::Decrease => ord,
        }
    });
    changes.truncate(n);
    changes
}

/// Rank regions by year-over-year change between the latest month and the
/// same month a year earlier. Returns at most `cfg.top_n` entries; never pads.
pub fn rank_changes(
    table: &DecodedTable,
    date_columns: &[String],
    direction: RankDirection,
    cfg: &RankConfig,
) -> (RankOutcome, Diagnostics) {
    let mut diag = Diagnostics::default();
    let outcome = match collect_candidates(table, date_columns, cfg, &mut diag) {
        Ok(c) => RankOutcome::Ranked {
            entries: top_n(c.changes, direction, cfg.top_n),
            current: c.current,
            prior_year: c.prior_year,
        },
        Err(empty) => empty,
    };
    (outcome, diag)
}

/// Both directions from a single pass over the table.
pub fn rank_both(
    table: &DecodedTable,
    date_columns: &[String],
    cfg: &RankConfig,
) -> (Rankings, Diagnostics) {
    let mut diag = Diagnostics::default();
    let rankings = match collect_candidates(table, date_columns, cfg, &mut diag) {
        Ok(c) => {
            debug!(
                current = %c.current,
                prior_year = %c.prior_year,
                candidates = c.changes.len(),
                "ranking year-over-year changes"
            );
            Rankings {
                increase: RankOutcome::Ranked {
                    current: c.current.clone(),
                    prior_year: c.prior_year.clone(),
                    entries: top_n(c.changes.clone(), RankDirection::Increase, cfg.top_n),
                },
                decrease: RankOutcome::Ranked {
                    current: c.current,
                    prior_year: c.prior_year,
                    entries: top_n(c.changes, RankDirection::Decrease, cfg.top_n),
                },
            }
        }
        Err(empty) => Rankings {
            increase: empty.clone(),
            decrease: empty,
        },
    };
    (rankings, diag)
}

pub fn ranking_rows(entries: &[RegionChange]) -> Vec<RankingRow> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, c)| RankingRow {
            rank: idx + 1,
            region: c.region.clone(),
            change_pct: format_number(c.change_percent, 2),
            current: format_number(c.current_value, 0),
            prior_year: format_number(c.prior_year_value, 0),
        })
        .collect()
}

pub fn series_rows(points: &[AlignedPoint]) -> Vec<SeriesRow> {
    points
        .iter()
        .map(|p| SeriesRow {
            date: p.date.clone(),
            region: p.region.clone(),
            all_homes: format_number(p.primary, 0),
            sfr_only: format_number(p.secondary, 0),
        })
        .collect()
}
