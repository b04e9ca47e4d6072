//! End-to-end run over one pair of exports: decode, find month columns,
//! align, rank.
use crate::align::{align_series, date_axis, regions};
use crate::cache::TableCache;
use crate::config::RankConfig;
use crate::dates::resolve_date_columns;
use crate::loader::LoadReport;
use crate::reports::{rank_both, RankOutcome, Rankings};
use crate::types::{AlignedPoint, Diagnostics, SummaryStats};
use chrono::Utc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// The all-homes export decoded to no rows.
    NoData,
    /// Rows exist but no header looks like a month.
    NoDateColumns,
    Ready,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub status: AnalysisStatus,
    pub date_columns: Vec<String>,
    pub points: Vec<AlignedPoint>,
    pub rankings: Rankings,
    pub primary_load: LoadReport,
    pub secondary_load: LoadReport,
    /// Alignment and ranking skips; load drops live in the load reports.
    pub diagnostics: Diagnostics,
}

impl Analysis {
    fn empty(status: AnalysisStatus, primary_load: LoadReport, secondary_load: LoadReport) -> Self {
        let outcome = match status {
            AnalysisStatus::NoData => RankOutcome::NoData,
            _ => RankOutcome::InsufficientDateRange,
        };
        Self {
            status,
            date_columns: Vec::new(),
            points: Vec::new(),
            rankings: Rankings {
                increase: outcome.clone(),
                decrease: outcome,
            },
            primary_load,
            secondary_load,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn regions(&self) -> Vec<String> {
        regions(&self.points)
    }

    pub fn date_axis(&self) -> Vec<String> {
        date_axis(&self.points)
    }

    pub fn summary(&self) -> SummaryStats {
        let (current, prior_year) = match &self.rankings.increase {
            RankOutcome::Ranked { current, prior_year, .. } => {
                (Some(current.clone()), Some(prior_year.clone()))
            }
            RankOutcome::NoYearAgoComparison { current } => (Some(current.clone()), None),
            RankOutcome::NoData | RankOutcome::InsufficientDateRange => (None, None),
        };
        SummaryStats {
            total_regions: self.regions().len(),
            date_columns: self.date_columns.len(),
            first_date: self.date_columns.first().cloned(),
            last_date: self.date_columns.last().cloned(),
            aligned_points: self.points.len(),
            dropped_rows_all_homes: self.primary_load.diagnostics.dropped_rows,
            dropped_rows_sfr_only: self.secondary_load.diagnostics.dropped_rows,
            current_column: current,
            prior_year_column: prior_year,
            status: format!("{:?}", self.status),
            generated_at: Utc::now(),
        }
    }
}

/// Run the whole pipeline. Month columns come from the primary table and
/// rankings are computed on it alone; the secondary table only feeds the
/// aligned series.
pub fn analyze(
    primary_blob: &str,
    secondary_blob: &str,
    cache: &mut TableCache,
    cfg: &RankConfig,
) -> Analysis {
    let primary = cache.decode(primary_blob);
    let secondary = cache.decode(secondary_blob);

    if primary.table.is_empty() {
        warn!("all-homes export has no data rows");
        return Analysis::empty(AnalysisStatus::NoData, primary.report, secondary.report);
    }
    let date_columns = resolve_date_columns(&primary.table.headers);
    if date_columns.is_empty() {
        warn!(columns = primary.table.headers.len(), "no month columns found");
        return Analysis::empty(AnalysisStatus::NoDateColumns, primary.report, secondary.report);
    }

    let (points, mut diagnostics) = align_series(&primary.table, &secondary.table, &date_columns);
    let (rankings, rank_diag) = rank_both(&primary.table, &date_columns, cfg);
    diagnostics.extend(rank_diag);

    info!(
        rows = primary.table.len(),
        months = date_columns.len(),
        points = points.len(),
        gainers = rankings.increase.entries().len(),
        decliners = rankings.decrease.entries().len(),
        "analysis complete"
    );

    Analysis {
        status: AnalysisStatus::Ready,
        date_columns,
        points,
        rankings,
        primary_load: primary.report,
        secondary_load: secondary.report,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &str = "RegionID,RegionName,RegionType,StateName,SizeRank,\
        2023-11-30,2024-10-31,2024-11-30\n\
        102001,United States,country,,0,300000,310000,320000\n\
        1,\"Austin, TX\",msa,TX,1,400000,385000,380000\n\
        2,\"Boise, ID\",msa,ID,2,300000,320000,330000\n";
    const SFR: &str = "RegionID,RegionName,RegionType,StateName,SizeRank,\
        2023-11-30,2024-10-31,2024-11-30\n\
        102001,United States,country,,0,310000,320000,330000\n\
        1,\"Austin, TX\",msa,TX,1,410000,395000,390000\n\
        2,\"Boise, ID\",msa,ID,2,310000,330000,0\n";

    #[test]
    fn produces_series_and_rankings() {
        let mut cache = TableCache::new();
        let a = analyze(ALL, SFR, &mut cache, &RankConfig::default());
        assert_eq!(a.status, AnalysisStatus::Ready);
        assert_eq!(a.date_columns.len(), 3);
        assert_eq!(a.points.len(), 8);
        assert_eq!(a.rankings.increase.entries()[0].region, "Boise, ID");
        assert_eq!(a.rankings.decrease.entries()[0].region, "Austin, TX");
        assert_eq!(a.regions(), vec!["Austin, TX", "Boise, ID", "United States"]);

        let s = a.summary();
        assert_eq!(s.current_column.as_deref(), Some("2024-11-30"));
        assert_eq!(s.prior_year_column.as_deref(), Some("2023-11-30"));
        assert_eq!(s.status, "Ready");
    }

    #[test]
    fn empty_primary_is_no_data() {
        let mut cache = TableCache::new();
        let a = analyze("", SFR, &mut cache, &RankConfig::default());
        assert_eq!(a.status, AnalysisStatus::NoData);
        assert!(a.points.is_empty());
        assert_eq!(a.rankings.increase, RankOutcome::NoData);
        assert_eq!(a.rankings.decrease, RankOutcome::NoData);
    }

    #[test]
    fn missing_month_columns_are_reported_distinctly() {
        let mut cache = TableCache::new();
        let blob = "RegionID,RegionName\n1,Boise\n";
        let a = analyze(blob, blob, &mut cache, &RankConfig::default());
        assert_eq!(a.status, AnalysisStatus::NoDateColumns);
        assert_eq!(a.rankings.increase, RankOutcome::InsufficientDateRange);
    }

    #[test]
    fn repeated_runs_reuse_decoded_tables() {
        let mut cache = TableCache::new();
        analyze(ALL, SFR, &mut cache, &RankConfig::default());
        analyze(ALL, SFR, &mut cache, &RankConfig::default());
        assert_eq!(cache.cached_tables(), 2);
    }
}
