use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tabled::Tabled;
use tracing::debug;

/// One source row: column name -> raw cell text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// Build from the header and an equally long list of values. Duplicate
    /// header names resolve to the later column.
    pub fn from_fields(headers: &[String], values: Vec<String>) -> Self {
        let fields = headers.iter().cloned().zip(values).collect();
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Header plus every row whose field count matched it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl DecodedTable {
    /// An empty table means "no data", never an error.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedPoint {
    pub date: String,
    pub region: String,
    pub primary: f64,
    pub secondary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionChange {
    pub region: String,
    pub change_percent: f64,
    pub current_value: f64,
    pub prior_year_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDirection {
    Increase,
    Decrease,
}

/// Why a row, cell or candidate was left out of a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum SkipReason {
    FieldCountMismatch { line: usize, expected: usize, found: usize },
    MissingRegion { row: usize },
    MissingSecondaryRow { row: usize },
    RegionMismatch { row: usize, primary: String, secondary: String },
    InvalidValue { row: usize, region: String, column: String },
    AggregateRegion { row: usize },
    NegligibleChange { region: String, change_percent: f64 },
    MissingCounterpart { region: String },
}

/// Data-quality signals gathered while skipping bad input.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Diagnostics {
    pub dropped_rows: usize,
    pub skips: Vec<SkipReason>,
}

impl Diagnostics {
    pub fn record(&mut self, reason: SkipReason) {
        debug!(?reason, "skipped");
        if matches!(reason, SkipReason::FieldCountMismatch { .. }) {
            self.dropped_rows += 1;
        }
        self.skips.push(reason);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.dropped_rows += other.dropped_rows;
        self.skips.extend(other.skips);
    }

    pub fn is_clean(&self) -> bool {
        self.skips.is_empty()
    }

    pub fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&SkipReason) -> bool,
    {
        self.skips.iter().filter(|s| pred(s)).count()
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "ChangePct")]
    #[tabled(rename = "ChangePct")]
    pub change_pct: String,
    #[serde(rename = "Current")]
    #[tabled(rename = "Current")]
    pub current: String,
    #[serde(rename = "PriorYear")]
    #[tabled(rename = "PriorYear")]
    pub prior_year: String,
}

/// Homeowner minus renter affordability for one region at the latest month.
/// `gap` is `None` when the homeowner value is unusable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffordabilityGap {
    pub region: String,
    pub homeowner: Option<f64>,
    pub renter: f64,
    pub gap: Option<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AffordabilityRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "Homeowner")]
    #[tabled(rename = "Homeowner")]
    pub homeowner: String,
    #[serde(rename = "Renter")]
    #[tabled(rename = "Renter")]
    pub renter: String,
    #[serde(rename = "Gap")]
    #[tabled(rename = "Gap")]
    pub gap: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SeriesRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "AllHomes")]
    #[tabled(rename = "AllHomes")]
    pub all_homes: String,
    #[serde(rename = "SfrOnly")]
    #[tabled(rename = "SfrOnly")]
    pub sfr_only: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_regions: usize,
    pub date_columns: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub aligned_points: usize,
    pub dropped_rows_all_homes: usize,
    pub dropped_rows_sfr_only: usize,
    pub current_column: Option<String>,
    pub prior_year_column: Option<String>,
    pub status: String,
    pub generated_at: DateTime<Utc>,
}
