// Constants describing the source tables and the ranking knobs.

/// Column holding the region identifier used for alignment and ranking.
pub const REGION_NAME: &str = "RegionName";

/// Metadata columns that are never treated as months.
pub const RESERVED_COLUMNS: [&str; 5] =
    ["RegionID", "RegionName", "RegionType", "StateName", "SizeRank"];

/// National aggregate row, excluded from comparative rankings.
pub const AGGREGATE_REGION: &str = "United States";

pub const DEFAULT_TOP_N: usize = 10;

/// Changes at or below this many percentage points are treated as noise.
pub const MIN_ABS_CHANGE_PCT: f64 = 0.01;

pub const DEFAULT_ALL_HOMES_FILE: &str = "Metro_median_sale_price_uc_sfrcondo_sm_month.csv";
pub const DEFAULT_SFR_ONLY_FILE: &str = "Metro_median_sale_price_uc_sfr_sm_month.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct RankConfig {
    pub top_n: usize,
    pub min_abs_change_pct: f64,
    pub excluded_region: String,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_abs_change_pct: MIN_ABS_CHANGE_PCT,
            excluded_region: AGGREGATE_REGION.to_string(),
        }
    }
}

impl RankConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

pub fn is_reserved_column(name: &str) -> bool {
    RESERVED_COLUMNS.contains(&name)
}
