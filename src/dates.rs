// Month column discovery.
use crate::config::is_reserved_column;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date column pattern"));

pub fn is_date_column(name: &str) -> bool {
    DATE_COLUMN.is_match(name) && !is_reserved_column(name)
}

/// Year and month digits of a date-shaped column name. Only the shape is
/// checked, so `2023-02-29` is still February 2023.
pub fn year_month(column: &str) -> Option<(i32, u32)> {
    if !is_date_column(column) {
        return None;
    }
    Some((column[0..4].parse().ok()?, column[5..7].parse().ok()?))
}

/// Header names shaped `YYYY-MM-DD`, ascending. For this fixed shape the
/// lexicographic order is also the chronological one. An empty result means
/// the table cannot be analysed at all.
pub fn resolve_date_columns(headers: &[String]) -> Vec<String> {
    let mut cols: Vec<String> = headers
        .iter()
        .filter(|h| is_date_column(h))
        .cloned()
        .collect();
    cols.sort();
    cols.dedup();
    cols
}

/// The column for the same calendar month one year before `current`.
pub fn year_ago_column<'a>(columns: &'a [String], current: &str) -> Option<&'a String> {
    let (year, month) = year_month(current)?;
    columns
        .iter()
        .find(|c| year_month(c) == Some((year - 1, month)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn picks_date_columns_sorted() {
        let h = headers(&[
            "RegionID", "RegionName", "RegionType", "StateName", "SizeRank",
            "2024-11-30", "2000-01-31", "2023-11-30",
        ]);
        assert_eq!(
            resolve_date_columns(&h),
            vec!["2000-01-31", "2023-11-30", "2024-11-30"]
        );
    }

    #[test]
    fn rejects_near_misses() {
        let h = headers(&["2024-1-31", "2024/01/31", " 2024-01-31x", "202-01-31", "Date"]);
        assert!(resolve_date_columns(&h).is_empty());
    }

    #[test]
    fn finds_same_month_last_year() {
        let cols = headers(&["2023-10-31", "2023-11-30", "2024-10-31", "2024-11-30"]);
        assert_eq!(year_ago_column(&cols, "2024-11-30").map(String::as_str), Some("2023-11-30"));
    }

    #[test]
    fn year_month_reads_digits_of_the_name() {
        assert_eq!(year_month("2024-11-30"), Some((2024, 11)));
        assert_eq!(year_month("2023-02-29"), Some((2023, 2)));
        assert_eq!(year_month("RegionName"), None);
    }

    #[test]
    fn non_calendar_day_still_matches_year_ago() {
        let cols = headers(&["2023-02-29", "2024-02-29"]);
        assert_eq!(year_ago_column(&cols, "2024-02-29").map(String::as_str), Some("2023-02-29"));
    }

    #[test]
    fn missing_year_ago_is_none() {
        let cols = headers(&["2024-01-31", "2024-11-30"]);
        assert_eq!(year_ago_column(&cols, "2024-11-30"), None);
    }
}
