// Utility helpers for cell parsing and number formatting.
//
// Export cells are forgiving about thousands separators and whitespace but
// anything textual ("NaN", "inf", "n/a") is rejected outright.
use num_format::{Locale, ToFormattedString};

/// Parse a raw cell into `f64`.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

/// A price cell is usable only when finite and strictly positive.
pub fn parse_positive(s: Option<&str>) -> Option<f64> {
    parse_f64_safe(s).filter(|v| v.is_finite() && *v > 0.0)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus en-locale thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
