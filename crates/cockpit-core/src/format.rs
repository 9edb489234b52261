//! Display conventions for currency, percentages and counts.
//!
//! Currency uses euro with K/M/B suffixes at the 1e3/1e6/1e9 thresholds:
//! - `>= 1e9` renders as `€X.XXB`
//! - `>= 1e6` renders as `€X.XM`
//! - `>= 1e3` renders as `€XK` (no decimals)
//! - otherwise `€X` (no decimals)
//!
//! Rounding is half away from zero. Non-finite values render as zero so a
//! degenerate upstream figure never reaches output as `NaN`.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Render `value` with exactly `dp` decimals.
fn fixed(value: f64, dp: u32) -> String {
    if !value.is_finite() {
        return format!("{:.*}", dp as usize, 0.0);
    }
    match Decimal::from_f64(value) {
        Some(d) => {
            let r = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", dp as usize, r)
        }
        // Out of Decimal range; f64 formatting is close enough at this scale.
        None => format!("{:.*}", dp as usize, value),
    }
}

/// Format a euro amount.
///
/// Example:
/// assert_eq!(format_currency(2_300_000.0), "€2.3M");
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "€0".to_string();
    }
    if value >= 1e9 {
        format!("€{}B", fixed(value / 1e9, 2))
    } else if value >= 1e6 {
        format!("€{}M", fixed(value / 1e6, 1))
    } else if value >= 1e3 {
        format!("€{}K", fixed(value / 1e3, 0))
    } else {
        format!("€{}", fixed(value, 0))
    }
}

/// Format a percentage with a fixed number of decimals, e.g. `91.3%`.
pub fn format_percent(value: f64, decimals: u32) -> String {
    format!("{}%", fixed(value, decimals))
}

/// Format a percentage delta with an explicit sign, e.g. `+25%` or `-5%`.
pub fn format_signed_percent(value: f64, decimals: u32) -> String {
    let body = fixed(value, decimals);
    if value >= 0.0 && value.is_finite() {
        format!("+{body}%")
    } else {
        format!("{body}%")
    }
}

/// Group an integer string's digits in thousands.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a number with thousands separators and at most three decimals,
/// trailing zeros trimmed (`9350` -> `9,350`, `1234.5` -> `1,234.5`).
pub fn format_number(value: f64) -> String {
    let text = fixed(value, 3);
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let frac = frac_part.trim_end_matches('0');
    let grouped = group_thousands(int_part);
    let sign = if grouped == "0" && frac.is_empty() {
        ""
    } else {
        sign
    };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}
