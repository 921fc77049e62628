//! Display helpers for token amounts.
//!
//! Threshold comparisons never go through these; they work on `U256`.
//! Floats only appear once a message is being rendered.

use alloy_primitives::U256;

/// Exact decimal string of `amount / 10^decimals`, e.g. `"1.5"`.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (int, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{int}.{frac}")
    }
}

/// `amount / 10^decimals` as a float, for display.
pub fn normalize(amount: U256, decimals: u8) -> f64 {
    format_units(amount, decimals).parse().unwrap_or(f64::NAN)
}

pub fn round_to(num: f64, dec: i32) -> f64 {
    let pow = 10f64.powi(dec);
    ((num + f64::EPSILON) * pow).round() / pow
}

/// Short human form: `1.23K`, `4.5M`, `2B`, `0.1234`, `1e-7`.
pub fn friendly(num: f64) -> String {
    if num == 0.0 {
        "0".into()
    } else if num > 1e9 {
        format!("{}B", round_to(num / 1e9, 2))
    } else if num > 1e6 {
        format!("{}M", round_to(num / 1e6, 2))
    } else if num > 1e3 {
        format!("{}K", round_to(num / 1e3, 2))
    } else if num < 1e-3 {
        format!("{num:e}")
    } else {
        round_to(num, 4).to_string()
    }
}
