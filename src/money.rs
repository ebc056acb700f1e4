//! Currency helpers. Every rounding to cents in the crate goes through
//! here, so drift from repeated additions can only surface at the
//! documented boundaries.

/// Residual balance below this is considered settled during planning,
/// and a candidate transfer within this of a planned amount matches.
pub const SETTLE_EPSILON: f64 = 0.01;

/// Round to two decimal places, half away from zero.
pub fn round_currency(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Format an amount the way slip records carry it.
pub fn format_amount(n: f64) -> String {
    format!("{:.2}", n)
}
