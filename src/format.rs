//! Numeric display policy for aggregate results.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};

/// Rounds the shortest decimal form of `value`, so `1.005` becomes `1.01`
fn to_hundredths(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Rounds to two decimal places, halves away from zero
pub fn round_hundredths(value: f64) -> f64 {
    to_hundredths(value)
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| (value * 100.0).round() / 100.0)
}

/// Renders a sum: two decimals at most, no trailing zeros, no trailing point.
///
/// ```
/// use json_proc::format::format_sum;
///
/// assert_eq!(format_sum(12.5), "12.5");
/// assert_eq!(format_sum(3.0), "3");
/// assert_eq!(format_sum(0.333), "0.33");
/// ```
pub fn format_sum(value: f64) -> String {
    match to_hundredths(value) {
        Some(d) if d.is_zero() => "0".to_string(),
        Some(d) => d.normalize().to_string(),
        // Out of Decimal's range; fall back to plain float text.
        None => {
            let text = format!("{:.2}", value);
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}
