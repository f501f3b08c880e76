//! Fixed-precision number handling

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::prelude::ToPrimitive;

// Largest scale a Decimal can carry.
const MAX_ACCURACY: u32 = 28;

fn round_decimal(value: f64, accuracy: u32) -> Option<Decimal> {
    let accuracy = accuracy.min(MAX_ACCURACY);
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(accuracy, RoundingStrategy::MidpointAwayFromZero))
}

/// Formats `value` with exactly `accuracy` decimal places.
///
/// Ties round away from zero. Values a decimal cannot hold (NaN, infinities,
/// huge magnitudes) fall back to float formatting.
pub fn to_fixed(value: f64, accuracy: u32) -> String {
    match round_decimal(value, accuracy) {
        Some(mut d) => {
            d.rescale(accuracy.min(MAX_ACCURACY));
            d.to_string()
        }
        None => format!("{:.*}", accuracy as usize, value),
    }
}

/// Rounds `value` to `accuracy` decimal places.
pub fn round_to(value: f64, accuracy: u32) -> f64 {
    round_decimal(value, accuracy)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_pads_and_rounds() {
        assert_eq!(to_fixed(12.5, 2), "12.50");
        assert_eq!(to_fixed(3.0, 0), "3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(-2.345, 1), "-2.3");
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
    }

    #[test]
    fn test_round_to_removes_float_noise() {
        assert_eq!(round_to(0.1 + 0.2, 2), 0.3);
        assert_eq!(round_to(10.004, 2), 10.0);
    }
}
