//! Shared helpers for Decimal ↔ f64 conversions.
//!
//! Set weights and RPE values are stored as NUMERIC columns and surface in
//! the API as f64. One decimal place is enough for both (0.1 kg / 0.5 RPE
//! granularity is finer than anyone logs), and consistent rounding keeps
//! stored values stable across re-submits.
//!
//! All conversions return `Decimal::ZERO` for non-finite inputs (NaN, ±Inf).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Convert an f64 to Decimal, rounded to 1 decimal place.
pub(crate) fn f64_to_decimal_1dp(v: f64) -> Decimal {
    if !v.is_finite() {
        tracing::warn!(
            "f64_to_decimal_1dp received non-finite value {}, defaulting to 0",
            v
        );
        return Decimal::ZERO;
    }
    Decimal::from_str_exact(&format!("{:.1}", v)).unwrap_or_default()
}

/// Convert an optional f64 to Decimal (1 decimal place), returning None if input is None.
pub(crate) fn opt_f64_to_decimal_1dp(v: Option<f64>) -> Option<Decimal> {
    v.map(f64_to_decimal_1dp)
}

/// Convert a Decimal to f64, defaulting to 0.0 for values that can't be represented.
///
/// Replaces the repeated pattern `some_decimal.to_f64().unwrap_or(0.0)`.
pub(crate) fn dec_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Convert an Option<Decimal> to Option<f64>.
pub(crate) fn opt_dec_to_f64(d: Option<Decimal>) -> Option<f64> {
    d.and_then(|v| v.to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_f64_to_decimal_1dp_normal() {
        let d = f64_to_decimal_1dp(102.5);
        assert_eq!(d, Decimal::from_str("102.5").unwrap());
    }

    #[test]
    fn test_f64_to_decimal_1dp_rounds() {
        // 82.46 rounded to 1dp → 82.5
        let d = f64_to_decimal_1dp(82.46);
        assert_eq!(d, Decimal::from_str("82.5").unwrap());
    }

    #[test]
    fn test_f64_to_decimal_1dp_nan() {
        assert_eq!(f64_to_decimal_1dp(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn test_f64_to_decimal_1dp_infinity() {
        assert_eq!(f64_to_decimal_1dp(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_dec_to_f64_normal() {
        let d = Decimal::from_str("7.5").unwrap();
        assert!((dec_to_f64(d) - 7.5).abs() < 1e-10);
    }

    #[test]
    fn test_dec_to_f64_zero() {
        assert_eq!(dec_to_f64(Decimal::ZERO), 0.0);
    }

    #[test]
    fn test_opt_f64_to_decimal_1dp() {
        assert_eq!(opt_f64_to_decimal_1dp(None), None);
        assert_eq!(
            opt_f64_to_decimal_1dp(Some(8.5)),
            Some(Decimal::from_str("8.5").unwrap())
        );
    }

    #[test]
    fn test_opt_dec_to_f64() {
        assert_eq!(opt_dec_to_f64(None), None);
        let d = Decimal::from_str("60.25").unwrap();
        assert!((opt_dec_to_f64(Some(d)).unwrap() - 60.25).abs() < 1e-10);
    }
}
