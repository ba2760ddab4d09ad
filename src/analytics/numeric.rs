//! Guarded arithmetic
//!
//! Every division and percentage in the analytics core goes through these
//! helpers. They never panic and never return NaN or infinity: degenerate
//! input resolves to the caller-supplied default instead.

/// Coerce a possibly missing or non-finite value to a finite number
///
/// A non-finite `default` is itself replaced by zero, so the result is
/// always finite.
///
/// # Examples
/// ```
/// use finsight::analytics::numeric::safe_number;
/// assert_eq!(safe_number(f64::NAN, 5.0), 5.0);
/// assert_eq!(safe_number(None, 1.0), 1.0);
/// assert_eq!(safe_number(3.5, 0.0), 3.5);
/// ```
pub fn safe_number(value: impl Into<Option<f64>>, default: f64) -> f64 {
    let default = if default.is_finite() { default } else { 0.0 };
    match value.into() {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Divide, returning `default` for a zero denominator or a non-finite quotient
pub fn safe_division(numerator: f64, denominator: f64, default: f64) -> f64 {
    let numerator = safe_number(numerator, 0.0);
    let denominator = safe_number(denominator, 0.0);

    if denominator == 0.0 {
        return safe_number(default, 0.0);
    }

    safe_number(numerator / denominator, default)
}

/// Percentage change from `previous` to `current`
///
/// With a zero baseline any positive value counts as a 100% increase;
/// anything else yields `default`.
pub fn safe_percentage(current: f64, previous: f64, default: f64) -> f64 {
    let current = safe_number(current, 0.0);
    let previous = safe_number(previous, 0.0);

    if previous == 0.0 {
        return if current > 0.0 {
            100.0
        } else {
            safe_number(default, 0.0)
        };
    }

    safe_number((current - previous) / previous * 100.0, default)
}

/// Sum of the finite entries
pub fn safe_sum(values: &[f64]) -> f64 {
    safe_number(
        values.iter().copied().filter(|v| v.is_finite()).sum::<f64>(),
        0.0,
    )
}

/// Arithmetic mean of the finite entries, zero when there are none
pub fn safe_mean(values: &[f64]) -> f64 {
    let count = values.iter().filter(|v| v.is_finite()).count();
    safe_division(safe_sum(values), count as f64, 0.0)
}

/// Clamp into `[min, max]` after coercing non-finite values to `min`
pub fn safe_clamp(value: f64, min: f64, max: f64) -> f64 {
    safe_number(value, min).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AWKWARD: [f64; 8] = [
        0.0,
        -0.0,
        1.0,
        -1.0,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::MAX,
    ];

    #[test]
    fn test_safe_number_coerces() {
        assert_eq!(safe_number(f64::NAN, 7.0), 7.0);
        assert_eq!(safe_number(f64::INFINITY, 7.0), 7.0);
        assert_eq!(safe_number(None, 2.0), 2.0);
        assert_eq!(safe_number(Some(4.5), 2.0), 4.5);
        assert_eq!(safe_number(f64::NAN, f64::NAN), 0.0);
    }

    #[test]
    fn test_safe_division_by_zero_returns_default() {
        for x in AWKWARD {
            assert_eq!(safe_division(x, 0.0, 42.0), 42.0);
            assert_eq!(safe_division(x, 0.0, -3.0), -3.0);
        }
        assert_eq!(safe_division(10.0, 4.0, 0.0), 2.5);
    }

    #[test]
    fn test_helpers_never_return_non_finite() {
        for a in AWKWARD {
            for b in AWKWARD {
                for d in AWKWARD {
                    assert!(safe_division(a, b, d).is_finite(), "div {a} {b} {d}");
                    assert!(safe_percentage(a, b, d).is_finite(), "pct {a} {b} {d}");
                    assert!(safe_number(a, d).is_finite());
                }
            }
        }
    }

    #[test]
    fn test_safe_division_overflow_falls_back() {
        // MAX / tiny overflows to infinity
        assert_eq!(safe_division(f64::MAX, 1e-300, 9.0), 9.0);
    }

    #[test]
    fn test_safe_percentage() {
        assert_eq!(safe_percentage(150.0, 100.0, 0.0), 50.0);
        assert_eq!(safe_percentage(50.0, 100.0, 0.0), -50.0);
        assert_eq!(safe_percentage(10.0, 0.0, 0.0), 100.0);
        assert_eq!(safe_percentage(0.0, 0.0, 5.0), 5.0);
        assert_eq!(safe_percentage(-10.0, 0.0, 5.0), 5.0);
    }

    #[test]
    fn test_safe_mean_and_sum() {
        assert_eq!(safe_mean(&[]), 0.0);
        assert_eq!(safe_mean(&[2.0, 4.0, f64::NAN]), 3.0);
        assert_eq!(safe_sum(&[1.0, f64::INFINITY, 2.0]), 3.0);
    }

    #[test]
    fn test_safe_clamp() {
        assert_eq!(safe_clamp(120.0, 0.0, 100.0), 100.0);
        assert_eq!(safe_clamp(f64::NAN, 40.0, 95.0), 40.0);
    }
}
