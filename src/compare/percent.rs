// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Percentage differences

/// Signed percentage change from `old` to `new`: `(new - old) / old * 100`.
///
/// Returns `0.0` when `old` is zero, when either operand is NaN or
/// infinite, and when the change itself overflows. Comparisons against empty or flat parts therefore read as "no change"
/// rather than infinity.
pub fn percent_diff(new: f64, old: f64) -> f64 {
    if old == 0.0 || !old.is_finite() || !new.is_finite() {
        return 0.0;
    }
    let change = (new - old) / old * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// [`percent_diff`] for counts
pub fn count_diff(new: usize, old: usize) -> f64 {
    percent_diff(new as f64, old as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_growth_and_shrinkage() {
        assert_eq!(percent_diff(2.0, 1.0), 100.0);
        assert_eq!(percent_diff(50.0, 100.0), -50.0);
        assert_relative_eq!(percent_diff(-3.0, -2.0), 50.0);
        assert_eq!(percent_diff(7.5, 7.5), 0.0);
    }

    #[test]
    fn test_degenerate_denominators() {
        assert_eq!(percent_diff(5.0, 0.0), 0.0);
        assert_eq!(percent_diff(5.0, -0.0), 0.0);
        assert_eq!(percent_diff(f64::NAN, 1.0), 0.0);
        assert_eq!(percent_diff(1.0, f64::NAN), 0.0);
        assert_eq!(percent_diff(f64::INFINITY, 1.0), 0.0);
        assert_eq!(percent_diff(1.0, f64::NEG_INFINITY), 0.0);
        assert_eq!(percent_diff(1e200, 1e-200), 0.0);
        assert_eq!(percent_diff(f64::MAX, -f64::MAX), 0.0);
    }

    #[test]
    fn test_counts() {
        assert_eq!(count_diff(2, 1), 100.0);
        assert_eq!(count_diff(0, 0), 0.0);
        assert_eq!(count_diff(3, 0), 0.0);
        assert_eq!(count_diff(0, 4), -100.0);
    }
}
