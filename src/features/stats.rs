//! Order statistics and regression helpers
//!
//! All helpers return NaN (the crate-wide "undefined" marker) when the input
//! carries too little data, rather than erroring: noisy estimator output is
//! the expected case.

/// Median of a set of values.
///
/// Sorts a copy defensively; callers are not required to pass sorted data.
/// An even count averages the two middle values, an odd count takes the
/// middle value. Empty input yields NaN.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Percentile with linear interpolation between order statistics.
///
/// `pct` is in [0, 100]. Empty input yields NaN.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Sample standard deviation (n - 1 denominator).
///
/// Fewer than two values yields 0.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

/// Ordinary least-squares slope of `y` against `x`.
///
/// A degenerate fit (zero variance in `x`, or mismatched/empty input)
/// reports slope 0.
pub fn ols_slope(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n == 0 || n != y.len() {
        return 0.0;
    }
    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var = 0.0;
    for i in 0..n {
        let dx = x[i] - x_mean;
        cov += dx * (y[i] - y_mean);
        var += dx * dx;
    }
    if var <= 0.0 {
        return 0.0;
    }
    cov / var
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_count() {
        assert_eq!(median(&[100.0, 110.0, 120.0]), 110.0);
        // Unsorted input sorts defensively
        assert_eq!(median(&[120.0, 100.0, 110.0]), 110.0);
    }

    #[test]
    fn test_median_even_count() {
        assert_eq!(median(&[100.0, 110.0]), 105.0);
        assert_eq!(median(&[110.0, 100.0, 130.0, 120.0]), 115.0);
    }

    #[test]
    fn test_median_empty_is_undefined() {
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&values, 0.0), 10.0);
        assert_eq!(percentile(&values, 100.0), 50.0);
        assert_eq!(percentile(&values, 50.0), 30.0);
        // Rank 0.2 between the first two order statistics
        assert!((percentile(&values, 5.0) - 12.0).abs() < 1e-12);
        assert!((percentile(&values, 95.0) - 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std() {
        assert_eq!(sample_std(&[5.0]), 0.0);
        assert_eq!(sample_std(&[]), 0.0);
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] is 32/7 with n-1
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((sample_std(&values) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_ols_slope() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        assert!((ols_slope(&x, &y) - 2.0).abs() < 1e-12);

        // Constant x is degenerate
        assert_eq!(ols_slope(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    }
}
