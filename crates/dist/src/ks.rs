//! Kolmogorov-Smirnov goodness-of-fit machinery.

/// Two-sided KS statistic of a sorted sample against a candidate CDF.
///
/// `D = max_i max(|F(x_i) - i/n|, |F(x_i) - (i-1)/n|)` over the sorted
/// sample, the usual one-sample supremum over both step edges.
pub(crate) fn ks_statistic<F>(sorted: &[f64], cdf: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = sorted.len() as f64;
    let mut d = 0.0f64;
    for (i, &x) in sorted.iter().enumerate() {
        let f = cdf(x);
        let upper = ((i + 1) as f64 / n - f).abs();
        let lower = (f - i as f64 / n).abs();
        d = d.max(upper).max(lower);
    }
    d
}

/// Asymptotic two-sided p-value for a KS statistic `d` on `n` samples.
///
/// Uses the Stephens small-sample correction
/// `lambda = (sqrt(n) + 0.12 + 0.11 / sqrt(n)) * d` before evaluating the
/// Kolmogorov series `p = 2 * sum_{j>=1} (-1)^(j-1) exp(-2 j^2 lambda^2)`.
pub(crate) fn ks_pvalue(d: f64, n: usize) -> f64 {
    if n == 0 || !d.is_finite() {
        return f64::NAN;
    }
    if d <= 0.0 {
        return 1.0;
    }
    let sqrt_n = (n as f64).sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;
    let mut p = 0.0f64;
    let mut sign = 1.0f64;
    for j in 1..=100 {
        let term = (-2.0 * (j as f64) * (j as f64) * lambda * lambda).exp();
        p += sign * term;
        sign = -sign;
        if term < 1e-12 {
            break;
        }
    }
    (2.0 * p).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn statistic_against_uniform() {
        // Sample equal to its own plotting grid: D = 1/(2n) shifted edges.
        let sorted: Vec<f64> = (1..=10).map(|i| i as f64 / 10.0).collect();
        let d = ks_statistic(&sorted, |x| x.clamp(0.0, 1.0));
        assert_relative_eq!(d, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn pvalue_edges() {
        assert_relative_eq!(ks_pvalue(0.0, 50), 1.0);
        assert!(ks_pvalue(0.9, 50) < 1e-6);
        assert!(ks_pvalue(f64::NAN, 50).is_nan());
    }

    #[test]
    fn pvalue_reference_point() {
        // lambda = (sqrt(100) + 0.12 + 0.011) * 0.1 = 1.0131;
        // 2 * (e^(-2 lambda^2) - e^(-8 lambda^2) + ...) ~= 0.2557.
        let p = ks_pvalue(0.1, 100);
        assert_relative_eq!(p, 0.2557, epsilon = 2e-3);
    }

    #[test]
    fn pvalue_decreases_with_statistic() {
        let mut prev = 1.0;
        for i in 1..10 {
            let p = ks_pvalue(i as f64 * 0.05, 80);
            assert!(p <= prev);
            prev = p;
        }
    }
}
