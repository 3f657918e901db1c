//! Drift Statistics
//!
//! The statistical machinery behind the per-feature drift tests: the
//! two-sample Kolmogorov-Smirnov test for numerical features, the chi-square
//! test of independence for categorical frequency tables, and the survival
//! functions both rely on. Callers validate inputs; the functions here assume
//! non-empty samples and well-formed tables.

/// Two-sample Kolmogorov-Smirnov test.
///
/// Returns `(statistic, p_value)` under the null hypothesis that both samples
/// come from the same continuous distribution. The p-value is the asymptotic
/// two-sided approximation, evaluated at `D * sqrt(n1*n2/(n1+n2))`.
pub fn ks_2samp(reference: &[f64], production: &[f64]) -> (f64, f64) {
    let mut x: Vec<f64> = reference.to_vec();
    let mut y: Vec<f64> = production.to_vec();
    x.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    y.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n1 = x.len();
    let n2 = y.len();
    let mut i = 0;
    let mut j = 0;
    let mut statistic = 0.0_f64;
    // Walk the merged order of both samples, evaluating the empirical CDF
    // difference after each distinct value.
    while i < n1 && j < n2 {
        let value = x[i].min(y[j]);
        while i < n1 && x[i] <= value {
            i += 1;
        }
        while j < n2 && y[j] <= value {
            j += 1;
        }
        let diff = (i as f64 / n1 as f64 - j as f64 / n2 as f64).abs();
        if diff > statistic {
            statistic = diff;
        }
    }

    let en = ((n1 as f64 * n2 as f64) / (n1 as f64 + n2 as f64)).sqrt();
    (statistic, kolmogorov_sf(statistic * en))
}

/// Survival function of the Kolmogorov distribution, `P(D > z)`.
///
/// Uses the theta-series form of the CDF for small `z`, where the usual
/// alternating series converges too slowly, and the alternating series
/// elsewhere.
pub fn kolmogorov_sf(z: f64) -> f64 {
    if z <= 0.0 {
        return 1.0;
    }
    if z < 1.18 {
        let t = std::f64::consts::PI.powi(2) / (8.0 * z * z);
        let cdf = (2.0 * std::f64::consts::PI).sqrt() / z
            * ((-t).exp() + (-9.0 * t).exp() + (-25.0 * t).exp() + (-49.0 * t).exp());
        return (1.0 - cdf).clamp(0.0, 1.0);
    }
    let z_sq = z * z;
    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=100 {
        let k = k as f64;
        let term = sign * (-2.0 * k * k * z_sq).exp();
        sum += term;
        if term.abs() < 1e-12 {
            break;
        }
        sign = -sign;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Chi-square test of independence on a 2xK contingency table.
///
/// Rows are the reference and production counts over the same K categories.
/// Returns `(statistic, p_value)` with `K - 1` degrees of freedom. Yates
/// continuity correction is applied when K == 2, matching standard practice
/// for single-degree-of-freedom tables. Callers guarantee K >= 2 and that
/// neither row sums to zero.
pub fn chi2_contingency(reference: &[f64], production: &[f64]) -> (f64, f64) {
    debug_assert_eq!(reference.len(), production.len());
    let k = reference.len();
    let total_ref: f64 = reference.iter().sum();
    let total_prod: f64 = production.iter().sum();
    let grand = total_ref + total_prod;
    let correction = k == 2;

    let mut statistic = 0.0;
    for j in 0..k {
        let column_total = reference[j] + production[j];
        for (observed, row_total) in [(reference[j], total_ref), (production[j], total_prod)] {
            let expected = row_total * column_total / grand;
            if expected > 0.0 {
                let mut diff = (observed - expected).abs();
                if correction {
                    diff = (diff - 0.5).max(0.0);
                }
                statistic += diff * diff / expected;
            }
        }
    }
    (statistic, chi2_sf(statistic, k - 1))
}

/// Survival function of the chi-square distribution with `dof` degrees of
/// freedom: the regularized upper incomplete gamma function Q(dof/2, x/2).
pub fn chi2_sf(x: f64, dof: usize) -> f64 {
    if dof == 0 || x <= 0.0 {
        return 1.0;
    }
    let a = dof as f64 / 2.0;
    let half = x / 2.0;
    let q = if half < a + 1.0 {
        1.0 - gamma_p_series(a, half)
    } else {
        gamma_q_continued_fraction(a, half)
    };
    q.clamp(0.0, 1.0)
}

fn ln_gamma(x: f64) -> f64 {
    const COF: [f64; 6] = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];
    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut ser = 1.000000000190015;
    for c in COF {
        y += 1.0;
        ser += c / y;
    }
    -tmp + (2.5066282746310005 * ser / x).ln()
}

/// Regularized lower incomplete gamma P(a, x) by series expansion,
/// converging for x < a + 1.
fn gamma_p_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut sum = 1.0 / a;
    let mut del = sum;
    for _ in 0..300 {
        ap += 1.0;
        del *= x / ap;
        sum += del;
        if del.abs() < sum.abs() * 1e-14 {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

/// Regularized upper incomplete gamma Q(a, x) by Lentz's continued fraction,
/// converging for x >= a + 1.
fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    const TINY: f64 = 1e-300;
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..300 {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < 1e-14 {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ks_identical_samples() {
        let data: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        let (statistic, p_value) = ks_2samp(&data, &data);
        assert_eq!(statistic, 0.0);
        assert_eq!(p_value, 1.0);
    }

    #[test]
    fn test_ks_disjoint_samples() {
        let reference: Vec<f64> = (0..1000).map(|i| i as f64 / 100.0).collect();
        let production: Vec<f64> = (0..1000).map(|i| 1000.0 + i as f64 / 100.0).collect();
        let (statistic, p_value) = ks_2samp(&reference, &production);
        assert_eq!(statistic, 1.0);
        assert!(p_value < 1e-6, "p-value should collapse: {}", p_value);
    }

    #[test]
    fn test_ks_moderate_shift() {
        // Uniform [0, 100) vs uniform [30, 130), n = 1000 each.
        let reference: Vec<f64> = (0..1000).map(|i| i as f64 / 10.0).collect();
        let production: Vec<f64> = (0..1000).map(|i| 30.0 + i as f64 / 10.0).collect();
        let (statistic, p_value) = ks_2samp(&reference, &production);
        assert!((statistic - 0.3).abs() < 0.01);
        assert!(p_value < 0.05);
    }

    #[test]
    fn test_ks_unequal_sample_sizes() {
        let reference: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let production: Vec<f64> = (0..1500).map(|i| i as f64 / 3.0).collect();
        let (statistic, p_value) = ks_2samp(&reference, &production);
        assert!(statistic < 0.05);
        assert!(p_value > 0.05);
    }

    #[test]
    fn test_kolmogorov_sf_reference_values() {
        // K(1.358) is the classic 5% critical point.
        assert!((kolmogorov_sf(1.358) - 0.05).abs() < 0.002);
        // K(1.627) ~ 1% critical point.
        assert!((kolmogorov_sf(1.627) - 0.01).abs() < 0.001);
        assert_eq!(kolmogorov_sf(0.0), 1.0);
        assert!(kolmogorov_sf(0.3) > 0.999);
        assert!(kolmogorov_sf(5.0) < 1e-20);
    }

    #[test]
    fn test_chi2_identical_tables() {
        let counts = vec![50.0, 30.0, 20.0];
        let (statistic, p_value) = chi2_contingency(&counts, &counts);
        assert_eq!(statistic, 0.0);
        assert_eq!(p_value, 1.0);
    }

    #[test]
    fn test_chi2_two_by_two_with_yates() {
        // Balanced margins, expected counts all 15.
        let (statistic, p_value) = chi2_contingency(&[10.0, 20.0], &[20.0, 10.0]);
        // 4 * (|10 - 15| - 0.5)^2 / 15 = 5.4
        assert!((statistic - 5.4).abs() < 1e-9);
        assert!((p_value - 0.0201).abs() < 0.001);
    }

    #[test]
    fn test_chi2_skewed_table() {
        let reference = vec![500.0, 500.0, 0.0];
        let production = vec![500.0, 0.0, 500.0];
        let (statistic, p_value) = chi2_contingency(&reference, &production);
        assert!(statistic > 100.0);
        assert!(p_value < 1e-6);
    }

    #[test]
    fn test_chi2_sf_reference_values() {
        // Classic 5% critical points.
        assert!((chi2_sf(3.841, 1) - 0.05).abs() < 0.001);
        assert!((chi2_sf(5.991, 2) - 0.05).abs() < 0.001);
        assert!((chi2_sf(16.919, 9) - 0.05).abs() < 0.001);
        assert_eq!(chi2_sf(0.0, 3), 1.0);
        assert!(chi2_sf(100.0, 1) < 1e-20);
    }
}
