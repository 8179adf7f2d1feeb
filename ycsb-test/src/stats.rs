//! Small statistics helpers for asserting on sampled distributions.

/// Counts how often each value in `0..domain` occurs in `samples`.
///
/// Panics if a sample lies outside of the domain, which is exactly what a test wants.
pub fn histogram(samples: &[u64], domain: usize) -> Vec<u64> {
    let mut counts = vec![0; domain];
    for &sample in samples {
        counts[sample as usize] += 1;
    }
    counts
}

/// Pearson's chi-squared statistic of `observed` against a uniform expectation.
pub fn chi_squared_uniform(observed: &[u64]) -> f64 {
    let total: u64 = observed.iter().sum();
    let expected = total as f64 / observed.len() as f64;

    observed
        .iter()
        .map(|&count| {
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Upper critical value of the chi-squared distribution at significance 0.001.
///
/// Uses the Wilson–Hilferty approximation, which is accurate to well under one percent for the
/// degrees of freedom used in tests (tens to thousands).
pub fn chi_squared_critical(degrees_of_freedom: usize) -> f64 {
    // z-score of the 99.9th percentile of the standard normal distribution
    const Z: f64 = 3.090_232;

    let k = degrees_of_freedom as f64;
    let term = 1.0 - 2.0 / (9.0 * k) + Z * (2.0 / (9.0 * k)).sqrt();
    k * term.powi(3)
}
