//! Zipfian key sampling over a bounded key domain.
//!
//! The probability of drawing the key `k` (zero-based, so of rank `k + 1`) is
//! `(k + 1)^-θ / ζ(N, θ)` with `ζ(N, θ) = Σ_{i=1}^{N} i^-θ`. With `θ = 0` every key is equally
//! likely, larger values of `θ` concentrate the draws on the first keys.

use rand::Rng;
use rand_distr::Distribution;

use crate::error::ConfigError;
use crate::random::{Random32, unit_interval};

/// Draws keys from `[0, domain)` following a Zipf law with skew `theta`.
///
/// Construction precomputes the cumulative weights of all ranks, whose last entry is the
/// normalization constant `ζ(N, θ)`. Each draw then inverts the cumulative distribution with a
/// binary search, so the result is exact and costs `O(log N)`.
#[derive(Clone, Debug)]
pub struct ZipfSampler {
    theta: f64,
    /// `cumulative[k]` holds `Σ_{i=1}^{k+1} i^-θ`.
    cumulative: Vec<f64>,
}

impl ZipfSampler {
    /// Creates a sampler over `domain` keys with skew `theta`.
    pub fn new(domain: u64, theta: f64) -> Result<Self, ConfigError> {
        if !theta.is_finite() || theta < 0.0 {
            return Err(ConfigError::InvalidTheta(theta));
        }
        if domain == 0 {
            return Err(ConfigError::EmptyDomain);
        }
        let len = usize::try_from(domain).map_err(|_| ConfigError::DomainTooLarge(domain))?;

        let mut cumulative = Vec::new();
        cumulative
            .try_reserve_exact(len)
            .map_err(|_| ConfigError::DomainTooLarge(domain))?;

        let mut zeta = 0.0;
        for rank in 1..=len {
            zeta += (rank as f64).powf(-theta);
            cumulative.push(zeta);
        }

        Ok(Self { theta, cumulative })
    }

    /// The skew parameter.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Number of distinct keys.
    pub fn domain(&self) -> u64 {
        self.cumulative.len() as u64
    }

    /// The normalization constant `ζ(N, θ)`.
    pub fn zeta(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Probability of drawing `key`, or zero if the key lies outside of the domain.
    pub fn probability(&self, key: u64) -> f64 {
        if key >= self.domain() {
            return 0.0;
        }
        ((key + 1) as f64).powf(-self.theta) / self.zeta()
    }

    /// Maps a uniform value `u` in `[0, 1)` onto a key.
    ///
    /// Returns the smallest key whose cumulative weight exceeds `u * ζ`.
    pub fn key_for(&self, u: f64) -> u64 {
        let target = u * self.zeta();
        let index = self.cumulative.partition_point(|&weight| weight <= target);

        // rounding can push `target` onto the last weight for `u` close to one
        index.min(self.cumulative.len() - 1) as u64
    }

    /// Draws `count` keys from `rng` in draw order.
    pub fn generate_lookup_keys(&self, rng: &mut Random32, count: usize) -> Vec<u64> {
        (0..count).map(|_| self.key_for(rng.next_unit())).collect()
    }
}

impl Distribution<u64> for ZipfSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.key_for(unit_interval(rng.next_u32()))
    }
}

#[cfg(test)]
mod tests {
    use ycsb_test::stats;

    use super::*;

    #[test]
    fn rejects_invalid_parameters() {
        assert_eq!(
            ZipfSampler::new(10, -0.5).unwrap_err(),
            ConfigError::InvalidTheta(-0.5)
        );
        assert!(matches!(
            ZipfSampler::new(10, f64::NAN),
            Err(ConfigError::InvalidTheta(_))
        ));
        assert!(matches!(
            ZipfSampler::new(10, f64::INFINITY),
            Err(ConfigError::InvalidTheta(_))
        ));
        assert_eq!(
            ZipfSampler::new(0, 0.99).unwrap_err(),
            ConfigError::EmptyDomain
        );
    }

    #[test]
    fn zeta_is_precomputed() {
        let sampler = ZipfSampler::new(4, 1.0).unwrap();
        let expected = 1.0 + 1.0 / 2.0 + 1.0 / 3.0 + 1.0 / 4.0;
        assert!((sampler.zeta() - expected).abs() < 1e-12);

        let uniform = ZipfSampler::new(1000, 0.0).unwrap();
        assert_eq!(uniform.zeta(), 1000.0);
        assert_eq!(uniform.probability(999), 0.001);
        assert_eq!(uniform.probability(1000), 0.0);
    }

    #[test]
    fn inverse_cdf_edges() {
        let sampler = ZipfSampler::new(100, 0.99).unwrap();
        assert_eq!(sampler.key_for(0.0), 0);
        assert_eq!(sampler.key_for(0.999_999_999), 99);

        // the first key owns the first `1/ζ` of the unit interval
        let boundary = 1.0 / sampler.zeta();
        assert_eq!(sampler.key_for(boundary * 0.999), 0);
        assert_eq!(sampler.key_for(boundary * 1.001), 1);

        let single = ZipfSampler::new(1, 2.0).unwrap();
        assert_eq!(single.key_for(0.5), 0);
    }

    #[test]
    fn keys_stay_in_domain() {
        let sampler = ZipfSampler::new(1000, 0.99).unwrap();
        let keys = sampler.generate_lookup_keys(&mut Random32::default(), 10_000);

        assert_eq!(keys.len(), 10_000);
        assert!(keys.iter().all(|&key| key < 1000));
    }

    #[test]
    fn deterministic_for_a_seed() {
        let sampler = ZipfSampler::new(1000, 0.99).unwrap();
        let a = sampler.generate_lookup_keys(&mut Random32::new(5), 1000);
        let b = sampler.generate_lookup_keys(&mut Random32::new(5), 1000);
        assert_eq!(a, b);

        // `Distribution` consumes the generator exactly like `generate_lookup_keys`
        let mut rng = Random32::new(5);
        let c: Vec<u64> = (0..1000).map(|_| sampler.sample(&mut rng)).collect();
        assert_eq!(a, c);
    }

    #[test]
    fn zero_skew_is_uniform() {
        let sampler = ZipfSampler::new(100, 0.0).unwrap();
        let keys = sampler.generate_lookup_keys(&mut Random32::default(), 100_000);

        let counts = stats::histogram(&keys, 100);
        let chi2 = stats::chi_squared_uniform(&counts);
        assert!(
            chi2 < stats::chi_squared_critical(99),
            "chi-squared statistic {chi2} rejects uniformity"
        );
    }

    #[test]
    fn skewed_frequencies_decrease() {
        let sampler = ZipfSampler::new(10, 0.99).unwrap();
        let keys = sampler.generate_lookup_keys(&mut Random32::default(), 200_000);
        let counts = stats::histogram(&keys, 10);

        for pair in counts.windows(2) {
            assert!(pair[0] >= pair[1], "frequencies not decreasing: {counts:?}");
        }

        for (key, &count) in counts.iter().enumerate() {
            let observed = count as f64 / keys.len() as f64;
            let expected = sampler.probability(key as u64);
            assert!(
                (observed - expected).abs() < 0.005,
                "key {key}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn most_popular_key_dominates_large_domain() {
        let sampler = ZipfSampler::new(1000, 0.99).unwrap();
        let keys = sampler.generate_lookup_keys(&mut Random32::default(), 10_000);
        let counts = stats::histogram(&keys, 1000);

        let first = counts[0];
        assert!(counts[1..].iter().all(|&count| count < first));
    }
}
