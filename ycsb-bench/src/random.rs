//! A deterministic 32-bit xorshift generator.
//!
//! All randomness in a benchmark run is drawn from [`Random32`] instances with explicit seeds, so
//! the reference dataset, the lookup keys and the field choices are identical on every run and
//! on every platform. See <https://en.wikipedia.org/wiki/Xorshift>.

use rand::{RngCore, SeedableRng};

/// The seed used when none is configured.
pub const DEFAULT_SEED: u32 = 314_159_265;

/// Marsaglia's xorshift32 generator with the (13, 7, 5) shift triple.
///
/// The state must not be zero: the all-zero state maps onto itself and the generator would
/// return zeros forever. Configuration validation rejects a zero seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Random32 {
    state: u32,
}

impl Random32 {
    /// Creates a generator starting from `seed`.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advances the state and returns it.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        let mut state = self.state;
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 5;
        self.state = state;
        state
    }

    /// Returns a uniformly distributed value in `[0, 1)`.
    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        unit_interval(self.next())
    }
}

impl Default for Random32 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Maps a 32-bit word onto `[0, 1)`.
#[inline]
pub(crate) fn unit_interval(word: u32) -> f64 {
    word as f64 / (1u64 << 32) as f64
}

impl RngCore for Random32 {
    fn next_u32(&mut self) -> u32 {
        self.next()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next());
        let high = u64::from(self.next());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.next().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

impl SeedableRng for Random32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
