//! Deterministic PRNG for reproducible randomized tests.

/// Minimal xorshift64 PRNG — deterministic and reproducible.
///
/// Use a fixed seed to ensure test results are identical across runs.
pub struct Xorshift64(u64);

impl Xorshift64 {
    /// A zero seed would lock the generator at zero, so it is replaced.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Returns `f64` in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns `u64` in `[min, max)`.
    pub fn range_u64(&mut self, min: u64, max: u64) -> u64 {
        min + ((max - min) as f64 * self.next_f64()) as u64
    }

    /// Returns `usize` in `[min, max)`.
    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        self.range_u64(min as u64, max as u64) as usize
    }

    /// Picks one element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.range_usize(0, items.len())]
    }
}
