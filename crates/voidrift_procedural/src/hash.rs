//! # Seeded Hash
//!
//! The single source of randomness for world generation.
//!
//! ## Why an integer mixer instead of noise-from-trig?
//!
//! A `sin()`-based hash depends on the platform's libm and on how the
//! optimizer contracts floating-point math, which is fatal for a game that
//! hands snapshots between peers. A fixed integer finalizer (splitmix64)
//! produces the exact same bits on every platform, every optimization
//! level, forever.
//!
//! ## Determinism Guarantee
//!
//! `sample(x, y, salt)` is a pure function of `(seed, x, y, salt)`: no
//! hidden state, no failure modes, total over all integer inputs.

/// World seed for deterministic generation.
///
/// All procedural content derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g. biome assignment).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        // FNV-1a style mixing
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xD01F_7C7A_1F00_0D5E)
    }
}

/// Weyl increment used to spread coordinate contributions before mixing.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// splitmix64 finalizer.
///
/// The standard constants; changing them changes every world ever seeded.
#[inline]
const fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Deterministic hash over `(chunk_x, chunk_y, salt)`.
///
/// Every content category in the generator draws from this through its own
/// salt range, so categories never perturb each other's rolls.
///
/// # Example
///
/// ```rust,ignore
/// let hash = SeededHash::new(WorldSeed::new(42));
/// let roll = hash.sample(10, -3, 200);
/// assert!((0.0..1.0).contains(&roll));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SeededHash {
    seed: WorldSeed,
}

impl SeededHash {
    /// Creates a hash bound to a world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self { seed }
    }

    /// Returns the bound seed.
    #[inline]
    #[must_use]
    pub const fn seed(self) -> WorldSeed {
        self.seed
    }

    /// Raw 64-bit hash of `(x, y, salt)` under the bound seed.
    #[inline]
    #[must_use]
    const fn bits(self, x: i32, y: i32, salt: u32) -> u64 {
        let mut state = self.seed.value();
        state = mix(state ^ (x as i64 as u64).wrapping_mul(GOLDEN_GAMMA));
        state = mix(state ^ (y as i64 as u64).wrapping_mul(GOLDEN_GAMMA));
        mix(state ^ (salt as u64).wrapping_mul(GOLDEN_GAMMA))
    }

    /// Samples a value in `[0, 1)`.
    ///
    /// Uses the top 53 bits so the result is exactly representable and the
    /// mapping is bit-stable across platforms.
    #[inline]
    #[must_use]
    pub fn sample(self, x: i32, y: i32, salt: u32) -> f64 {
        // 2^-53
        const SCALE: f64 = 1.0 / 9_007_199_254_740_992.0;
        (self.bits(x, y, salt) >> 11) as f64 * SCALE
    }

    /// Samples a value in `[min, max)`.
    #[inline]
    #[must_use]
    pub fn range(self, x: i32, y: i32, salt: u32, min: f64, max: f64) -> f64 {
        min + self.sample(x, y, salt) * (max - min)
    }

    /// Samples an integer in `[min, max]` (inclusive).
    #[inline]
    #[must_use]
    pub fn int_range(self, x: i32, y: i32, salt: u32, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "int_range requires min <= max");
        let span = (max - min + 1) as f64;
        min + (self.sample(x, y, salt) * span) as i32
    }

    /// Rolls a probability check: true with chance `probability`.
    #[inline]
    #[must_use]
    pub fn roll(self, x: i32, y: i32, salt: u32, probability: f64) -> bool {
        self.sample(x, y, salt) < probability
    }

    /// Picks an element of a non-empty slice uniformly.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `items` is empty.
    #[inline]
    #[must_use]
    pub fn pick<'a, T>(self, x: i32, y: i32, salt: u32, items: &'a [T]) -> &'a T {
        debug_assert!(!items.is_empty(), "pick requires a non-empty slice");
        let index = (self.sample(x, y, salt) * items.len() as f64) as usize;
        &items[index.min(items.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let h1 = SeededHash::new(WorldSeed::new(12345));
        let h2 = SeededHash::new(WorldSeed::new(12345));

        for i in 0..1000 {
            let x = i * 31 - 500;
            let y = i * 17 - 300;
            let salt = (i as u32) * 7;
            assert_eq!(
                h1.sample(x, y, salt).to_bits(),
                h2.sample(x, y, salt).to_bits(),
                "Hash must be bit-identical for identical inputs"
            );
        }
    }

    #[test]
    fn test_range_is_half_open_unit() {
        let hash = SeededHash::new(WorldSeed::new(42));

        for i in 0..10_000 {
            let value = hash.sample(i % 97 - 48, i / 97, i as u32);
            assert!(
                (0.0..1.0).contains(&value),
                "Value {value} out of [0, 1) at iteration {i}"
            );
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let h1 = SeededHash::new(WorldSeed::new(1));
        let h2 = SeededHash::new(WorldSeed::new(2));

        assert_ne!(h1.sample(100, 100, 0), h2.sample(100, 100, 0));
    }

    #[test]
    fn test_salt_independence() {
        let hash = SeededHash::new(WorldSeed::new(42));

        // Neighboring salts must decorrelate completely.
        let a = hash.sample(5, 5, 200);
        let b = hash.sample(5, 5, 201);
        assert_ne!(a, b, "Adjacent salts should produce unrelated draws");
    }

    #[test]
    fn test_rough_uniformity() {
        let hash = SeededHash::new(WorldSeed::new(7));

        let samples = 20_000;
        let mut sum = 0.0;
        for i in 0..samples {
            sum += hash.sample(i, -i, 9999);
        }
        let mean = sum / f64::from(samples);

        // Mean of U[0,1) over 20k draws; generous tolerance.
        assert!(
            (0.48..0.52).contains(&mean),
            "Mean {mean} suggests a badly biased hash"
        );
    }

    #[test]
    fn test_int_range_bounds() {
        let hash = SeededHash::new(WorldSeed::new(42));

        for i in 0..5000 {
            let n = hash.int_range(i, i * 3, 77, 3, 10);
            assert!((3..=10).contains(&n), "int_range produced {n}");
        }
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        let derived1 = base.derive(1);
        let derived2 = base.derive(2);
        let derived1_again = base.derive(1);

        assert_ne!(derived1, derived2, "Different purposes should give different seeds");
        assert_eq!(derived1, derived1_again, "Same purpose should give same seed");
        assert_ne!(derived1, base, "Derived seed should differ from base");
    }

    #[test]
    fn test_negative_coordinates_are_distinct() {
        let hash = SeededHash::new(WorldSeed::new(42));

        assert_ne!(hash.sample(-1, 0, 0), hash.sample(1, 0, 0));
        assert_ne!(hash.sample(0, -1, 0), hash.sample(0, 1, 0));
        assert_ne!(hash.sample(-5, -5, 0), hash.sample(5, 5, 0));
    }
}
