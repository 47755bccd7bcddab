//! Random sampling context for burst generation.
//!
//! Wraps a [`SmallRng`] with the sampling helpers the burst factory and the
//! color remapper need, so call sites stay free of RNG boilerplate:
//!
//! ```ignore
//! let mut ctx = SpawnContext::new();
//! let dir = ctx.unit_sphere();
//! let radius = ctx.random() * params.randomness;
//! ```

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Sampling context shared by burst generation, color remapping, and the
/// launch-position picker.
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a deterministic context for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 in [0, 1).
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in [min, max).
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    /// Random angle in [0, 2π).
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.rng.gen_range(0.0..TAU)
    }

    /// Unbiased random direction on the unit sphere.
    ///
    /// Azimuth is uniform in [0, 2π); the polar angle comes from
    /// `acos(uniform(-1, 1))`, which cancels the pole clustering a uniform
    /// polar angle would produce.
    pub fn unit_sphere(&mut self) -> Vec3 {
        let theta = self.angle();
        let phi = self.rng.gen_range(-1.0f32..1.0).acos();

        Vec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        )
    }

    /// Pick one entry of `items` uniformly at random.
    ///
    /// Panics if `items` is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.gen_range(0..items.len())]
    }
}

impl Default for SpawnContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_sphere_has_unit_length() {
        let mut ctx = SpawnContext::with_seed(7);
        for _ in 0..100 {
            let dir = ctx.unit_sphere();
            assert!((dir.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_seeded_contexts_agree() {
        let mut a = SpawnContext::with_seed(42);
        let mut b = SpawnContext::with_seed(42);
        for _ in 0..32 {
            assert_eq!(a.random(), b.random());
        }
    }

    #[test]
    fn test_random_range_bounds() {
        let mut ctx = SpawnContext::with_seed(3);
        for _ in 0..100 {
            let v = ctx.random_range(-2.0, 5.0);
            assert!((-2.0..5.0).contains(&v));
        }
    }

    #[test]
    fn test_pick_returns_member() {
        let mut ctx = SpawnContext::with_seed(9);
        let items = [1, 2, 3];
        for _ in 0..20 {
            assert!(items.contains(ctx.pick(&items)));
        }
    }
}
