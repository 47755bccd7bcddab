//! Live-tunable display parameters.
//!
//! [`DisplayParams`] is the single snapshot struct every component reads.
//! The parameter panel mutates it between frames; the burst factory and the
//! renderer read it on next use. Changes to `particle_count` never resize a
//! burst that is already in flight - buffers are sized at spawn time.

use std::ops::RangeInclusive;

use glam::Vec3;

/// Geometric/velocity generation strategy selected at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BurstDesign {
    /// Uniform shell expansion from the burst origin.
    #[default]
    Explosion,
    /// Upward, asymmetric drift in the origin's local XY plane.
    Spiral,
}

impl BurstDesign {
    /// Human-readable name for UI display.
    pub fn name(&self) -> &'static str {
        match self {
            BurstDesign::Explosion => "Explosion",
            BurstDesign::Spiral => "Spiral",
        }
    }
}

/// Panel slider bounds for [`DisplayParams::particle_size`].
pub const PARTICLE_SIZE_RANGE: RangeInclusive<f32> = 0.1..=1.0;
/// Panel slider bounds for [`DisplayParams::speed`].
pub const SPEED_RANGE: RangeInclusive<f32> = 0.5..=5.0;
/// Panel slider bounds for [`DisplayParams::particle_count`].
pub const PARTICLE_COUNT_RANGE: RangeInclusive<u32> = 100..=1000;
/// Panel slider step for [`DisplayParams::particle_count`].
pub const PARTICLE_COUNT_STEP: u32 = 50;
/// Panel slider bounds for [`DisplayParams::randomness`].
pub const RANDOMNESS_RANGE: RangeInclusive<f32> = 1.0..=10.0;

/// Snapshot of all user-facing display parameters.
///
/// Read-only to the simulation core; only the parameter panel writes it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayParams {
    /// Gradient color at the center of each burst (RGB in [0,1]).
    pub inside_color: Vec3,
    /// Gradient color at the rim of each burst (RGB in [0,1]).
    pub outside_color: Vec3,
    /// Rendered sprite size.
    pub particle_size: f32,
    /// Scales every initial particle velocity.
    pub speed: f32,
    /// Particles per burst, fixed at spawn time.
    pub particle_count: u32,
    /// Spread radius of the initial particle cloud, in world units.
    pub randomness: f32,
    /// Generation strategy for the next spawned burst.
    pub design: BurstDesign,
    /// Fade-out rate for expiring particles.
    pub fade_out: f32,
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            inside_color: Vec3::new(1.0, 0.0, 0.0),
            outside_color: Vec3::new(1.0, 1.0, 0.0),
            particle_size: 0.2,
            speed: 2.0,
            particle_count: 500,
            randomness: 5.0,
            design: BurstDesign::Explosion,
            fade_out: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_panel_ranges() {
        let params = DisplayParams::default();
        assert!(PARTICLE_SIZE_RANGE.contains(&params.particle_size));
        assert!(SPEED_RANGE.contains(&params.speed));
        assert!(PARTICLE_COUNT_RANGE.contains(&params.particle_count));
        assert!(RANDOMNESS_RANGE.contains(&params.randomness));
    }

    #[test]
    fn test_default_design_is_explosion() {
        assert_eq!(DisplayParams::default().design, BurstDesign::Explosion);
    }
}
