//! Burst generation and per-burst particle buffers.
//!
//! A burst is one spawned cluster of particles. Its attributes live in
//! fixed-size parallel arrays ([`ParticleBuffers`]) indexed consistently:
//! particle `i` is row `i` of positions, velocities, colors, and lifetimes.
//! The arrays never resize or compact - expired particles are suppressed by
//! the integrator, not removed.

use glam::Vec3;

use crate::params::{BurstDesign, DisplayParams};
use crate::spawn::SpawnContext;
use crate::visuals;

/// Velocity factor tying explosion launch speed to distance from center -
/// the "shell expansion" look, not a physical law.
const SHELL_EXPANSION: f32 = 0.05;
/// Velocity factor for the spiral's tangential/radial drift.
const SPIRAL_DRIFT: f32 = 0.1;
/// Angular jitter added to the spiral drift direction.
const SPIRAL_JITTER: f32 = 0.5;
/// Upper bound of the spiral's initial Z offset band.
const SPIRAL_HEIGHT: f32 = 5.0;
/// Upper bound of the spiral's upward Z velocity.
const SPIRAL_LIFT: f32 = 0.5;
/// Upper bound of the per-particle initial lifetime, in seconds.
///
/// Deliberately jittered per particle so a burst fades unevenly; independent
/// of the whole-burst retirement delay even though both happen to be 3s.
const LIFETIME_JITTER: f32 = 3.0;

/// Stable identifier of a registered burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BurstId(pub(crate) u64);

/// Structure-of-arrays attribute storage for one burst.
///
/// Length is fixed at generation time. Dirty flags track which attribute
/// streams the renderer must re-upload.
pub struct ParticleBuffers {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) velocities: Vec<Vec3>,
    pub(crate) colors: Vec<Vec3>,
    pub(crate) lifetimes: Vec<f32>,
    pub(crate) positions_dirty: bool,
    pub(crate) colors_dirty: bool,
}

impl ParticleBuffers {
    fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count),
            velocities: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
            lifetimes: Vec::with_capacity(count),
            positions_dirty: true,
            colors_dirty: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        positions: Vec<Vec3>,
        velocities: Vec<Vec3>,
        colors: Vec<Vec3>,
        lifetimes: Vec<f32>,
    ) -> Self {
        assert_eq!(positions.len(), velocities.len());
        assert_eq!(positions.len(), colors.len());
        assert_eq!(positions.len(), lifetimes.len());
        Self {
            positions,
            velocities,
            colors,
            lifetimes,
            positions_dirty: true,
            colors_dirty: true,
        }
    }

    fn push(&mut self, position: Vec3, velocity: Vec3, color: Vec3, lifetime: f32) {
        self.positions.push(position);
        self.velocities.push(velocity);
        self.colors.push(color);
        self.lifetimes.push(lifetime);
    }

    /// Number of particles in this burst.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the burst holds no particles.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// World-space particle positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Particle velocities in world units per second.
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Particle colors, RGB in [0,1].
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Remaining per-particle lifetimes in seconds.
    pub fn lifetimes(&self) -> &[f32] {
        &self.lifetimes
    }

    /// Whether any attribute stream changed since the last renderer sync.
    pub fn dirty(&self) -> bool {
        self.positions_dirty || self.colors_dirty
    }

    /// Acknowledge a renderer re-upload of all dirty streams.
    pub fn clear_dirty(&mut self) {
        self.positions_dirty = false;
        self.colors_dirty = false;
    }

    /// Recompute every particle's color as a gradient sample between the
    /// two endpoint colors.
    ///
    /// Each particle draws a fresh interpolation factor `t ~ U[0,1)` - the
    /// color is fully re-randomized per call, not mapped from distance to
    /// the burst center.
    pub fn remap_colors(&mut self, inside: Vec3, outside: Vec3, ctx: &mut SpawnContext) {
        for color in &mut self.colors {
            *color = inside.lerp(outside, ctx.random());
        }
        self.colors_dirty = true;
    }
}

/// One active firework: an attribute buffer set plus its creation time.
pub struct Burst {
    pub(crate) id: BurstId,
    pub(crate) buffers: ParticleBuffers,
    pub(crate) spawned_at: f32,
}

impl Burst {
    /// Identifier this burst was registered under.
    pub fn id(&self) -> BurstId {
        self.id
    }

    /// Clock reading at creation, in seconds.
    pub fn spawned_at(&self) -> f32 {
        self.spawned_at
    }

    /// The burst's attribute buffers.
    pub fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }

    /// Mutable access for integration and color remapping.
    pub fn buffers_mut(&mut self) -> &mut ParticleBuffers {
        &mut self.buffers
    }
}

/// Generate one burst's attribute buffers at `origin` from the current
/// parameter snapshot.
///
/// `params.particle_count` fixes the buffer length; `params.design` selects
/// the generation strategy.
pub fn generate(origin: Vec3, params: &DisplayParams, ctx: &mut SpawnContext) -> ParticleBuffers {
    match params.design {
        BurstDesign::Explosion => generate_explosion(origin, params, ctx),
        BurstDesign::Spiral => generate_spiral(origin, params, ctx),
    }
}

/// Uniform shell expansion: particles scatter inside a sphere of radius
/// `randomness` and launch outward, faster the further they start from the
/// center.
fn generate_explosion(
    origin: Vec3,
    params: &DisplayParams,
    ctx: &mut SpawnContext,
) -> ParticleBuffers {
    let count = params.particle_count as usize;
    let mut buffers = ParticleBuffers::with_capacity(count);

    for _ in 0..count {
        let radius = ctx.random() * params.randomness;
        let offset = ctx.unit_sphere() * radius;

        let position = origin + offset;
        let velocity = offset * params.speed * SHELL_EXPANSION;
        let color = *ctx.pick(&visuals::VIBRANT);
        let lifetime = ctx.random() * LIFETIME_JITTER;

        buffers.push(position, velocity, color, lifetime);
    }

    buffers
}

/// Asymmetric spiral: particles scatter on a disk in the origin's local XY
/// plane with a positive Z band, and drift along the disk tangent with
/// random jitter plus a small upward Z component.
fn generate_spiral(
    origin: Vec3,
    params: &DisplayParams,
    ctx: &mut SpawnContext,
) -> ParticleBuffers {
    let count = params.particle_count as usize;
    let mut buffers = ParticleBuffers::with_capacity(count);

    for _ in 0..count {
        let angle = ctx.angle();
        let radius = ctx.random() * params.randomness;
        let offset = Vec3::new(
            radius * angle.cos(),
            radius * angle.sin(),
            ctx.random() * SPIRAL_HEIGHT,
        );

        let position = origin + offset;
        let velocity = Vec3::new(
            (angle.cos() + ctx.random() * SPIRAL_JITTER) * params.speed * SPIRAL_DRIFT,
            (angle.sin() + ctx.random() * SPIRAL_JITTER) * params.speed * SPIRAL_DRIFT,
            ctx.random() * SPIRAL_LIFT,
        );
        let color = *ctx.pick(&visuals::VIBRANT);
        let lifetime = ctx.random() * LIFETIME_JITTER;

        buffers.push(position, velocity, color, lifetime);
    }

    buffers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params(design: BurstDesign) -> DisplayParams {
        DisplayParams {
            design,
            ..DisplayParams::default()
        }
    }

    #[test]
    fn test_buffers_are_parallel_and_sized_by_count() {
        let mut ctx = SpawnContext::with_seed(1);
        let params = test_params(BurstDesign::Explosion);
        let buffers = generate(Vec3::ZERO, &params, &mut ctx);

        assert_eq!(buffers.len(), params.particle_count as usize);
        assert_eq!(buffers.positions().len(), buffers.velocities().len());
        assert_eq!(buffers.positions().len(), buffers.colors().len());
        assert_eq!(buffers.positions().len(), buffers.lifetimes().len());
        assert!(buffers.dirty());
    }

    #[test]
    fn test_explosion_stays_within_spread_radius() {
        let mut ctx = SpawnContext::with_seed(2);
        let origin = Vec3::new(4.0, -1.0, 8.0);
        let params = test_params(BurstDesign::Explosion);
        let buffers = generate(origin, &params, &mut ctx);

        for position in buffers.positions() {
            assert!((*position - origin).length() <= params.randomness + 1e-4);
        }
    }

    #[test]
    fn test_explosion_velocity_points_outward() {
        let mut ctx = SpawnContext::with_seed(11);
        let params = test_params(BurstDesign::Explosion);
        let buffers = generate(Vec3::ZERO, &params, &mut ctx);

        for (position, velocity) in buffers.positions().iter().zip(buffers.velocities()) {
            let expected = *position * params.speed * SHELL_EXPANSION;
            assert!((*velocity - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_zero_randomness_collapses_to_origin() {
        let mut ctx = SpawnContext::with_seed(3);
        let params = DisplayParams {
            particle_count: 1,
            randomness: 0.0,
            ..test_params(BurstDesign::Explosion)
        };
        let buffers = generate(Vec3::ZERO, &params, &mut ctx);

        assert_eq!(buffers.positions()[0], Vec3::ZERO);
    }

    #[test]
    fn test_spiral_planar_radius_and_height_band() {
        let mut ctx = SpawnContext::with_seed(4);
        let origin = Vec3::new(-2.0, 6.0, 1.0);
        let params = test_params(BurstDesign::Spiral);
        let buffers = generate(origin, &params, &mut ctx);

        for position in buffers.positions() {
            let offset = *position - origin;
            let planar = (offset.x * offset.x + offset.y * offset.y).sqrt();
            assert!(planar <= params.randomness + 1e-4);
            assert!((0.0..SPIRAL_HEIGHT).contains(&offset.z));
        }
    }

    #[test]
    fn test_spiral_lifts_upward() {
        let mut ctx = SpawnContext::with_seed(5);
        let params = test_params(BurstDesign::Spiral);
        let buffers = generate(Vec3::ZERO, &params, &mut ctx);

        for velocity in buffers.velocities() {
            assert!((0.0..SPIRAL_LIFT).contains(&velocity.z));
        }
    }

    #[test]
    fn test_generated_colors_come_from_palette() {
        let mut ctx = SpawnContext::with_seed(6);
        let params = test_params(BurstDesign::Explosion);
        let buffers = generate(Vec3::ZERO, &params, &mut ctx);

        for color in buffers.colors() {
            assert!(visuals::VIBRANT.contains(color));
        }
    }

    #[test]
    fn test_lifetimes_are_jittered_within_bound() {
        let mut ctx = SpawnContext::with_seed(7);
        let params = test_params(BurstDesign::Spiral);
        let buffers = generate(Vec3::ZERO, &params, &mut ctx);

        let mut distinct = false;
        for lifetime in buffers.lifetimes() {
            assert!((0.0..LIFETIME_JITTER).contains(lifetime));
            if (lifetime - buffers.lifetimes()[0]).abs() > f32::EPSILON {
                distinct = true;
            }
        }
        // Lifetime jitter is per particle, never one shared value.
        assert!(distinct);
    }

    #[test]
    fn test_remap_stays_in_endpoint_hull() {
        let mut ctx = SpawnContext::with_seed(8);
        let params = test_params(BurstDesign::Explosion);
        let mut buffers = generate(Vec3::ZERO, &params, &mut ctx);

        let inside = Vec3::new(0.9, 0.1, 0.4);
        let outside = Vec3::new(0.2, 0.8, 0.6);
        buffers.clear_dirty();
        buffers.remap_colors(inside, outside, &mut ctx);

        for color in buffers.colors() {
            for ((channel, lo), hi) in color
                .to_array()
                .iter()
                .zip(inside.min(outside).to_array())
                .zip(inside.max(outside).to_array())
            {
                assert!(*channel >= lo - 1e-6 && *channel <= hi + 1e-6);
            }
        }
        assert!(buffers.dirty());
    }
}
