//! Per-frame kinematic integration of a burst's particle buffers.

use glam::Vec3;

use crate::burst::ParticleBuffers;

/// Constant downward acceleration applied to velocity Y, per second.
const GRAVITY: f32 = 0.1;
/// Per-step multiplier on horizontal velocity. Applied once per frame,
/// not time-normalized, so the damping rate tracks frame rate.
const HORIZONTAL_DAMPING: f32 = 0.99;
/// Coordinate expired particles are parked at, outside the visible volume.
pub const OFFSCREEN: f32 = -100.0;

/// Advance every particle of `buffers` by `delta` seconds.
///
/// Per particle, in this exact order: explicit Euler position update,
/// gravity, horizontal damping, lifetime decay, then off-screen relocation
/// once the lifetime has run out. Expired particles stay in the buffer at
/// the sentinel position so indices remain stable.
///
/// Deterministic: identical buffers and `delta` produce identical output.
pub fn step(buffers: &mut ParticleBuffers, delta: f32) {
    for i in 0..buffers.positions.len() {
        let velocity = &mut buffers.velocities[i];
        buffers.positions[i] += *velocity * delta;

        velocity.y -= delta * GRAVITY;
        velocity.x *= HORIZONTAL_DAMPING;
        velocity.z *= HORIZONTAL_DAMPING;

        buffers.lifetimes[i] -= delta;
        if buffers.lifetimes[i] <= 0.0 {
            buffers.positions[i] = Vec3::splat(OFFSCREEN);
        }
    }

    buffers.positions_dirty = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_particle(velocity: Vec3, lifetime: f32) -> ParticleBuffers {
        ParticleBuffers::from_parts(
            vec![Vec3::ZERO],
            vec![velocity],
            vec![Vec3::ONE],
            vec![lifetime],
        )
    }

    #[test]
    fn test_position_updates_before_gravity() {
        let mut buffers = single_particle(Vec3::new(0.0, 10.0, 0.0), 5.0);
        step(&mut buffers, 1.0);

        // Position advanced by the pre-gravity velocity.
        assert_eq!(buffers.positions()[0].y, 10.0);
        assert!((buffers.velocities()[0].y - 9.9).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_damping() {
        let mut buffers = single_particle(Vec3::new(2.0, 0.0, -4.0), 5.0);
        step(&mut buffers, 0.5);

        assert!((buffers.velocities()[0].x - 2.0 * 0.99).abs() < 1e-6);
        assert!((buffers.velocities()[0].z - -4.0 * 0.99).abs() < 1e-6);
    }

    #[test]
    fn test_lifetime_decays_by_delta() {
        let mut buffers = single_particle(Vec3::ZERO, 2.0);
        step(&mut buffers, 0.25);
        assert!((buffers.lifetimes()[0] - 1.75).abs() < 1e-6);
    }

    #[test]
    fn test_expired_particle_parks_offscreen_and_stays_there() {
        let mut buffers = single_particle(Vec3::new(1.0, 1.0, 1.0), 0.5);

        step(&mut buffers, 1.0);
        assert_eq!(buffers.positions()[0], Vec3::splat(OFFSCREEN));

        // Retirement is monotonic across further steps.
        for _ in 0..5 {
            step(&mut buffers, 0.016);
            assert_eq!(buffers.positions()[0], Vec3::splat(OFFSCREEN));
        }
        assert_eq!(buffers.len(), 1);
    }

    #[test]
    fn test_step_is_deterministic() {
        let make = || {
            ParticleBuffers::from_parts(
                vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, 2.0)],
                vec![Vec3::new(0.3, -0.2, 0.9), Vec3::new(1.5, 2.5, -3.5)],
                vec![Vec3::ONE, Vec3::ONE],
                vec![1.0, 0.01],
            )
        };
        let mut a = make();
        let mut b = make();

        step(&mut a, 0.0166);
        step(&mut b, 0.0166);

        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.velocities(), b.velocities());
        assert_eq!(a.lifetimes(), b.lifetimes());
    }

    #[test]
    fn test_step_marks_positions_dirty() {
        let mut buffers = single_particle(Vec3::ZERO, 1.0);
        buffers.clear_dirty();
        step(&mut buffers, 0.016);
        assert!(buffers.dirty());
    }
}
