//! Lifecycle bookkeeping for active bursts.
//!
//! The [`BurstRegistry`] exclusively owns every active burst, caps the
//! concurrent count, and retires whole bursts a fixed delay after creation.
//! Timers are modeled as tick-polled schedulers (the frame driver calls
//! [`BurstRegistry::retire_due`] and [`SpawnTimer::tick`] once per frame),
//! which keeps the single-threaded cooperative model of the display: no
//! callback can fire in the middle of an integration pass.

use glam::Vec3;

use crate::burst::{self, Burst, BurstId};
use crate::params::DisplayParams;
use crate::spawn::SpawnContext;

/// Maximum number of concurrently active bursts. New spawns are refused
/// beyond this, never evicting older bursts.
pub const MAX_BURSTS: usize = 20;
/// Fixed whole-burst lifetime in seconds, independent of the per-particle
/// lifetime jitter.
pub const BURST_LIFETIME: f32 = 3.0;
/// Cadence of spawn attempts, in seconds.
pub const SPAWN_INTERVAL: f32 = 0.8;

/// Owner and lifecycle manager of all currently active bursts.
pub struct BurstRegistry {
    bursts: Vec<Burst>,
    next_id: u64,
}

impl BurstRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bursts: Vec::new(),
            next_id: 0,
        }
    }

    /// Number of active bursts.
    pub fn len(&self) -> usize {
        self.bursts.len()
    }

    /// Whether no bursts are active.
    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }

    /// Generate and register a new burst at `origin`, or refuse silently
    /// when [`MAX_BURSTS`] are already active.
    ///
    /// `now` is the clock reading the retirement delay counts from.
    /// Returns the freshly registered burst so the caller can hand its
    /// buffers to the renderer.
    pub fn try_spawn<'a>(
        &'a mut self,
        origin: Vec3,
        params: &DisplayParams,
        now: f32,
        ctx: &mut SpawnContext,
    ) -> Option<&'a mut Burst> {
        if self.bursts.len() >= MAX_BURSTS {
            return None;
        }

        let id = BurstId(self.next_id);
        self.next_id += 1;

        let buffers = burst::generate(origin, params, ctx);
        self.bursts.push(Burst {
            id,
            buffers,
            spawned_at: now,
        });
        self.bursts.last_mut()
    }

    /// Remove one burst from the active set.
    ///
    /// Returns whether the burst was still registered; retiring an already
    /// retired id is a no-op, so double retirement cannot corrupt the set.
    pub fn retire(&mut self, id: BurstId) -> bool {
        let before = self.bursts.len();
        self.bursts.retain(|b| b.id != id);
        self.bursts.len() != before
    }

    /// Retire every burst whose fixed lifetime has elapsed at `now`.
    ///
    /// Returns the retired ids so the caller can release the renderer-side
    /// resources in the same frame - from the frame's point of view the
    /// registry removal and the scene removal are one step.
    pub fn retire_due(&mut self, now: f32) -> Vec<BurstId> {
        let mut retired = Vec::new();
        self.bursts.retain(|b| {
            if now - b.spawned_at >= BURST_LIFETIME {
                retired.push(b.id);
                false
            } else {
                true
            }
        });
        retired
    }

    /// Look up an active burst by id.
    pub fn get(&self, id: BurstId) -> Option<&Burst> {
        self.bursts.iter().find(|b| b.id == id)
    }

    /// Iterate over the active bursts.
    pub fn iter(&self) -> impl Iterator<Item = &Burst> {
        self.bursts.iter()
    }

    /// Iterate mutably, for the per-frame integration pass.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Burst> {
        self.bursts.iter_mut()
    }

    /// Re-randomize the gradient colors of every active burst.
    pub fn remap_colors(&mut self, inside: Vec3, outside: Vec3, ctx: &mut SpawnContext) {
        for burst in &mut self.bursts {
            burst.buffers.remap_colors(inside, outside, ctx);
        }
    }
}

impl Default for BurstRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-cadence spawn trigger, polled with the frame delta.
pub struct SpawnTimer {
    interval: f32,
    accumulator: f32,
}

impl SpawnTimer {
    /// Create a timer firing every `interval` seconds.
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    /// Advance by `delta` seconds; returns whether the timer fired.
    ///
    /// Intervals missed during a stall coalesce into a single firing, the
    /// way a wall-clock timer behaves on a blocked main thread.
    pub fn tick(&mut self, delta: f32) -> bool {
        self.accumulator += delta;
        if self.accumulator < self.interval {
            return false;
        }
        self.accumulator %= self.interval;
        true
    }
}

/// Pick a launch origin for the next firework: anywhere in a wide band
/// above the ground plane.
pub fn launch_position(ctx: &mut SpawnContext) -> Vec3 {
    Vec3::new(
        (ctx.random() - 0.5) * 30.0,
        (ctx.random() - 0.5) * 15.0 + 10.0,
        (ctx.random() - 0.5) * 30.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burst::ParticleBuffers;

    fn ctx() -> SpawnContext {
        SpawnContext::with_seed(99)
    }

    fn small_params() -> DisplayParams {
        DisplayParams {
            particle_count: 8,
            ..DisplayParams::default()
        }
    }

    #[test]
    fn test_spawn_registers_and_reports_burst() {
        let mut registry = BurstRegistry::new();
        let mut ctx = ctx();
        let params = small_params();

        let id = {
            let burst = registry
                .try_spawn(Vec3::ZERO, &params, 1.0, &mut ctx)
                .expect("registry empty, spawn must succeed");
            assert_eq!(burst.spawned_at(), 1.0);
            assert_eq!(burst.buffers().len(), 8);
            burst.id()
        };

        assert_eq!(registry.len(), 1);
        assert!(registry.get(id).is_some());
    }

    #[test]
    fn test_capacity_refuses_new_spawns() {
        let mut registry = BurstRegistry::new();
        let mut ctx = ctx();
        let params = small_params();

        for _ in 0..MAX_BURSTS {
            assert!(registry
                .try_spawn(Vec3::ZERO, &params, 0.0, &mut ctx)
                .is_some());
        }
        assert!(registry
            .try_spawn(Vec3::ZERO, &params, 0.0, &mut ctx)
            .is_none());
        assert_eq!(registry.len(), MAX_BURSTS);
    }

    #[test]
    fn test_capacity_holds_under_interleaved_retirement() {
        let mut registry = BurstRegistry::new();
        let mut ctx = ctx();
        let params = small_params();

        for round in 0..50u32 {
            let now = round as f32 * SPAWN_INTERVAL;
            registry.retire_due(now);
            registry.try_spawn(Vec3::ZERO, &params, now, &mut ctx);
            assert!(registry.len() <= MAX_BURSTS);
        }
    }

    #[test]
    fn test_retirement_waits_for_full_lifetime() {
        let mut registry = BurstRegistry::new();
        let mut ctx = ctx();
        let params = small_params();

        registry.try_spawn(Vec3::ZERO, &params, 10.0, &mut ctx);

        assert!(registry.retire_due(10.0 + BURST_LIFETIME - 0.01).is_empty());
        assert_eq!(registry.len(), 1);

        let retired = registry.retire_due(10.0 + BURST_LIFETIME);
        assert_eq!(retired.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_retire_is_idempotent() {
        let mut registry = BurstRegistry::new();
        let mut ctx = ctx();
        let params = small_params();

        let id = registry
            .try_spawn(Vec3::ZERO, &params, 0.0, &mut ctx)
            .map(|b| b.id())
            .expect("spawn must succeed");

        assert!(registry.retire(id));
        assert!(!registry.retire(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_spawn_timer_cadence() {
        let mut timer = SpawnTimer::new(SPAWN_INTERVAL);

        assert!(!timer.tick(0.5));
        assert!(timer.tick(0.5));
        assert!(!timer.tick(0.1));
    }

    #[test]
    fn test_spawn_timer_coalesces_missed_intervals() {
        let mut timer = SpawnTimer::new(SPAWN_INTERVAL);

        // A 5s stall still produces exactly one firing.
        assert!(timer.tick(5.0));
        assert!(!timer.tick(0.1));
    }

    #[test]
    fn test_launch_position_band() {
        let mut ctx = ctx();
        for _ in 0..100 {
            let p = launch_position(&mut ctx);
            assert!((-15.0..15.0).contains(&p.x));
            assert!((2.5..17.5).contains(&p.y));
            assert!((-15.0..15.0).contains(&p.z));
        }
    }

    #[test]
    fn test_remap_colors_touches_every_burst() {
        let mut registry = BurstRegistry::new();
        let mut ctx = ctx();
        let params = small_params();

        registry.try_spawn(Vec3::ZERO, &params, 0.0, &mut ctx);
        registry.try_spawn(Vec3::ONE, &params, 0.0, &mut ctx);
        for burst in registry.iter_mut() {
            burst.buffers_mut().clear_dirty();
        }

        registry.remap_colors(Vec3::X, Vec3::Y, &mut ctx);
        for burst in registry.iter() {
            assert!(burst.buffers().dirty());
        }
    }

    #[test]
    fn test_registered_buffers_stay_parallel() {
        let mut registry = BurstRegistry::new();
        let mut ctx = ctx();
        let params = small_params();
        registry.try_spawn(Vec3::ZERO, &params, 0.0, &mut ctx);
        let burst = registry.iter().next().expect("one burst");
        let b: &ParticleBuffers = burst.buffers();
        assert_eq!(b.positions().len(), b.lifetimes().len());
    }
}
