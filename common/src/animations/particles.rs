//! Ambient particle field behind the badge.
//!
//! Each slot cycles: wait for its spawn time, activate at a random position,
//! fade in over phase `0..PI`, fade out over `PI..TAU`, retire. Retiring
//! schedules the next spawn 1-10 s later. Motion is speed (px/s) times `dt`.

use core::f32::consts::TAU;

use rand::RngCore;

use super::cos;
use crate::random::RandomExt;

/// Slots in the ambient pool.
pub const PARTICLE_COUNT: usize = 10;

const SPAWN_DELAY_MIN_MS: u32 = 1_000;
const SPAWN_DELAY_MAX_MS: u32 = 10_000;
const SPEED_MIN: f32 = 6.0;
const SPEED_MAX: f32 = 22.0;
const LIFETIME_MIN_S: f32 = 2.0;
const LIFETIME_MAX_S: f32 = 5.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientParticle {
    pub x: f32,
    pub y: f32,
    /// Upward speed in pixels per second.
    pub speed: f32,
    pub size: u32,
    pub max_alpha: f32,
    pub alpha: f32,
    /// Lifecycle phase, `0..TAU`.
    pub phase: f32,
    /// Phase advance per second (`TAU / lifetime`).
    pub phase_rate: f32,
    pub active: bool,
    /// `None` until the slot gets its first spawn time.
    pub next_spawn_ms: Option<u64>,
}

impl AmbientParticle {
    fn spawn<R: RngCore>(
        &mut self,
        width: u32,
        height: u32,
        rng: &mut R,
    ) {
        self.x = rng.range_f32(0.0, width as f32);
        self.y = rng.range_f32(height as f32 * 0.3, height as f32);
        self.speed = rng.range_f32(SPEED_MIN, SPEED_MAX);
        self.size = rng.range_u32(1, 4);
        self.max_alpha = rng.range_f32(0.4, 1.0);
        self.alpha = 0.0;
        self.phase = 0.0;
        self.phase_rate = TAU / rng.range_f32(LIFETIME_MIN_S, LIFETIME_MAX_S);
        self.active = true;
    }

    fn retire<R: RngCore>(
        &mut self,
        now_ms: u64,
        rng: &mut R,
    ) {
        self.active = false;
        self.alpha = 0.0;
        self.phase = 0.0;
        let delay = rng.range_u32(SPAWN_DELAY_MIN_MS, SPAWN_DELAY_MAX_MS + 1);
        self.next_spawn_ms = Some(now_ms + u64::from(delay));
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParticleField {
    particles: [AmbientParticle; PARTICLE_COUNT],
}

impl ParticleField {
    pub fn new() -> Self {
        Self {
            particles: [AmbientParticle::default(); PARTICLE_COUNT],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AmbientParticle> { self.particles.iter() }

    pub fn update<R: RngCore>(
        &mut self,
        dt: f32,
        now_ms: u64,
        width: u32,
        height: u32,
        rng: &mut R,
    ) {
        for p in &mut self.particles {
            if !p.active {
                match p.next_spawn_ms {
                    None => {
                        let delay = rng.range_u32(0, SPAWN_DELAY_MAX_MS);
                        p.next_spawn_ms = Some(now_ms + u64::from(delay));
                    }
                    Some(due) if now_ms >= due => p.spawn(width, height, rng),
                    Some(_) => {}
                }
                continue;
            }

            p.phase += p.phase_rate * dt;
            p.y -= p.speed * dt;

            if p.phase >= TAU || p.y < -(p.size as f32) {
                p.retire(now_ms, rng);
                continue;
            }

            p.alpha = (p.max_alpha * (1.0 - cos(p.phase)) * 0.5).clamp(0.0, 1.0);
        }
    }
}

impl Default for ParticleField {
    fn default() -> Self { Self::new() }
}
