//! Neon intensity envelope.
//!
//! Two tiers combined multiplicatively:
//!
//! ```text
//! base    = 0.92 + 0.08 * sin(2t)                       slow breathing
//! flicker = 0.15 + (sin(phase) * 0.5 + 0.5) * 0.25 + noise   during an episode
//!         = smoothed -> 1.0                              otherwise
//! out     = clamp(base * flicker * dim, 0.05, 1.0)
//! ```
//!
//! An episode starts with probability [`EPISODE_RATE`] per second of frame
//! time and lasts 1-2 s of wall time. Short dim bursts dip the output a little
//! between episodes. Output is never 0, so text always stays legible.

use core::f32::consts::TAU;

use rand::RngCore;

use super::{sin, wrap};
use crate::random::RandomExt;

/// Intensity floor.
pub const MIN_INTENSITY: f32 = 0.05;

/// Intensity ceiling.
pub const MAX_INTENSITY: f32 = 1.0;

const BASE_LEVEL: f32 = 0.92;
const BASE_AMPLITUDE: f32 = 0.08;
const BASE_RATE: f32 = 2.0;

/// Expected episodes per second.
pub const EPISODE_RATE: f32 = 0.08;
const EPISODE_MIN_MS: u32 = 1000;
const EPISODE_MAX_MS: u32 = 2000;

const EPISODE_SPEED_MIN: f32 = 15.0;
const EPISODE_SPEED_MAX: f32 = 25.0;
const EPISODE_NOISE: f32 = 0.15;

/// How fast intensity returns to 1.0 after an episode (per second).
const RELAX_RATE: f32 = 4.0;

const DIM_RATE: f32 = 0.15;
const DIM_MIN_S: f32 = 0.08;
const DIM_MAX_S: f32 = 0.25;
const DIM_TARGET_MIN: f32 = 0.6;
const DIM_TARGET_MAX: f32 = 0.9;

#[derive(Debug, Clone, Copy)]
pub struct Flicker {
    intensity: f32,
    /// Smoothing accumulator: last episode value relaxing back to 1.0.
    smoothed: f32,
    episode_end_ms: Option<u64>,
    phase: f32,
    dim_remaining: f32,
    dim_target: f32,
}

impl Flicker {
    pub const fn new() -> Self {
        Self {
            intensity: MAX_INTENSITY,
            smoothed: 1.0,
            episode_end_ms: None,
            phase: 0.0,
            dim_remaining: 0.0,
            dim_target: 1.0,
        }
    }

    /// Current intensity in `[MIN_INTENSITY, MAX_INTENSITY]`.
    #[inline]
    pub const fn intensity(&self) -> f32 { self.intensity }

    #[inline]
    pub const fn in_episode(&self) -> bool { self.episode_end_ms.is_some() }

    #[inline]
    pub const fn is_dimmed(&self) -> bool { self.dim_remaining > 0.0 }

    pub fn update<R: RngCore>(
        &mut self,
        dt: f32,
        t: f32,
        now_ms: u64,
        rng: &mut R,
    ) {
        let base = BASE_LEVEL + BASE_AMPLITUDE * sin(wrap(t * BASE_RATE, TAU));

        match self.episode_end_ms {
            Some(end) if now_ms >= end => self.episode_end_ms = None,
            None if rng.chance(EPISODE_RATE * dt) => {
                let len = rng.range_u32(EPISODE_MIN_MS, EPISODE_MAX_MS);
                self.episode_end_ms = Some(now_ms + u64::from(len));
            }
            _ => {}
        }

        let flicker = if self.in_episode() {
            let speed = rng.range_f32(EPISODE_SPEED_MIN, EPISODE_SPEED_MAX);
            self.phase = wrap(self.phase + dt * speed, TAU);
            let noise = rng.range_f32(-EPISODE_NOISE, EPISODE_NOISE);
            let v = (0.15 + (sin(self.phase) * 0.5 + 0.5) * 0.25 + noise).clamp(MIN_INTENSITY, MAX_INTENSITY);
            self.smoothed = v;
            v
        } else {
            self.smoothed += (1.0 - self.smoothed) * (dt * RELAX_RATE).min(1.0);
            self.smoothed
        };

        if self.dim_remaining > 0.0 {
            self.dim_remaining -= dt;
        } else if rng.chance(DIM_RATE * dt) {
            self.dim_remaining = rng.range_f32(DIM_MIN_S, DIM_MAX_S);
            self.dim_target = rng.range_f32(DIM_TARGET_MIN, DIM_TARGET_MAX);
        }
        let dim = if self.dim_remaining > 0.0 { self.dim_target } else { 1.0 };

        self.intensity = (base * flicker * dim).clamp(MIN_INTENSITY, MAX_INTENSITY);
    }
}

impl Default for Flicker {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_starts_fully_lit() {
        let f = Flicker::new();
        assert!((f.intensity() - 1.0).abs() < f32::EPSILON);
        assert!(!f.in_episode());
    }

    #[test]
    fn test_episode_length_bounded() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut f = Flicker::new();
        let mut now = 0u64;
        let mut started_at = None;
        let mut lengths = std::vec::Vec::new();
        for _ in 0..200_000 {
            now += 33;
            f.update(0.033, now as f32 / 1000.0, now, &mut rng);
            match (f.in_episode(), started_at) {
                (true, None) => started_at = Some(now),
                (false, Some(s)) => {
                    lengths.push(now - s);
                    started_at = None;
                }
                _ => {}
            }
        }
        assert!(!lengths.is_empty(), "episodes should occur over ~110 minutes");
        for len in lengths {
            assert!((1_000..=2_100).contains(&len), "episode lasted {len} ms");
        }
    }

    #[test]
    fn test_relaxes_after_episode() {
        let mut f = Flicker::new();
        f.smoothed = 0.2;
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..30 {
            f.update(0.033, 0.0, 0, &mut rng);
            if f.in_episode() {
                return;
            }
        }
        assert!(f.smoothed > 0.9, "smoothed value should relax toward 1.0, got {}", f.smoothed);
    }

    #[test]
    fn test_dim_bursts_short_and_shallow() {
        const STEP_MS: u64 = 10;
        let mut rng = SmallRng::seed_from_u64(21);
        let mut f = Flicker::new();
        let mut now = 0u64;
        let mut started_at = None;
        let mut lengths = std::vec::Vec::new();
        for _ in 0..12_000 {
            now += STEP_MS;
            let t = now as f32 / 1000.0;
            f.update(STEP_MS as f32 / 1000.0, t, now, &mut rng);
            if f.is_dimmed() {
                let base = BASE_LEVEL + BASE_AMPLITUDE * sin(wrap(t * BASE_RATE, TAU));
                assert!(
                    f.intensity() <= base * DIM_TARGET_MAX + 1e-5,
                    "dimmed intensity {} above {}",
                    f.intensity(),
                    base * DIM_TARGET_MAX
                );
            }
            match (f.is_dimmed(), started_at) {
                (true, None) => started_at = Some(now),
                (false, Some(s)) => {
                    lengths.push(now - s);
                    started_at = None;
                }
                _ => {}
            }
        }
        assert!(!lengths.is_empty(), "dim bursts should occur within two minutes");
        for len in lengths {
            assert!((80..=250 + STEP_MS).contains(&len), "dim burst lasted {len} ms");
        }
    }

    proptest! {
        #[test]
        fn prop_intensity_in_bounds(seed in any::<u64>(), dts in proptest::collection::vec(0.0f32..=0.1, 1..300)) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut f = Flicker::new();
            let mut now = 0u64;
            for dt in dts {
                now += (dt * 1000.0) as u64;
                f.update(dt, now as f32 / 1000.0, now, &mut rng);
                prop_assert!(f.intensity() >= MIN_INTENSITY);
                prop_assert!(f.intensity() <= MAX_INTENSITY);
            }
        }
    }
}
