//! Neon badge animation engine.
//!
//! All effects are time based: they consume the clamped frame delta from the
//! [`FrameClock`](crate::clock::FrameClock) and wall-clock milliseconds, never
//! frame counts, so they run at the same speed at any frame rate.
//!
//! [`step`] advances them in a fixed order, because later stages read earlier
//! outputs (glow derives from the flicker intensity of the same frame):
//!
//! 1. [`flicker`]: breathing plus rare flicker episodes and dim bursts
//! 2. [`glitch`]: independent burst scheduler with per-frame pixel offsets
//! 3. [`particles`]: ambient particle field
//! 4. [`chip`]: progressive vector drawing
//! 5. [`pulses`]: scanline scroll, corner/border pulses, header counter
//!
//! Glow layers ([`glow`]) are planned at draw time from the current intensity.
//!
//! Trigonometry goes through `micromath` so the crate stays `no_std`.

pub mod chip;
pub mod flicker;
pub mod glitch;
pub mod glow;
pub mod particles;
pub mod pulses;

use rand::RngCore;

use crate::state::AppState;

/// Advance every badge effect by one frame.
pub fn step<R: RngCore>(
    state: &mut AppState,
    rng: &mut R,
) {
    let (dt, t, now) = (state.dt, state.t, state.now_ms);
    state.flicker.update(dt, t, now, rng);
    state.glitch.update(now, rng);
    state.particles.update(dt, now, state.width, state.height, rng);
    state.chip.update(dt);
    state.pulses.update(dt);
    state.percent.update(dt);
}

#[inline]
pub(crate) fn sin(x: f32) -> f32 { micromath::F32(x).sin().0 }

#[inline]
pub(crate) fn cos(x: f32) -> f32 { micromath::F32(x).cos().0 }

#[inline]
pub(crate) fn sqrt(x: f32) -> f32 { micromath::F32(x).sqrt().0 }

/// Wrap a non-negative accumulator into `0..period`.
#[inline]
pub(crate) fn wrap(
    value: f32,
    period: f32,
) -> f32 {
    if value < period {
        return value.max(0.0);
    }
    let w = value - period * ((value / period) as u32) as f32;
    if w >= period || w < 0.0 { 0.0 } else { w }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::TAU;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_wrap() {
        assert!((wrap(1.0, TAU) - 1.0).abs() < 1e-6);
        assert!((wrap(TAU + 0.5, TAU) - 0.5).abs() < 1e-4);
        assert!((wrap(25.0, 10.0) - 5.0).abs() < 1e-4);
        assert!(wrap(-1.0, TAU).abs() < 1e-6);
    }

    #[test]
    fn test_step_advances_everything() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = AppState::new(240, 320);
        state.advance(0.1, 1.0, 1_000);
        step(&mut state, &mut rng);
        assert!(state.pulses.corner_phase > 0.0);
        assert!(state.chip.progress() > 0.0);
        assert!(state.percent.value() > 0);
        assert!(state.glitch.next_trigger_ms().is_some(), "glitch timer scheduled on first step");
    }
}
