//! Frame pacing gate.
//!
//! The driver loop polls [`FrameClock::should_render_frame`] with a monotonic
//! millisecond timestamp. A `false` return means "not yet": nothing changed and
//! the caller should yield briefly before polling again.
//!
//! **FPS Independence**: every animation consumes [`FrameClock::dt`], the real
//! elapsed time since the previous accepted frame, clamped to [`MAX_DT`] so a
//! stall (debugger pause, slow flush) cannot fast-forward the simulation.
//!
//! [`FrameClock::t`] wraps every [`TIME_WRAP_MS`] so it keeps millisecond
//! resolution as an `f32` over long uptime. Effects reading it see one phase
//! seam per wrap.

use crate::config::{DEFAULT_TARGET_FPS, MAX_DT, MAX_TARGET_FPS};

/// Period of the elapsed-time value handed to animations (one hour).
pub const TIME_WRAP_MS: u64 = 3_600_000;

/// Fixed-or-adaptive frame interval gate.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    target_fps: u32,
    last_frame_ms: Option<u64>,
    dt: f32,
    t: f32,
}

impl FrameClock {
    /// Create a gate for `target_fps` (clamped to 1-120).
    pub const fn new(target_fps: u32) -> Self {
        let fps = clamp_fps(target_fps);
        Self {
            target_fps: fps,
            last_frame_ms: None,
            dt: 0.0,
            t: 0.0,
        }
    }

    /// Change the target rate. Takes effect on the next poll.
    pub fn set_target_fps(
        &mut self,
        target_fps: u32,
    ) {
        self.target_fps = clamp_fps(target_fps);
    }

    /// Returns `true` when a new frame is due and updates `dt`/`t`.
    ///
    /// The first call always accepts and reports a nominal `1 / target_fps`
    /// delta. Rejected polls leave the clock untouched. The interval check
    /// is exact (`elapsed * fps >= 1000`), so 30 FPS never runs at 30.3.
    pub fn should_render_frame(
        &mut self,
        now_ms: u64,
    ) -> bool {
        let Some(last) = self.last_frame_ms else {
            self.dt = 1.0 / self.target_fps as f32;
            self.last_frame_ms = Some(now_ms);
            self.t = wrapped_seconds(now_ms);
            return true;
        };

        let elapsed = now_ms.saturating_sub(last);
        if elapsed.saturating_mul(u64::from(self.target_fps)) < 1000 {
            return false;
        }

        self.dt = (elapsed as f32 / 1000.0).min(MAX_DT);
        self.last_frame_ms = Some(now_ms);
        self.t = wrapped_seconds(now_ms);
        true
    }

    /// Seconds since the previous accepted frame, at most [`MAX_DT`].
    #[inline]
    pub const fn dt(&self) -> f32 { self.dt }

    /// Seconds since boot at the last accepted frame, modulo [`TIME_WRAP_MS`].
    #[inline]
    pub const fn t(&self) -> f32 { self.t }

    #[inline]
    pub const fn target_fps(&self) -> u32 { self.target_fps }

    /// Shortest accepted spacing in whole milliseconds.
    #[inline]
    pub const fn frame_interval_ms(&self) -> u64 { 1000u64.div_ceil(self.target_fps as u64) }
}

impl Default for FrameClock {
    fn default() -> Self { Self::new(DEFAULT_TARGET_FPS) }
}

fn wrapped_seconds(now_ms: u64) -> f32 { (now_ms % TIME_WRAP_MS) as f32 / 1000.0 }

const fn clamp_fps(fps: u32) -> u32 {
    if fps == 0 {
        1
    } else if fps > MAX_TARGET_FPS {
        MAX_TARGET_FPS
    } else {
        fps
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_first_frame_uses_nominal_dt() {
        let mut clock = FrameClock::new(30);
        assert!(clock.should_render_frame(5_000), "cold start must render");
        assert!((clock.dt() - 1.0 / 30.0).abs() < 1e-6, "cold start dt should be 1/fps");
        assert!((clock.t() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_early_poll_without_mutation() {
        let mut clock = FrameClock::new(30);
        clock.should_render_frame(0);
        let dt_before = clock.dt();
        assert!(!clock.should_render_frame(10), "10 ms is below the 33.3 ms interval");
        assert!((clock.dt() - dt_before).abs() < f32::EPSILON);
        assert!(!clock.should_render_frame(33), "33 ms would run faster than 30 FPS");
        assert!(clock.should_render_frame(34));
    }

    #[test]
    fn test_interval_rounds_up() {
        assert_eq!(FrameClock::new(30).frame_interval_ms(), 34);
        assert_eq!(FrameClock::new(10).frame_interval_ms(), 100);
        assert_eq!(FrameClock::new(120).frame_interval_ms(), 9);
    }

    #[test]
    fn test_elapsed_time_keeps_resolution_after_long_uptime() {
        let base = 1u64 << 30;
        let mut clock = FrameClock::new(30);
        assert!(clock.should_render_frame(base));
        let t0 = clock.t();
        assert!(clock.should_render_frame(base + 40));
        let t1 = clock.t();
        assert!(clock.should_render_frame(base + 80));
        let t2 = clock.t();
        assert!(t1 > t0 && t2 > t1, "t must advance every frame: {t0} {t1} {t2}");
        assert!(((t1 - t0) - 0.04).abs() < 1e-3, "step was {}", t1 - t0);
        assert!(t0 < TIME_WRAP_MS as f32 / 1000.0);
    }

    #[test]
    fn test_elapsed_time_wraps() {
        let mut clock = FrameClock::new(30);
        clock.should_render_frame(TIME_WRAP_MS - 20);
        assert!(clock.should_render_frame(TIME_WRAP_MS + 20));
        assert!((clock.t() - 0.02).abs() < 1e-6);
        assert!((clock.dt() - 0.04).abs() < 1e-6, "dt is unaffected by the wrap");
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new(30);
        clock.should_render_frame(0);
        assert!(clock.should_render_frame(10_000));
        assert!((clock.dt() - MAX_DT).abs() < f32::EPSILON, "10 s stall must clamp to MAX_DT");
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.target_fps(), 1);
        assert_eq!(clock.frame_interval_ms(), 1000);
    }

    #[test]
    fn test_set_target_fps_changes_interval() {
        let mut clock = FrameClock::default();
        clock.set_target_fps(10);
        assert_eq!(clock.frame_interval_ms(), 100);
        clock.should_render_frame(0);
        assert!(!clock.should_render_frame(50));
        assert!(clock.should_render_frame(100));
    }

    proptest! {
        #[test]
        fn prop_dt_never_exceeds_max(gaps in proptest::collection::vec(0u64..50_000, 1..64)) {
            let mut clock = FrameClock::new(30);
            let mut now = 0u64;
            clock.should_render_frame(now);
            for gap in gaps {
                now += gap;
                if clock.should_render_frame(now) {
                    prop_assert!(clock.dt() <= MAX_DT);
                    prop_assert!(clock.dt() >= 0.0);
                }
            }
        }

        #[test]
        fn prop_accepted_frames_respect_interval(fps in 1u32..=120, step in 1u64..8, polls in 10usize..400) {
            let mut clock = FrameClock::new(fps);
            let mut last_accept: Option<u64> = None;
            for i in 0..polls {
                let now = i as u64 * step;
                if clock.should_render_frame(now) {
                    if let Some(prev) = last_accept {
                        prop_assert!((now - prev) * u64::from(fps) >= 1000);
                    }
                    last_accept = Some(now);
                }
            }
        }
    }
}
