//! Glitch burst scheduler.
//!
//! Runs on its own timer, independent of the flicker envelope. A burst lasts
//! 150-600 ms; every frame inside it draws a fresh pixel offset in
//! `[-3, 3] x [-2, 2]`. When the burst ends the next one is scheduled
//! 2-15 s later.

use rand::RngCore;

use crate::random::RandomExt;

const BURST_MIN_MS: u32 = 150;
const BURST_MAX_MS: u32 = 600;
const GAP_MIN_MS: u32 = 2_000;
const GAP_MAX_MS: u32 = 15_000;

/// Horizontal offset bound (pixels, inclusive).
pub const MAX_OFFSET_X: i32 = 3;
/// Vertical offset bound (pixels, inclusive).
pub const MAX_OFFSET_Y: i32 = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct Glitch {
    next_trigger_ms: Option<u64>,
    active: bool,
    start_ms: u64,
    duration_ms: u32,
    offset: (i32, i32),
}

impl Glitch {
    pub const fn new() -> Self {
        Self {
            next_trigger_ms: None,
            active: false,
            start_ms: 0,
            duration_ms: 0,
            offset: (0, 0),
        }
    }

    #[inline]
    pub const fn is_active(&self) -> bool { self.active }

    /// Offset to apply to text and line draws this frame; `(0, 0)` when idle.
    #[inline]
    pub const fn offset(&self) -> (i32, i32) { self.offset }

    /// Offset while a burst is active, `None` between bursts. A burst can
    /// land on `(0, 0)` for a frame and still counts as active.
    #[inline]
    pub const fn burst_offset(&self) -> Option<(i32, i32)> { if self.active { Some(self.offset) } else { None } }

    #[inline]
    pub const fn next_trigger_ms(&self) -> Option<u64> { self.next_trigger_ms }

    pub fn update<R: RngCore>(
        &mut self,
        now_ms: u64,
        rng: &mut R,
    ) {
        if self.active {
            if now_ms.saturating_sub(self.start_ms) >= u64::from(self.duration_ms) {
                self.active = false;
                self.offset = (0, 0);
                self.schedule(now_ms, rng);
            } else {
                self.offset = random_offset(rng);
            }
            return;
        }

        match self.next_trigger_ms {
            None => self.schedule(now_ms, rng),
            Some(due) if now_ms >= due => {
                self.active = true;
                self.start_ms = now_ms;
                self.duration_ms = rng.range_u32(BURST_MIN_MS, BURST_MAX_MS + 1);
                self.offset = random_offset(rng);
            }
            Some(_) => {}
        }
    }

    fn schedule<R: RngCore>(
        &mut self,
        now_ms: u64,
        rng: &mut R,
    ) {
        let gap = rng.range_u32(GAP_MIN_MS, GAP_MAX_MS + 1);
        self.next_trigger_ms = Some(now_ms + u64::from(gap));
    }
}

fn random_offset<R: RngCore>(rng: &mut R) -> (i32, i32) {
    (
        rng.range_i32(-MAX_OFFSET_X, MAX_OFFSET_X),
        rng.range_i32(-MAX_OFFSET_Y, MAX_OFFSET_Y),
    )
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_first_update_schedules_only() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut g = Glitch::new();
        g.update(1_000, &mut rng);
        assert!(!g.is_active());
        let due = g.next_trigger_ms().unwrap();
        assert!((3_000..=16_000).contains(&due), "next burst due at {due}");
    }

    #[test]
    fn test_burst_bounds_and_offsets() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut g = Glitch::new();
        let mut now = 0u64;
        let mut burst_start: Option<u64> = None;
        let mut last_end: Option<u64> = None;
        let mut bursts = 0;
        while now < 600_000 {
            g.update(now, &mut rng);
            let (dx, dy) = g.offset();
            assert!(dx.abs() <= MAX_OFFSET_X && dy.abs() <= MAX_OFFSET_Y);
            match (g.is_active(), burst_start) {
                (true, None) => {
                    if let Some(end) = last_end {
                        let gap = now - end;
                        assert!((2_000..=15_020).contains(&gap), "gap {gap} ms out of range");
                    }
                    burst_start = Some(now);
                }
                (false, Some(start)) => {
                    let len = now - start;
                    assert!((150..=620).contains(&len), "burst lasted {len} ms");
                    burst_start = None;
                    last_end = Some(now);
                    bursts += 1;
                }
                (false, None) => assert_eq!(g.offset(), (0, 0), "idle glitch has no offset"),
                _ => {}
            }
            now += 10;
        }
        assert!(bursts > 20, "expected many bursts in 10 minutes, got {bursts}");
    }

    #[test]
    fn test_burst_offset_follows_active_flag() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut g = Glitch::new();
        assert_eq!(g.burst_offset(), None);
        let mut now = 0u64;
        while !g.is_active() {
            now += 10;
            g.update(now, &mut rng);
        }
        g.offset = (0, 0);
        assert_eq!(g.burst_offset(), Some((0, 0)), "zero offset inside a burst is still a burst");
    }
}
