//! Bounded random draws over an injected [`RngCore`].
//!
//! Firmware seeds the generator from hardware entropy; tests and the
//! simulator seed [`rand::rngs::SmallRng`] explicitly so runs are repeatable.

use rand::RngCore;

/// Range helpers used by the animation and game schedulers.
///
/// Every helper returns a value inside its stated range, including for
/// degenerate ranges (`hi <= lo` returns `lo`).
pub trait RandomExt: RngCore {
    /// Uniform in `lo..hi`.
    fn range_u32(
        &mut self,
        lo: u32,
        hi: u32,
    ) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_u32() % (hi - lo)
    }

    /// Uniform in `lo..=hi`.
    fn range_i32(
        &mut self,
        lo: i32,
        hi: i32,
    ) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u32 + 1;
        lo + (self.next_u32() % span) as i32
    }

    /// Uniform in `0.0..1.0` (24-bit resolution).
    fn unit_f32(&mut self) -> f32 { (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32 }

    /// Uniform in `lo..hi`.
    fn range_f32(
        &mut self,
        lo: f32,
        hi: f32,
    ) -> f32 {
        if hi <= lo {
            return lo;
        }
        (lo + (hi - lo) * self.unit_f32()).clamp(lo, hi)
    }

    /// `true` with probability `p` (clamped to 0-1).
    fn chance(
        &mut self,
        p: f32,
    ) -> bool {
        self.unit_f32() < p.clamp(0.0, 1.0)
    }
}

impl<R: RngCore + ?Sized> RandomExt for R {}

// =============================================================================
// Tests
// =============================================================================
