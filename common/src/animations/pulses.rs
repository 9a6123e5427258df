//! Periodic decoration phases and the header percentage counter.

use core::f32::consts::TAU;

use super::wrap;

/// Vertical distance between scanlines.
pub const SCANLINE_SPACING: f32 = 10.0;

const SCANLINE_SPEED: f32 = 12.0;
const CORNER_RATE: f32 = 2.0;
const BORDER_RATE: f32 = 1.5;

/// Scroll offset and pulse phases, all wrapped to their period.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pulses {
    pub scanline_offset: f32,
    pub corner_phase: f32,
    pub border_phase: f32,
}

impl Pulses {
    pub const fn new() -> Self {
        Self {
            scanline_offset: 0.0,
            corner_phase: 0.0,
            border_phase: 0.0,
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
    ) {
        self.scanline_offset = wrap(self.scanline_offset + dt * SCANLINE_SPEED, SCANLINE_SPACING);
        self.corner_phase = wrap(self.corner_phase + dt * CORNER_RATE, TAU);
        self.border_phase = wrap(self.border_phase + dt * BORDER_RATE, TAU);
    }
}

const COUNTER_DURATION_S: f32 = 1.5;

/// Header counter that eases from 0 to 100 each time the badge is shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentCounter {
    progress: f32,
}

impl PercentCounter {
    pub const fn new() -> Self { Self { progress: 0.0 } }

    pub fn reset(&mut self) { self.progress = 0.0; }

    pub fn update(
        &mut self,
        dt: f32,
    ) {
        self.progress = (self.progress + dt / COUNTER_DURATION_S).min(1.0);
    }

    /// Displayed value, cubic ease-out.
    pub fn value(&self) -> u32 {
        let inv = 1.0 - self.progress;
        let eased = 1.0 - inv * inv * inv;
        (eased * 100.0 + 0.5) as u32
    }

    #[inline]
    pub fn is_done(&self) -> bool { self.progress >= 1.0 }
}
