//! Shared per-frame state handed to every view.
//!
//! Owned by the display manager and lent to the active view for the duration
//! of one call. Field ownership per tick:
//!
//! - geometry and timing (`width`, `height`, `dt`, `t`, `now_ms`): display
//!   manager, before input routing
//! - animation fields: the active view (the badge steps them through
//!   [`crate::animations::step`])
//!
//! Only one view is active per frame, so no field has two writers. Button and
//! touch gesture state lives in the [`InputRouter`](crate::input::InputRouter),
//! also owned by the display manager.

use crate::animations::chip::ChipDraw;
use crate::animations::flicker::Flicker;
use crate::animations::glitch::Glitch;
use crate::animations::particles::ParticleField;
use crate::animations::pulses::{PercentCounter, Pulses};

#[derive(Debug, Clone, Copy)]
pub struct AppState {
    // Geometry
    pub width: u32,
    pub height: u32,

    // Frame timing
    /// Clamped seconds since the previous frame.
    pub dt: f32,
    /// Seconds since boot, wrapped hourly (see [`crate::clock::TIME_WRAP_MS`]).
    pub t: f32,
    pub now_ms: u64,

    // Animation
    pub flicker: Flicker,
    pub glitch: Glitch,
    pub particles: ParticleField,
    pub chip: ChipDraw,
    pub pulses: Pulses,
    pub percent: PercentCounter,
}

impl AppState {
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            width,
            height,
            dt: 0.0,
            t: 0.0,
            now_ms: 0,
            flicker: Flicker::new(),
            glitch: Glitch::new(),
            particles: ParticleField::new(),
            chip: ChipDraw::new(),
            pulses: Pulses::new(),
            percent: PercentCounter::new(),
        }
    }

    /// Record the timing of a newly accepted frame.
    pub fn advance(
        &mut self,
        dt: f32,
        t: f32,
        now_ms: u64,
    ) {
        self.dt = dt;
        self.t = t;
        self.now_ms = now_ms;
    }

    /// Update geometry after a rotation or sink change.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
    ) {
        self.width = width;
        self.height = height;
    }

    /// Horizontal center in pixels.
    #[inline]
    pub const fn center_x(&self) -> i32 { (self.width / 2) as i32 }
}
