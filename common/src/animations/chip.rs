//! Progressive "chip" line drawing.
//!
//! A small microchip outline is revealed segment by segment, held, faded and
//! hidden in a four phase cycle driven by elapsed time:
//!
//! ```text
//! Drawing (progress += 0.25/s) -> Holding (5 s) -> Fading (3 s) -> Waiting (5 s) -> Drawing
//! ```
//!
//! Pen-up segments are moves: they take their share of the reveal time but
//! draw nothing.

use embedded_graphics::prelude::Point;

const DRAW_RATE: f32 = 0.25;
const HOLD_S: f32 = 5.0;
const FADE_S: f32 = 3.0;
const WAIT_S: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipPhase {
    Drawing,
    Holding,
    Fading,
    Waiting,
}

/// One stroke of the path, in path-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment {
    pub from: (i16, i16),
    pub to: (i16, i16),
    pub pen_down: bool,
}

const fn line(
    from: (i16, i16),
    to: (i16, i16),
) -> PathSegment {
    PathSegment { from, to, pen_down: true }
}

const fn jump(
    from: (i16, i16),
    to: (i16, i16),
) -> PathSegment {
    PathSegment { from, to, pen_down: false }
}

/// Chip outline: body, die, pins on each side. 36x36 local box.
pub const CHIP_PATH: [PathSegment; 22] = [
    line((6, 6), (30, 6)),
    line((30, 6), (30, 30)),
    line((30, 30), (6, 30)),
    line((6, 30), (6, 6)),
    jump((6, 6), (12, 12)),
    line((12, 12), (24, 12)),
    line((24, 12), (24, 24)),
    line((24, 24), (12, 24)),
    line((12, 24), (12, 12)),
    jump((12, 12), (12, 6)),
    line((12, 6), (12, 0)),
    jump((12, 0), (24, 6)),
    line((24, 6), (24, 0)),
    jump((24, 0), (30, 12)),
    line((30, 12), (36, 12)),
    jump((36, 12), (30, 24)),
    line((30, 24), (36, 24)),
    jump((36, 24), (24, 30)),
    line((24, 30), (24, 36)),
    jump((24, 36), (12, 30)),
    line((12, 30), (12, 36)),
    line((6, 18), (0, 18)),
];

#[derive(Debug, Clone, Copy)]
pub struct ChipDraw {
    phase: ChipPhase,
    progress: f32,
    alpha: f32,
    phase_elapsed: f32,
}

impl ChipDraw {
    pub const fn new() -> Self {
        Self {
            phase: ChipPhase::Drawing,
            progress: 0.0,
            alpha: 1.0,
            phase_elapsed: 0.0,
        }
    }

    #[inline]
    pub const fn phase(&self) -> ChipPhase { self.phase }

    /// Fraction of the path revealed, `0.0..=1.0`.
    #[inline]
    pub const fn progress(&self) -> f32 { self.progress }

    /// Stroke opacity, `0.0..=1.0`.
    #[inline]
    pub const fn alpha(&self) -> f32 { self.alpha }

    pub fn update(
        &mut self,
        dt: f32,
    ) {
        match self.phase {
            ChipPhase::Drawing => {
                self.alpha = 1.0;
                self.progress = (self.progress + dt * DRAW_RATE).min(1.0);
                if self.progress >= 1.0 {
                    self.enter(ChipPhase::Holding);
                }
            }
            ChipPhase::Holding => {
                self.phase_elapsed += dt;
                if self.phase_elapsed >= HOLD_S {
                    self.enter(ChipPhase::Fading);
                }
            }
            ChipPhase::Fading => {
                self.phase_elapsed += dt;
                self.alpha = (1.0 - self.phase_elapsed / FADE_S).clamp(0.0, 1.0);
                if self.phase_elapsed >= FADE_S {
                    self.alpha = 0.0;
                    self.enter(ChipPhase::Waiting);
                }
            }
            ChipPhase::Waiting => {
                self.phase_elapsed += dt;
                if self.phase_elapsed >= WAIT_S {
                    self.progress = 0.0;
                    self.alpha = 1.0;
                    self.enter(ChipPhase::Drawing);
                }
            }
        }
    }

    fn enter(
        &mut self,
        phase: ChipPhase,
    ) {
        self.phase = phase;
        self.phase_elapsed = 0.0;
    }

    /// Visible strokes for the current progress, offset by `origin`.
    ///
    /// Fully revealed segments come out whole; the segment under the reveal
    /// cursor is cut at its fractional length.
    pub fn visible_strokes(
        &self,
        origin: Point,
    ) -> impl Iterator<Item = (Point, Point)> + '_ {
        let cursor = self.progress * CHIP_PATH.len() as f32;
        CHIP_PATH.iter().enumerate().filter_map(move |(i, seg)| {
            let done = (cursor - i as f32).clamp(0.0, 1.0);
            if !seg.pen_down || done <= 0.0 {
                return None;
            }
            let (fx, fy) = (f32::from(seg.from.0), f32::from(seg.from.1));
            let (tx, ty) = (f32::from(seg.to.0), f32::from(seg.to.1));
            let ex = fx + (tx - fx) * done;
            let ey = fy + (ty - fy) * done;
            Some((
                origin + Point::new(fx as i32, fy as i32),
                origin + Point::new(ex as i32, ey as i32),
            ))
        })
    }
}

impl Default for ChipDraw {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        chip: &mut ChipDraw,
        seconds: f32,
    ) {
        let steps = (seconds / 0.05 + 0.5) as usize;
        for _ in 0..steps {
            chip.update(0.05);
        }
    }

    #[test]
    fn test_full_cycle_timing() {
        let mut chip = ChipDraw::new();
        let mut transitions = std::vec::Vec::new();
        let mut last = chip.phase();
        let dt = 0.01;
        for i in 1..=2_000 {
            chip.update(dt);
            if chip.phase() != last {
                transitions.push((chip.phase(), i as f32 * dt));
                last = chip.phase();
            }
        }
        let phases: std::vec::Vec<ChipPhase> = transitions.iter().map(|(p, _)| *p).collect();
        assert_eq!(
            &phases[..4],
            [ChipPhase::Holding, ChipPhase::Fading, ChipPhase::Waiting, ChipPhase::Drawing]
        );
        let at = |n: usize| transitions[n].1;
        assert!((at(0) - 4.0).abs() < 0.05, "drawing takes 4 s at 0.25/s, took {}", at(0));
        assert!((at(1) - at(0) - 5.0).abs() < 0.05, "hold lasts 5 s");
        assert!((at(2) - at(1) - 3.0).abs() < 0.05, "fade lasts 3 s");
        assert!((at(3) - at(2) - 5.0).abs() < 0.05, "wait lasts 5 s");
    }

    #[test]
    fn test_fade_is_linear() {
        let mut chip = ChipDraw::new();
        chip.phase = ChipPhase::Fading;
        chip.progress = 1.0;
        run(&mut chip, 1.5);
        assert!((chip.alpha() - 0.5).abs() < 0.05, "halfway through fade, alpha {}", chip.alpha());
        run(&mut chip, 2.0);
        assert_eq!(chip.phase(), ChipPhase::Waiting);
        assert!(chip.alpha().abs() < f32::EPSILON);
    }

    #[test]
    fn test_strokes_grow_with_progress() {
        let mut chip = ChipDraw::new();
        assert_eq!(chip.visible_strokes(Point::zero()).count(), 0);
        run(&mut chip, 2.0);
        let half = chip.visible_strokes(Point::zero()).count();
        run(&mut chip, 2.0);
        let full = chip.visible_strokes(Point::zero()).count();
        let pen_down = CHIP_PATH.iter().filter(|s| s.pen_down).count();
        assert!(half > 0 && half < pen_down);
        assert_eq!(full, pen_down);
    }

    #[test]
    fn test_strokes_are_offset() {
        let mut chip = ChipDraw::new();
        run(&mut chip, 4.5);
        let (a, _) = chip.visible_strokes(Point::new(100, 50)).next().unwrap();
        assert_eq!(a, Point::new(106, 56));
    }
}
