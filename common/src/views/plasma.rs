//! Animated sine plasma on a coarse block grid.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use rand::RngCore;

use super::{RedrawFlags, View, ViewContext};
use crate::animations::{sin, sqrt};
use crate::colors::{Palette, lerp_rgb565};

/// Block edge in pixels. Larger blocks mean fewer fills per frame.
pub const PLASMA_BLOCK: u32 = 12;

pub struct PlasmaView {
    palette: Palette,
    flags: RedrawFlags,
}

impl PlasmaView {
    pub const fn new(palette: Palette) -> Self {
        Self {
            palette,
            flags: RedrawFlags::dynamic(),
        }
    }

    /// Field value in `0.0..=1.0` at block center `(x, y)`.
    fn field(
        x: f32,
        y: f32,
        cx: f32,
        cy: f32,
        t: f32,
    ) -> f32 {
        let (dx, dy) = (x - cx, y - cy);
        let v = sin(x * 0.045 + t)
            + sin(y * 0.035 + t * 1.3)
            + sin((x + y) * 0.03 + t * 0.7)
            + sin(sqrt(dx * dx + dy * dy) * 0.05 - t * 1.6);
        ((v + 4.0) / 8.0).clamp(0.0, 1.0)
    }

    /// Three-stop ramp violet -> cyan -> pink, shifted over time.
    fn color_at(
        &self,
        v: f32,
        t: f32,
    ) -> Rgb565 {
        let p = &self.palette;
        let shifted = (v + t * 0.05) % 1.0;
        let u = shifted * 3.0;
        if u < 1.0 {
            lerp_rgb565(p.violet, p.cyan, u)
        } else if u < 2.0 {
            lerp_rgb565(p.cyan, p.pink, u - 1.0)
        } else {
            lerp_rgb565(p.pink, p.violet, u - 2.0)
        }
    }
}

impl View for PlasmaView {
    fn render<D, R>(
        &mut self,
        display: &mut D,
        ctx: &mut ViewContext<'_, R>,
    ) where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        R: RngCore,
    {
        let size = display.size();
        let t = ctx.state.t;
        let (cx, cy) = (size.width as f32 / 2.0, size.height as f32 / 2.0);
        let half = PLASMA_BLOCK as f32 / 2.0;

        let mut y = 0;
        while y < size.height {
            let mut x = 0;
            while x < size.width {
                let v = Self::field(x as f32 + half, y as f32 + half, cx, cy, t);
                Rectangle::new(Point::new(x as i32, y as i32), Size::new(PLASMA_BLOCK, PLASMA_BLOCK))
                    .into_styled(PrimitiveStyle::with_fill(self.color_at(v, t)))
                    .draw(display)
                    .ok();
                x += PLASMA_BLOCK;
            }
            y += PLASMA_BLOCK;
        }
    }

    fn flags(&self) -> &RedrawFlags { &self.flags }

    fn flags_mut(&mut self) -> &mut RedrawFlags { &mut self.flags }

    fn name(&self) -> &'static str { "Plasma" }
}
