//! Simulator window as a frame sink.
//!
//! Rotation is emulated by mirroring every pixel through the screen center, so
//! the window shows what a panel flipped 180 degrees would. Touch points are
//! mapped back the same way before they reach the badge core.
//!
//! The backlight is emulated on present: the finished frame is copied to a
//! second buffer scaled by the last backlight level, so sleep dimming shows.

use std::convert::Infallible;

use badge_common::colors::scale;
use badge_common::sink::FrameSink;
use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, Window};

use crate::timing::WINDOW_SCALE;

pub struct SimulatorSink {
    display: SimulatorDisplay<Rgb565>,
    /// What the window shows: `display` after the backlight.
    lit: SimulatorDisplay<Rgb565>,
    window: Window,
    rotated: bool,
    backlight: u8,
}

impl SimulatorSink {
    pub fn new(
        size: Size,
        title: &str,
    ) -> Self {
        let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
        let mut display = SimulatorDisplay::new(size);
        let mut window = Window::new(title, &output_settings);
        display.clear(Rgb565::BLACK).ok();
        window.update(&display);
        Self {
            display,
            lit: SimulatorDisplay::new(size),
            window,
            rotated: false,
            backlight: u8::MAX,
        }
    }

    pub fn window_mut(&mut self) -> &mut Window { &mut self.window }

    /// Map between logical and window coordinates (the mapping is its own inverse).
    pub fn map_point(
        &self,
        p: Point,
    ) -> Point {
        if !self.rotated {
            return p;
        }
        let size = self.display.size();
        Point::new(size.width as i32 - 1 - p.x, size.height as i32 - 1 - p.y)
    }
}

impl OriginDimensions for SimulatorSink {
    fn size(&self) -> Size { self.display.size() }
}

impl DrawTarget for SimulatorSink {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let rotated = self.rotated;
        let size = self.display.size();
        let mapped = pixels.into_iter().map(|Pixel(p, c)| {
            if rotated {
                Pixel(Point::new(size.width as i32 - 1 - p.x, size.height as i32 - 1 - p.y), c)
            } else {
                Pixel(p, c)
            }
        });
        self.display.draw_iter(mapped)
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.display.clear(color)
    }
}

impl FrameSink for SimulatorSink {
    fn present(&mut self) {
        if self.backlight == u8::MAX {
            self.window.update(&self.display);
            return;
        }
        let level = self.backlight;
        let display = &self.display;
        let lit = display
            .bounding_box()
            .points()
            .map(|p| Pixel(p, backlit(display.get_pixel(p), level)));
        self.lit.draw_iter(lit).ok();
        self.window.update(&self.lit);
    }

    /// Re-presents immediately so a static frame picks up the new level.
    fn set_backlight(
        &mut self,
        level: u8,
    ) {
        self.backlight = level;
        self.present();
    }

    fn set_rotated(
        &mut self,
        rotated: bool,
    ) {
        self.rotated = rotated;
    }
}

/// Panel color as seen through a backlight at hardware `level`.
fn backlit(
    color: Rgb565,
    level: u8,
) -> Rgb565 {
    scale(color, f32::from(level) / f32::from(u8::MAX))
}
