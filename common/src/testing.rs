//! Host-side test doubles for the frame sink, input source and config store.

use std::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors::BLACK;
use crate::config::{ConfigStore, SCREEN_HEIGHT, SCREEN_WIDTH, Settings, StoreError};
use crate::input::InputSource;
use crate::sink::FrameSink;

/// In-memory 240x320 frame sink that records side-channel calls.
pub struct TestSink {
    size: Size,
    frame: Vec<Rgb565>,
    pixels_drawn: usize,
    min: Option<Point>,
    max: Option<Point>,
    pub presents: u32,
    pub backlight: Vec<u8>,
    pub rotations: Vec<bool>,
}

impl TestSink {
    pub fn new() -> Self {
        Self {
            size: Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            frame: std::vec![BLACK; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            pixels_drawn: 0,
            min: None,
            max: None,
            presents: 0,
            backlight: Vec::new(),
            rotations: Vec::new(),
        }
    }

    /// In-bounds pixel writes since creation.
    pub fn pixels_drawn(&self) -> usize { self.pixels_drawn }

    /// Smallest rectangle covering every in-bounds write.
    pub fn bounding_box_drawn(&self) -> Option<Rectangle> {
        let (min, max) = (self.min?, self.max?);
        Some(Rectangle::with_corners(min, max))
    }

    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgb565> {
        if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
            return None;
        }
        self.frame.get(y as usize * self.size.width as usize + x as usize).copied()
    }
}

impl Default for TestSink {
    fn default() -> Self { Self::new() }
}

impl OriginDimensions for TestSink {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for TestSink {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        for Pixel(p, color) in pixels {
            if p.x < 0 || p.y < 0 || p.x >= w || p.y >= h {
                continue;
            }
            self.frame[(p.y * w + p.x) as usize] = color;
            self.pixels_drawn += 1;
            self.min = Some(self.min.map_or(p, |m| Point::new(m.x.min(p.x), m.y.min(p.y))));
            self.max = Some(self.max.map_or(p, |m| Point::new(m.x.max(p.x), m.y.max(p.y))));
        }
        Ok(())
    }
}

impl FrameSink for TestSink {
    fn present(&mut self) { self.presents += 1; }

    fn set_backlight(
        &mut self,
        level: u8,
    ) {
        self.backlight.push(level);
    }

    fn set_rotated(
        &mut self,
        rotated: bool,
    ) {
        self.rotations.push(rotated);
    }
}

/// Input source driven by the test: set the fields before each tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptedInput {
    pub button: bool,
    pub touch: Option<Point>,
}

impl InputSource for ScriptedInput {
    fn button_pressed(&mut self) -> bool { self.button }

    fn touch(&mut self) -> Option<Point> { self.touch }
}

/// Config store that keeps every save, optionally failing writes.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub stored: Option<Settings>,
    pub saves: u32,
    pub fail_writes: bool,
}

impl ConfigStore for RecordingStore {
    fn load(&mut self) -> Option<Settings> { self.stored }

    fn save(
        &mut self,
        settings: &Settings,
    ) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed);
        }
        self.stored = Some(*settings);
        self.saves += 1;
        Ok(())
    }
}
