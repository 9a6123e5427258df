//! Frame sink capability.
//!
//! The display driver is an external collaborator. The core only needs an
//! `embedded-graphics` draw target it can fill with a complete frame, plus the
//! three side channels below. Drawing primitives come from `embedded-graphics`
//! itself; draw errors are ignored per call (`.ok()`) since a dropped
//! primitive is cosmetic.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions};

/// Destination for rendered frames.
pub trait FrameSink: DrawTarget<Color = Rgb565> + OriginDimensions {
    /// Push the completed frame to the panel.
    fn present(&mut self);

    /// Set the backlight to a hardware level (0-255).
    fn set_backlight(
        &mut self,
        level: u8,
    );

    /// Flip the panel 180 degrees (or back).
    fn set_rotated(
        &mut self,
        rotated: bool,
    );
}
