//! Widget components shared by the views.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` for platform independence.

mod controls;
mod primitives;

pub use controls::{draw_button, draw_checkbox, draw_slider, draw_value_box, hit, slider_value_at};
pub use primitives::{
    draw_corner_brackets,
    draw_double_frame,
    draw_glow_text,
    draw_neon_hline,
    draw_neon_text,
    draw_view_title,
};
