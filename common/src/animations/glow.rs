//! Glow planning for neon text.
//!
//! The glow is a stack of offset text copies behind a bright foreground copy.
//! Layer `i` has alpha `0.8^i * max(I, 0.32) * 0.5 * I` for intensity `I`.
//! The number of layers also shrinks with `I`, so the halo visibly thins
//! while the sign flickers.

/// Layers drawn at full intensity.
#[cfg(not(feature = "simple-glow"))]
pub const MAX_GLOW_LAYERS: u8 = 12;

/// Layers drawn at full intensity (reduced for slow panels).
#[cfg(feature = "simple-glow")]
pub const MAX_GLOW_LAYERS: u8 = 4;

const LAYER_DECAY: f32 = 0.8;
const FADE_FLOOR: f32 = 0.32;

/// Glow parameters derived from one intensity sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowPlan {
    pub intensity: f32,
    pub layers: u8,
    /// Foreground brightness, `0.3 + 0.6 * I`.
    pub brightness: f32,
}

impl GlowPlan {
    pub fn for_intensity(intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        let layers = ((MAX_GLOW_LAYERS as f32 * i) + 0.999) as u8;
        Self {
            intensity: i,
            layers: layers.clamp(1, MAX_GLOW_LAYERS),
            brightness: 0.3 + 0.6 * i,
        }
    }

    /// Alpha of each layer, innermost first.
    pub fn layer_alphas(&self) -> impl Iterator<Item = f32> {
        let scale = self.intensity.max(FADE_FLOOR) * 0.5 * self.intensity;
        let mut decay = 1.0f32;
        (0..self.layers).map(move |_| {
            let a = decay * scale;
            decay *= LAYER_DECAY;
            a
        })
    }

    /// Pixel radius of layer `index` (1 for the innermost layers).
    #[inline]
    pub const fn layer_radius(index: u8) -> i32 { 1 + index as i32 / 3 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_intensity_uses_all_layers() {
        let plan = GlowPlan::for_intensity(1.0);
        assert_eq!(plan.layers, MAX_GLOW_LAYERS);
        assert!((plan.brightness - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_layers_thin_with_intensity() {
        let bright = GlowPlan::for_intensity(0.9);
        let dim = GlowPlan::for_intensity(0.2);
        assert!(dim.layers < bright.layers);
        assert!(dim.layers >= 1, "at least one glow layer always");
        assert_eq!(GlowPlan::for_intensity(0.05).layers, 1);
    }

    #[test]
    fn test_alphas_decay_geometrically() {
        let plan = GlowPlan::for_intensity(1.0);
        let alphas: std::vec::Vec<f32> = plan.layer_alphas().collect();
        assert_eq!(alphas.len(), MAX_GLOW_LAYERS as usize);
        assert!((alphas[0] - 0.5).abs() < 1e-6);
        for pair in alphas.windows(2) {
            assert!((pair[1] / pair[0] - 0.8).abs() < 1e-4);
        }
    }

    #[test]
    fn test_alpha_uses_fade_floor() {
        let plan = GlowPlan::for_intensity(0.1);
        let first = plan.layer_alphas().next().unwrap();
        assert!((first - 0.32 * 0.5 * 0.1).abs() < 1e-6);
    }
}
