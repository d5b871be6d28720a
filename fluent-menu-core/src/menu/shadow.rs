use fluent_menu_theme::Theme;
use vello::kurbo::{Rect, Vec2};

use crate::menu::constants::{SHADOW_OFFSET_Y, SHADOW_RADIUS_STEP};

/// One ring of the drop shadow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowLayer {
    /// Rounded rectangle bounds.
    pub rect: Rect,
    /// Corner radius.
    pub radius: f64,
    /// Opacity multiplier for the shadow colour.
    pub alpha: f32,
}

/// Approximates a blurred drop shadow with concentric translucent rounded rectangles.
///
/// Layer `i` of `N` is the content rect grown by `i` units with
/// `alpha = base * (1 - i/N)^2`, so the cost is linear in the blur radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCompositor {
    /// Number of layers, and the distance the outermost layer reaches.
    pub blur_radius: usize,
    /// Alpha of the innermost layer.
    pub base_alpha: f32,
    /// Corner radius of the innermost layer.
    pub corner_radius: f64,
}

impl ShadowCompositor {
    /// Shadow parameters of a theme.
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            blur_radius: theme.shadow_radius,
            base_alpha: theme.shadow_base_alpha(),
            corner_radius: theme.corner_radius,
        }
    }

    /// Space the shadow needs around the content, the downward offset included.
    pub fn margin(&self) -> f64 {
        if self.blur_radius == 0 {
            return 0.0;
        }
        self.blur_radius as f64 + SHADOW_OFFSET_Y
    }

    /// Alpha of layer `i`.
    pub fn alpha(&self, i: usize) -> f32 {
        if i >= self.blur_radius {
            return 0.0;
        }
        let falloff = 1.0 - i as f32 / self.blur_radius as f32;
        self.base_alpha * falloff * falloff
    }

    /// The layers for `content`, innermost first.
    pub fn layers(&self, content: Rect) -> Vec<ShadowLayer> {
        let offset = Vec2::new(0.0, SHADOW_OFFSET_Y);
        (0..self.blur_radius)
            .map(|i| {
                let grow = i as f64;
                ShadowLayer {
                    rect: content.inflate(grow, grow) + offset,
                    radius: self.corner_radius + grow * SHADOW_RADIUS_STEP,
                    alpha: self.alpha(i),
                }
            })
            .collect()
    }
}
