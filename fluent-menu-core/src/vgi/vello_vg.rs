use vello::kurbo::{Affine, BezPath, Point, Rect, Stroke};
use vello::peniko::{Brush, Color, Fill};
use vello::Scene;

use crate::menu::item::IconHandle;
use crate::vgi::Graphics;

/// Draws text and icons into a scene on behalf of [VelloGraphics].
///
/// Implemented by the host, which owns fonts and icon images.
pub trait ContentPainter {
    /// Draw one line of text. See [Graphics::draw_text].
    fn draw_text(&mut self, scene: &mut Scene, text: &str, origin: Point, font_size: f32, color: Color);

    /// Draw an icon. See [Graphics::draw_icon].
    fn draw_icon(&mut self, scene: &mut Scene, icon: IconHandle, rect: Rect, tint: Color);
}

/// A Vello-based implementation of the [Graphics] trait.
pub struct VelloGraphics<'a> {
    scene: &'a mut Scene,
    painter: Option<&'a mut dyn ContentPainter>,
}

impl<'a> VelloGraphics<'a> {
    /// Create a new VelloGraphics from a Scene reference. Text and icons are skipped.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self {
            scene,
            painter: None,
        }
    }

    /// Create a VelloGraphics that forwards text and icons to `painter`.
    pub fn with_painter(scene: &'a mut Scene, painter: &'a mut dyn ContentPainter) -> Self {
        Self {
            scene,
            painter: Some(painter),
        }
    }

    /// Get a mutable reference to the underlying Scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }
}

impl<'a> Graphics for VelloGraphics<'a> {
    fn fill(
        &mut self,
        fill_rule: Fill,
        transform: Affine,
        brush: &Brush,
        brush_transform: Option<Affine>,
        shape: &BezPath,
    ) {
        self.scene.fill(fill_rule, transform, brush, brush_transform, shape);
    }

    fn stroke(
        &mut self,
        style: &Stroke,
        transform: Affine,
        brush: &Brush,
        brush_transform: Option<Affine>,
        shape: &BezPath,
    ) {
        self.scene.stroke(style, transform, brush, brush_transform, shape);
    }

    fn draw_text(&mut self, text: &str, origin: Point, font_size: f32, color: Color) {
        if let Some(painter) = self.painter.as_deref_mut() {
            painter.draw_text(self.scene, text, origin, font_size, color);
        }
    }

    fn draw_icon(&mut self, icon: IconHandle, rect: Rect, tint: Color) {
        if let Some(painter) = self.painter.as_deref_mut() {
            painter.draw_icon(self.scene, icon, rect, tint);
        }
    }
}
