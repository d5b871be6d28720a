// SPDX-License-Identifier: MIT OR Apache-2.0
use vello::kurbo::{Affine, BezPath, Point, Rect, Stroke};
use vello::peniko::{Brush, Color, Fill};

use crate::menu::item::IconHandle;
use crate::vgi::Graphics;

/// One recorded drawing operation. Paths are stored with their transform applied.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// A filled path.
    Fill {
        /// The path, in target coordinates.
        path: BezPath,
        /// The brush it was filled with.
        brush: Brush,
    },
    /// A stroked path.
    Stroke {
        /// The path, in target coordinates.
        path: BezPath,
        /// Stroke width.
        width: f64,
        /// The brush it was stroked with.
        brush: Brush,
    },
    /// A line of text.
    Text {
        /// The text.
        text: String,
        /// See [Graphics::draw_text].
        origin: Point,
        /// Font size.
        font_size: f32,
        /// Text colour.
        color: Color,
    },
    /// An icon.
    Icon {
        /// The icon handle.
        icon: IconHandle,
        /// Target rectangle.
        rect: Rect,
        /// Tint colour.
        tint: Color,
    },
}

/// Records [Graphics] calls instead of rendering them.
///
/// Used by hosts that rasterise elsewhere and by tests that inspect what a
/// popup would draw.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands in paint order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Texts drawn, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Colour a given text was drawn with, if it was drawn.
    pub fn text_color(&self, needle: &str) -> Option<Color> {
        self.commands.iter().find_map(|cmd| match cmd {
            DrawCommand::Text { text, color, .. } if text == needle => Some(*color),
            _ => None,
        })
    }

    /// Solid colours of all fills, in paint order.
    pub fn fill_colors(&self) -> Vec<Color> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Fill {
                    brush: Brush::Solid(color),
                    ..
                } => Some(*color),
                _ => None,
            })
            .collect()
    }
}

impl Graphics for DisplayList {
    fn fill(
        &mut self,
        _fill_rule: Fill,
        transform: Affine,
        brush: &Brush,
        _brush_transform: Option<Affine>,
        shape: &BezPath,
    ) {
        let mut path = shape.clone();
        path.apply_affine(transform);
        self.commands.push(DrawCommand::Fill {
            path,
            brush: brush.clone(),
        });
    }

    fn stroke(
        &mut self,
        style: &Stroke,
        transform: Affine,
        brush: &Brush,
        _brush_transform: Option<Affine>,
        shape: &BezPath,
    ) {
        let mut path = shape.clone();
        path.apply_affine(transform);
        self.commands.push(DrawCommand::Stroke {
            path,
            width: style.width,
            brush: brush.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, font_size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font_size,
            color,
        });
    }

    fn draw_icon(&mut self, icon: IconHandle, rect: Rect, tint: Color) {
        self.commands.push(DrawCommand::Icon { icon, rect, tint });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vgi::shape_to_path;
    use vello::kurbo::Shape;

    #[test]
    fn fills_are_recorded_in_target_space() {
        let mut list = DisplayList::new();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        list.fill(
            Fill::NonZero,
            Affine::translate((5.0, 7.0)),
            &Brush::Solid(Color::from_rgb8(1, 2, 3)),
            None,
            &shape_to_path(&rect),
        );

        let DrawCommand::Fill { path, .. } = &list.commands()[0] else {
            panic!("expected a fill");
        };
        let bounds = path.bounding_box();
        assert_eq!(bounds, Rect::new(5.0, 7.0, 15.0, 17.0));
        assert_eq!(list.fill_colors().len(), 1);
    }

    #[test]
    fn texts_keep_paint_order() {
        let mut list = DisplayList::new();
        list.draw_text("Cut", Point::ZERO, 13.0, Color::BLACK);
        list.draw_text("Ctrl+X", Point::ZERO, 12.0, Color::WHITE);
        assert_eq!(list.texts(), vec!["Cut", "Ctrl+X"]);
        assert!(list.text_color("Paste").is_none());
        list.clear();
        assert!(list.commands().is_empty());
    }
}
