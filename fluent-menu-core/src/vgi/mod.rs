//! Vector Graphics Interface abstraction.
//!
//! Popups paint through [Graphics] so they stay decoupled from the rendering
//! backend. Shapes go through as kurbo paths; text and icons are handed back to
//! the host, which owns shaping and image decoding.

use vello::kurbo::{Affine, BezPath, Point, Rect, Shape, Stroke};
use vello::peniko::{Brush, Color, Fill};

use crate::menu::item::IconHandle;

/// A trait for rendering vector graphics.
///
/// Note: Methods use `&BezPath` for object-safety. To use concrete shape types
/// (Rect, RoundedRect, Line, etc.), convert them with [shape_to_path].
pub trait Graphics {
    /// Fill a shape with the given brush.
    fn fill(
        &mut self,
        fill_rule: Fill,
        transform: Affine,
        brush: &Brush,
        brush_transform: Option<Affine>,
        shape: &BezPath,
    );

    /// Stroke a shape with the given brush.
    fn stroke(
        &mut self,
        style: &Stroke,
        transform: Affine,
        brush: &Brush,
        brush_transform: Option<Affine>,
        shape: &BezPath,
    );

    /// Draw a single line of text.
    ///
    /// `origin` is the left end of the line's vertical centre, already transformed.
    fn draw_text(&mut self, text: &str, origin: Point, font_size: f32, color: Color);

    /// Draw a host-resolved icon into `rect`, tinted with `tint`.
    fn draw_icon(&mut self, icon: IconHandle, rect: Rect, tint: Color);
}

/// Helper function to convert a shape to BezPath for use with Graphics trait.
pub fn shape_to_path(shape: &impl Shape) -> BezPath {
    shape.to_path(0.1)
}

/// A recording [Graphics] implementation.
pub mod display_list;

/// A default graphics implementation using Vello.
pub mod vello_vg;

pub use display_list::{DisplayList, DrawCommand};
pub use vello_vg::{ContentPainter, VelloGraphics};
