//! Drawing primitives rendered as content-stream operators

mod color;
mod image;
mod path;

pub use color::{Color, ColorSpace};
pub use image::{ImageHandle, ImagePlacement, ImageResource};
pub use path::{DashPattern, Line, LineCap, LineJoin, RectangleShape};

use crate::geometry::Rectangle;

/// Something that can be painted onto a page.
///
/// `frame` is the page's effective crop box; implementations position
/// themselves relative to its top-left corner.
pub trait Graphic {
    fn render(&self, frame: &Rectangle) -> String;
}
