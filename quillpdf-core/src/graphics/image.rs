//! Image XObjects and their placement on a page

use crate::compression::StreamFilter;
use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::graphics::ColorSpace;
use crate::objects::{Object, ObjectId, Stream};

/// Handle to an image registered with a [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub(crate) usize);

/// Raw image samples embedded as an image XObject.
///
/// Samples are stored row by row without padding beyond the byte boundary
/// at the end of each row.
#[derive(Debug, Clone)]
pub struct ImageResource {
    width: u32,
    height: u32,
    color_space: ColorSpace,
    bits_per_component: u8,
    stream: Stream,
}

impl ImageResource {
    pub fn new(
        width: u32,
        height: u32,
        color_space: ColorSpace,
        bits_per_component: u8,
        data: Vec<u8>,
    ) -> Result<Self> {
        Self::with_filter(
            width,
            height,
            color_space,
            bits_per_component,
            data,
            StreamFilter::Identity,
        )
    }

    pub fn with_filter(
        width: u32,
        height: u32,
        color_space: ColorSpace,
        bits_per_component: u8,
        data: Vec<u8>,
        filter: StreamFilter,
    ) -> Result<Self> {
        if !matches!(bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(PdfError::InvalidStructure(format!(
                "unsupported bits per component: {bits_per_component}"
            )));
        }
        let row_bits = width as usize * color_space.components() * bits_per_component as usize;
        let expected = row_bits.div_ceil(8) * height as usize;
        if data.len() != expected {
            return Err(PdfError::InvalidStructure(format!(
                "image of {width}x{height} needs {expected} bytes of samples, got {}",
                data.len()
            )));
        }

        let mut stream = Stream::new(filter);
        let dict = stream.dictionary_mut();
        dict.set("Type", Object::name("XObject"));
        dict.set("Subtype", Object::name("Image"));
        dict.set("Width", width);
        dict.set("Height", height);
        dict.set("BitsPerComponent", bits_per_component as u32);
        dict.set("ColorSpace", Object::name(color_space.pdf_name()));
        stream.add_bytes(data);

        Ok(Self {
            width,
            height,
            color_space,
            bits_per_component,
            stream,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn bits_per_component(&self) -> u8 {
        self.bits_per_component
    }

    pub fn id(&self) -> ObjectId {
        self.stream.id()
    }

    pub(crate) fn id_mut(&mut self) -> &mut ObjectId {
        self.stream.id_mut()
    }

    pub fn compile(&self) -> Result<Vec<u8>> {
        self.stream.compile()
    }
}

/// Where and how an image is painted: centered on a point measured from the
/// crop box's top-left corner, scaled to `width` x `height` and rotated
/// counter-clockwise by `rotation` radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl ImagePlacement {
    /// Placement at the image's natural size (one unit per sample).
    pub fn new(image: &ImageResource, center_x: f64, center_y: f64) -> Self {
        Self {
            center_x,
            center_y,
            width: image.width() as f64,
            height: image.height() as f64,
            rotation: 0.0,
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn rotate(mut self, radians: f64) -> Self {
        self.rotation = radians;
        self
    }

    /// Renders the `cm`/`Do` sequence painting the XObject registered under
    /// `name` in the page resources.
    pub fn render(&self, name: &str, frame: &Rectangle) -> String {
        let (sin, cos) = self.rotation.sin_cos();
        let a = self.width * cos;
        let b = self.width * sin;
        let c = -self.height * sin;
        let d = self.height * cos;
        let half_x = 0.5 * self.width * cos - 0.5 * self.height * sin;
        let half_y = 0.5 * self.width * sin + 0.5 * self.height * cos;
        let e = frame.left() as f64 + self.center_x - half_x;
        let f = frame.top() as f64 - self.center_y - half_y;
        format!("q {a:.4} {b:.4} {c:.4} {d:.4} {e:.4} {f:.4} cm /{name} Do Q\n")
    }
}
