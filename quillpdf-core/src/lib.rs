//! # quillpdf
//!
//! PDF generation from a graph of pages, fonts, images and bookmarks.
//!
//! ## Features
//!
//! - **Lazy numbering**: objects get their numbers when the document is built,
//!   and every object is written exactly once no matter how many pages share it
//! - **Balanced page trees**: page lists never hold more than a configurable
//!   number of children
//! - **Compact cross-reference tables**: consecutive object numbers share one
//!   subsection
//! - **Font subsetting**: embedded TrueType fonts carry only the glyphs the
//!   document uses
//! - **Compression**: content and font streams are deflated with the default
//!   `compression` feature
//!
//! ## Quick Start
//!
//! ```rust
//! use quillpdf::graphics::{Color, Line};
//! use quillpdf::{Document, Rectangle, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new(Rectangle::a4());
//! let font = doc.add_type1_font("Helvetica");
//!
//! let page = doc.add_page();
//! doc.page(page)?
//!     .write_text(50, 50, font, 24, "Hello, PDF!")?
//!     .draw(&Line::new(50, 90, 300, 90, 2).color(Color::blue()))?;
//!
//! let bytes = doc.write(Vec::new())?;
//! assert!(bytes.ends_with(b"%%EOF"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Embedding fonts
//!
//! ```rust,no_run
//! use quillpdf::{Document, Rectangle};
//!
//! # fn main() -> quillpdf::Result<()> {
//! let mut doc = Document::new(Rectangle::a4());
//! let font = doc.load_font("fonts/NotoSans-Regular.ttf")?;
//! let page = doc.add_page();
//! doc.page(page)?.write_text(72, 72, font, 12, "Grüße")?;
//! doc.save("greeting.pdf")?;
//! # Ok(())
//! # }
//! ```

pub mod compression;
pub mod document;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod objects;
pub mod page;
pub mod resources;
pub mod structure;
pub mod text;
pub mod writer;

// Re-export commonly used types
pub use document::{Document, DocumentConfig, PageEditor};
pub use error::{PdfError, Result};
pub use geometry::{Point, Rectangle};
pub use graphics::{Color, ImagePlacement, ImageResource};
pub use page::PageHandle;
pub use structure::OutlineDestination;
pub use text::{CMap, FontHandle};

/// Current version of quillpdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
