//! Fonts and text placement

pub mod cid_font;
mod font;
pub mod fonts;
pub mod subset;

pub use cid_font::{CMap, CidFont, CidSystemInfo, FontDescriptor, FontFlags};
pub use font::{Font, FontHandle, FontKind};
pub use fonts::TrueTypeFont;
pub use subset::GlyphSubset;
