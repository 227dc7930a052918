//! Serialization of a numbered document graph into PDF bytes

mod pdf_writer;
mod trailer;
mod xref;

pub use pdf_writer::PdfWriter;
pub use trailer::Trailer;
pub use xref::{CrossRefEntry, CrossRefTable};
