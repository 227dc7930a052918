use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Failed to load font {}: {source}", path.display())]
    FontLoad {
        path: PathBuf,
        #[source]
        source: Box<PdfError>,
    },

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Unknown kind of PDF object, no: {0}")]
    UnknownObjectKind(u32),

    #[error("Object was serialized before it was numbered")]
    UnnumberedObject,

    #[error("{}", join_errors(.0))]
    Build(Vec<PdfError>),
}

pub type Result<T> = std::result::Result<T, PdfError>;

fn join_errors(errors: &[PdfError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
