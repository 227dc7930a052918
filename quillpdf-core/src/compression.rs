//! Stream filters applied to stream payloads before they are written

use crate::error::{PdfError, Result};

/// Filter used to encode the payload of a [`Stream`](crate::objects::Stream).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamFilter {
    /// No transformation; no `/Filter` entry is emitted.
    #[default]
    Identity,
    /// zlib/deflate compression, emitted as `/Filter /FlateDecode`.
    Deflate,
}

impl StreamFilter {
    /// Filter name written into the stream dictionary, if any.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            StreamFilter::Identity => None,
            StreamFilter::Deflate => Some("FlateDecode"),
        }
    }

    /// Concatenates `chunks` and applies the filter to the result.
    pub fn compress(&self, chunks: &[Vec<u8>]) -> Result<Vec<u8>> {
        match self {
            StreamFilter::Identity => Ok(concat(chunks)),
            StreamFilter::Deflate => deflate(chunks),
        }
    }

    /// Filter used for page content streams: deflate when compression is
    /// compiled in and requested.
    pub fn for_content(compress: bool) -> Self {
        if compress && cfg!(feature = "compression") {
            StreamFilter::Deflate
        } else {
            StreamFilter::Identity
        }
    }
}

fn concat(chunks: &[Vec<u8>]) -> Vec<u8> {
    let size = chunks.iter().map(Vec::len).sum();
    let mut data = Vec::with_capacity(size);
    for chunk in chunks {
        data.extend_from_slice(chunk);
    }
    data
}

#[cfg(feature = "compression")]
fn deflate(chunks: &[Vec<u8>]) -> Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    for chunk in chunks {
        encoder
            .write_all(chunk)
            .map_err(|e| PdfError::CompressionError(e.to_string()))?;
    }
    encoder
        .finish()
        .map_err(|e| PdfError::CompressionError(e.to_string()))
}

#[cfg(not(feature = "compression"))]
fn deflate(_chunks: &[Vec<u8>]) -> Result<Vec<u8>> {
    Err(PdfError::CompressionError(
        "deflate requires the `compression` feature".to_string(),
    ))
}
