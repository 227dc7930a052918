//! Font program codecs

pub mod truetype;

#[cfg(test)]
pub(crate) mod test_utils;

pub use truetype::{CmapSubtable, TrueTypeFont};
