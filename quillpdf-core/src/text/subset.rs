//! Glyph subset bookkeeping for embedded TrueType fonts

use crate::text::fonts::TrueTypeFont;
use indexmap::IndexMap;

/// Maps the glyphs of a font program that are actually used to a compact
/// numbering starting at 0.
///
/// Glyph 0 (`.notdef`) is always part of the subset and keeps id 0. New
/// glyphs receive the next free id in the order they are first seen, which
/// is also the order the filtered font lists them in. Once frozen the
/// mapping no longer grows.
#[derive(Debug, Clone)]
pub struct GlyphSubset {
    glyphs: IndexMap<u16, u16>,
    frozen: bool,
}

impl GlyphSubset {
    pub fn new() -> Self {
        let mut glyphs = IndexMap::new();
        glyphs.insert(0, 0);
        Self {
            glyphs,
            frozen: false,
        }
    }

    /// Compacted id for `original`, adding it to the subset if needed.
    ///
    /// The components of a composite glyph are added right after it so the
    /// filtered font stays self-contained. A glyph seen for the first time
    /// after [`freeze`](Self::freeze) maps to `.notdef`.
    pub fn map_glyph(&mut self, original: u16, font: &TrueTypeFont) -> u16 {
        if let Some(&compacted) = self.glyphs.get(&original) {
            return compacted;
        }
        if self.frozen {
            tracing::warn!(
                glyph = original,
                "glyph used after the font subset was frozen, rendering .notdef"
            );
            return 0;
        }

        let compacted = self.insert(original);
        self.include_components(original, font);
        compacted
    }

    fn include_components(&mut self, glyph: u16, font: &TrueTypeFont) {
        // Broken components surface when the glyph table is filtered
        for component in font.components(glyph).unwrap_or_default() {
            if !self.glyphs.contains_key(&component) {
                self.insert(component);
                self.include_components(component, font);
            }
        }
    }

    fn insert(&mut self, original: u16) -> u16 {
        let compacted = self.glyphs.len() as u16;
        self.glyphs.insert(original, compacted);
        compacted
    }

    pub fn get(&self, original: u16) -> Option<u16> {
        self.glyphs.get(&original).copied()
    }

    /// Original glyph ids indexed by their compacted id.
    pub fn ordered_ids(&self) -> Vec<u16> {
        self.glyphs.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl Default for GlyphSubset {
    fn default() -> Self {
        Self::new()
    }
}
