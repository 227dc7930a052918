//! CIDFonts: the descendant fonts of Type0 composite fonts
//!
//! A CIDFont addresses glyphs by CID. Non-embedded fonts use the Adobe Type 1
//! based `CIDFontType0` flavor and are shown with UTF-16 codes; embedded
//! TrueType programs become `CIDFontType2` fonts whose CIDs are the glyph ids
//! of the subset written into the file.

use crate::compression::StreamFilter;
use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::text::fonts::TrueTypeFont;
use crate::text::subset::GlyphSubset;
use bitflags::bitflags;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::fmt;

/// A predefined CMap mapping character codes to CIDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMap {
    name: Cow<'static, str>,
}

impl CMap {
    /// 2-byte codes map to the same CID, written horizontally.
    pub const IDENTITY_H: CMap = CMap::predefined_static("Identity-H");
    /// Vertical version of `Identity-H`.
    pub const IDENTITY_V: CMap = CMap::predefined_static("Identity-V");

    const fn predefined_static(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    pub fn predefined(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Character collection a CIDFont or CMap refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CidSystemInfo {
    registry: Cow<'static, str>,
    ordering: Cow<'static, str>,
    supplement: u32,
}

macro_rules! adobe_collection {
    ($($(#[$doc:meta])* $name:ident => ($ordering:literal, $supplement:literal)),* $(,)?) => {
        impl CidSystemInfo {
            $(
                $(#[$doc])*
                pub const $name: CidSystemInfo = CidSystemInfo {
                    registry: Cow::Borrowed("Adobe"),
                    ordering: Cow::Borrowed($ordering),
                    supplement: $supplement,
                };
            )*
        }
    };
}

adobe_collection! {
    /// Collection for fonts that are not CID-keyed
    ADOBE_IDENTITY_0 => ("Identity", 0),
    /// Traditional Chinese
    ADOBE_CNS1_1 => ("CNS1", 1),
    ADOBE_CNS1_2 => ("CNS1", 2),
    ADOBE_CNS1_3 => ("CNS1", 3),
    ADOBE_CNS1_4 => ("CNS1", 4),
    ADOBE_CNS1_5 => ("CNS1", 5),
    ADOBE_CNS1_6 => ("CNS1", 6),
    ADOBE_CNS1_7 => ("CNS1", 7),
    /// Simplified Chinese
    ADOBE_GB1_1 => ("GB1", 1),
    ADOBE_GB1_2 => ("GB1", 2),
    ADOBE_GB1_3 => ("GB1", 3),
    ADOBE_GB1_4 => ("GB1", 4),
    ADOBE_GB1_5 => ("GB1", 5),
    /// Japanese
    ADOBE_JAPAN1_1 => ("Japan1", 1),
    ADOBE_JAPAN1_2 => ("Japan1", 2),
    ADOBE_JAPAN1_3 => ("Japan1", 3),
    ADOBE_JAPAN1_4 => ("Japan1", 4),
    ADOBE_JAPAN1_5 => ("Japan1", 5),
    ADOBE_JAPAN1_6 => ("Japan1", 6),
    /// Korean
    ADOBE_KOREA1_1 => ("Korea1", 1),
    ADOBE_KOREA1_2 => ("Korea1", 2),
}

impl CidSystemInfo {
    pub fn new(
        registry: impl Into<String>,
        ordering: impl Into<String>,
        supplement: u32,
    ) -> Self {
        Self {
            registry: Cow::Owned(registry.into()),
            ordering: Cow::Owned(ordering.into()),
            supplement,
        }
    }

    fn to_dictionary(&self) -> Dictionary {
        Dictionary::new()
            .with("Registry", Object::String(self.registry.to_string()))
            .with("Ordering", Object::String(self.ordering.to_string()))
            .with("Supplement", self.supplement)
    }
}

impl fmt::Display for CidSystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.registry, self.ordering, self.supplement)
    }
}

bitflags! {
    /// Font descriptor flags (PDF 32000-1:2008, table 123)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontFlags: u32 {
        const FIXED_PITCH = 1;
        const SERIF = 1 << 1;
        const SYMBOLIC = 1 << 2;
        const SCRIPT = 1 << 3;
        const NONSYMBOLIC = 1 << 5;
        const ITALIC = 1 << 6;
        const ALL_CAP = 1 << 16;
        const SMALL_CAP = 1 << 17;
        const FORCE_BOLD = 1 << 18;
    }
}

/// Font-wide metrics and attributes of a CIDFont.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub font_name: String,
    pub flags: FontFlags,
    pub font_bbox: Rectangle,
    pub italic_angle: i32,
    pub ascent: i32,
    pub descent: i32,
    pub cap_height: i32,
    pub stem_v: i32,
}

impl FontDescriptor {
    /// Descriptor with generic metrics suitable for most text faces.
    pub fn new(font_name: impl Into<String>) -> Self {
        Self {
            font_name: font_name.into(),
            flags: FontFlags::SYMBOLIC,
            font_bbox: Rectangle::from_coords(-538, -374, 1254, 1418),
            italic_angle: 0,
            ascent: 1418,
            descent: -374,
            cap_height: 763,
            stem_v: 116,
        }
    }

    pub fn compile(&self, font_file2: Option<ObjectId>) -> String {
        let mut dict = Dictionary::new()
            .with("Type", Object::name("FontDescriptor"))
            .with("FontName", Object::name(self.font_name.as_str()))
            .with("Flags", self.flags.bits())
            .with("FontBBox", Object::Raw(self.font_bbox.to_string()))
            .with("ItalicAngle", self.italic_angle)
            .with("Ascent", self.ascent)
            .with("Descent", self.descent)
            .with("CapHeight", self.cap_height)
            .with("StemV", self.stem_v);
        if let Some(id) = font_file2 {
            dict.set("FontFile2", id);
        }
        dict.to_string()
    }
}

#[derive(Debug, Clone)]
struct EmbeddedProgram {
    font: TrueTypeFont,
    subset: GlyphSubset,
    stream: Stream,
}

/// Descendant font of a composite font.
#[derive(Debug, Clone)]
pub struct CidFont {
    base_font: String,
    system_info: CidSystemInfo,
    descriptor: FontDescriptor,
    default_width: u32,
    widths: Vec<u32>,
    program: Option<EmbeddedProgram>,
}

impl CidFont {
    /// A `CIDFontType0` font the viewer is expected to supply.
    pub fn type0(
        base_font: impl Into<String>,
        system_info: CidSystemInfo,
        descriptor: FontDescriptor,
    ) -> Self {
        Self {
            base_font: base_font.into(),
            system_info,
            descriptor,
            default_width: 0,
            widths: Vec::new(),
            program: None,
        }
    }

    /// A `CIDFontType2` font embedding a subset of `font`.
    pub fn embedded(font: TrueTypeFont) -> Self {
        let base_font = font
            .postscript_name()
            .unwrap_or_else(|| "unknown".to_string());
        let mut stream = Stream::new(StreamFilter::for_content(true));
        stream.dictionary_mut().set("Length1", 0usize);

        Self {
            descriptor: FontDescriptor::new(base_font.clone()),
            base_font,
            system_info: CidSystemInfo::ADOBE_IDENTITY_0,
            default_width: 0,
            widths: Vec::new(),
            program: Some(EmbeddedProgram {
                font,
                subset: GlyphSubset::new(),
                stream,
            }),
        }
    }

    pub fn subtype(&self) -> &'static str {
        if self.program.is_some() {
            "CIDFontType2"
        } else {
            "CIDFontType0"
        }
    }

    /// PostScript name, subset-tagged once an embedded font is finalized.
    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    /// `BaseFont` of the parent Type0 font.
    pub fn parent_base_font(&self, cmap: &CMap) -> String {
        if self.program.is_some() {
            self.base_font.clone()
        } else {
            format!("{}-{}", self.base_font, cmap.name())
        }
    }

    pub fn system_info(&self) -> &CidSystemInfo {
        &self.system_info
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    pub fn is_embedded(&self) -> bool {
        self.program.is_some()
    }

    pub fn glyph_subset(&self) -> Option<&GlyphSubset> {
        self.program.as_ref().map(|program| &program.subset)
    }

    /// Widths of the subset glyphs in 1/1000 em, indexed by CID.
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn default_width(&self) -> u32 {
        self.default_width
    }

    /// Identity of the `FontFile2` stream of an embedded font.
    pub fn program_id(&self) -> Option<ObjectId> {
        self.program.as_ref().map(|program| program.stream.id())
    }

    pub(crate) fn program_id_mut(&mut self) -> Option<&mut ObjectId> {
        self.program
            .as_mut()
            .map(|program| program.stream.id_mut())
    }

    pub fn compile_program(&self) -> Option<Result<Vec<u8>>> {
        self.program.as_ref().map(|program| program.stream.compile())
    }

    /// Hex string of the codes showing `text`. Embedded fonts add every glyph
    /// they meet to the subset.
    pub fn encode(&mut self, text: &str) -> String {
        let mut hex = String::with_capacity(text.len() * 4);
        match &mut self.program {
            None => {
                for unit in text.encode_utf16() {
                    hex.push_str(&format!("{unit:04X}"));
                }
            }
            Some(EmbeddedProgram { font, subset, .. }) => {
                for ch in text.chars() {
                    let glyph = font.glyph_id(ch).unwrap_or_else(|| {
                        tracing::warn!(
                            character = %ch.escape_unicode(),
                            font = %self.base_font,
                            "no glyph for character, rendering .notdef"
                        );
                        0
                    });
                    hex.push_str(&format!("{:04X}", subset.map_glyph(glyph, font)));
                }
            }
        }
        hex
    }

    /// Subsets the embedded program to the glyphs used so far.
    ///
    /// Runs once; the glyph subset is frozen on entry. Non-embedded fonts
    /// have nothing to finalize.
    pub fn finalize(&mut self) -> Result<()> {
        let Some(program) = self.program.as_mut() else {
            return Ok(());
        };
        if program.subset.is_frozen() {
            if program.stream.chunks().is_empty() {
                return Err(PdfError::FontError(format!(
                    "subset of {} was frozen by a failed build",
                    self.base_font
                )));
            }
            return Ok(());
        }
        program.subset.freeze();

        let glyphs = program.subset.ordered_ids();
        let filtered = program.font.filter_glyphs(&glyphs)?;
        let units_per_em = filtered.units_per_em() as u32;
        let widths: Vec<u32> = filtered
            .glyph_widths()
            .into_iter()
            .map(|advance| advance as u32 * 1000 / units_per_em)
            .collect();
        let binary = filtered.rebuild_binary()?;

        tracing::debug!(
            font = %self.base_font,
            glyphs = glyphs.len(),
            bytes = binary.len(),
            "subset embedded font"
        );

        program
            .stream
            .dictionary_mut()
            .set("Length1", binary.len());
        program.stream.add_bytes(binary);

        self.default_width = widths.last().copied().unwrap_or(0);
        self.widths = widths;
        self.base_font = format!("{}+{}", subset_tag(&glyphs), self.base_font);
        self.descriptor.font_name = self.base_font.clone();
        Ok(())
    }

    /// The CIDFont dictionary, inlined into its parent's `DescendantFonts`.
    pub fn compile(&self) -> String {
        let mut dict = Dictionary::new()
            .with("Type", Object::name("Font"))
            .with("BaseFont", Object::name(self.base_font.as_str()))
            .with("Subtype", Object::name(self.subtype()))
            .with("CIDSystemInfo", self.system_info.to_dictionary())
            .with(
                "FontDescriptor",
                Object::Raw(self.descriptor.compile(self.program_id())),
            );
        if self.program.is_some() {
            dict.set("CIDToGIDMap", Object::name("Identity"));
        }
        if self.default_width > 0 {
            dict.set("DW", self.default_width);
        }
        if !self.widths.is_empty() {
            let widths = self
                .widths
                .iter()
                .map(|&w| Object::from(w))
                .collect::<Vec<_>>();
            dict.set("W", vec![Object::Integer(0), Object::Array(widths)]);
        }
        dict.to_string()
    }
}

/// Six uppercase letters derived from the glyph list, marking the font as
/// a subset.
fn subset_tag(glyphs: &[u16]) -> String {
    let mut hasher = Sha256::new();
    for glyph in glyphs {
        hasher.update(glyph.to_be_bytes());
    }
    hasher
        .finalize()
        .iter()
        .take(6)
        .map(|byte| (b'A' + byte % 26) as char)
        .collect()
}
