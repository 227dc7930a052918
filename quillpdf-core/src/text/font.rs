use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::cid_font::{CMap, CidFont};

/// Handle to a font registered with a [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub(crate) usize);

/// The two font dictionary flavors the document can write.
#[derive(Debug, Clone)]
pub enum FontKind {
    /// A simple font from the standard Type 1 set, e.g. `Helvetica`.
    Type1 { base_font: String },
    /// A Type0 font taking its glyphs from a CIDFont through a CMap.
    Composite { cmap: CMap, descendant: CidFont },
}

/// A font dictionary together with the name it is registered under in
/// resource dictionaries.
#[derive(Debug, Clone)]
pub struct Font {
    id: ObjectId,
    resource_name: String,
    kind: FontKind,
}

impl Font {
    pub fn type1(resource_name: impl Into<String>, base_font: impl Into<String>) -> Self {
        Self {
            id: ObjectId::unassigned(),
            resource_name: resource_name.into(),
            kind: FontKind::Type1 {
                base_font: base_font.into(),
            },
        }
    }

    pub fn composite(resource_name: impl Into<String>, cmap: CMap, descendant: CidFont) -> Self {
        Self {
            id: ObjectId::unassigned(),
            resource_name: resource_name.into(),
            kind: FontKind::Composite { cmap, descendant },
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn id_mut(&mut self) -> &mut ObjectId {
        &mut self.id
    }

    /// Name in resource dictionaries, without the leading slash.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn kind(&self) -> &FontKind {
        &self.kind
    }

    pub fn subtype(&self) -> &'static str {
        match self.kind {
            FontKind::Type1 { .. } => "Type1",
            FontKind::Composite { .. } => "Type0",
        }
    }

    pub fn base_font(&self) -> String {
        match &self.kind {
            FontKind::Type1 { base_font } => base_font.clone(),
            FontKind::Composite { cmap, descendant } => descendant.parent_base_font(cmap),
        }
    }

    /// Embedded font program stream, if the font carries one.
    pub fn program_id(&self) -> Option<ObjectId> {
        match &self.kind {
            FontKind::Composite { descendant, .. } => descendant.program_id(),
            FontKind::Type1 { .. } => None,
        }
    }

    pub(crate) fn program_id_mut(&mut self) -> Option<&mut ObjectId> {
        match &mut self.kind {
            FontKind::Composite { descendant, .. } => descendant.program_id_mut(),
            FontKind::Type1 { .. } => None,
        }
    }

    pub fn compile_program(&self) -> Option<Result<Vec<u8>>> {
        match &self.kind {
            FontKind::Composite { descendant, .. } => descendant.compile_program(),
            FontKind::Type1 { .. } => None,
        }
    }

    /// Freezes and embeds the glyph subset of an embedded font.
    pub fn finalize(&mut self) -> Result<()> {
        match &mut self.kind {
            FontKind::Composite { descendant, .. } => descendant.finalize(),
            FontKind::Type1 { .. } => Ok(()),
        }
    }

    pub fn compile(&self) -> String {
        let mut dict = Dictionary::new()
            .with("Type", Object::name("Font"))
            .with("BaseFont", Object::name(self.base_font()))
            .with("Subtype", Object::name(self.subtype()));
        if let FontKind::Composite { cmap, descendant } = &self.kind {
            dict.set("Encoding", Object::name(cmap.name()));
            dict.set(
                "DescendantFonts",
                vec![Object::Raw(descendant.compile())],
            );
        }
        self.id.bracket(&dict.to_string())
    }

    /// Text object showing `text` with its first baseline at `(x, y)`.
    ///
    /// Lines are separated by `\n` and advanced with `T*`, using the font
    /// size as leading.
    pub fn create_text(&mut self, x: i32, y: i32, font_size: i32, text: &str) -> String {
        let shows = text
            .split('\n')
            .map(|line| format!("<{}> Tj", self.encode(line)))
            .collect::<Vec<_>>();
        format!(
            "BT\n{x} {y} Td {font_size} TL \n/{} {font_size}. Tf\n{}\nET\n",
            self.resource_name,
            shows.join(" T*\n")
        )
    }

    fn encode(&mut self, line: &str) -> String {
        match &mut self.kind {
            FontKind::Type1 { .. } => line
                .encode_utf16()
                .map(|unit| format!("{unit:04X}"))
                .collect(),
            FontKind::Composite { descendant, .. } => descendant.encode(line),
        }
    }
}
