use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::graphics::{Graphic, ImageHandle, ImagePlacement, ImageResource};
use crate::objects::{ObjectCounter, ObjectId};
use crate::page::PageHandle;
use crate::resources::{ResourceHandle, Resources};
use crate::structure::{Outline, OutlineDestination, OutlineItemHandle, PageTree};
use crate::text::fonts::TrueTypeFont;
use crate::text::{CMap, CidFont, Font, FontHandle};
use crate::writer::PdfWriter;
use std::io::Write;
use std::path::Path;

mod config;
mod graph;

pub use config::DocumentConfig;
pub use graph::{CompiledObject, NodeRef, ObjectGraph};

/// An image together with the name it is registered under.
#[derive(Debug, Clone)]
struct NamedImage {
    name: String,
    image: ImageResource,
}

/// A PDF document under construction.
///
/// The document owns every page, font, image and resource dictionary;
/// callers hold copyable handles to them. Fonts and images are added to the
/// document once and may then be referenced from any number of pages.
///
/// # Example
///
/// ```rust
/// use quillpdf::{Document, Rectangle};
///
/// let mut doc = Document::new(Rectangle::a4());
/// let helvetica = doc.add_type1_font("Helvetica");
/// let page = doc.add_page();
/// doc.page(page)?.write_text(72, 72, helvetica, 12, "Hello")?;
/// let bytes = doc.write(Vec::new())?;
/// assert!(bytes.starts_with(b"%PDF-1.7"));
/// # Ok::<(), quillpdf::PdfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    config: DocumentConfig,
    tree: PageTree,
    resources: Vec<Resources>,
    fonts: Vec<Font>,
    images: Vec<NamedImage>,
    outline: Option<Outline>,
    counter: ObjectCounter,
}

impl Document {
    /// Resource dictionary shared by every page without its own.
    const DEFAULT_RESOURCES: ResourceHandle = ResourceHandle(0);

    /// Creates an empty document whose pages default to `media_box`.
    pub fn new(media_box: Rectangle) -> Self {
        Self::with_config(media_box, DocumentConfig::default())
    }

    pub fn with_config(media_box: Rectangle, config: DocumentConfig) -> Self {
        let mut tree = PageTree::new(Some(media_box), None);
        tree.set_root_resources(Self::DEFAULT_RESOURCES);
        Self {
            config,
            tree,
            resources: vec![Resources::new()],
            fonts: Vec::new(),
            images: Vec::new(),
            outline: None,
            counter: ObjectCounter::new(),
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Sets the crop box inherited by pages that do not set their own.
    pub fn set_default_crop_box(&mut self, crop_box: Option<Rectangle>) {
        self.tree.set_root_crop_box(crop_box);
    }

    pub fn page_tree(&self) -> &PageTree {
        &self.tree
    }

    /// Gets the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.tree.page_count()
    }

    /// Adds one of the standard Type 1 fonts, e.g. `Helvetica`.
    pub fn add_type1_font(&mut self, base_font: impl Into<String>) -> FontHandle {
        let name = self.next_font_name();
        self.push_font(Font::type1(name, base_font))
    }

    /// Adds a composite font drawing its glyphs from `descendant`.
    pub fn add_composite_font(&mut self, cmap: CMap, descendant: CidFont) -> FontHandle {
        let name = self.next_font_name();
        self.push_font(Font::composite(name, cmap, descendant))
    }

    /// Loads a TrueType font for subset embedding, using `Identity-H`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::FontLoad`] if the file cannot be read or parsed;
    /// the document is left untouched.
    pub fn load_font(&mut self, path: impl AsRef<Path>) -> Result<FontHandle> {
        self.load_font_with_cmap(path, CMap::IDENTITY_H)
    }

    pub fn load_font_with_cmap(&mut self, path: impl AsRef<Path>, cmap: CMap) -> Result<FontHandle> {
        let path = path.as_ref();
        let font = std::fs::read(path)
            .map_err(PdfError::from)
            .and_then(TrueTypeFont::parse)
            .map_err(|source| PdfError::FontLoad {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;
        tracing::debug!(path = %path.display(), glyphs = font.num_glyphs(), "loaded font");
        Ok(self.add_composite_font(cmap, CidFont::embedded(font)))
    }

    /// Embeds a TrueType font given as bytes, using `Identity-H`.
    pub fn add_font_data(&mut self, data: Vec<u8>) -> Result<FontHandle> {
        let font = TrueTypeFont::parse(data)?;
        Ok(self.add_composite_font(CMap::IDENTITY_H, CidFont::embedded(font)))
    }

    pub fn font(&self, handle: FontHandle) -> Option<&Font> {
        self.fonts.get(handle.0)
    }

    fn next_font_name(&self) -> String {
        format!("F{}", self.fonts.len())
    }

    fn push_font(&mut self, font: Font) -> FontHandle {
        let handle = FontHandle(self.fonts.len());
        self.fonts.push(font);
        handle
    }

    /// Adds an image XObject, registered as `XI0`, `XI1`, ...
    pub fn add_image(&mut self, image: ImageResource) -> ImageHandle {
        let handle = ImageHandle(self.images.len());
        self.images.push(NamedImage {
            name: format!("XI{}", handle.0),
            image,
        });
        handle
    }

    pub fn image(&self, handle: ImageHandle) -> Option<&ImageResource> {
        self.images.get(handle.0).map(|i| &i.image)
    }

    /// Makes `font` available to every page without its own resources.
    pub fn register_font(&mut self, font: FontHandle) -> Result<()> {
        self.attach_font(Self::DEFAULT_RESOURCES, font)
    }

    /// Makes `image` available to every page without its own resources.
    pub fn register_image(&mut self, image: ImageHandle) -> Result<()> {
        self.attach_image(Self::DEFAULT_RESOURCES, image)
    }

    fn attach_font(&mut self, resources: ResourceHandle, font: FontHandle) -> Result<()> {
        let name = self
            .font(font)
            .ok_or_else(|| invalid_handle("font", font.0))?
            .resource_name()
            .to_string();
        let target = self
            .resources
            .get_mut(resources.0)
            .ok_or_else(|| invalid_handle("resources", resources.0))?;
        if !target.has_font(&name) {
            target.add_font(name, font);
        }
        Ok(())
    }

    fn attach_image(&mut self, resources: ResourceHandle, image: ImageHandle) -> Result<()> {
        let name = self
            .images
            .get(image.0)
            .ok_or_else(|| invalid_handle("image", image.0))?
            .name
            .clone();
        let target = self
            .resources
            .get_mut(resources.0)
            .ok_or_else(|| invalid_handle("resources", resources.0))?;
        if !target.has_image(&name) {
            target.add_image(name, image);
        }
        Ok(())
    }

    /// Appends a page inheriting the document's boxes.
    pub fn add_page(&mut self) -> PageHandle {
        self.add_page_with_box(None, None)
    }

    /// Appends a page with its own media and crop box.
    pub fn add_page_with_box(
        &mut self,
        media_box: Option<Rectangle>,
        crop_box: Option<Rectangle>,
    ) -> PageHandle {
        let filter = crate::compression::StreamFilter::for_content(self.config.compress_content);
        self.tree.add_page(media_box, crop_box, filter)
    }

    /// Editor drawing onto `page`.
    pub fn page(&mut self, page: PageHandle) -> Result<PageEditor<'_>> {
        if self.tree.page(page).is_none() {
            return Err(invalid_handle("page", page.0));
        }
        Ok(PageEditor { doc: self, page })
    }

    pub fn outline(&self) -> Option<&Outline> {
        self.outline.as_ref()
    }

    /// Adds a bookmark to `page`, below `parent` or at the top level.
    pub fn add_outline_item(
        &mut self,
        parent: Option<OutlineItemHandle>,
        title: impl Into<String>,
        page: PageHandle,
        destination: OutlineDestination,
    ) -> Result<OutlineItemHandle> {
        if self.tree.page(page).is_none() {
            return Err(invalid_handle("page", page.0));
        }
        self.outline
            .get_or_insert_with(Outline::new)
            .add_item(parent, title, page, destination)
    }

    /// Balances the page tree, numbers every reachable object and embeds
    /// font subsets.
    ///
    /// Numbers handed out by an earlier build are kept. Font errors do not
    /// stop the pass; they are collected into one [`PdfError::Build`].
    pub fn build(&mut self) -> Result<()> {
        self.tree.balance(self.config.page_tree_order)?;

        let mut nodes = Vec::new();
        self.walk(&mut |node| nodes.push(node));

        let mut counter = std::mem::take(&mut self.counter);
        let mut errors = Vec::new();
        for &node in &nodes {
            if let Some(id) = self.identity_mut(node) {
                id.assign(&mut counter);
            }
            if let NodeRef::Font(handle) = node {
                if let Some(Err(e)) = self.fonts.get_mut(handle.0).map(Font::finalize) {
                    errors.push(e);
                }
            }
        }
        self.counter = counter;

        tracing::debug!(
            nodes = nodes.len(),
            objects = self.counter.current(),
            failed = errors.len(),
            "numbered document"
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PdfError::Build(errors))
        }
    }

    /// Builds the document and writes it into `writer`, handing the sink
    /// back on success.
    pub fn write<W: Write>(&mut self, writer: W) -> Result<W> {
        self.write_with(PdfWriter::new_with_writer(writer))
    }

    /// Builds the document and writes it to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails or the file cannot be created
    /// or written.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.write_with(PdfWriter::new(path)?)?;
        Ok(())
    }

    fn write_with<W: Write>(&mut self, mut writer: PdfWriter<W>) -> Result<W> {
        self.build()?;
        writer
            .start(&self.config.version)
            .write_graph(&*self);
        writer.finish(ObjectId::new(ObjectCounter::CATALOG, 0))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Rectangle::a4())
    }
}

fn invalid_handle(kind: &str, index: usize) -> PdfError {
    PdfError::InvalidStructure(format!("unknown {kind} handle {index}"))
}

/// Draws onto one page of a [`Document`].
///
/// Coordinates are measured from the top-left corner of the page's
/// effective crop box, y growing downwards.
#[derive(Debug)]
pub struct PageEditor<'a> {
    doc: &'a mut Document,
    page: PageHandle,
}

impl PageEditor<'_> {
    pub fn handle(&self) -> PageHandle {
        self.page
    }

    /// Effective crop box of the page.
    pub fn crop_box(&self) -> Rectangle {
        self.doc.tree.effective_crop_box(self.page)
    }

    /// Adds `font` to the page's own resources.
    ///
    /// The first call gives the page a resource dictionary of its own; from
    /// then on it no longer sees the document-wide one.
    pub fn add_font(&mut self, font: FontHandle) -> Result<&mut Self> {
        let resources = self.own_resources();
        self.doc.attach_font(resources, font)?;
        Ok(self)
    }

    /// Adds `image` to the page's own resources, like [`add_font`](Self::add_font).
    pub fn add_image(&mut self, image: ImageHandle) -> Result<&mut Self> {
        let resources = self.own_resources();
        self.doc.attach_image(resources, image)?;
        Ok(self)
    }

    /// Writes `text` with its top-left corner at `(x, y)`.
    ///
    /// The font is added to the resources in effect for the page if it is
    /// not there yet.
    pub fn write_text(
        &mut self,
        x: i32,
        y: i32,
        font: FontHandle,
        font_size: i32,
        text: &str,
    ) -> Result<&mut Self> {
        let resources = self.effective_resources();
        self.doc.attach_font(resources, font)?;

        let frame = self.crop_box();
        let operators = self
            .doc
            .fonts
            .get_mut(font.0)
            .ok_or_else(|| invalid_handle("font", font.0))?
            .create_text(frame.left() + x, frame.top() - font_size - y, font_size, text);
        self.add_content(&operators)
    }

    pub fn draw(&mut self, graphic: &impl Graphic) -> Result<&mut Self> {
        let operators = graphic.render(&self.crop_box());
        self.add_content(&operators)
    }

    /// Paints `image` as placed by `placement`, registering it like
    /// [`write_text`](Self::write_text) registers fonts.
    pub fn draw_image(
        &mut self,
        image: ImageHandle,
        placement: &ImagePlacement,
    ) -> Result<&mut Self> {
        let resources = self.effective_resources();
        self.doc.attach_image(resources, image)?;

        let name = &self.doc.images[image.0].name;
        let operators = placement.render(name, &self.crop_box());
        self.add_content(&operators)
    }

    /// Appends raw content-stream operators.
    pub fn add_content(&mut self, operators: &str) -> Result<&mut Self> {
        self.doc
            .tree
            .page_mut(self.page)
            .ok_or_else(|| invalid_handle("page", self.page.0))?
            .add_content(operators);
        Ok(self)
    }

    fn effective_resources(&mut self) -> ResourceHandle {
        match self.doc.tree.effective_resources(self.page) {
            Some(resources) => resources,
            None => self.own_resources(),
        }
    }

    fn own_resources(&mut self) -> ResourceHandle {
        let doc = &mut *self.doc;
        if let Some(resources) = doc.tree.page(self.page).and_then(|p| p.resources()) {
            return resources;
        }
        let handle = ResourceHandle(doc.resources.len());
        doc.resources.push(Resources::new());
        if let Some(page) = doc.tree.page_mut(self.page) {
            page.set_resources(handle);
        }
        handle
    }
}
