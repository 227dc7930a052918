//! Traversal of the document graph and the contract the writer consumes

use super::Document;
use crate::error::Result;
use crate::graphics::ImageHandle;
use crate::objects::{Dictionary, Object, ObjectCounter, ObjectId};
use crate::page::PageHandle;
use crate::resources::ResourceHandle;
use crate::structure::{OutlineItemHandle, PageListHandle};
use crate::text::FontHandle;

/// Serialized form of one graph node.
#[derive(Debug)]
pub enum CompiledObject {
    /// Complete `obj ... endobj` text
    Text(String),
    /// Complete object bytes, or the error that prevented producing them
    Binary(Result<Vec<u8>>),
}

/// A graph of numbered objects the writer can serialize.
///
/// `walk` must visit every reachable node, possibly more than once; the
/// writer emits each identity once.
pub trait ObjectGraph {
    type Node: Copy;

    fn walk(&self, visitor: &mut dyn FnMut(Self::Node));

    fn identity(&self, node: Self::Node) -> ObjectId;

    /// `None` if the node cannot be serialized.
    fn compile(&self, node: Self::Node) -> Option<CompiledObject>;
}

/// A node of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Catalog,
    PageList(PageListHandle),
    Page(PageHandle),
    Contents(PageHandle),
    Resources(ResourceHandle),
    Font(FontHandle),
    FontProgram(FontHandle),
    Image(ImageHandle),
    Outline,
    OutlineItem(OutlineItemHandle),
}

impl Document {
    /// Visits the catalog, the page tree and then the outline, depth-first.
    pub fn walk(&self, visitor: &mut dyn FnMut(NodeRef)) {
        visitor(NodeRef::Catalog);
        self.walk_list(self.tree.root(), visitor);
        if let Some(outline) = self.outline.as_ref().filter(|o| o.first().is_some()) {
            visitor(NodeRef::Outline);
            for item in outline.walk_order() {
                visitor(NodeRef::OutlineItem(item));
            }
        }
    }

    fn walk_list(&self, handle: PageListHandle, visitor: &mut dyn FnMut(NodeRef)) {
        let Some(list) = self.tree.list(handle) else {
            return;
        };
        visitor(NodeRef::PageList(handle));
        if let Some(resources) = list.resources() {
            self.walk_resources(resources, visitor);
        }
        for &kid in list.kids() {
            self.walk_list(kid, visitor);
        }
        for &page in list.pages() {
            self.walk_page(page, visitor);
        }
    }

    fn walk_page(&self, handle: PageHandle, visitor: &mut dyn FnMut(NodeRef)) {
        let Some(page) = self.tree.page(handle) else {
            return;
        };
        visitor(NodeRef::Page(handle));
        if let Some(resources) = page.resources() {
            self.walk_resources(resources, visitor);
        }
        visitor(NodeRef::Contents(handle));
    }

    fn walk_resources(&self, handle: ResourceHandle, visitor: &mut dyn FnMut(NodeRef)) {
        let Some(resources) = self.resources.get(handle.0) else {
            return;
        };
        visitor(NodeRef::Resources(handle));
        for (_, font) in resources.fonts() {
            visitor(NodeRef::Font(font));
            if self.fonts.get(font.0).and_then(|f| f.program_id()).is_some() {
                visitor(NodeRef::FontProgram(font));
            }
        }
        for (_, image) in resources.images() {
            visitor(NodeRef::Image(image));
        }
    }

    /// Mutable identity of a node; `None` for the catalog, whose number is
    /// fixed, and for stale handles.
    pub(crate) fn identity_mut(&mut self, node: NodeRef) -> Option<&mut ObjectId> {
        match node {
            NodeRef::Catalog => None,
            NodeRef::PageList(h) => self.tree.list_mut(h).map(|l| l.id_mut()),
            NodeRef::Page(h) => self.tree.page_mut(h).map(|p| p.id_mut()),
            NodeRef::Contents(h) => self.tree.page_mut(h).map(|p| p.contents_mut().id_mut()),
            NodeRef::Resources(h) => self.resources.get_mut(h.0).map(|r| r.id_mut()),
            NodeRef::Font(h) => self.fonts.get_mut(h.0).map(|f| f.id_mut()),
            NodeRef::FontProgram(h) => self.fonts.get_mut(h.0).and_then(|f| f.program_id_mut()),
            NodeRef::Image(h) => self.images.get_mut(h.0).map(|i| i.image.id_mut()),
            NodeRef::Outline => self.outline.as_mut().map(|o| o.id_mut()),
            NodeRef::OutlineItem(h) => self.outline.as_mut().and_then(|o| o.item_id_mut(h)),
        }
    }

    fn list_id(&self, handle: PageListHandle) -> ObjectId {
        self.tree
            .list(handle)
            .map_or_else(ObjectId::unassigned, |l| l.id())
    }

    fn page_id(&self, handle: PageHandle) -> ObjectId {
        self.tree
            .page(handle)
            .map_or_else(ObjectId::unassigned, |p| p.id())
    }

    fn resources_id(&self, handle: ResourceHandle) -> ObjectId {
        self.resources
            .get(handle.0)
            .map_or_else(ObjectId::unassigned, |r| r.id())
    }

    fn font_id(&self, handle: FontHandle) -> ObjectId {
        self.fonts
            .get(handle.0)
            .map_or_else(ObjectId::unassigned, |f| f.id())
    }

    fn image_id(&self, handle: ImageHandle) -> ObjectId {
        self.images
            .get(handle.0)
            .map_or_else(ObjectId::unassigned, |i| i.image.id())
    }

    fn compile_catalog(&self) -> String {
        let mut dict = Dictionary::new()
            .with("Type", Object::name("Catalog"))
            .with("Pages", self.list_id(self.tree.root()));
        if let Some(outline) = self.outline.as_ref().filter(|o| o.first().is_some()) {
            dict.set("Outlines", outline.id());
        }
        ObjectId::new(ObjectCounter::CATALOG, 0).bracket(&dict.to_string())
    }

    fn compile_list(&self, handle: PageListHandle) -> Option<String> {
        let list = self.tree.list(handle)?;
        let parent = list.parent().map(|p| self.list_id(p));
        let resources = list.resources().map(|r| self.resources_id(r));
        let kids: Vec<ObjectId> = list
            .kids()
            .iter()
            .map(|&k| self.list_id(k))
            .chain(list.pages().iter().map(|&p| self.page_id(p)))
            .collect();
        Some(list.compile(parent, resources, &kids, self.tree.count(handle)))
    }
}

impl ObjectGraph for Document {
    type Node = NodeRef;

    fn walk(&self, visitor: &mut dyn FnMut(NodeRef)) {
        Document::walk(self, visitor)
    }

    fn identity(&self, node: NodeRef) -> ObjectId {
        match node {
            NodeRef::Catalog => ObjectId::new(ObjectCounter::CATALOG, 0),
            NodeRef::PageList(h) => self.list_id(h),
            NodeRef::Page(h) => self.page_id(h),
            NodeRef::Contents(h) => self
                .tree
                .page(h)
                .map_or_else(ObjectId::unassigned, |p| p.contents().id()),
            NodeRef::Resources(h) => self.resources_id(h),
            NodeRef::Font(h) => self.font_id(h),
            NodeRef::FontProgram(h) => self
                .fonts
                .get(h.0)
                .and_then(|f| f.program_id())
                .unwrap_or_else(ObjectId::unassigned),
            NodeRef::Image(h) => self.image_id(h),
            NodeRef::Outline => self
                .outline
                .as_ref()
                .map_or_else(ObjectId::unassigned, |o| o.id()),
            NodeRef::OutlineItem(h) => self
                .outline
                .as_ref()
                .and_then(|o| o.item(h))
                .map_or_else(ObjectId::unassigned, |i| i.id()),
        }
    }

    fn compile(&self, node: NodeRef) -> Option<CompiledObject> {
        let compiled = match node {
            NodeRef::Catalog => CompiledObject::Text(self.compile_catalog()),
            NodeRef::PageList(h) => CompiledObject::Text(self.compile_list(h)?),
            NodeRef::Page(h) => {
                let page = self.tree.page(h)?;
                let resources = page.resources().map(|r| self.resources_id(r));
                CompiledObject::Text(page.compile(self.list_id(page.parent()), resources))
            }
            NodeRef::Contents(h) => CompiledObject::Binary(self.tree.page(h)?.contents().compile()),
            NodeRef::Resources(h) => {
                let resources = self.resources.get(h.0)?;
                CompiledObject::Text(resources.compile(|f| self.font_id(f), |i| self.image_id(i)))
            }
            NodeRef::Font(h) => CompiledObject::Text(self.fonts.get(h.0)?.compile()),
            NodeRef::FontProgram(h) => CompiledObject::Binary(self.fonts.get(h.0)?.compile_program()?),
            NodeRef::Image(h) => CompiledObject::Binary(self.images.get(h.0)?.image.compile()),
            NodeRef::Outline => CompiledObject::Text(self.outline.as_ref()?.compile()?),
            NodeRef::OutlineItem(h) => {
                let outline = self.outline.as_ref()?;
                let page = self.page_id(outline.item(h)?.page());
                CompiledObject::Text(outline.compile_item(h, page)?)
            }
        };
        Some(compiled)
    }
}
