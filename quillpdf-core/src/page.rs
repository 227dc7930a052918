use crate::compression::StreamFilter;
use crate::geometry::Rectangle;
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::resources::ResourceHandle;
use crate::structure::PageListHandle;

/// Handle to a page owned by a [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHandle(pub(crate) usize);

/// A leaf of the page tree.
///
/// Boxes and resources are optional; without them the page inherits the
/// values of its ancestors. A page that gets its own resources no longer
/// sees the inherited ones.
#[derive(Debug, Clone)]
pub struct Page {
    id: ObjectId,
    parent: PageListHandle,
    media_box: Option<Rectangle>,
    crop_box: Option<Rectangle>,
    resources: Option<ResourceHandle>,
    contents: Stream,
}

impl Page {
    pub(crate) fn new(
        parent: PageListHandle,
        media_box: Option<Rectangle>,
        crop_box: Option<Rectangle>,
        filter: StreamFilter,
    ) -> Self {
        Self {
            id: ObjectId::unassigned(),
            parent,
            media_box,
            crop_box,
            resources: None,
            contents: Stream::new(filter),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn id_mut(&mut self) -> &mut ObjectId {
        &mut self.id
    }

    pub fn parent(&self) -> PageListHandle {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: PageListHandle) {
        self.parent = parent;
    }

    pub fn media_box(&self) -> Option<Rectangle> {
        self.media_box
    }

    pub fn crop_box(&self) -> Option<Rectangle> {
        self.crop_box
    }

    pub fn resources(&self) -> Option<ResourceHandle> {
        self.resources
    }

    pub(crate) fn set_resources(&mut self, resources: ResourceHandle) {
        self.resources = Some(resources);
    }

    pub fn contents(&self) -> &Stream {
        &self.contents
    }

    pub(crate) fn contents_mut(&mut self) -> &mut Stream {
        &mut self.contents
    }

    /// Appends operators to the content stream.
    pub(crate) fn add_content(&mut self, operators: &str) {
        self.contents.add_text(operators);
    }

    pub fn compile(&self, parent: ObjectId, resources: Option<ObjectId>) -> String {
        let mut dict = Dictionary::new()
            .with("Type", Object::name("Page"))
            .with("Parent", parent);
        if let Some(media_box) = self.media_box {
            dict.set("MediaBox", Object::Raw(media_box.to_string()));
        }
        if let Some(crop_box) = self.crop_box {
            dict.set("CropBox", Object::Raw(crop_box.to_string()));
        }
        if let Some(resources) = resources {
            dict.set("Resources", resources);
        }
        dict.set("Contents", vec![Object::Reference(self.contents.id())]);
        self.id.bracket(&dict.to_string())
    }
}
