//! Page tree structure according to ISO 32000-1 Section 7.7.3
//!
//! Pages are kept in an arena in document order. Before each build the
//! intermediate page lists are rebuilt so that no list has more than
//! `order` children.

use crate::compression::StreamFilter;
use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::objects::{Dictionary, Object, ObjectCounter, ObjectId};
use crate::page::{Page, PageHandle};
use crate::resources::ResourceHandle;

/// Handle to a page list (`/Type /Pages` node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageListHandle(pub(crate) usize);

/// Intermediate node of the page tree.
///
/// After balancing a list holds either child lists or pages, never both.
#[derive(Debug, Clone)]
pub struct PageList {
    id: ObjectId,
    parent: Option<PageListHandle>,
    media_box: Option<Rectangle>,
    crop_box: Option<Rectangle>,
    resources: Option<ResourceHandle>,
    kids: Vec<PageListHandle>,
    pages: Vec<PageHandle>,
}

impl PageList {
    fn new(id: ObjectId, parent: Option<PageListHandle>) -> Self {
        Self {
            id,
            parent,
            media_box: None,
            crop_box: None,
            resources: None,
            kids: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn id_mut(&mut self) -> &mut ObjectId {
        &mut self.id
    }

    pub fn parent(&self) -> Option<PageListHandle> {
        self.parent
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

    pub fn kids(&self) -> &[PageListHandle] {
        &self.kids
    }

    pub fn pages(&self) -> &[PageHandle] {
        &self.pages
    }

    /// Renders the node. `kids` are the identities of the child lists
    /// followed by those of the pages.
    pub fn compile(
        &self,
        parent: Option<ObjectId>,
        resources: Option<ObjectId>,
        kids: &[ObjectId],
        count: usize,
    ) -> String {
        let mut dict = Dictionary::new().with("Type", Object::name("Pages"));
        if let Some(parent) = parent {
            dict.set("Parent", parent);
        }
        if let Some(media_box) = self.media_box {
            dict.set("MediaBox", Object::Raw(media_box.to_string()));
        }
        if let Some(crop_box) = self.crop_box {
            dict.set("CropBox", Object::Raw(crop_box.to_string()));
        }
        if let Some(resources) = resources {
            dict.set("Resources", resources);
        }
        let kids = kids.iter().map(|&kid| Object::Reference(kid)).collect::<Vec<_>>();
        dict.set("Kids", kids);
        dict.set("Count", count);
        self.id.bracket(&dict.to_string())
    }
}

/// Page tree
#[derive(Debug, Clone)]
pub struct PageTree {
    lists: Vec<PageList>,
    pages: Vec<Page>,
}

impl PageTree {
    /// Creates a tree whose root list carries the default boxes. The root
    /// always has object number 2.
    pub fn new(media_box: Option<Rectangle>, crop_box: Option<Rectangle>) -> Self {
        let mut root = PageList::new(ObjectId::new(ObjectCounter::ROOT_PAGES, 0), None);
        root.media_box = media_box;
        root.crop_box = crop_box;
        Self {
            lists: vec![root],
            pages: Vec::new(),
        }
    }

    pub fn root(&self) -> PageListHandle {
        PageListHandle(0)
    }

    /// Appends a page to the document, directly under the root until the
    /// tree is balanced.
    pub fn add_page(
        &mut self,
        media_box: Option<Rectangle>,
        crop_box: Option<Rectangle>,
        filter: StreamFilter,
    ) -> PageHandle {
        let handle = PageHandle(self.pages.len());
        let root = self.root();
        self.pages.push(Page::new(root, media_box, crop_box, filter));
        self.lists[root.0].pages.push(handle);
        handle
    }

    pub fn page(&self, handle: PageHandle) -> Option<&Page> {
        self.pages.get(handle.0)
    }

    pub(crate) fn page_mut(&mut self, handle: PageHandle) -> Option<&mut Page> {
        self.pages.get_mut(handle.0)
    }

    pub fn list(&self, handle: PageListHandle) -> Option<&PageList> {
        self.lists.get(handle.0)
    }

    pub(crate) fn list_mut(&mut self, handle: PageListHandle) -> Option<&mut PageList> {
        self.lists.get_mut(handle.0)
    }

    pub(crate) fn set_root_resources(&mut self, resources: ResourceHandle) {
        self.lists[0].resources = Some(resources);
    }

    pub(crate) fn set_root_crop_box(&mut self, crop_box: Option<Rectangle>) {
        self.lists[0].crop_box = crop_box;
    }

    /// Pages in document order.
    pub fn pages(&self) -> impl Iterator<Item = PageHandle> {
        (0..self.pages.len()).map(PageHandle)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of pages below `handle`, recomputed on every call.
    pub fn count(&self, handle: PageListHandle) -> usize {
        self.list(handle).map_or(0, |list| {
            list.pages.len()
                + list
                    .kids
                    .iter()
                    .map(|&kid| self.count(kid))
                    .sum::<usize>()
        })
    }

    /// Rebuilds the intermediate lists so that every list has at most
    /// `order` children.
    ///
    /// Pages are grouped into lists of `order`; the resulting level is
    /// grouped again while it has more than `order` lists, and the last
    /// level becomes the root's children. Lists from an earlier balance
    /// are discarded.
    pub fn balance(&mut self, order: usize) -> Result<()> {
        if order < 2 {
            return Err(PdfError::InvalidStructure(format!(
                "page tree order must be at least 2, got {order}"
            )));
        }

        let root = self.root();
        self.lists.truncate(1);
        self.lists[0].kids.clear();
        self.lists[0].pages.clear();

        let pages: Vec<PageHandle> = self.pages().collect();
        let mut level = Vec::with_capacity(pages.len().div_ceil(order));
        for chunk in pages.chunks(order) {
            let list = self.push_list(root);
            for &page in chunk {
                self.pages[page.0].set_parent(list);
            }
            self.lists[list.0].pages.extend_from_slice(chunk);
            level.push(list);
        }

        let mut depth = 1;
        while level.len() > order {
            let mut parents = Vec::with_capacity(level.len().div_ceil(order));
            for chunk in level.chunks(order) {
                let parent = self.push_list(root);
                for &child in chunk {
                    self.lists[child.0].parent = Some(parent);
                }
                self.lists[parent.0].kids.extend_from_slice(chunk);
                parents.push(parent);
            }
            level = parents;
            depth += 1;
        }
        self.lists[0].kids = level;

        tracing::debug!(
            pages = self.pages.len(),
            lists = self.lists.len() - 1,
            depth,
            order,
            "balanced page tree"
        );
        Ok(())
    }

    fn push_list(&mut self, parent: PageListHandle) -> PageListHandle {
        let handle = PageListHandle(self.lists.len());
        self.lists
            .push(PageList::new(ObjectId::unassigned(), Some(parent)));
        handle
    }

    /// Media box of a page, inherited from the nearest ancestor that sets
    /// one; A4 when none does.
    pub fn effective_media_box(&self, handle: PageHandle) -> Rectangle {
        self.inherited(handle, |page| page.media_box(), |list| list.media_box)
            .unwrap_or_default()
    }

    /// Crop box of a page, inherited like the media box and defaulting to
    /// the effective media box.
    pub fn effective_crop_box(&self, handle: PageHandle) -> Rectangle {
        self.inherited(handle, |page| page.crop_box(), |list| list.crop_box)
            .unwrap_or_else(|| self.effective_media_box(handle))
    }

    fn inherited<T>(
        &self,
        handle: PageHandle,
        from_page: impl Fn(&Page) -> Option<T>,
        from_list: impl Fn(&PageList) -> Option<T>,
    ) -> Option<T> {
        let page = self.page(handle)?;
        if let Some(value) = from_page(page) {
            return Some(value);
        }
        let mut current = Some(page.parent());
        while let Some(list) = current.and_then(|h| self.list(h)) {
            if let Some(value) = from_list(list) {
                return Some(value);
            }
            current = list.parent;
        }
        None
    }

    /// Resources in effect for a page: its own, or the nearest ancestor's.
    pub fn effective_resources(&self, handle: PageHandle) -> Option<ResourceHandle> {
        self.inherited(handle, |page| page.resources(), |list| list.resources)
    }
}
