//! Document outline (bookmarks) according to ISO 32000-1 Section 12.3.3

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ObjectId};
use crate::page::PageHandle;

/// Handle to an outline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutlineItemHandle(pub(crate) usize);

/// How the target page is shown when an item is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlineDestination {
    /// Whole page fits the window
    #[default]
    Fit,
    /// Page width fits the window, `top` at the window's top edge
    FitH(i32),
}

impl OutlineDestination {
    fn operands(&self) -> Vec<Object> {
        match self {
            OutlineDestination::Fit => vec![Object::name("Fit")],
            OutlineDestination::FitH(top) => vec![Object::name("FitH"), Object::from(*top)],
        }
    }
}

/// Outline item (bookmark)
#[derive(Debug, Clone)]
pub struct OutlineItem {
    id: ObjectId,
    title: String,
    parent: Option<OutlineItemHandle>,
    prev: Option<OutlineItemHandle>,
    next: Option<OutlineItemHandle>,
    first: Option<OutlineItemHandle>,
    page: PageHandle,
    destination: OutlineDestination,
}

impl OutlineItem {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Parent item; `None` for top-level items.
    pub fn parent(&self) -> Option<OutlineItemHandle> {
        self.parent
    }

    pub fn prev(&self) -> Option<OutlineItemHandle> {
        self.prev
    }

    pub fn next(&self) -> Option<OutlineItemHandle> {
        self.next
    }

    pub fn first(&self) -> Option<OutlineItemHandle> {
        self.first
    }

    pub fn page(&self) -> PageHandle {
        self.page
    }

    pub fn destination(&self) -> OutlineDestination {
        self.destination
    }
}

/// Outline dictionary and its items.
///
/// Items form sibling chains (`first`, `next`, `prev`) below the outline
/// root or below another item.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    id: ObjectId,
    first: Option<OutlineItemHandle>,
    items: Vec<OutlineItem>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn id_mut(&mut self) -> &mut ObjectId {
        &mut self.id
    }

    pub fn first(&self) -> Option<OutlineItemHandle> {
        self.first
    }

    pub fn item(&self, handle: OutlineItemHandle) -> Option<&OutlineItem> {
        self.items.get(handle.0)
    }

    pub(crate) fn item_id_mut(&mut self, handle: OutlineItemHandle) -> Option<&mut ObjectId> {
        self.items.get_mut(handle.0).map(|item| &mut item.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends an item to the children of `parent`, or to the top level
    /// when `parent` is `None`.
    pub fn add_item(
        &mut self,
        parent: Option<OutlineItemHandle>,
        title: impl Into<String>,
        page: PageHandle,
        destination: OutlineDestination,
    ) -> Result<OutlineItemHandle> {
        let first = match parent {
            Some(p) => self
                .item(p)
                .ok_or_else(|| {
                    PdfError::InvalidStructure(format!("unknown outline item {}", p.0))
                })?
                .first,
            None => self.first,
        };
        let handle = OutlineItemHandle(self.items.len());
        let prev = first.map(|f| self.last_sibling(f));

        self.items.push(OutlineItem {
            id: ObjectId::unassigned(),
            title: title.into(),
            parent,
            prev,
            next: None,
            first: None,
            page,
            destination,
        });
        match (prev, parent) {
            (Some(prev), _) => self.items[prev.0].next = Some(handle),
            (None, Some(parent)) => self.items[parent.0].first = Some(handle),
            (None, None) => self.first = Some(handle),
        }
        Ok(handle)
    }

    fn last_sibling(&self, mut handle: OutlineItemHandle) -> OutlineItemHandle {
        while let Some(next) = self.items[handle.0].next {
            handle = next;
        }
        handle
    }

    /// Items in output order: each item, then its children, then its next
    /// sibling.
    pub fn walk_order(&self) -> Vec<OutlineItemHandle> {
        let mut order = Vec::with_capacity(self.items.len());
        let mut stack: Vec<OutlineItemHandle> = self.first.into_iter().collect();
        while let Some(handle) = stack.pop() {
            order.push(handle);
            let item = &self.items[handle.0];
            stack.extend(item.next);
            stack.extend(item.first);
        }
        order
    }

    /// The outline dictionary; `None` while there are no items.
    pub fn compile(&self) -> Option<String> {
        let first = self.first?;
        let last = self.last_sibling(first);
        let dict = Dictionary::new()
            .with("Type", Object::name("Outlines"))
            .with("First", self.items[first.0].id)
            .with("Last", self.items[last.0].id);
        Some(self.id.bracket(&dict.to_string()))
    }

    /// The dictionary of one item; `page` is the identity of its target.
    pub fn compile_item(&self, handle: OutlineItemHandle, page: ObjectId) -> Option<String> {
        let item = self.item(handle)?;
        let parent = match item.parent {
            Some(parent) => self.items[parent.0].id,
            None => self.id,
        };
        let mut dest = vec![Object::Reference(page)];
        dest.extend(item.destination.operands());

        let mut dict = Dictionary::new()
            .with("Title", encode_title(&item.title))
            .with("Parent", parent)
            .with("Dest", dest);
        if let Some(prev) = item.prev {
            dict.set("Prev", self.items[prev.0].id);
        }
        if let Some(next) = item.next {
            dict.set("Next", self.items[next.0].id);
        }
        if let Some(first) = item.first {
            dict.set("First", self.items[first.0].id);
            dict.set("Last", self.items[self.last_sibling(first).0].id);
        }
        Some(item.id.bracket(&dict.to_string()))
    }
}

/// ASCII titles are written as literal strings, anything else as UTF-16BE
/// with a byte order mark.
fn encode_title(title: &str) -> Object {
    if title.is_ascii() {
        return Object::String(title.to_string());
    }
    let mut hex = String::from("<FEFF");
    for unit in title.encode_utf16() {
        hex.push_str(&format!("{unit:04X}"));
    }
    hex.push('>');
    Object::Raw(hex)
}
