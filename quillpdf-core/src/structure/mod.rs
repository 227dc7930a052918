//! Document structure elements: the page tree and the outline, according
//! to ISO 32000-1

mod outline;
mod page_tree;

pub use outline::{Outline, OutlineDestination, OutlineItem, OutlineItemHandle};
pub use page_tree::{PageList, PageListHandle, PageTree};
