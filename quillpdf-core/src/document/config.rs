//! Options controlling how a document is built and written

/// Build options of a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    /// PDF version written into the file header
    pub version: String,
    /// Maximum number of kids per page list after balancing
    pub page_tree_order: usize,
    /// Deflate page content streams
    pub compress_content: bool,
}

impl DocumentConfig {
    pub const DEFAULT_PAGE_TREE_ORDER: usize = 6;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Values below 2 are rejected when the document is built.
    pub fn with_page_tree_order(mut self, order: usize) -> Self {
        self.page_tree_order = order;
        self
    }

    /// Has no effect unless the `compression` feature is enabled.
    pub fn with_compress_content(mut self, compress: bool) -> Self {
        self.compress_content = compress;
        self
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            page_tree_order: Self::DEFAULT_PAGE_TREE_ORDER,
            compress_content: cfg!(feature = "compression"),
        }
    }
}
