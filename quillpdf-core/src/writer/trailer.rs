use crate::objects::ObjectId;

/// File trailer pointing readers at the catalog and the xref section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    root: ObjectId,
    size: usize,
    start_xref: u64,
}

impl Trailer {
    pub fn new(root: ObjectId, size: usize, start_xref: u64) -> Self {
        Self {
            root,
            size,
            start_xref,
        }
    }

    pub fn compile(&self) -> String {
        format!(
            "trailer\n<</Root {} /Size {}>>\nstartxref\n{}\n%%EOF",
            self.root.indirect_reference(),
            self.size,
            self.start_xref
        )
    }
}
