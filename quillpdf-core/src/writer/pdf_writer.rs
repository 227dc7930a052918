use crate::document::{CompiledObject, ObjectGraph};
use crate::error::{PdfError, Result};
use crate::objects::ObjectId;
use crate::writer::{CrossRefTable, Trailer};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Streams a document graph into a byte sink.
///
/// The writer tracks the running byte offset for the cross-reference table
/// and keeps the first error it encounters: once an error is recorded every
/// further write is skipped and the offset stops advancing.
pub struct PdfWriter<W: Write> {
    writer: W,
    offset: u64,
    xref: CrossRefTable,
    error: Option<PdfError>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            offset: 0,
            xref: CrossRefTable::new(),
            error: None,
        }
    }

    pub fn current_position(&self) -> u64 {
        self.offset
    }

    pub fn xref(&self) -> &CrossRefTable {
        &self.xref
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&PdfError> {
        self.error.as_ref()
    }

    /// Writes the version header followed by the binary marker comment.
    pub fn start(&mut self, version: &str) -> &mut Self {
        self.write_str(&format!("%PDF-{version}\n"));
        self.write_bytes(&[b'%', 0x80, 0x81, 0x82, 0x83, b'\n']);
        self
    }

    /// Writes every node of `graph` that has not been written yet.
    pub fn write_graph<G: ObjectGraph>(&mut self, graph: &G) -> &mut Self {
        if !self.has_error() {
            graph.walk(&mut |node| self.write_node(graph, node));
        }
        self
    }

    fn write_node<G: ObjectGraph>(&mut self, graph: &G, node: G::Node) {
        if self.has_error() {
            return;
        }
        let id = graph.identity(node);
        if !id.is_assigned() {
            self.fail(PdfError::UnnumberedObject);
            return;
        }
        if self.xref.has_entry(id) {
            return;
        }

        self.xref.add_entry(id, self.offset);
        tracing::trace!(object = id.number(), offset = self.offset, "writing object");
        match graph.compile(node) {
            Some(CompiledObject::Text(text)) => self.write_str(&text),
            Some(CompiledObject::Binary(Ok(data))) => self.write_bytes(&data),
            Some(CompiledObject::Binary(Err(e))) => self.fail(e),
            None => self.fail(PdfError::UnknownObjectKind(id.number())),
        }
    }

    /// Appends the cross-reference table and trailer, flushes the sink and
    /// hands it back. Returns the first error recorded by any earlier step.
    pub fn finish(mut self, root: ObjectId) -> Result<W> {
        let start_xref = self.offset;
        let table = self.xref.compile();
        self.write_str(&table);
        let trailer = Trailer::new(root, self.xref.len(), start_xref);
        self.write_str(&trailer.compile());

        if self.error.is_none() {
            if let Err(e) = self.writer.flush() {
                self.fail(e.into());
            }
        }
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.writer),
        }
    }

    fn fail(&mut self, error: PdfError) {
        if self.error.is_none() {
            tracing::debug!(%error, offset = self.offset, "writer stopped");
            self.error = Some(error);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    fn write_bytes(&mut self, data: &[u8]) {
        if self.has_error() {
            return;
        }
        match self.writer.write_all(data) {
            Ok(()) => self.offset += data.len() as u64,
            Err(e) => self.fail(e.into()),
        }
    }
}

impl PdfWriter<BufWriter<std::fs::File>> {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new_with_writer(BufWriter::new(file)))
    }
}
