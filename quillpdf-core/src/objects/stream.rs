use crate::compression::StreamFilter;
use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};

/// An indirect stream object: identity, auxiliary dictionary and the ordered
/// chunks that make up its payload.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    id: ObjectId,
    dictionary: Dictionary,
    filter: StreamFilter,
    chunks: Vec<Vec<u8>>,
}

impl Stream {
    pub fn new(filter: StreamFilter) -> Self {
        Self {
            id: ObjectId::unassigned(),
            dictionary: Dictionary::new(),
            filter,
            chunks: Vec::new(),
        }
    }

    /// Stream whose payload is written as-is.
    pub fn flat() -> Self {
        Self::new(StreamFilter::Identity)
    }

    /// Stream whose payload is deflated.
    pub fn deflated() -> Self {
        Self::new(StreamFilter::Deflate)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn id_mut(&mut self) -> &mut ObjectId {
        &mut self.id
    }

    pub fn filter(&self) -> StreamFilter {
        self.filter
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    pub fn add_text(&mut self, text: &str) {
        self.chunks.push(text.as_bytes().to_vec());
    }

    pub fn add_bytes(&mut self, data: Vec<u8>) {
        self.chunks.push(data);
    }

    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Uncompressed payload size.
    pub fn raw_len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Encodes the payload and renders the complete indirect object,
    /// `/Filter` and `/Length` reflecting the encoded payload.
    pub fn compile(&self) -> Result<Vec<u8>> {
        let payload = self.filter.compress(&self.chunks)?;

        let mut dictionary = self.dictionary.clone();
        if let Some(name) = self.filter.name() {
            dictionary.set("Filter", Object::name(name));
        }
        dictionary.set("Length", payload.len());

        let header = format!(
            "{} {} obj\n<<{}>>\nstream\n",
            self.id.number(),
            self.id.generation(),
            dictionary.entries_to_string()
        );
        let mut out = Vec::with_capacity(header.len() + payload.len() + 18);
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&payload);
        out.extend_from_slice(b"\nendstream\nendobj\n");
        Ok(out)
    }
}
