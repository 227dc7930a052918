use crate::objects::ObjectId;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// One line of the cross-reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossRefEntry {
    offset: u64,
    generation: u16,
    in_use: bool,
}

impl CrossRefEntry {
    pub fn new(offset: u64, generation: u16, in_use: bool) -> Self {
        Self {
            offset,
            generation,
            in_use,
        }
    }

    /// Head of the free list, always present as object 0.
    pub fn free_head() -> Self {
        Self::new(0, 65535, false)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }

    pub fn in_use(&self) -> bool {
        self.in_use
    }

    /// Renders the fixed 20-byte entry line.
    pub fn compile(&self) -> String {
        let flag = if self.in_use { 'n' } else { 'f' };
        format!("{:010} {:05} {} \n", self.offset, self.generation, flag)
    }
}

/// Byte offsets of every object written so far, keyed by object number.
#[derive(Debug, Clone)]
pub struct CrossRefTable {
    entries: BTreeMap<u32, CrossRefEntry>,
}

impl CrossRefTable {
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(0, CrossRefEntry::free_head());
        Self { entries }
    }

    pub fn has_entry(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id.number())
    }

    /// Records `id` as written at `offset`. Callers check
    /// [`has_entry`](Self::has_entry) first; an existing entry is kept.
    pub fn add_entry(&mut self, id: ObjectId, offset: u64) {
        self.entries
            .entry(id.number())
            .or_insert_with(|| CrossRefEntry::new(offset, id.generation(), true));
    }

    pub fn get(&self, number: u32) -> Option<&CrossRefEntry> {
        self.entries.get(&number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Object numbers grouped into maximal runs of consecutive integers.
    pub fn subsections(&self) -> Vec<(u32, u32)> {
        let mut runs: Vec<(u32, u32)> = Vec::new();
        for &number in self.entries.keys() {
            match runs.last_mut() {
                Some((first, count)) if *first + *count == number => *count += 1,
                _ => runs.push((number, 1)),
            }
        }
        runs
    }

    /// Renders the complete `xref` section.
    pub fn compile(&self) -> String {
        let mut out = String::with_capacity(5 + self.entries.len() * 20 + 16);
        out.push_str("xref\n");
        for (first, count) in self.subsections() {
            let _ = writeln!(out, "{first} {count}");
            for entry in self.entries.range(first..first + count).map(|(_, e)| e) {
                out.push_str(&entry.compile());
            }
        }
        out
    }
}

impl Default for CrossRefTable {
    fn default() -> Self {
        Self::new()
    }
}
