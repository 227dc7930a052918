//! Synthetic TrueType fonts for tests
//!
//! Builds small but structurally complete fonts in memory so the codec and
//! the subsetting engine can be exercised without binary fixtures.

use std::collections::BTreeMap;

struct TestGlyph {
    data: Vec<u8>,
    advance: u16,
    lsb: i16,
}

/// Builder for an in-memory TrueType font.
pub struct TestFontBuilder {
    units_per_em: u16,
    glyphs: Vec<TestGlyph>,
    mappings: Vec<(u32, u16)>,
    name: Option<String>,
    h_metrics: Option<u16>,
    long_loca: bool,
    extra: Vec<([u8; 4], Vec<u8>)>,
}

impl TestFontBuilder {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            units_per_em,
            glyphs: Vec::new(),
            mappings: Vec::new(),
            name: None,
            h_metrics: None,
            long_loca: false,
            extra: Vec::new(),
        }
    }

    pub fn glyph(mut self, data: Vec<u8>, advance: u16, lsb: i16) -> Self {
        self.glyphs.push(TestGlyph { data, advance, lsb });
        self
    }

    pub fn map(mut self, ch: char, glyph_id: u16) -> Self {
        self.mappings.push((ch as u32, glyph_id));
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Number of full horizontal metrics; the rest only carry a bearing.
    pub fn h_metrics(mut self, count: u16) -> Self {
        self.h_metrics = Some(count);
        self
    }

    pub fn long_loca(mut self) -> Self {
        self.long_loca = true;
        self
    }

    pub fn extra_table(mut self, tag: [u8; 4], data: Vec<u8>) -> Self {
        self.extra.push((tag, data));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let num_glyphs = self.glyphs.len() as u16;
        let h_metrics = self.h_metrics.unwrap_or(num_glyphs);
        let mut tables: BTreeMap<[u8; 4], Vec<u8>> = BTreeMap::new();

        let mut glyf = Vec::new();
        let mut offsets = Vec::new();
        for glyph in &self.glyphs {
            offsets.push(glyf.len() as u32);
            glyf.extend_from_slice(&glyph.data);
            while glyf.len() % 4 != 0 {
                glyf.push(0);
            }
        }
        offsets.push(glyf.len() as u32);

        let mut loca = Vec::new();
        for offset in offsets {
            if self.long_loca {
                loca.extend_from_slice(&offset.to_be_bytes());
            } else {
                loca.extend_from_slice(&((offset / 2) as u16).to_be_bytes());
            }
        }

        let mut hmtx = Vec::new();
        for (i, glyph) in self.glyphs.iter().enumerate() {
            if i < h_metrics as usize {
                hmtx.extend_from_slice(&glyph.advance.to_be_bytes());
            }
            hmtx.extend_from_slice(&glyph.lsb.to_be_bytes());
        }

        let mut head = vec![0u8; 54];
        head[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        head[4..8].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
        head[18..20].copy_from_slice(&self.units_per_em.to_be_bytes());
        head[40..42].copy_from_slice(&1000i16.to_be_bytes());
        head[42..44].copy_from_slice(&1000i16.to_be_bytes());
        head[50..52].copy_from_slice(&(self.long_loca as i16).to_be_bytes());

        let mut hhea = vec![0u8; 36];
        hhea[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
        hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());
        hhea[34..36].copy_from_slice(&h_metrics.to_be_bytes());

        let mut maxp = Vec::new();
        maxp.extend_from_slice(&0x0000_5000u32.to_be_bytes());
        maxp.extend_from_slice(&num_glyphs.to_be_bytes());

        let mut post = vec![0u8; 32];
        post[0..4].copy_from_slice(&0x0003_0000u32.to_be_bytes());

        tables.insert(*b"glyf", glyf);
        tables.insert(*b"loca", loca);
        tables.insert(*b"hmtx", hmtx);
        tables.insert(*b"head", head);
        tables.insert(*b"hhea", hhea);
        tables.insert(*b"maxp", maxp);
        tables.insert(*b"post", post);
        tables.insert(*b"cmap", build_cmap(&self.mappings));
        if let Some(name) = &self.name {
            tables.insert(*b"name", build_name(name));
        }
        for (tag, data) in self.extra {
            tables.insert(tag, data);
        }

        assemble(&tables)
    }
}

/// A one-point simple glyph with the given horizontal extent.
pub fn simple_glyph(x_max: i16) -> Vec<u8> {
    let mut glyph = Vec::new();
    glyph.extend_from_slice(&1i16.to_be_bytes()); // numberOfContours
    glyph.extend_from_slice(&0i16.to_be_bytes());
    glyph.extend_from_slice(&0i16.to_be_bytes());
    glyph.extend_from_slice(&x_max.to_be_bytes());
    glyph.extend_from_slice(&700i16.to_be_bytes());
    glyph.extend_from_slice(&0u16.to_be_bytes()); // endPtsOfContours
    glyph.extend_from_slice(&0u16.to_be_bytes()); // instructionLength
    glyph.push(0x01); // on curve, 16-bit coordinates
    glyph.extend_from_slice(&x_max.to_be_bytes());
    glyph.extend_from_slice(&700i16.to_be_bytes());
    glyph
}

/// A composite glyph placing each component at the origin.
pub fn composite_glyph(components: &[u16]) -> Vec<u8> {
    let mut glyph = Vec::new();
    glyph.extend_from_slice(&(-1i16).to_be_bytes());
    glyph.extend_from_slice(&[0; 8]);
    for (i, component) in components.iter().enumerate() {
        // ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES
        let mut flags: u16 = 0x0001 | 0x0002;
        if i + 1 < components.len() {
            flags |= 0x0020;
        }
        glyph.extend_from_slice(&flags.to_be_bytes());
        glyph.extend_from_slice(&component.to_be_bytes());
        glyph.extend_from_slice(&0i16.to_be_bytes());
        glyph.extend_from_slice(&0i16.to_be_bytes());
    }
    glyph
}

/// Six glyphs at 2048 units per em: `.notdef`, `A`, `B`, a composite `Ä`
/// built from `A` and a dieresis, the dieresis itself and an empty space.
pub fn sample_font() -> Vec<u8> {
    TestFontBuilder::new(2048)
        .glyph(simple_glyph(900), 1024, 50)
        .glyph(simple_glyph(1300), 1366, 20)
        .glyph(simple_glyph(1200), 1300, 150)
        .glyph(composite_glyph(&[1, 4]), 1366, 20)
        .glyph(simple_glyph(500), 600, 100)
        .glyph(Vec::new(), 512, 0)
        .map(' ', 5)
        .map('A', 1)
        .map('B', 2)
        .map('\u{a8}', 4)
        .map('\u{c4}', 3)
        .name("QuillTest-Regular")
        .build()
}

fn build_cmap(mappings: &[(u32, u16)]) -> Vec<u8> {
    let mut sorted = mappings.to_vec();
    sorted.sort_unstable();
    let bmp: Vec<(u16, u16)> = sorted
        .iter()
        .filter_map(|&(code, glyph)| u16::try_from(code).ok().map(|code| (code, glyph)))
        .collect();
    let needs_format_12 = sorted.iter().any(|&(code, _)| code > 0xFFFF);

    // format 4, one segment per character plus the terminator; sets too
    // large for its 16-bit length only get format 12
    let seg_count = bmp.len() as u32 + 1;
    let length = 16 + 8 * seg_count;
    let mut subtables = Vec::new();
    if length <= 0xFFFF {
        let mut format4 = Vec::new();
        format4.extend_from_slice(&4u16.to_be_bytes());
        format4.extend_from_slice(&(length as u16).to_be_bytes());
        format4.extend_from_slice(&0u16.to_be_bytes());
        format4.extend_from_slice(&((seg_count * 2) as u16).to_be_bytes());
        format4.extend_from_slice(&[0; 6]); // search fields are not consulted by readers
        for &(code, _) in &bmp {
            format4.extend_from_slice(&code.to_be_bytes());
        }
        format4.extend_from_slice(&0xFFFFu16.to_be_bytes());
        format4.extend_from_slice(&0u16.to_be_bytes());
        for &(code, _) in &bmp {
            format4.extend_from_slice(&code.to_be_bytes());
        }
        format4.extend_from_slice(&0xFFFFu16.to_be_bytes());
        for &(code, glyph) in &bmp {
            format4.extend_from_slice(&glyph.wrapping_sub(code).to_be_bytes());
        }
        format4.extend_from_slice(&1u16.to_be_bytes());
        format4.extend_from_slice(&vec![0; seg_count as usize * 2]);
        subtables.push((3u16, 1u16, format4));
    }

    if needs_format_12 || subtables.is_empty() {
        let mut format12 = Vec::new();
        format12.extend_from_slice(&12u16.to_be_bytes());
        format12.extend_from_slice(&0u16.to_be_bytes());
        format12.extend_from_slice(&(16 + 12 * sorted.len() as u32).to_be_bytes());
        format12.extend_from_slice(&0u32.to_be_bytes());
        format12.extend_from_slice(&(sorted.len() as u32).to_be_bytes());
        for &(code, glyph) in &sorted {
            format12.extend_from_slice(&code.to_be_bytes());
            format12.extend_from_slice(&code.to_be_bytes());
            format12.extend_from_slice(&(glyph as u32).to_be_bytes());
        }
        subtables.push((3, 10, format12));
    }

    let mut cmap = Vec::new();
    cmap.extend_from_slice(&0u16.to_be_bytes());
    cmap.extend_from_slice(&(subtables.len() as u16).to_be_bytes());
    let mut offset = 4 + 8 * subtables.len() as u32;
    for (platform, encoding, data) in &subtables {
        cmap.extend_from_slice(&platform.to_be_bytes());
        cmap.extend_from_slice(&encoding.to_be_bytes());
        cmap.extend_from_slice(&offset.to_be_bytes());
        offset += data.len() as u32;
    }
    for (_, _, data) in subtables {
        cmap.extend_from_slice(&data);
    }
    cmap
}

fn build_name(name: &str) -> Vec<u8> {
    let encoded: Vec<u8> = name.encode_utf16().flat_map(u16::to_be_bytes).collect();
    let mut table = Vec::new();
    table.extend_from_slice(&0u16.to_be_bytes()); // format
    table.extend_from_slice(&1u16.to_be_bytes()); // count
    table.extend_from_slice(&18u16.to_be_bytes()); // stringOffset
    table.extend_from_slice(&3u16.to_be_bytes()); // Windows
    table.extend_from_slice(&1u16.to_be_bytes()); // Unicode BMP
    table.extend_from_slice(&0x0409u16.to_be_bytes());
    table.extend_from_slice(&6u16.to_be_bytes()); // PostScript name
    table.extend_from_slice(&(encoded.len() as u16).to_be_bytes());
    table.extend_from_slice(&0u16.to_be_bytes());
    table.extend_from_slice(&encoded);
    table
}

fn assemble(tables: &BTreeMap<[u8; 4], Vec<u8>>) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut font = Vec::new();
    font.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    font.extend_from_slice(&num_tables.to_be_bytes());
    font.extend_from_slice(&[0; 6]);

    let mut offset = 12 + 16 * tables.len() as u32;
    for (tag, data) in tables {
        font.extend_from_slice(tag);
        font.extend_from_slice(&0u32.to_be_bytes());
        font.extend_from_slice(&offset.to_be_bytes());
        font.extend_from_slice(&(data.len() as u32).to_be_bytes());
        offset += (data.len() as u32 + 3) & !3;
    }
    for data in tables.values() {
        font.extend_from_slice(data);
        while font.len() % 4 != 0 {
            font.push(0);
        }
    }
    font
}
