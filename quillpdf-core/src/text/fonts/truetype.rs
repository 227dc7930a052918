//! TrueType font program codec
//!
//! Reads the `sfnt` container of a TrueType font, answers character and
//! metric queries, filters the glyph set down to a subset and writes the
//! result back out with valid table checksums and padding.

use crate::error::{PdfError, Result};
use std::collections::{BTreeMap, HashMap};

type Tag = [u8; 4];

const HEAD: Tag = *b"head";
const CMAP: Tag = *b"cmap";
const GLYF: Tag = *b"glyf";
const LOCA: Tag = *b"loca";
const MAXP: Tag = *b"maxp";
const HHEA: Tag = *b"hhea";
const HMTX: Tag = *b"hmtx";
const NAME: Tag = *b"name";
const POST: Tag = *b"post";

/// Required tables for TrueType embedding in PDF
const REQUIRED_TABLES: [Tag; 7] = [HEAD, CMAP, GLYF, LOCA, MAXP, HHEA, HMTX];

/// Most tables whose directory search fields fit in 16 bits.
const MAX_TABLES: u32 = 0xFFFF / 16;

/// Tables addressed by glyph index; they are dropped from a subset since
/// their glyph references would no longer be valid.
const GLYPH_INDEXED_TABLES: [Tag; 14] = [
    *b"hdmx", *b"kern", *b"GPOS", *b"GSUB", *b"GDEF", *b"JSTF", *b"LTSH", *b"VDMX", *b"vhea",
    *b"vmtx", *b"BASE", *b"MATH", *b"morx", *b"DSIG",
];

const SIGNATURE_TRUETYPE: u32 = 0x0001_0000;
const SIGNATURE_APPLE: u32 = 0x7472_7565; // 'true'
const SIGNATURE_CFF: u32 = 0x4F54_544F; // 'OTTO'
const SIGNATURE_COLLECTION: u32 = 0x7474_6366; // 'ttcf'

const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

// Composite glyph component flags
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// Character to glyph mapping
#[derive(Debug, Clone)]
pub struct CmapSubtable {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub format: u16,
    /// Character code to glyph index; unmapped codes are absent
    pub mappings: HashMap<u32, u16>,
}

/// A parsed TrueType font program.
///
/// Tables are held by tag in ascending order, which is also the order they
/// are written back out in. The `head` table is stored with its
/// `checkSumAdjustment` zeroed; [`rebuild_binary`](Self::rebuild_binary)
/// fills it in.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Vec<u8>>,
    num_glyphs: u16,
    units_per_em: u16,
    loca_format: i16,
    /// Glyph data offsets into `glyf`, `num_glyphs + 1` entries
    loca: Vec<u32>,
    /// Advance width and left side bearing per glyph
    metrics: Vec<(u16, i16)>,
    cmap: HashMap<u32, u16>,
}

impl TrueTypeFont {
    /// Parse a TrueType font from data
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        if data.len() < 12 {
            return Err(font_error("Font file too small"));
        }

        let signature = read_u32(&data, 0)?;
        match signature {
            SIGNATURE_TRUETYPE | SIGNATURE_APPLE => {}
            SIGNATURE_CFF => {
                return Err(font_error(
                    "CFF-based OpenType fonts cannot be embedded as TrueType",
                ))
            }
            SIGNATURE_COLLECTION => {
                return Err(font_error(
                    "TrueType Collection (TTC) files are not supported",
                ))
            }
            _ => {
                return Err(font_error(format!(
                    "Invalid font signature: 0x{signature:08X}"
                )))
            }
        }

        let num_tables = read_u16(&data, 4)? as usize;
        let mut tables = BTreeMap::new();
        for i in 0..num_tables {
            let record = 12 + i * 16;
            let tag = read_tag(&data, record)?;
            let offset = read_u32(&data, record + 8)? as usize;
            let length = read_u32(&data, record + 12)? as usize;

            let table = offset
                .checked_add(length)
                .and_then(|end| data.get(offset..end))
                .ok_or_else(|| {
                    font_error(format!("Table {} extends beyond file", tag_name(&tag)))
                })?;
            tables.insert(tag, table.to_vec());
        }

        Self::from_tables(signature, tables)
    }

    fn from_tables(sfnt_version: u32, mut tables: BTreeMap<Tag, Vec<u8>>) -> Result<Self> {
        for tag in REQUIRED_TABLES {
            if !tables.contains_key(&tag) {
                return Err(font_error(format!(
                    "Missing required table: {}",
                    tag_name(&tag)
                )));
            }
        }

        let head = table(&tables, HEAD)?;
        if head.len() < 54 {
            return Err(font_error("head table too small"));
        }
        let units_per_em = read_u16(head, 18)?;
        if units_per_em == 0 {
            return Err(font_error("head table declares zero units per em"));
        }
        let loca_format = read_i16(head, 50)?;

        let num_glyphs = read_u16(table(&tables, MAXP)?, 4)?;
        if num_glyphs == 0 {
            return Err(font_error("Font has no glyphs"));
        }
        let num_h_metrics = read_u16(table(&tables, HHEA)?, 34)?;
        if num_h_metrics == 0 {
            return Err(font_error("hhea table declares no horizontal metrics"));
        }

        let loca = parse_loca(table(&tables, LOCA)?, loca_format, num_glyphs)?;
        let metrics = parse_hmtx(table(&tables, HMTX)?, num_h_metrics, num_glyphs)?;
        let cmap = parse_cmap(table(&tables, CMAP)?, num_glyphs)?
            .into_iter()
            .min_by_key(cmap_priority)
            .map(|subtable| subtable.mappings)
            .unwrap_or_default();

        if let Some(head) = tables.get_mut(&HEAD) {
            head[8..12].fill(0);
        }

        Ok(Self {
            sfnt_version,
            tables,
            num_glyphs,
            units_per_em,
            loca_format,
            loca,
            metrics,
            cmap,
        })
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Format of 'loca' table (0 = short, 1 = long)
    pub fn loca_format(&self) -> i16 {
        self.loca_format
    }

    /// Raw bytes of a table, if present.
    pub fn table(&self, tag: &[u8; 4]) -> Option<&[u8]> {
        self.tables.get(tag).map(Vec::as_slice)
    }

    /// Glyph for a character according to the preferred Unicode cmap.
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.cmap.get(&(ch as u32)).copied()
    }

    /// Advance width of every glyph, in glyph order, in font units.
    pub fn glyph_widths(&self) -> Vec<u16> {
        self.metrics.iter().map(|&(advance, _)| advance).collect()
    }

    pub fn advance_width(&self, glyph_id: u16) -> Option<u16> {
        self.metrics.get(glyph_id as usize).map(|&(advance, _)| advance)
    }

    /// PostScript name (name ID 6), falling back to the full name (ID 4).
    pub fn postscript_name(&self) -> Option<String> {
        let name = self.table(&NAME)?;
        let count = read_u16(name, 2).ok()? as usize;
        let string_offset = read_u16(name, 4).ok()? as usize;

        let mut full_name = None;
        for i in 0..count {
            let record = 6 + i * 12;
            let (Ok(platform_id), Ok(encoding_id), Ok(name_id), Ok(length), Ok(offset)) = (
                read_u16(name, record),
                read_u16(name, record + 2),
                read_u16(name, record + 6),
                read_u16(name, record + 8),
                read_u16(name, record + 10),
            ) else {
                break;
            };
            if name_id != 6 && name_id != 4 {
                continue;
            }
            let start = string_offset + offset as usize;
            let Some(bytes) = name.get(start..start + length as usize) else {
                continue;
            };

            let decoded = match (platform_id, encoding_id) {
                // Mac Roman
                (1, 0) => String::from_utf8_lossy(bytes).into_owned(),
                // Unicode / Windows Unicode
                (0, _) | (3, 1) | (3, 10) => {
                    let units: Vec<u16> = bytes
                        .chunks_exact(2)
                        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                        .collect();
                    String::from_utf16_lossy(&units)
                }
                _ => continue,
            };
            if name_id == 6 {
                return Some(decoded);
            }
            full_name.get_or_insert(decoded);
        }
        full_name
    }

    /// All cmap subtables of the font, in table order.
    pub fn cmap_subtables(&self) -> Result<Vec<CmapSubtable>> {
        parse_cmap(table(&self.tables, CMAP)?, self.num_glyphs)
    }

    /// Raw outline data of a glyph; empty for glyphs without outlines.
    pub fn glyph_data(&self, glyph_id: u16) -> Result<&[u8]> {
        let index = glyph_id as usize;
        if index >= self.num_glyphs as usize {
            return Err(font_error(format!("Glyph {glyph_id} out of range")));
        }
        let start = self.loca[index] as usize;
        let end = self.loca[index + 1] as usize;
        if start >= end {
            return Ok(&[]);
        }
        table(&self.tables, GLYF)?
            .get(start..end)
            .ok_or_else(|| font_error(format!("Glyph {glyph_id} extends beyond glyf table")))
    }

    /// Glyphs a composite glyph is assembled from. Simple and empty glyphs
    /// have no components.
    pub fn components(&self, glyph_id: u16) -> Result<Vec<u16>> {
        let glyph = self.glyph_data(glyph_id)?;
        component_positions(glyph)
            .into_iter()
            .map(|pos| read_u16(glyph, pos))
            .collect()
    }

    /// Builds a new font that contains exactly `glyph_ids`, renumbered so
    /// that `glyph_ids[i]` becomes glyph `i`.
    ///
    /// Components of composite glyphs must be part of `glyph_ids`; their
    /// references are rewritten to the new numbering. The cmap keeps every
    /// character of the retained glyphs.
    pub fn filter_glyphs(&self, glyph_ids: &[u16]) -> Result<TrueTypeFont> {
        if glyph_ids.is_empty() {
            return Err(font_error("Cannot build a font without glyphs"));
        }

        let mut remap: HashMap<u16, u16> = HashMap::with_capacity(glyph_ids.len());
        for (new_id, &old_id) in glyph_ids.iter().enumerate() {
            if old_id >= self.num_glyphs {
                return Err(font_error(format!("Glyph {old_id} out of range")));
            }
            if remap.insert(old_id, new_id as u16).is_some() {
                return Err(font_error(format!("Glyph {old_id} requested twice")));
            }
        }
        let count = glyph_ids.len() as u16;

        // glyf and loca
        let mut glyf = Vec::new();
        let mut offsets = Vec::with_capacity(glyph_ids.len() + 1);
        for &old_id in glyph_ids {
            offsets.push(glyf.len() as u32);
            let mut glyph = self.glyph_data(old_id)?.to_vec();
            for pos in component_positions(&glyph) {
                let component = read_u16(&glyph, pos)?;
                let new_component = remap.get(&component).ok_or_else(|| {
                    font_error(format!(
                        "Component glyph {component} of glyph {old_id} is missing from the subset"
                    ))
                })?;
                glyph[pos..pos + 2].copy_from_slice(&new_component.to_be_bytes());
            }
            glyf.extend_from_slice(&glyph);
            pad_to_four(&mut glyf);
        }
        offsets.push(glyf.len() as u32);

        // short offsets store half the value in 16 bits
        let loca_format: i16 = if glyf.len() <= 0x1FFFE { 0 } else { 1 };
        let loca = encode_loca(&offsets, loca_format);

        let mut hmtx = Vec::with_capacity(glyph_ids.len() * 4);
        for &old_id in glyph_ids {
            let (advance, lsb) = self.metrics[old_id as usize];
            hmtx.extend_from_slice(&advance.to_be_bytes());
            hmtx.extend_from_slice(&lsb.to_be_bytes());
        }

        let mut head = table(&self.tables, HEAD)?.to_vec();
        head[50..52].copy_from_slice(&loca_format.to_be_bytes());

        let mut hhea = table(&self.tables, HHEA)?.to_vec();
        hhea[34..36].copy_from_slice(&count.to_be_bytes());

        let mut maxp = table(&self.tables, MAXP)?.to_vec();
        maxp[4..6].copy_from_slice(&count.to_be_bytes());

        let mut mappings: Vec<(u32, u16)> = self
            .cmap
            .iter()
            .filter_map(|(&code, glyph)| remap.get(glyph).map(|&new_id| (code, new_id)))
            .collect();
        mappings.sort_unstable();

        let mut tables: BTreeMap<Tag, Vec<u8>> = self
            .tables
            .iter()
            .filter(|(tag, _)| !GLYPH_INDEXED_TABLES.contains(tag))
            .map(|(tag, data)| (*tag, data.clone()))
            .collect();
        tables.insert(GLYF, glyf);
        tables.insert(LOCA, loca);
        tables.insert(HMTX, hmtx);
        tables.insert(HEAD, head);
        tables.insert(HHEA, hhea);
        tables.insert(MAXP, maxp);
        tables.insert(CMAP, build_cmap(&mappings));

        // glyph names are indexed by glyph; keep the header only
        if let Some(post) = tables.remove(&POST) {
            if post.len() >= 32 {
                let mut header = post[..32].to_vec();
                header[0..4].copy_from_slice(&0x0003_0000u32.to_be_bytes());
                tables.insert(POST, header);
            }
        }

        tracing::debug!(
            glyphs = count,
            original_glyphs = self.num_glyphs,
            "filtered TrueType glyph set"
        );
        Self::from_tables(self.sfnt_version, tables)
    }

    /// Serializes the font: sorted table directory, per-table checksums,
    /// 4-byte padding and the `head` checksum adjustment.
    pub fn rebuild_binary(&self) -> Result<Vec<u8>> {
        let table_count = u32::try_from(self.tables.len())
            .ok()
            .filter(|&count| (1..=MAX_TABLES).contains(&count))
            .ok_or_else(|| font_error(format!("Cannot write {} tables", self.tables.len())))?;
        let entry_selector = table_count.ilog2();
        let search_range = (1u32 << entry_selector) * 16;
        let range_shift = table_count * 16 - search_range;
        // all three fit in u16 for at most MAX_TABLES tables
        let num_tables = table_count as u16;
        let (search_range, entry_selector, range_shift) =
            (search_range as u16, entry_selector as u16, range_shift as u16);

        let total: usize = self.tables.values().map(|t| padded_len(t.len())).sum();
        let mut out = Vec::with_capacity(12 + 16 * num_tables as usize + total);
        out.extend_from_slice(&self.sfnt_version.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&range_shift.to_be_bytes());

        let mut offset = 12 + 16 * num_tables as usize;
        let mut head_offset = None;
        for (tag, data) in &self.tables {
            out.extend_from_slice(tag);
            out.extend_from_slice(&table_checksum(data).to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            if *tag == HEAD {
                head_offset = Some(offset);
            }
            offset += padded_len(data.len());
        }
        for data in self.tables.values() {
            out.extend_from_slice(data);
            pad_to_four(&mut out);
        }

        if let Some(head) = head_offset {
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(table_checksum(&out));
            out[head + 8..head + 12].copy_from_slice(&adjustment.to_be_bytes());
        }
        Ok(out)
    }
}

fn font_error(message: impl Into<String>) -> PdfError {
    PdfError::FontError(message.into())
}

fn tag_name(tag: &Tag) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

fn table(tables: &BTreeMap<Tag, Vec<u8>>, tag: Tag) -> Result<&[u8]> {
    tables
        .get(&tag)
        .map(Vec::as_slice)
        .ok_or_else(|| font_error(format!("Missing table: {}", tag_name(&tag))))
}

fn cmap_priority(subtable: &CmapSubtable) -> u8 {
    match (subtable.platform_id, subtable.encoding_id) {
        (3, 10) => 0,
        (0, 4) | (0, 6) => 1,
        (3, 1) => 2,
        (0, _) => 3,
        _ => 4,
    }
}

fn parse_loca(loca: &[u8], format: i16, num_glyphs: u16) -> Result<Vec<u32>> {
    let count = num_glyphs as usize + 1;
    let offsets = match format {
        0 => (0..count)
            .map(|i| read_u16(loca, i * 2).map(|v| v as u32 * 2))
            .collect::<Result<Vec<_>>>(),
        1 => (0..count).map(|i| read_u32(loca, i * 4)).collect(),
        _ => return Err(font_error(format!("Unknown loca format: {format}"))),
    };
    offsets.map_err(|_| font_error("loca table too small"))
}

fn parse_hmtx(hmtx: &[u8], num_h_metrics: u16, num_glyphs: u16) -> Result<Vec<(u16, i16)>> {
    if hmtx.len() < num_h_metrics as usize * 4 {
        return Err(font_error("hmtx table too small"));
    }
    let mut metrics = Vec::with_capacity(num_glyphs as usize);
    let mut last_advance = 0;
    for glyph in 0..num_glyphs as usize {
        if glyph < num_h_metrics as usize {
            last_advance = read_u16(hmtx, glyph * 4)?;
            metrics.push((last_advance, read_i16(hmtx, glyph * 4 + 2)?));
        } else {
            // Only LSB, use last advance width
            let offset = num_h_metrics as usize * 4 + (glyph - num_h_metrics as usize) * 2;
            metrics.push((last_advance, read_i16(hmtx, offset).unwrap_or(0)));
        }
    }
    Ok(metrics)
}

fn parse_cmap(cmap: &[u8], num_glyphs: u16) -> Result<Vec<CmapSubtable>> {
    if cmap.len() < 4 {
        return Err(font_error("cmap table too small"));
    }
    let num_subtables = read_u16(cmap, 2)? as usize;
    let mut subtables = Vec::with_capacity(num_subtables);
    for i in 0..num_subtables {
        let record = 4 + i * 8;
        if record + 8 > cmap.len() {
            break;
        }
        let platform_id = read_u16(cmap, record)?;
        let encoding_id = read_u16(cmap, record + 2)?;
        let offset = read_u32(cmap, record + 4)? as usize;

        // Unsupported formats are skipped, not fatal
        if let Ok(subtable) =
            parse_cmap_subtable(cmap, offset, platform_id, encoding_id, num_glyphs)
        {
            subtables.push(subtable);
        }
    }
    Ok(subtables)
}

fn parse_cmap_subtable(
    data: &[u8],
    offset: usize,
    platform_id: u16,
    encoding_id: u16,
    num_glyphs: u16,
) -> Result<CmapSubtable> {
    let format = read_u16(data, offset)?;
    let mut mappings = HashMap::new();

    match format {
        0 => {
            // Byte encoding table
            let glyphs = data
                .get(offset + 6..offset + 262)
                .ok_or_else(|| font_error("Format 0 cmap subtable too small"))?;
            for (code, &glyph) in glyphs.iter().enumerate() {
                if glyph != 0 {
                    mappings.insert(code as u32, glyph as u16);
                }
            }
        }
        4 => {
            // Segment mapping to delta values
            let seg_count = read_u16(data, offset + 6)? as usize / 2;
            let end_codes = offset + 14;
            let start_codes = end_codes + seg_count * 2 + 2;
            let id_deltas = start_codes + seg_count * 2;
            let id_range_offsets = id_deltas + seg_count * 2;

            for i in 0..seg_count {
                let end_code = read_u16(data, end_codes + i * 2)?;
                let start_code = read_u16(data, start_codes + i * 2)?;
                let id_delta = read_u16(data, id_deltas + i * 2)?;
                let id_range_offset = read_u16(data, id_range_offsets + i * 2)? as usize;
                if start_code == 0xFFFF {
                    break;
                }

                for code in start_code..=end_code {
                    let glyph = if id_range_offset == 0 {
                        code.wrapping_add(id_delta)
                    } else {
                        let position = id_range_offsets
                            + i * 2
                            + id_range_offset
                            + 2 * (code - start_code) as usize;
                        match read_u16(data, position) {
                            Ok(0) | Err(_) => 0,
                            Ok(glyph) => glyph.wrapping_add(id_delta),
                        }
                    };
                    if glyph != 0 {
                        mappings.insert(code as u32, glyph);
                    }
                }
            }
        }
        6 => {
            // Trimmed mapping table
            let first_code = read_u16(data, offset + 6)? as u32;
            let entry_count = read_u16(data, offset + 8)? as u32;
            for i in 0..entry_count {
                let glyph = read_u16(data, offset + 10 + i as usize * 2)?;
                if glyph != 0 {
                    mappings.insert(first_code + i, glyph);
                }
            }
        }
        12 => {
            // Segmented coverage
            let num_groups = read_u32(data, offset + 12)? as usize;
            for g in 0..num_groups {
                let group = offset + 16 + g * 12;
                let start_char = read_u32(data, group)?;
                let end_char = read_u32(data, group + 4)?;
                let start_glyph = read_u32(data, group + 8)?;
                if end_char < start_char {
                    continue;
                }
                for code in start_char..=end_char {
                    let glyph = start_glyph + (code - start_char);
                    if glyph >= num_glyphs as u32 {
                        break;
                    }
                    if glyph != 0 {
                        mappings.insert(code, glyph as u16);
                    }
                }
            }
        }
        _ => {
            return Err(font_error(format!("Unsupported cmap format: {format}")));
        }
    }

    Ok(CmapSubtable {
        platform_id,
        encoding_id,
        format,
        mappings,
    })
}

/// Positions of the glyph index fields of a composite glyph's components.
fn component_positions(glyph: &[u8]) -> Vec<usize> {
    let mut positions = Vec::new();
    if read_i16(glyph, 0).map_or(true, |contours| contours >= 0) {
        return positions;
    }

    let mut pos = 10;
    while pos + 4 <= glyph.len() {
        let flags = u16::from_be_bytes([glyph[pos], glyph[pos + 1]]);
        positions.push(pos + 2);
        pos += 4;
        pos += if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_SCALE != 0 {
            pos += 2;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            pos += 4;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            pos += 8;
        }
        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    positions
}

fn encode_loca(offsets: &[u32], format: i16) -> Vec<u8> {
    let mut loca = Vec::with_capacity(offsets.len() * if format == 0 { 2 } else { 4 });
    for &offset in offsets {
        if format == 0 {
            loca.extend_from_slice(&((offset / 2) as u16).to_be_bytes());
        } else {
            loca.extend_from_slice(&offset.to_be_bytes());
        }
    }
    loca
}

/// Largest segment count whose format 4 subtable still fits the 16-bit
/// `length` field.
const FORMAT4_MAX_SEGMENTS: usize = (0xFFFF - 16) / 8;

/// Builds the cmap of a subset font. BMP characters go into a Windows
/// Unicode BMP (3, 1) format 4 subtable. Supplementary characters, or a BMP
/// set too fragmented for format 4, add a (3, 10) format 12 subtable that
/// carries every mapping. `mappings` must be sorted by character code.
fn build_cmap(mappings: &[(u32, u16)]) -> Vec<u8> {
    let format4 = cmap_format4(mappings);
    let has_supplementary = mappings.last().is_some_and(|&(code, _)| code > 0xFFFF);

    let mut subtables: Vec<(u16, u16, Vec<u8>)> = Vec::with_capacity(2);
    let fragmented = format4.is_none();
    if let Some(format4) = format4 {
        subtables.push((3, 1, format4));
    }
    if fragmented || has_supplementary {
        subtables.push((3, 10, cmap_format12(mappings)));
    }
    if fragmented {
        tracing::debug!(
            mappings = mappings.len(),
            "cmap exceeds format 4 limits, writing format 12 only"
        );
    }

    let mut cmap = Vec::new();
    cmap.extend_from_slice(&0u16.to_be_bytes()); // version
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

/// Format 4 subtable for the BMP part of `mappings`, or `None` when the
/// segments do not fit its 16-bit size fields.
fn cmap_format4(mappings: &[(u32, u16)]) -> Option<Vec<u8>> {
    // (start, end, delta)
    let mut segments: Vec<(u16, u16, u16)> = Vec::new();
    for &(code, glyph) in mappings {
        let Ok(code) = u16::try_from(code) else {
            break;
        };
        if code == 0xFFFF {
            continue;
        }
        let delta = glyph.wrapping_sub(code);
        match segments.last_mut() {
            Some((_, end, last_delta)) if *end + 1 == code && *last_delta == delta => *end = code,
            _ => segments.push((code, code, delta)),
        }
    }
    // Final segment
    segments.push((0xFFFF, 0xFFFF, 1));
    if segments.len() > FORMAT4_MAX_SEGMENTS {
        return None;
    }

    // all of these fit in u16 below FORMAT4_MAX_SEGMENTS
    let seg_count = segments.len() as u32;
    let entry_selector = seg_count.ilog2();
    let search_range = 2 * (1u32 << entry_selector);
    let range_shift = 2 * seg_count - search_range;
    let length = 16 + 8 * seg_count;

    let mut subtable = Vec::with_capacity(length as usize);
    subtable.extend_from_slice(&4u16.to_be_bytes());
    subtable.extend_from_slice(&(length as u16).to_be_bytes());
    subtable.extend_from_slice(&0u16.to_be_bytes()); // language
    subtable.extend_from_slice(&((seg_count * 2) as u16).to_be_bytes());
    subtable.extend_from_slice(&(search_range as u16).to_be_bytes());
    subtable.extend_from_slice(&(entry_selector as u16).to_be_bytes());
    subtable.extend_from_slice(&(range_shift as u16).to_be_bytes());
    for &(_, end, _) in &segments {
        subtable.extend_from_slice(&end.to_be_bytes());
    }
    subtable.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
    for &(start, _, _) in &segments {
        subtable.extend_from_slice(&start.to_be_bytes());
    }
    for &(_, _, delta) in &segments {
        subtable.extend_from_slice(&delta.to_be_bytes());
    }
    for _ in &segments {
        subtable.extend_from_slice(&0u16.to_be_bytes());
    }
    Some(subtable)
}

/// Format 12 subtable with one group per run of consecutive codes mapped to
/// consecutive glyphs.
fn cmap_format12(mappings: &[(u32, u16)]) -> Vec<u8> {
    // (start code, end code, start glyph)
    let mut groups: Vec<(u32, u32, u32)> = Vec::new();
    for &(code, glyph) in mappings {
        let glyph = u32::from(glyph);
        match groups.last_mut() {
            Some((start, end, first_glyph))
                if *end + 1 == code && *first_glyph + (code - *start) == glyph =>
            {
                *end = code
            }
            _ => groups.push((code, code, glyph)),
        }
    }

    // at most 0x110000 groups, far below u32::MAX / 12
    let length = 16 + 12 * groups.len() as u32;
    let mut subtable = Vec::with_capacity(length as usize);
    subtable.extend_from_slice(&12u16.to_be_bytes());
    subtable.extend_from_slice(&0u16.to_be_bytes()); // reserved
    subtable.extend_from_slice(&length.to_be_bytes());
    subtable.extend_from_slice(&0u32.to_be_bytes()); // language
    subtable.extend_from_slice(&(groups.len() as u32).to_be_bytes());
    for (start, end, glyph) in groups {
        subtable.extend_from_slice(&start.to_be_bytes());
        subtable.extend_from_slice(&end.to_be_bytes());
        subtable.extend_from_slice(&glyph.to_be_bytes());
    }
    subtable
}

pub(crate) fn table_checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn pad_to_four(data: &mut Vec<u8>) {
    data.resize(padded_len(data.len()), 0);
}

/// Helper functions for reading binary data
fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| font_error(format!("Insufficient data for u16 at {offset}")))
}

fn read_i16(data: &[u8], offset: usize) -> Result<i16> {
    read_u16(data, offset).map(|v| v as i16)
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| font_error(format!("Insufficient data for u32 at {offset}")))
}

fn read_tag(data: &[u8], offset: usize) -> Result<Tag> {
    read_u32(data, offset).map(u32::to_be_bytes)
}
