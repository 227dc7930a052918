//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;

/// A TrueType font with 1000 units per em: `.notdef` followed by one
/// single-point glyph per `(char, advance)` pair, mapped in a format 4 cmap.
pub fn simple_font(glyphs: &[(char, u16)]) -> Vec<u8> {
    let mut advances = vec![500u16];
    advances.extend(glyphs.iter().map(|&(_, advance)| advance));
    let num_glyphs = advances.len() as u16;

    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    for &advance in &advances {
        loca.extend_from_slice(&((glyf.len() / 2) as u16).to_be_bytes());
        glyf.extend_from_slice(&point_glyph(advance as i16));
        while glyf.len() % 4 != 0 {
            glyf.push(0);
        }
    }
    loca.extend_from_slice(&((glyf.len() / 2) as u16).to_be_bytes());

    let mut hmtx = Vec::new();
    for &advance in &advances {
        hmtx.extend_from_slice(&advance.to_be_bytes());
        hmtx.extend_from_slice(&0i16.to_be_bytes());
    }

    let mut head = vec![0u8; 54];
    head[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    head[18..20].copy_from_slice(&1000u16.to_be_bytes());

    let mut hhea = vec![0u8; 36];
    hhea[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    hhea[34..36].copy_from_slice(&num_glyphs.to_be_bytes());

    let mut maxp = 0x0000_5000u32.to_be_bytes().to_vec();
    maxp.extend_from_slice(&num_glyphs.to_be_bytes());

    let mappings: Vec<(u16, u16)> = glyphs
        .iter()
        .enumerate()
        .map(|(i, &(ch, _))| (ch as u16, i as u16 + 1))
        .collect();

    let mut tables = BTreeMap::new();
    tables.insert(*b"head", head);
    tables.insert(*b"hhea", hhea);
    tables.insert(*b"maxp", maxp);
    tables.insert(*b"hmtx", hmtx);
    tables.insert(*b"loca", loca);
    tables.insert(*b"glyf", glyf);
    tables.insert(*b"cmap", format4_cmap(mappings));
    assemble(&tables)
}

fn point_glyph(x_max: i16) -> Vec<u8> {
    let mut glyph = Vec::new();
    for value in [1, 0, 0, x_max, 700, 0, 0] {
        glyph.extend_from_slice(&value.to_be_bytes());
    }
    glyph.push(0x01);
    glyph.extend_from_slice(&x_max.to_be_bytes());
    glyph.extend_from_slice(&700i16.to_be_bytes());
    glyph
}

fn format4_cmap(mut mappings: Vec<(u16, u16)>) -> Vec<u8> {
    mappings.sort_unstable();
    let seg_count = mappings.len() as u16 + 1;

    let mut sub = Vec::new();
    for value in [4, 16 + 8 * seg_count, 0, seg_count * 2, 0, 0, 0] {
        sub.extend_from_slice(&value.to_be_bytes());
    }
    let ends = mappings.iter().map(|&(code, _)| code).chain([0xFFFF]);
    ends.for_each(|code| sub.extend_from_slice(&code.to_be_bytes()));
    sub.extend_from_slice(&0u16.to_be_bytes());
    let starts = mappings.iter().map(|&(code, _)| code).chain([0xFFFF]);
    starts.for_each(|code| sub.extend_from_slice(&code.to_be_bytes()));
    let deltas = mappings
        .iter()
        .map(|&(code, glyph)| glyph.wrapping_sub(code))
        .chain([1]);
    deltas.for_each(|delta| sub.extend_from_slice(&delta.to_be_bytes()));
    sub.extend_from_slice(&vec![0; seg_count as usize * 2]);

    let mut cmap = Vec::new();
    for value in [0u16, 1, 3, 1] {
        cmap.extend_from_slice(&value.to_be_bytes());
    }
    cmap.extend_from_slice(&12u32.to_be_bytes());
    cmap.extend_from_slice(&sub);
    cmap
}

fn assemble(tables: &BTreeMap<[u8; 4], Vec<u8>>) -> Vec<u8> {
    let mut font = 0x0001_0000u32.to_be_bytes().to_vec();
    font.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    font.extend_from_slice(&[0; 6]);

    let mut offset = 12 + 16 * tables.len() as u32;
    for (tag, data) in tables {
        font.extend_from_slice(tag);
        font.extend_from_slice(&checksum(data).to_be_bytes());
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

/// Sum of big-endian u32 words, the last one zero-padded.
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Table directory of a font file: tag, checksum, offset, length.
pub fn table_directory(font: &[u8]) -> Vec<([u8; 4], u32, usize, usize)> {
    let count = u16::from_be_bytes([font[4], font[5]]) as usize;
    (0..count)
        .map(|i| {
            let record = &font[12 + 16 * i..28 + 16 * i];
            let word = |at: usize| {
                u32::from_be_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
            };
            let tag = [record[0], record[1], record[2], record[3]];
            (tag, word(4), word(8) as usize, word(12) as usize)
        })
        .collect()
}

/// In-use entries of the cross-reference table of a written file, as
/// `(object number, offset)`.
pub fn xref_entries(pdf: &[u8]) -> Vec<(u32, usize)> {
    let marker = rfind(pdf, b"startxref\n").expect("startxref") + 10;
    let tail = std::str::from_utf8(&pdf[marker..]).expect("ASCII trailer");
    let start_xref: usize = tail.lines().next().unwrap().parse().unwrap();

    let table = std::str::from_utf8(&pdf[start_xref..marker]).expect("ASCII xref table");
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some("xref"));
    let mut entries = Vec::new();
    while let Some(line) = lines.next() {
        if line.starts_with("trailer") {
            break;
        }
        let mut header = line.split(' ');
        let first: u32 = header.next().unwrap().parse().unwrap();
        let count: u32 = header.next().unwrap().parse().unwrap();
        for number in first..first + count {
            let entry = lines.next().unwrap();
            if entry.ends_with("n ") {
                entries.push((number, entry[..10].parse().unwrap()));
            }
        }
    }
    entries
}

/// Payload of the stream object `number`, located through the xref table.
pub fn stream_payload(pdf: &[u8], number: u32) -> Vec<u8> {
    let (_, start) = xref_entries(pdf)
        .into_iter()
        .find(|&(n, _)| n == number)
        .expect("object in xref table");
    let data = find(pdf, b">>\nstream\n", start).expect("stream keyword") + 10;
    let end = find(pdf, b"\nendstream", data).expect("endstream");
    pdf[data..end].to_vec()
}

/// Dictionary text of the stream object `number`.
pub fn stream_dictionary(pdf: &[u8], number: u32) -> String {
    let (_, start) = xref_entries(pdf)
        .into_iter()
        .find(|&(n, _)| n == number)
        .expect("object in xref table");
    let end = find(pdf, b">>\nstream\n", start).expect("stream keyword");
    String::from_utf8_lossy(&pdf[start..end + 2]).into_owned()
}

pub fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|at| at + from)
}

pub fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}
