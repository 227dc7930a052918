//! TrueType subsetting through the public codec and font types

mod common;

use common::{checksum, simple_font, table_directory};
use pretty_assertions::assert_eq;
use quillpdf::text::{CMap, CidFont, Font, GlyphSubset, TrueTypeFont};

fn alphabet() -> TrueTypeFont {
    let glyphs: Vec<(char, u16)> = ('a'..='j')
        .enumerate()
        .map(|(i, ch)| (ch, 400 + 10 * i as u16))
        .collect();
    TrueTypeFont::parse(simple_font(&glyphs)).unwrap()
}

#[test]
fn test_filtered_font_round_trips() {
    let font = alphabet();
    assert_eq!(font.num_glyphs(), 11);

    // .notdef, 'c', 'a'
    let subset = font.filter_glyphs(&[0, 3, 1]).unwrap();
    let binary = subset.rebuild_binary().unwrap();
    let reparsed = TrueTypeFont::parse(binary).unwrap();

    assert_eq!(reparsed.num_glyphs(), 3);
    assert_eq!(reparsed.units_per_em(), 1000);
    assert_eq!(reparsed.glyph_widths(), vec![500, 420, 400]);
    assert_eq!(reparsed.glyph_id('c'), Some(1));
    assert_eq!(reparsed.glyph_id('a'), Some(2));
    assert_eq!(reparsed.glyph_id('b'), None);
}

#[test]
fn test_rebuilt_binary_checksums() {
    let binary = alphabet()
        .filter_glyphs(&[0, 5, 6])
        .unwrap()
        .rebuild_binary()
        .unwrap();
    assert_eq!(binary.len() % 4, 0);

    let directory = table_directory(&binary);
    let tags: Vec<[u8; 4]> = directory.iter().map(|(tag, ..)| *tag).collect();
    let mut sorted = tags.clone();
    sorted.sort();
    assert_eq!(tags, sorted);

    for (tag, sum, offset, length) in &directory {
        let mut data = binary[*offset..*offset + *length].to_vec();
        if tag == b"head" {
            data[8..12].fill(0);
        }
        assert_eq!(*sum, checksum(&data), "{}", String::from_utf8_lossy(tag));
        assert_eq!(offset % 4, 0);
    }
    assert_eq!(checksum(&binary), 0xB1B0_AFBA);
}

#[test]
fn test_filter_rejects_bad_requests() {
    let font = alphabet();
    assert!(font.filter_glyphs(&[]).is_err());
    assert!(font.filter_glyphs(&[0, 11]).is_err());
    assert!(font.filter_glyphs(&[0, 2, 2]).is_err());
}

#[test]
fn test_parse_rejects_other_containers() {
    let mut otto = simple_font(&[('a', 100)]);
    otto[0..4].copy_from_slice(b"OTTO");
    assert!(TrueTypeFont::parse(otto).is_err());

    let mut collection = simple_font(&[('a', 100)]);
    collection[0..4].copy_from_slice(b"ttcf");
    assert!(TrueTypeFont::parse(collection).is_err());

    assert!(TrueTypeFont::parse(vec![0, 1, 0, 0]).is_err());
}

/// Shows the codec's debug events with `--nocapture`.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("quillpdf=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn test_glyph_subset_assigns_ids_in_first_use_order() {
    init_logging();
    let font = alphabet();
    let mut subset = GlyphSubset::new();
    for ch in "jab".chars() {
        subset.map_glyph(font.glyph_id(ch).unwrap(), &font);
    }
    assert_eq!(subset.ordered_ids(), vec![0, 10, 1, 2]);
    assert_eq!(subset.get(10), Some(1));

    subset.freeze();
    assert_eq!(subset.map_glyph(font.glyph_id('e').unwrap(), &font), 0);
    assert_eq!(subset.len(), 4);
}

#[test]
fn test_composite_font_widths_after_finalize() {
    init_logging();
    let mut font = Font::composite("F0", CMap::IDENTITY_H, CidFont::embedded(alphabet()));
    let text = font.create_text(0, 0, 10, "ba");
    assert!(text.contains("<00010002> Tj"));

    font.finalize().unwrap();
    let compiled = font.compile();
    assert!(compiled.contains("/W [0 [500 410 400]]"));
    assert!(compiled.contains("/DW 400"));
    assert!(compiled.contains("/Encoding /Identity-H"));

    // finalizing again is a no-op
    font.finalize().unwrap();
    assert_eq!(font.compile(), compiled);
}
