#![allow(clippy::unwrap_used)]
mod common;

use offmark::{
    filters::{FontFilter, MarkGlyphs},
    Batch, Font, OffmarkError,
};
use pretty_assertions::assert_eq;
use std::path::Path;

/// Square minus the part of the cut bar the stroke does not fill back in
const MARKED_SQUARE_AREA: f64 = 512.0 * 512.0 - 20412.0;
const STROKE_BAR_AREA: f64 = 20412.0;

fn marker() -> MarkGlyphs {
    MarkGlyphs::default()
}

fn glyph_area(font: &Font, id: u32) -> f64 {
    common::area(&font.glyphs.get(id).unwrap().outline().to_kurbo().unwrap())
}

fn mark_icon_font(dir: &Path) -> (Font, Font) {
    let source = common::write_icon_font(dir, "icons.ttf");
    let target = dir.join("off-icons.ttf");
    offmark::mark_font(&source, &target, &marker()).unwrap();
    (offmark::load(source).unwrap(), offmark::load(target).unwrap())
}

#[test]
fn glyphs_below_threshold_are_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let (before, after) = mark_icon_font(dir.path());
    assert_eq!(before.glyphs.len(), after.glyphs.len());
    // .notdef, A, B and the unencoded glyph
    for id in [0, 1, 2, 5] {
        assert_eq!(
            before.glyphs.get(id).unwrap().outline(),
            after.glyphs.get(id).unwrap().outline(),
            "glyph {} changed",
            id
        );
    }
}

#[test]
fn private_use_glyphs_are_marked() {
    let dir = tempfile::tempdir().unwrap();
    let (before, after) = mark_icon_font(dir.path());
    for id in [3, 4] {
        assert_ne!(
            before.glyphs.get(id).unwrap().outline(),
            after.glyphs.get(id).unwrap().outline()
        );
    }

    // The square is cut through: an outer contour and the uncovered gap
    let icon = after.glyphs.get_by_codepoint(0xE100).unwrap();
    assert_eq!(icon.outline().paths().len(), 2);
    assert!((glyph_area(&after, 3) - MARKED_SQUARE_AREA).abs() < 1.0);

    // The small square lies clear of the cut and gains the stroke alongside it
    let corner = after.glyphs.get_by_codepoint(0xF8FF).unwrap();
    assert_eq!(corner.outline().paths().len(), 2);
    assert!((glyph_area(&after, 4) - (10000.0 + STROKE_BAR_AREA)).abs() < 1.0);
}

#[test]
fn output_keeps_font_structure() {
    let dir = tempfile::tempdir().unwrap();
    let (before, after) = mark_icon_font(dir.path());
    assert_eq!(after.upm, 1000);
    for (old, new) in before.glyphs.iter().zip(after.glyphs.iter()) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.codepoints, new.codepoints);
        assert!(!new.is_modified());
    }
}

#[test]
fn marking_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_icon_font(dir.path(), "icons.ttf");
    let first = dir.path().join("first.ttf");
    let second = dir.path().join("second.ttf");
    offmark::mark_font(&source, &first, &marker()).unwrap();
    offmark::mark_font(&source, &second, &marker()).unwrap();
    assert_eq!(
        std::fs::read(first).unwrap(),
        std::fs::read(second).unwrap()
    );
}

#[test]
fn marked_font_can_be_marked_again() {
    let dir = tempfile::tempdir().unwrap();
    let (_, once) = mark_icon_font(dir.path());
    let mut twice = offmark::load(dir.path().join("off-icons.ttf")).unwrap();
    marker().apply(&mut twice).unwrap();
    assert_eq!(twice.modified_glyph_count(), 2);
    let target = dir.path().join("twice.ttf");
    twice.save(&target).unwrap();
    let twice = offmark::load(target).unwrap();
    // The stroke already fills its own cut, so the area is stable
    assert!((glyph_area(&twice, 3) - glyph_area(&once, 3)).abs() < 1.0);
}

#[test]
fn threshold_is_configurable() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_icon_font(dir.path(), "icons.ttf");
    let target = dir.path().join("off.ttf");
    let filter: MarkGlyphs = MarkGlyphs::from_str("70,448,27,U+0042").unwrap();
    offmark::mark_font(&source, &target, &filter).unwrap();
    let (before, after) = (
        offmark::load(source).unwrap(),
        offmark::load(target).unwrap(),
    );
    assert_eq!(
        before.glyphs.get(1).unwrap().outline(),
        after.glyphs.get(1).unwrap().outline()
    );
    assert_ne!(
        before.glyphs.get(2).unwrap().outline(),
        after.glyphs.get(2).unwrap().outline()
    );
}

#[test]
fn font_extents_follow_the_marked_outlines() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("corner.ttf");
    let glyphs = [
        common::TestGlyph {
            codepoint: None,
            outline: None,
        },
        common::TestGlyph {
            codepoint: Some('\u{E000}'),
            outline: Some(common::square(400.0, 400.0, 500.0, 500.0)),
        },
    ];
    std::fs::write(&source, common::build_font(&glyphs)).unwrap();
    assert_eq!(
        common::font_extents(&std::fs::read(&source).unwrap()),
        [400, 400, 500, 500, 400, 12, 500]
    );

    let target = dir.path().join("off-corner.ttf");
    offmark::mark_font(&source, &target, &marker()).unwrap();
    // The stroke bar reaches down to (43, 43); the square still sets the maxima
    assert_eq!(
        common::font_extents(&std::fs::read(&target).unwrap()),
        [43, 43, 500, 500, 43, 12, 500]
    );
}

fn write_material_sources(dir: &Path, skip: Option<&str>) {
    for name in [
        "MaterialIcons-Regular.ttf",
        "MaterialIconsOutlined-Regular.otf",
        "MaterialIconsRound-Regular.otf",
        "MaterialIconsSharp-Regular.otf",
    ] {
        if Some(name) != skip {
            common::write_icon_font(dir, name);
        }
    }
}

#[test]
fn batch_writes_every_flavor() {
    let source = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_material_sources(source.path(), None);

    let batch = Batch::material_icons(source.path(), output.path());
    assert_eq!(batch.run(&marker()).unwrap(), 4);

    let mut written: Vec<String> = std::fs::read_dir(output.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            "MaterialOffIcons-Regular.ttf",
            "MaterialOffIconsOutlined-Regular.otf",
            "MaterialOffIconsRound-Regular.otf",
            "MaterialOffIconsSharp-Regular.otf",
        ]
    );
    for job in &batch.jobs {
        let font = offmark::load(&job.target).unwrap();
        assert!((glyph_area(&font, 3) - MARKED_SQUARE_AREA).abs() < 1.0);
    }
}

#[test]
fn missing_source_halts_the_batch() {
    let source = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_material_sources(source.path(), Some("MaterialIconsRound-Regular.otf"));

    let batch = Batch::material_icons(source.path(), output.path());
    let result = batch.run(&marker());
    assert!(matches!(result, Err(OffmarkError::IO(_))));

    let exists: Vec<bool> = batch.jobs.iter().map(|job| job.target.exists()).collect();
    assert_eq!(exists, vec![true, true, false, false]);
}

#[test]
fn unwritable_target_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_icon_font(dir.path(), "icons.ttf");
    let target = dir.path().join("no-such-dir").join("off.ttf");
    let result = offmark::mark_font(&source, &target, &marker());
    assert!(matches!(result, Err(OffmarkError::IO(_))));
    assert!(!target.exists());
}

#[test]
fn malformed_source_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("broken.ttf");
    std::fs::write(&source, b"not a font at all").unwrap();
    let target = dir.path().join("off.ttf");
    let result = offmark::mark_font(&source, &target, &marker());
    assert!(matches!(result, Err(OffmarkError::BinaryFontRead(_))));
    assert!(!target.exists());
}
