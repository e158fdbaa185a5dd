#![allow(clippy::unwrap_used, dead_code)]
use kurbo::{BezPath, Rect, Shape};
use std::path::{Path, PathBuf};
use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
    },
    read::{FontRef, TableProvider},
    types::{FWord, GlyphId},
    FontBuilder,
};

pub const ADVANCE: u16 = 512;

/// A glyph in a test font: an optional code point and an optional outline
pub struct TestGlyph {
    pub codepoint: Option<char>,
    pub outline: Option<BezPath>,
}

pub fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    Rect::new(x0, y0, x1, y1).to_path(0.1)
}

/// .notdef, "A", "B", two private-use icons and an unencoded glyph
pub fn icon_glyphs() -> Vec<TestGlyph> {
    vec![
        TestGlyph {
            codepoint: None,
            outline: None,
        },
        TestGlyph {
            codepoint: Some('A'),
            outline: Some(square(100.0, 0.0, 400.0, 700.0)),
        },
        TestGlyph {
            codepoint: Some('B'),
            outline: Some(square(50.0, 50.0, 150.0, 150.0)),
        },
        TestGlyph {
            codepoint: Some('\u{E100}'),
            outline: Some(square(0.0, 0.0, 512.0, 512.0)),
        },
        TestGlyph {
            codepoint: Some('\u{F8FF}'),
            outline: Some(square(400.0, 400.0, 500.0, 500.0)),
        },
        TestGlyph {
            codepoint: None,
            outline: Some(square(0.0, 0.0, 512.0, 512.0)),
        },
    ]
}

/// Assemble a minimal TrueType font
pub fn build_font(glyphs: &[TestGlyph]) -> Vec<u8> {
    let mut builder = GlyfLocaBuilder::new();
    let mut side_bearings = vec![];
    let mut bounds = vec![];
    for glyph in glyphs {
        match &glyph.outline {
            Some(path) => {
                let simple = SimpleGlyph::from_bezpath(path).unwrap();
                side_bearings.push(simple.bbox.x_min);
                bounds.push(simple.bbox);
                builder.add_glyph(&Glyph::Simple(simple)).unwrap();
            }
            None => {
                side_bearings.push(0);
                builder.add_glyph(&Glyph::Empty).unwrap();
            }
        }
    }
    let (glyf, loca, loca_format) = builder.build();

    let head = Head {
        units_per_em: 1000,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        x_min: bounds.iter().map(|b| b.x_min).min().unwrap_or(0),
        y_min: bounds.iter().map(|b| b.y_min).min().unwrap_or(0),
        x_max: bounds.iter().map(|b| b.x_max).max().unwrap_or(0),
        y_max: bounds.iter().map(|b| b.y_max).max().unwrap_or(0),
        ..Default::default()
    };
    let maxp = Maxp {
        num_glyphs: glyphs.len() as u16,
        max_points: Some(64),
        max_contours: Some(8),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };
    let hhea = Hhea {
        number_of_h_metrics: glyphs.len() as u16,
        advance_width_max: ADVANCE.into(),
        min_left_side_bearing: FWord::new(bounds.iter().map(|b| b.x_min).min().unwrap_or(0)),
        min_right_side_bearing: FWord::new(
            bounds
                .iter()
                .map(|b| ADVANCE as i16 - b.x_max)
                .min()
                .unwrap_or(0),
        ),
        x_max_extent: FWord::new(bounds.iter().map(|b| b.x_max).max().unwrap_or(0)),
        ..Default::default()
    };
    let hmtx = Hmtx::new(
        side_bearings
            .into_iter()
            .map(|lsb| LongMetric::new(ADVANCE, lsb))
            .collect(),
        vec![],
    );
    let cmap = Cmap::from_mappings(glyphs.iter().enumerate().filter_map(|(id, glyph)| {
        glyph
            .codepoint
            .map(|cp| (cp, GlyphId::new(id as u32)))
    }))
    .unwrap();

    let mut font = FontBuilder::new();
    font.add_table(&head).unwrap();
    font.add_table(&maxp).unwrap();
    font.add_table(&hhea).unwrap();
    font.add_table(&hmtx).unwrap();
    font.add_table(&cmap).unwrap();
    font.add_table(&glyf).unwrap();
    font.add_table(&loca).unwrap();
    font.build()
}

/// Write the icon test font to `dir/name`
pub fn write_icon_font(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_font(&icon_glyphs())).unwrap();
    path
}

/// Font-wide extents as `[xMin, yMin, xMax, yMax, minLSB, minRSB, xMaxExtent]`
/// from `head` and `hhea`
pub fn font_extents(data: &[u8]) -> [i16; 7] {
    let font = FontRef::new(data).unwrap();
    let (head, hhea) = (font.head().unwrap(), font.hhea().unwrap());
    [
        head.x_min(),
        head.y_min(),
        head.x_max(),
        head.y_max(),
        hhea.min_left_side_bearing().to_i16(),
        hhea.min_right_side_bearing().to_i16(),
        hhea.x_max_extent().to_i16(),
    ]
}

pub fn area(path: &BezPath) -> f64 {
    path.area().abs()
}
