use super::cff;
use crate::{
    font::OutlineFlavor,
    glyph::{Glyph, GlyphList, Outline},
    Font, OffmarkError, OutlinePen, PathBuilder,
};
use kurbo::{BezPath, CubicBez, PathEl, Point, Shape};
use skrifa::{
    instance::{LocationRef, Size},
    outline::DrawSettings,
    MetadataProvider,
};
use std::{collections::BTreeMap, path::PathBuf};
use write_fonts::{
    from_obj::FromTableRef,
    read::{
        tables::{
            glyf::{Glyf as ReadGlyf, Glyph as ReadGlyph},
            loca::Loca as ReadLoca,
        },
        FontRef, TableProvider,
    },
    tables::{
        glyf::{CompositeGlyph, Glyf, GlyfLocaBuilder, Glyph as WriteGlyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::Hmtx,
        loca::{Loca, LocaFormat},
        maxp::Maxp,
    },
    types::{FWord, GlyphId, Tag},
    FontBuilder,
};

/// Maximum distance between a cubic curve and its quadratic replacement
const CUBIC_ACCURACY: f64 = 0.5;

const GLYF: Tag = Tag::new(b"glyf");
const LOCA: Tag = Tag::new(b"loca");
const HEAD: Tag = Tag::new(b"head");
const HHEA: Tag = Tag::new(b"hhea");
const MAXP: Tag = Tag::new(b"maxp");
const HMTX: Tag = Tag::new(b"hmtx");
const CFF: Tag = Tag::new(b"CFF ");
const CFF2: Tag = Tag::new(b"CFF2");
const VORG: Tag = Tag::new(b"VORG");
const DSIG: Tag = Tag::new(b"DSIG");

pub fn load(path: PathBuf) -> Result<Font, OffmarkError> {
    log::info!("Loading {}", path.display());
    let data = std::fs::read(&path)?;
    let mut font = from_bytes(data)?;
    font.source = Some(path);
    Ok(font)
}

/// Read a TrueType or OpenType binary into the glyph model
pub fn from_bytes(data: Vec<u8>) -> Result<Font, OffmarkError> {
    let (upm, flavor, glyphs) = {
        let tables = FontRef::new(&data)?;
        let upm = tables.head()?.units_per_em();
        let num_glyphs = tables.maxp()?.num_glyphs();
        let flavor = if tables.table_data(GLYF).is_some() {
            OutlineFlavor::TrueType
        } else if tables.table_data(CFF).is_some() || tables.table_data(CFF2).is_some() {
            OutlineFlavor::PostScript
        } else {
            return Err(OffmarkError::NoOutlines);
        };
        (upm, flavor, read_glyphs(&data, num_glyphs)?)
    };
    log::debug!("Read {} glyphs ({:?} outlines)", glyphs.len(), flavor);
    Ok(Font {
        upm,
        flavor,
        glyphs: GlyphList(glyphs),
        source: None,
        binary: Some(data),
    })
}

fn read_glyphs(data: &[u8], num_glyphs: u16) -> Result<Vec<Glyph>, OffmarkError> {
    let font = skrifa::FontRef::new(data).map_err(|e| OffmarkError::Malformed(e.to_string()))?;
    let mut codepoints: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for (codepoint, gid) in font.charmap().mappings() {
        codepoints.entry(gid.to_u32()).or_default().push(codepoint);
    }
    let outlines = font.outline_glyphs();
    let mut glyphs = Vec::with_capacity(num_glyphs as usize);
    for id in 0..u32::from(num_glyphs) {
        let mut pen = PathBuilder::new();
        if let Some(outline) = outlines.get(skrifa::GlyphId::new(id)) {
            let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
            outline
                .draw(settings, &mut SkrifaPen(&mut pen))
                .map_err(|e| OffmarkError::Outline {
                    glyph: id,
                    reason: e.to_string(),
                })?;
        }
        glyphs.push(Glyph::new(
            id,
            codepoints.remove(&id).unwrap_or_default(),
            Outline::new(pen.build()),
        ));
    }
    Ok(glyphs)
}

/// Forwards skrifa's drawing commands to one of our pens
struct SkrifaPen<'a, P: OutlinePen>(&'a mut P);

impl<P: OutlinePen> skrifa::outline::OutlinePen for SkrifaPen<'_, P> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0.quad_to(cx0, cy0, x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.curve_to(cx0, cy0, cx1, cy1, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

/// Bounds of every glyph, plus maxp statistics of the glyphs we re-encoded
#[derive(Debug, Default)]
struct Extents {
    bounds: BTreeMap<u32, [i16; 4]>,
    max_points: u16,
    max_contours: u16,
    reencoded: Vec<u32>,
}

impl Extents {
    fn record_bounds(&mut self, id: u32, bounds: Option<[i16; 4]>) {
        if let Some(bounds) = bounds {
            self.bounds.insert(id, bounds);
        }
    }

    fn record_simple(&mut self, id: u32, simple: &SimpleGlyph, path: &BezPath) {
        let bbox = simple.bbox;
        self.record_bounds(id, Some([bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]));
        // An upper bound: encoding can only drop implied on-curve points
        let (points, contours) = path.elements().iter().fold((0, 0), |(p, c), el| match el {
            PathEl::MoveTo(_) => (p + 1, c + 1),
            PathEl::LineTo(_) => (p + 1, c),
            PathEl::QuadTo(..) => (p + 2, c),
            PathEl::CurveTo(..) => (p + 3, c),
            PathEl::ClosePath => (p, c),
        });
        self.max_points = self.max_points.max(clamp_u16(points));
        self.max_contours = self.max_contours.max(clamp_u16(contours));
        self.reencoded.push(id);
    }

    /// Union of all glyph bounds
    fn font_bounds(&self) -> Option<[i16; 4]> {
        self.bounds.values().copied().reduce(|[x0, y0, x1, y1], [a0, b0, a1, b1]| {
            [x0.min(a0), y0.min(b0), x1.max(a1), y1.max(b1)]
        })
    }
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn clamp_i16(value: f64) -> i16 {
    value.clamp(i16::MIN.into(), i16::MAX.into()) as i16
}

/// Integer bounds enclosing the outline, or `None` if it is empty
fn path_bounds(path: &BezPath) -> Option<[i16; 4]> {
    if path.elements().is_empty() {
        return None;
    }
    let rect = path.bounding_box();
    Some([
        clamp_i16(rect.x0.floor()),
        clamp_i16(rect.y0.floor()),
        clamp_i16(rect.x1.ceil()),
        clamp_i16(rect.y1.ceil()),
    ])
}

fn glyph_bounds(glyph: &WriteGlyph) -> Option<[i16; 4]> {
    let bbox = match glyph {
        WriteGlyph::Empty => return None,
        WriteGlyph::Simple(simple) => simple.bbox,
        WriteGlyph::Composite(composite) => composite.bbox,
    };
    Some([bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max])
}

/// Serialize the font with the given outline flavor, re-encoding edited
/// glyphs and copying everything else.
///
/// A PostScript target keeps the source's `CFF ` or `CFF2` table and only
/// swaps in charstrings for edited glyphs. A TrueType target rebuilds
/// `glyf`/`loca`, converting every glyph of a PostScript source.
pub(crate) fn compile(font: &Font, target: OutlineFlavor) -> Result<Vec<u8>, OffmarkError> {
    let data = font.binary.as_deref().ok_or(OffmarkError::NoBinarySource)?;
    let source = FontRef::new(data)?;
    let mut builder = FontBuilder::new();
    let mut rebuilt = vec![HEAD, HHEA, HMTX, DSIG];
    let mut head = Head::from_table_ref(&source.head()?);
    let mut extents = Extents::default();

    match (target, font.flavor) {
        (OutlineFlavor::PostScript, OutlineFlavor::PostScript) => {
            let tag = if source.table_data(CFF).is_some() {
                CFF
            } else {
                CFF2
            };
            let table = source.table_data(tag).ok_or(OffmarkError::NoOutlines)?;
            let charstrings = encode_charstrings(font, tag == CFF2, &mut extents)?;
            builder.add_raw(tag, cff::replace_charstrings(table.as_bytes(), &charstrings)?);
            rebuilt.push(tag);
        }
        _ => {
            let (glyf, loca, loca_format) = encode_glyf(font, &source, &mut extents)?;
            head.index_to_loc_format = match loca_format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            };
            builder.add_table(&glyf)?;
            builder.add_table(&loca)?;
            builder.add_table(&truetype_maxp(&source, &extents)?)?;
            // Outlines now live in glyf alone
            rebuilt.extend([GLYF, LOCA, MAXP, CFF, CFF2, VORG]);
        }
    }
    log::debug!(
        "Re-encoded {} glyphs as {:?}",
        extents.reencoded.len(),
        target
    );

    if let Some([x0, y0, x1, y1]) = extents.font_bounds() {
        head.x_min = x0;
        head.y_min = y0;
        head.x_max = x1;
        head.y_max = y1;
    }

    let mut hmtx = Hmtx::from_table_ref(&source.hmtx()?);
    let long_metrics = hmtx.h_metrics.len();
    for &id in &extents.reencoded {
        let Some(&[x_min, ..]) = extents.bounds.get(&id) else {
            continue;
        };
        let id = id as usize;
        if id < long_metrics {
            if let Some(metric) = hmtx.h_metrics.get_mut(id) {
                metric.side_bearing = x_min;
            }
        } else if let Some(bearing) = hmtx.left_side_bearings.get_mut(id - long_metrics) {
            *bearing = x_min;
        }
    }
    let mut hhea = Hhea::from_table_ref(&source.hhea()?);
    update_hhea(&mut hhea, &hmtx, &extents);

    builder.add_table(&head)?;
    builder.add_table(&hhea)?;
    builder.add_table(&hmtx)?;
    for record in source.table_directory.table_records() {
        let tag = record.tag();
        if rebuilt.contains(&tag) {
            continue;
        }
        if let Some(table) = source.table_data(tag) {
            builder.add_raw(tag, table.as_bytes());
        }
    }
    Ok(builder.build())
}

/// Type 2 charstrings for the edited glyphs of a PostScript source
fn encode_charstrings(
    font: &Font,
    cff2: bool,
    extents: &mut Extents,
) -> Result<BTreeMap<u32, Vec<u8>>, OffmarkError> {
    let mut charstrings = BTreeMap::new();
    for glyph in font.glyphs.iter() {
        let path = glyph.outline().to_kurbo()?;
        if glyph.is_modified() {
            // Charstrings hold integers; round first so the bounds agree
            let path = rounded(&path);
            extents.record_bounds(glyph.id, path_bounds(&path));
            extents.reencoded.push(glyph.id);
            charstrings.insert(glyph.id, cff::charstring(&path, cff2));
        } else {
            extents.record_bounds(glyph.id, path_bounds(&path));
        }
    }
    Ok(charstrings)
}

/// Rebuild glyf/loca, carrying over untouched TrueType glyphs as they were
fn encode_glyf(
    font: &Font,
    source: &FontRef,
    extents: &mut Extents,
) -> Result<(Glyf, Loca, LocaFormat), OffmarkError> {
    let original = match font.flavor {
        OutlineFlavor::TrueType => Some((source.loca(None)?, source.glyf()?)),
        OutlineFlavor::PostScript => None,
    };
    let mut glyf_builder = GlyfLocaBuilder::new();
    for glyph in font.glyphs.iter() {
        let carried = match (&original, glyph.is_modified()) {
            (Some((loca, glyf)), false) => Some(copy_glyph(loca, glyf, glyph.id)?),
            _ => None,
        };
        if let Some(carried) = carried {
            extents.record_bounds(glyph.id, glyph_bounds(&carried));
            glyf_builder.add_glyph(&carried)?;
            continue;
        }
        let path = to_quadratic(&glyph.outline().to_kurbo()?);
        if path.elements().is_empty() {
            glyf_builder.add_glyph(&WriteGlyph::Empty)?;
            continue;
        }
        let simple = SimpleGlyph::from_bezpath(&path).map_err(|e| OffmarkError::Outline {
            glyph: glyph.id,
            reason: format!("cannot encode outline: {:?}", e),
        })?;
        extents.record_simple(glyph.id, &simple, &path);
        glyf_builder.add_glyph(&WriteGlyph::Simple(simple))?;
    }
    Ok(glyf_builder.build())
}

fn truetype_maxp(source: &FontRef, extents: &Extents) -> Result<Maxp, OffmarkError> {
    let mut maxp = Maxp::from_table_ref(&source.maxp()?);
    maxp.max_points = Some(maxp.max_points.unwrap_or(0).max(extents.max_points));
    maxp.max_contours = Some(maxp.max_contours.unwrap_or(0).max(extents.max_contours));
    // Version 0.5 tables (from CFF fonts) lack the TrueType fields entirely
    maxp.max_zones.get_or_insert(1);
    for field in [
        &mut maxp.max_composite_points,
        &mut maxp.max_composite_contours,
        &mut maxp.max_twilight_points,
        &mut maxp.max_storage,
        &mut maxp.max_function_defs,
        &mut maxp.max_instruction_defs,
        &mut maxp.max_stack_elements,
        &mut maxp.max_size_of_instructions,
        &mut maxp.max_component_elements,
        &mut maxp.max_component_depth,
    ] {
        field.get_or_insert(0);
    }
    Ok(maxp)
}

/// Recompute the side bearing extremes from the glyph bounds and metrics.
/// Empty glyphs do not count.
fn update_hhea(hhea: &mut Hhea, hmtx: &Hmtx, extents: &Extents) {
    let metrics = extents.bounds.iter().filter_map(|(&id, &[x_min, _, x_max, _])| {
        let id = id as usize;
        let advance = hmtx
            .h_metrics
            .get(id)
            .or_else(|| hmtx.h_metrics.last())?
            .advance;
        let lsb = match hmtx.h_metrics.get(id) {
            Some(metric) => metric.side_bearing,
            None => *hmtx.left_side_bearings.get(id - hmtx.h_metrics.len())?,
        };
        let extent = i32::from(lsb) + i32::from(x_max) - i32::from(x_min);
        Some((i32::from(lsb), i32::from(advance) - extent, extent))
    });
    let mut found = false;
    let (mut min_lsb, mut min_rsb, mut max_extent) = (i32::MAX, i32::MAX, i32::MIN);
    for (lsb, rsb, extent) in metrics {
        found = true;
        min_lsb = min_lsb.min(lsb);
        min_rsb = min_rsb.min(rsb);
        max_extent = max_extent.max(extent);
    }
    if found {
        let fword = |v: i32| FWord::new(clamp_i16(v.into()));
        hhea.min_left_side_bearing = fword(min_lsb);
        hhea.min_right_side_bearing = fword(min_rsb);
        hhea.x_max_extent = fword(max_extent);
    }
}

/// Snap every point to the integer grid
fn rounded(path: &BezPath) -> BezPath {
    let round = |p: Point| Point::new(p.x.round(), p.y.round());
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => PathEl::MoveTo(round(p)),
            PathEl::LineTo(p) => PathEl::LineTo(round(p)),
            PathEl::QuadTo(p1, p2) => PathEl::QuadTo(round(p1), round(p2)),
            PathEl::CurveTo(p1, p2, p3) => PathEl::CurveTo(round(p1), round(p2), round(p3)),
            PathEl::ClosePath => PathEl::ClosePath,
        })
        .collect()
}

fn copy_glyph(loca: &ReadLoca, glyf: &ReadGlyf, id: u32) -> Result<WriteGlyph, OffmarkError> {
    Ok(match loca.get_glyf(GlyphId::new(id), glyf)? {
        None => WriteGlyph::Empty,
        Some(ReadGlyph::Simple(simple)) => WriteGlyph::Simple(SimpleGlyph::from_table_ref(&simple)),
        Some(ReadGlyph::Composite(composite)) => {
            WriteGlyph::Composite(CompositeGlyph::from_table_ref(&composite))
        }
    })
}

/// Replace cubic segments with quadratic splines, as glyf requires
fn to_quadratic(path: &BezPath) -> BezPath {
    let mut out = BezPath::new();
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.move_to(p);
                current = p;
                start = p;
            }
            PathEl::LineTo(p) => {
                out.line_to(p);
                current = p;
            }
            PathEl::QuadTo(p1, p2) => {
                out.quad_to(p1, p2);
                current = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                for (_, _, quad) in CubicBez::new(current, p1, p2, p3).to_quads(CUBIC_ACCURACY) {
                    out.quad_to(quad.p1, quad.p2);
                }
                current = p3;
            }
            PathEl::ClosePath => {
                out.close_path();
                current = start;
            }
        }
    }
    out
}
