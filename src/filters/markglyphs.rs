use crate::{
    boolean::{BooleanOps, Overlay},
    filters::FontFilter,
    glyph::{Glyph, Outline},
    OffmarkError, OutlinePen, PathBuilder,
};
use kurbo::Point;

/// First code point of the Basic Multilingual Plane's private-use area
pub const PRIVATE_USE_START: u32 = 0xE000;

/// Where the diagonal "off" mark sits, in font units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkGeometry {
    /// The upper-left end of the stroke; its mirror in the diagonal is the lower-right end
    pub anchor: Point,
    /// Offset applied to both coordinates to widen the bars
    pub width: f64,
}

impl Default for MarkGeometry {
    fn default() -> Self {
        MarkGeometry {
            anchor: Point::new(70.0, 448.0),
            width: 27.0,
        }
    }
}

impl MarkGeometry {
    pub fn new(anchor: impl Into<Point>, width: f64) -> Self {
        MarkGeometry {
            anchor: anchor.into(),
            width,
        }
    }

    /// The wide bar that is cut out of the glyph
    pub fn draw_cut_bar(&self, pen: &mut impl OutlinePen) {
        let (x, y, w) = self.coords();
        pen.move_to(x + w, y + w);
        pen.line_to(y + w, x + w);
        pen.line_to(y - w, x - w);
        pen.line_to(x - w, y - w);
        pen.close();
    }

    /// The narrower bar drawn back into the cut
    pub fn draw_stroke_bar(&self, pen: &mut impl OutlinePen) {
        let (x, y, w) = self.coords();
        pen.move_to(x, y);
        pen.line_to(y, x);
        pen.line_to(y - w, x - w);
        pen.line_to(x - w, y - w);
        pen.close();
    }

    fn coords(&self) -> (f32, f32, f32) {
        (
            self.anchor.x as f32,
            self.anchor.y as f32,
            self.width as f32,
        )
    }
}

/// A filter that strikes a diagonal "off" mark through every glyph whose
/// primary code point is at or above a threshold
#[derive(Debug, Clone)]
pub struct MarkGlyphs<B = Overlay> {
    geometry: MarkGeometry,
    threshold: u32,
    ops: B,
}

impl Default for MarkGlyphs<Overlay> {
    fn default() -> Self {
        MarkGlyphs::new(MarkGeometry::default())
    }
}

impl MarkGlyphs<Overlay> {
    /// Create a new MarkGlyphs filter for the private-use area
    pub fn new(geometry: MarkGeometry) -> Self {
        MarkGlyphs::with_ops(geometry, Overlay::default())
    }
}

impl<B: BooleanOps> MarkGlyphs<B> {
    /// Create a filter backed by a specific boolean geometry implementation
    pub fn with_ops(geometry: MarkGeometry, ops: B) -> Self {
        MarkGlyphs {
            geometry,
            threshold: PRIVATE_USE_START,
            ops,
        }
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn geometry(&self) -> &MarkGeometry {
        &self.geometry
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Unencoded glyphs are never marked
    pub fn applies_to(&self, glyph: &Glyph) -> bool {
        glyph.unicode().is_some_and(|cp| cp >= self.threshold)
    }

    /// Cut the wide bar out of the outline, draw the stroke bar back in,
    /// then clean up overlaps.
    pub fn mark_outline(&self, outline: &mut Outline) -> Result<(), OffmarkError> {
        let original = self.ops.remove_overlap(outline.paths())?;
        let mut pen = PathBuilder::new();
        self.geometry.draw_cut_bar(&mut pen);
        let mask = pen.build();
        outline.set(self.ops.exclude(&original, &mask)?);
        outline.draw(false, |pen| self.geometry.draw_stroke_bar(pen));
        let normalized = self.ops.remove_overlap(outline.paths())?;
        outline.set(normalized);
        Ok(())
    }
}

impl<B: BooleanOps + Default> FontFilter for MarkGlyphs<B> {
    fn apply(&self, font: &mut crate::Font) -> Result<(), OffmarkError> {
        log::info!(
            "Marking glyphs from U+{:04X} (anchor {:?}, width {})",
            self.threshold,
            self.geometry.anchor,
            self.geometry.width
        );
        let mut marked = 0;
        for glyph in font.glyphs.iter_mut() {
            if !self.applies_to(glyph) {
                continue;
            }
            let id = glyph.id;
            log::debug!("Marking glyph {} ({:04X?})", id, glyph.codepoints);
            self.mark_outline(glyph.outline_mut())
                .map_err(|e| OffmarkError::Outline {
                    glyph: id,
                    reason: e.to_string(),
                })?;
            marked += 1;
        }
        log::info!("Marked {} of {} glyphs", marked, font.glyphs.len());
        Ok(())
    }

    /// Parses `X,Y,WIDTH` or `X,Y,WIDTH,THRESHOLD` (threshold in hex, `U+` optional)
    fn from_str(s: &str) -> Result<Self, OffmarkError>
    where
        Self: Sized,
    {
        let bad = || OffmarkError::FilterError(format!("Bad mark specification: '{}'", s));
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let (numbers, threshold) = match parts.as_slice() {
            [x, y, w] => ([*x, *y, *w], None),
            [x, y, w, t] => ([*x, *y, *w], Some(*t)),
            _ => return Err(bad()),
        };
        let mut values = [0.0; 3];
        for (value, text) in values.iter_mut().zip(numbers) {
            *value = text.parse::<f64>().map_err(|_| bad())?;
        }
        let [x, y, width] = values;
        let mut filter = MarkGlyphs::with_ops(MarkGeometry::new((x, y), width), B::default());
        if let Some(threshold) = threshold {
            filter.threshold = parse_codepoint(threshold).ok_or_else(bad)?;
        }
        Ok(filter)
    }
}

/// Parse a hexadecimal code point, optionally prefixed with `U+` or `0x`
pub(crate) fn parse_codepoint(input: &str) -> Option<u32> {
    let input = input.trim();
    let digits = ["U+", "u+", "0x", "0X"]
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
        .unwrap_or(input);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16)
        .ok()
        .filter(|&cp| cp <= char::MAX as u32)
}
