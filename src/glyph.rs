use crate::shape::{Path, PathBuilder};
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, Default)]
pub struct GlyphList(pub Vec<Glyph>);
impl GlyphList {
    pub fn get(&self, id: u32) -> Option<&Glyph> {
        self.0.iter().find(|glyph| glyph.id == id)
    }

    /// Find the glyph a code point is mapped to
    pub fn get_by_codepoint(&self, codepoint: u32) -> Option<&Glyph> {
        self.0
            .iter()
            .find(|glyph| glyph.codepoints.contains(&codepoint))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Glyph> {
        self.0.iter()
    }
}

impl Deref for GlyphList {
    type Target = Vec<Glyph>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for GlyphList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// The foreground layer of a glyph: a set of closed contours
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    paths: Vec<Path>,
}

impl Outline {
    pub fn new(paths: Vec<Path>) -> Self {
        Outline { paths }
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Replace every contour
    pub fn set(&mut self, paths: Vec<Path>) {
        self.paths = paths;
    }

    /// Add contours after the existing ones
    pub fn append(&mut self, paths: Vec<Path>) {
        self.paths.extend(paths);
    }

    /// Draw contours with a pen; with `replace` the drawing supersedes the
    /// current contours, otherwise it is appended to them.
    pub fn draw(&mut self, replace: bool, f: impl FnOnce(&mut PathBuilder)) {
        let mut pen = PathBuilder::new();
        f(&mut pen);
        if replace {
            self.set(pen.build());
        } else {
            self.append(pen.build());
        }
    }

    pub fn to_kurbo(&self) -> Result<kurbo::BezPath, crate::OffmarkError> {
        crate::shape::paths_to_kurbo(&self.paths)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Glyph {
    /// Glyph id within the font
    pub id: u32,
    /// Every code point the character map assigns to this glyph, ascending
    pub codepoints: Vec<u32>,
    outline: Outline,
    modified: bool,
}

impl Glyph {
    pub fn new(id: u32, codepoints: Vec<u32>, outline: Outline) -> Self {
        let mut codepoints = codepoints;
        codepoints.sort_unstable();
        codepoints.dedup();
        Glyph {
            id,
            codepoints,
            outline,
            modified: false,
        }
    }

    /// The primary code point: the lowest one mapped to this glyph
    pub fn unicode(&self) -> Option<u32> {
        self.codepoints.first().copied()
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Mutable access to the outline; marks the glyph as modified
    pub fn outline_mut(&mut self) -> &mut Outline {
        self.modified = true;
        &mut self.outline
    }

    /// Whether the outline has been touched since loading
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}
