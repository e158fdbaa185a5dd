#![deny(clippy::unwrap_used, clippy::expect_used)]
//! Build "off" variants of icon fonts.
//!
//! Every glyph at or above a code point threshold (by default the start of
//! the private-use area, U+E000) has a diagonal bar cut out of its outline
//! and a narrower stroke drawn back into the cut. Everything else in the
//! font is passed through.
//!
//! ```no_run
//! use offmark::filters::{FontFilter, MarkGlyphs};
//!
//! let mut font = offmark::load("MaterialIcons-Regular.ttf")?;
//! let filter: MarkGlyphs = MarkGlyphs::default();
//! filter.apply(&mut font)?;
//! font.save("MaterialOffIcons-Regular.ttf")?;
//! # Ok::<(), offmark::OffmarkError>(())
//! ```

pub mod batch;
mod boolean;
mod common;
pub mod convertors;
mod error;
pub mod filters;
mod font;
mod glyph;
mod shape;

pub use crate::{
    batch::{Batch, FontJob},
    boolean::{BooleanOps, Overlay},
    common::{Node, NodeType},
    error::OffmarkError,
    font::{Font, OutlineFlavor},
    glyph::{Glyph, GlyphList, Outline},
    shape::{OutlinePen, Path, PathBuilder},
};
use filters::FontFilter;
use std::path::{Path as FilePath, PathBuf};

pub fn load(filename: impl Into<PathBuf>) -> Result<Font, OffmarkError> {
    let pb = filename.into();
    match pb.extension() {
        Some(ext) if ext == "ttf" || ext == "otf" => crate::convertors::sfnt::load(pb),
        _ => Err(OffmarkError::UnknownFileType { path: pb }),
    }
}

/// Load `source`, mark it with `filter` and save the result to `target`.
///
/// Nothing is written if loading or marking fails.
pub fn mark_font(
    source: impl AsRef<FilePath>,
    target: impl AsRef<FilePath>,
    filter: &dyn FontFilter,
) -> Result<(), OffmarkError> {
    let mut font = load(source.as_ref())?;
    filter.apply(&mut font)?;
    font.save(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("icons.ufo")]
    #[case("icons.glyphs")]
    #[case("icons")]
    fn only_binary_fonts_load(#[case] name: &str) {
        assert!(matches!(
            load(name),
            Err(OffmarkError::UnknownFileType { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load("this/does/not/exist.ttf");
        assert!(matches!(result, Err(OffmarkError::IO(_))));
    }
}
