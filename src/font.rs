use crate::{glyph::GlyphList, OffmarkError};
use std::path::{Path, PathBuf};

/// Which outline table a binary font carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlineFlavor {
    /// Quadratic outlines in `glyf`/`loca`
    #[default]
    TrueType,
    /// Cubic outlines in `CFF ` or `CFF2`
    PostScript,
}

#[derive(Debug, Clone)]
pub struct Font {
    pub upm: u16,
    pub flavor: OutlineFlavor,
    pub glyphs: GlyphList,
    /// The file this font was loaded from, if any
    pub source: Option<PathBuf>,
    /// The binary the font was read from; untouched tables are copied from here
    pub(crate) binary: Option<Vec<u8>>,
}

impl Default for Font {
    fn default() -> Self {
        Self::new()
    }
}

impl Font {
    pub fn new() -> Self {
        Font {
            upm: 1000,
            flavor: OutlineFlavor::default(),
            glyphs: GlyphList(vec![]),
            source: None,
            binary: None,
        }
    }

    /// Number of glyphs whose outlines have been edited
    pub fn modified_glyph_count(&self) -> usize {
        self.glyphs.iter().filter(|g| g.is_modified()).count()
    }

    /// Save the font, choosing the format from the file extension.
    ///
    /// `.ttf` always gets glyf outlines. `.otf` keeps the outline flavor
    /// the font was loaded with.
    pub fn save(&self, filename: impl AsRef<Path>) -> Result<(), OffmarkError> {
        let path = filename.as_ref();
        let target = match path.extension() {
            Some(ext) if ext == "ttf" => OutlineFlavor::TrueType,
            Some(ext) if ext == "otf" => self.flavor,
            _ => {
                return Err(OffmarkError::UnknownFileType {
                    path: path.to_path_buf(),
                })
            }
        };
        log::info!(
            "Saving {} ({} modified glyphs)",
            path.display(),
            self.modified_glyph_count()
        );
        let bytes = crate::convertors::sfnt::compile(self, target)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("out.ufo")]
    #[case("out.woff2")]
    #[case("out")]
    fn save_rejects_unknown_extensions(#[case] name: &str) {
        let dir = std::env::temp_dir().join("offmark-unknown-ext");
        let result = Font::new().save(dir.join(name));
        assert!(matches!(result, Err(OffmarkError::UnknownFileType { .. })));
        assert!(!dir.join(name).exists());
    }

    #[test]
    fn save_without_binary_fails() {
        let dir = std::env::temp_dir();
        let result = Font::new().save(dir.join("offmark-no-binary.ttf"));
        assert!(matches!(result, Err(OffmarkError::NoBinarySource)));
    }
}
