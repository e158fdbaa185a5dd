use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors that can occur while loading, marking or saving a font
pub enum OffmarkError {
    #[error("Unknown file type for file {path:?}")]
    /// The file extension is not a binary font format we can handle
    UnknownFileType {
        /// The path with the unrecognised extension
        path: PathBuf,
    },

    #[error("IO Error: {0}")]
    /// An IO error occurred
    IO(#[from] io::Error),

    #[error("Binary font reading error: {0}")]
    /// The sfnt structure or one of its tables could not be read
    BinaryFontRead(#[from] write_fonts::read::ReadError),

    #[error("Malformed font: {0}")]
    /// The font could not be interpreted by the outline reader
    Malformed(String),

    #[error("Font contains neither glyf nor CFF outlines")]
    /// The font has no outline table we know how to edit
    NoOutlines,

    #[error("Ill-constructed path")]
    /// A path's nodes do not describe a valid sequence of segments
    BadPath,

    #[error("Glyph {glyph}: {reason}")]
    /// A glyph outline could not be read, combined or encoded
    Outline {
        /// The glyph id
        glyph: u32,
        /// What went wrong
        reason: String,
    },

    #[error("Error assembling font: {0}")]
    /// The font builder rejected a table
    Builder(#[from] write_fonts::BuilderError),

    #[error("Error writing table: {0}")]
    /// A table could not be compiled
    Write(#[from] write_fonts::error::Error),

    #[error("Font was not loaded from a binary and cannot be saved")]
    /// Saving requires the binary the font was loaded from
    NoBinarySource,

    #[error("Filter error: {0}")]
    /// General error when running a filter
    FilterError(String),
}
