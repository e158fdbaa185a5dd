mod markglyphs;

pub use markglyphs::{MarkGeometry, MarkGlyphs, PRIVATE_USE_START};

/// A trait for font filters that can be applied to a font
pub trait FontFilter {
    /// Apply the filter to the given font
    fn apply(&self, font: &mut crate::Font) -> Result<(), crate::OffmarkError>;

    /// Parse a FontFilter from a string argument
    fn from_str(s: &str) -> Result<Self, crate::OffmarkError>
    where
        Self: Sized;
}
