use crate::{filters::FontFilter, OffmarkError};
use std::path::{Path, PathBuf};

/// Where the Material Icons checkout keeps its fonts
pub const DEFAULT_SOURCE_DIR: &str = "material-design-icons/font";
/// Where the marked fonts are written
pub const DEFAULT_OUTPUT_DIR: &str = "assets/fonts";

/// Material Icons styles, with the extension each is distributed as
pub const MATERIAL_FLAVORS: [(&str, &str); 4] = [
    ("", "ttf"),
    ("Outlined", "otf"),
    ("Round", "otf"),
    ("Sharp", "otf"),
];

/// One font to mark: where it is read from and where the result goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontJob {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl FontJob {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        FontJob {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn run(&self, filter: &dyn FontFilter) -> Result<(), OffmarkError> {
        crate::mark_font(&self.source, &self.target, filter)
    }
}

/// An ordered list of fonts, processed one after another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub jobs: Vec<FontJob>,
}

impl Default for Batch {
    fn default() -> Self {
        Batch::material_icons(DEFAULT_SOURCE_DIR, DEFAULT_OUTPUT_DIR)
    }
}

impl Batch {
    pub fn new(jobs: Vec<FontJob>) -> Self {
        Batch { jobs }
    }

    /// The four Material Icons styles, renamed from `MaterialIcons*` to
    /// `MaterialOffIcons*`
    pub fn material_icons(source_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        let (source_dir, output_dir) = (source_dir.as_ref(), output_dir.as_ref());
        let jobs = MATERIAL_FLAVORS
            .iter()
            .map(|(flavor, ext)| {
                FontJob::new(
                    source_dir.join(format!("MaterialIcons{}-Regular.{}", flavor, ext)),
                    output_dir.join(format!("MaterialOffIcons{}-Regular.{}", flavor, ext)),
                )
            })
            .collect();
        Batch { jobs }
    }

    /// Run every job in order, stopping at the first failure. Fonts written
    /// before the failure are left in place.
    pub fn run(&self, filter: &dyn FontFilter) -> Result<usize, OffmarkError> {
        for (ix, job) in self.jobs.iter().enumerate() {
            log::info!(
                "[{}/{}] {} -> {}",
                ix + 1,
                self.jobs.len(),
                job.source.display(),
                job.target.display()
            );
            job.run(filter)?;
        }
        Ok(self.jobs.len())
    }
}
