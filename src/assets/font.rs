use std::path::PathBuf;

use crate::foundation::error::{LabelError, LabelResult};

/// DejaVu Sans, shipped in `assets/` next to the crate sources.
pub const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Where caption glyphs come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FontSource {
    /// [`BUNDLED_FONT`].
    #[default]
    Bundled,
    /// A TTF/OTF file on disk.
    File(PathBuf),
}

impl FontSource {
    /// Load the raw font bytes.
    pub fn load(&self) -> LabelResult<Vec<u8>> {
        match self {
            Self::Bundled => Ok(BUNDLED_FONT.to_vec()),
            Self::File(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    LabelError::render(format!("failed to read font '{}': {e}", path.display()))
                })?;
                if bytes.is_empty() {
                    return Err(LabelError::render(format!(
                        "font file '{}' is empty",
                        path.display()
                    )));
                }
                Ok(bytes)
            }
        }
    }
}

impl From<Option<PathBuf>> for FontSource {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Bundled, Self::File)
    }
}
