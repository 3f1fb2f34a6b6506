use std::path::PathBuf;

/// Convenience result type used across autolabel.
pub type LabelResult<T> = Result<T, LabelError>;

/// Top-level error taxonomy for the labeling pipeline and batch driver.
#[derive(thiserror::Error, Debug)]
pub enum LabelError {
    /// Invalid configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing sheet or cells, or a workbook that cannot be read or saved.
    #[error("workbook error: {0}")]
    Workbook(String),

    /// The table lists no files to process.
    #[error("no files to process are listed in the table")]
    NoWorkItems,

    /// A source image could not be opened or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// JPEG encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Text layout or label rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Even the lowest searched JPEG quality does not fit the size budget.
    #[error(
        "could not meet size budget for '{}': {smallest} bytes at lowest quality, budget {budget} bytes",
        path.display()
    )]
    SizeBudget {
        /// Source image the budget applies to.
        path: PathBuf,
        /// Budget in bytes.
        budget: u64,
        /// Encoded size at the quality floor.
        smallest: u64,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LabelError {
    /// Build a [`LabelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LabelError::Workbook`] value.
    pub fn workbook(msg: impl Into<String>) -> Self {
        Self::Workbook(msg.into())
    }

    /// Build a [`LabelError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`LabelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`LabelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
