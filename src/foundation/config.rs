use crate::foundation::error::{LabelError, LabelResult};

/// Edge a label is anchored to along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Left or top edge.
    Start,
    /// Right or bottom edge.
    End,
}

impl Anchor {
    /// `0` for [`Anchor::Start`], `1` for [`Anchor::End`].
    pub fn factor(self) -> i64 {
        match self {
            Self::Start => 0,
            Self::End => 1,
        }
    }
}

/// Image corner the label box is placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Corner {
    /// Horizontal anchor.
    pub horizontal: Anchor,
    /// Vertical anchor.
    pub vertical: Anchor,
}

impl Corner {
    pub const TOP_LEFT: Self = Self::new(Anchor::Start, Anchor::Start);
    pub const TOP_RIGHT: Self = Self::new(Anchor::End, Anchor::Start);
    pub const BOTTOM_LEFT: Self = Self::new(Anchor::Start, Anchor::End);
    pub const BOTTOM_RIGHT: Self = Self::new(Anchor::End, Anchor::End);

    /// Build a corner from independent horizontal/vertical anchors.
    pub const fn new(horizontal: Anchor, vertical: Anchor) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

impl Default for Corner {
    fn default() -> Self {
        Self::BOTTOM_RIGHT
    }
}

/// How the resize stage applies the height bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsCheck {
    /// Compare the width against `max_height`. Keeps existing tables producing
    /// the same output sizes as before. Never upscales.
    #[default]
    Legacy,
    /// Compare the height against `max_height`.
    Strict,
}

/// Largest bound the label rasterizer can cover.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Immutable per-run configuration threaded through the pipeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Config {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// Maximum encoded size in megabytes (1 MB = 1024 * 1024 bytes).
    pub max_size_mb: f64,
    /// Caption used when a row leaves its caption blank.
    pub default_caption: String,
    /// Label background opacity, percent.
    pub opacity: u8,
    /// Caption font size in pixels; also the label margin unit.
    pub font_size: u32,
    /// Label placement.
    pub corner: Corner,
    /// Height bound policy for the resize stage.
    pub bounds: BoundsCheck,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_width: 3000,
            max_height: 2250,
            max_size_mb: 2.0,
            default_caption: String::new(),
            opacity: 90,
            font_size: 50,
            corner: Corner::default(),
            bounds: BoundsCheck::default(),
        }
    }
}

impl Config {
    /// Reject values the pipeline cannot honor.
    pub fn validate(&self) -> LabelResult<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(LabelError::validation(
                "max width and max height must be > 0",
            ));
        }
        if self.max_width > MAX_DIMENSION || self.max_height > MAX_DIMENSION {
            return Err(LabelError::validation(format!(
                "max width and max height must be <= {MAX_DIMENSION}, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        if !self.max_size_mb.is_finite() || self.max_size_mb <= 0.0 {
            return Err(LabelError::validation(
                "max size must be finite and > 0",
            ));
        }
        if self.font_size == 0 {
            return Err(LabelError::validation("font size must be > 0"));
        }
        if self.opacity > 100 {
            return Err(LabelError::validation(format!(
                "opacity must be within 0..=100, got {}",
                self.opacity
            )));
        }
        Ok(())
    }

    /// Size budget in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        (self.max_size_mb * 1024.0 * 1024.0).floor() as u64
    }

    /// Label fill alpha derived from [`Config::opacity`].
    pub fn fill_alpha(&self) -> u8 {
        fill_alpha(self.opacity)
    }
}

/// Map a 0..=100 opacity percentage onto an 8-bit alpha.
pub fn fill_alpha(opacity: u8) -> u8 {
    let pct = f64::from(opacity.min(100));
    (255.0 * pct / 100.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
