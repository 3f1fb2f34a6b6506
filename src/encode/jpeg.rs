use std::io::Cursor;

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

use crate::foundation::error::{LabelError, LabelResult};

/// First quality probed by [`search_quality`].
pub const START_QUALITY: u8 = 90;
/// Quality decrement between probes.
pub const QUALITY_STEP: u8 = 5;
/// Lowest quality ever handed to the encoder.
pub const MIN_QUALITY: u8 = 5;

/// Encode `img` as baseline JPEG at `quality` (1..=100).
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> LabelResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    img.write_with_encoder(encoder)
        .map_err(|e| LabelError::encode(format!("JPEG encode failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Outcome of a quality search against a byte budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeSearch {
    /// Highest probed quality that fits, or [`MIN_QUALITY`] when none does.
    pub quality: u8,
    /// Encoded size at `quality`.
    pub bytes: u64,
    /// Whether `bytes <= budget`.
    pub met: bool,
}

/// Walk qualities 90, 85, ... down to [`MIN_QUALITY`] and stop at the first
/// encode that fits in `budget` bytes.
///
/// An unreachable budget yields `met == false` at the floor quality.
pub fn search_quality(img: &RgbImage, budget: u64) -> LabelResult<SizeSearch> {
    let mut quality = START_QUALITY;
    loop {
        let bytes = encode_jpeg(img, quality)?.len() as u64;
        tracing::debug!(quality, bytes, budget, "size probe");
        if bytes <= budget {
            return Ok(SizeSearch {
                quality,
                bytes,
                met: true,
            });
        }
        if quality <= MIN_QUALITY {
            return Ok(SizeSearch {
                quality,
                bytes,
                met: false,
            });
        }
        quality = quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
