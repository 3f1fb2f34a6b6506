use std::path::Path;

use image::RgbImage;

use crate::foundation::error::{LabelError, LabelResult};

/// Read and decode a source photo into an opaque RGB8 bitmap.
///
/// Alpha, if any, is dropped: the output is always a JPEG.
pub fn open_image(path: &Path) -> LabelResult<RgbImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        LabelError::decode(format!("failed to read image '{}': {e}", path.display()))
    })?;
    decode_image(&bytes)
        .map_err(|e| LabelError::decode(format!("'{}': {e}", path.display())))
}

/// Decode an in-memory image of any format supported by `image`.
pub fn decode_image(bytes: &[u8]) -> LabelResult<RgbImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| LabelError::decode(format!("decode image from memory: {e}")))?;
    Ok(dyn_img.to_rgb8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
