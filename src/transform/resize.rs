use image::RgbImage;
use image::imageops::FilterType;

use crate::foundation::config::{BoundsCheck, Config};
use crate::foundation::math::scale_floor;

/// Output dimensions for a `width`x`height` source under `cfg`'s bounds.
///
/// The width bound is applied first; the height bound then sees the updated
/// size. Integer division truncates the scaled side. Never upscales.
pub fn target_dimensions(width: u32, height: u32, cfg: &Config) -> (u32, u32) {
    let (mut w, mut h) = (width, height);

    if w > cfg.max_width {
        h = scale_floor(h, cfg.max_width, w);
        w = cfg.max_width;
    }

    let height_check_fires = match cfg.bounds {
        BoundsCheck::Legacy => w > cfg.max_height,
        BoundsCheck::Strict => h > cfg.max_height,
    };
    if height_check_fires && h > cfg.max_height {
        w = scale_floor(w, cfg.max_height, h);
        h = cfg.max_height;
    }

    (w, h)
}

/// Downscale `img` to fit `cfg`'s bounds with a Lanczos3 filter.
///
/// Returns the input untouched when it already fits.
pub fn resize_to_bounds(img: RgbImage, cfg: &Config) -> RgbImage {
    let (src_w, src_h) = img.dimensions();
    let (w, h) = target_dimensions(src_w, src_h, cfg);
    if (w, h) == (src_w, src_h) {
        return img;
    }
    tracing::debug!(src_w, src_h, w, h, "resizing");
    image::imageops::resize(&img, w, h, FilterType::Lanczos3)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/resize.rs"]
mod tests;
