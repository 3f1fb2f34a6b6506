use crate::foundation::error::{LabelError, LabelResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

pub type PremulRgba8 = [u8; 4];
pub type Rgb8 = [u8; 3];

/// Premultiplied source-over onto an opaque RGB pixel.
pub fn over_opaque(dst: Rgb8, src: PremulRgba8) -> Rgb8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 3];
    for i in 0..3 {
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(src[i], dc);
    }
    out
}

/// Composite a premultiplied RGBA8 layer over a tightly packed RGB8 buffer of
/// the same pixel count.
pub fn over_rgb_in_place(dst_rgb: &mut [u8], src_premul: &[u8]) -> LabelResult<()> {
    if !dst_rgb.len().is_multiple_of(3)
        || !src_premul.len().is_multiple_of(4)
        || dst_rgb.len() / 3 != src_premul.len() / 4
    {
        return Err(LabelError::render(
            "over_rgb_in_place expects rgb8 and rgba8 buffers with equal pixel counts",
        ));
    }
    for (d, s) in dst_rgb.chunks_exact_mut(3).zip(src_premul.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over_opaque([d[0], d[1], d[2]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
