pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Scale `value` by `num / den` with integer division, never returning 0.
pub(crate) fn scale_floor(value: u32, num: u32, den: u32) -> u32 {
    if den == 0 {
        return value.max(1);
    }
    let scaled = u64::from(value) * u64::from(num) / u64::from(den);
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}
