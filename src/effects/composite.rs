use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{luma_u8, mul_div255_u8, unit_to_u8_weight};

/// One straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Interpolate one pixel between its grey (luma) value at `grade = 0` and itself at `grade = 1`.
pub fn grade_px(px: Rgba8, grade: f32) -> Rgba8 {
    let w = unit_to_u8_weight(grade);
    if w == 255 {
        return px;
    }
    let y = u16::from(luma_u8(px[0], px[1], px[2]));
    let iw = 255u16 - w;

    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = add_sat_u8(mul_div255_u8(y, iw), mul_div255_u8(u16::from(px[i]), w));
    }
    out[3] = px[3];
    out
}

/// Linear mix of two pixels; `t = 0` is `a`, `t = 1` is `b`.
pub fn crossfade(a: Rgba8, b: Rgba8, t: f32) -> Rgba8 {
    let tt = unit_to_u8_weight(t);
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255_u8(u16::from(a[i]), it);
        let bv = mul_div255_u8(u16::from(b[i]), tt);
        out[i] = add_sat_u8(av, bv);
    }
    out
}

/// Apply [`grade_px`] to every pixel of an RGBA8 buffer.
pub fn grade_in_place(rgba: &mut [u8], grade: f32) -> ReelResult<()> {
    if !rgba.len().is_multiple_of(4) {
        return Err(ReelError::render(
            "grade_in_place expects an rgba8 buffer",
        ));
    }
    if unit_to_u8_weight(grade) == 255 {
        return Ok(());
    }
    for px in rgba.chunks_exact_mut(4) {
        let out = grade_px([px[0], px[1], px[2], px[3]], grade);
        px.copy_from_slice(&out);
    }
    Ok(())
}

/// Write the cross-dissolve of `a` into `b` at progress `t` to `dst`.
pub fn crossfade_into(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) -> ReelResult<()> {
    if dst.len() != a.len() || dst.len() != b.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::render(
            "crossfade_into expects equal-length rgba8 buffers",
        ));
    }
    for ((d, a), b) in dst
        .chunks_exact_mut(4)
        .zip(a.chunks_exact(4))
        .zip(b.chunks_exact(4))
    {
        let out = crossfade([a[0], a[1], a[2], a[3]], [b[0], b[1], b[2], b[3]], t);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
