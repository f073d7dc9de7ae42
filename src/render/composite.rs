use crate::foundation::{
    error::{TypebannerError, TypebannerResult},
    math::mul_div255_u8,
};

pub(crate) type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels, with `src` scaled by `opacity`.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite equal-sized buffers in place.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> TypebannerResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TypebannerError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite a `src_w x src_h` buffer onto `dst` (a `dst_w`-wide surface) with its top-left corner
/// at `(x, y)`. Source rows or columns falling outside `dst` are clipped.
#[allow(clippy::too_many_arguments)]
pub(crate) fn over_region_in_place(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    x: u32,
    y: u32,
) -> TypebannerResult<()> {
    if dst.len() != (dst_w as usize) * (dst_h as usize) * 4
        || src.len() != (src_w as usize) * (src_h as usize) * 4
    {
        return Err(TypebannerError::render(
            "over_region_in_place buffer sizes do not match their dimensions",
        ));
    }
    if x >= dst_w || y >= dst_h {
        return Ok(());
    }

    let cols = src_w.min(dst_w - x) as usize;
    let rows = src_h.min(dst_h - y);
    for row in 0..rows {
        let s0 = (row * src_w) as usize * 4;
        let d0 = (((y + row) * dst_w + x) as usize) * 4;
        over_in_place(
            &mut dst[d0..d0 + cols * 4],
            &src[s0..s0 + cols * 4],
            1.0,
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
