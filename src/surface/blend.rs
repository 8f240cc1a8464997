use crate::foundation::math::{mul_div255_u8, opacity_u8};

pub type PremulRgba8 = [u8; 4];

/// Blend operator applied when drawing onto a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendOp {
    /// Porter-Duff source-over.
    #[default]
    Over,
    /// Additive: channels are summed and saturated.
    Lighter,
    /// Separable `|dst - src|` with source-over alpha.
    Difference,
}

/// Composite one premultiplied source pixel onto `dst` with `op` at `opacity`.
pub fn blend_px(op: BlendOp, dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    match op {
        BlendOp::Over => over(dst, src, opacity),
        BlendOp::Lighter => lighter(dst, src, opacity),
        BlendOp::Difference => difference(dst, src, opacity),
    }
}

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

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

pub fn lighter(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u8(opacity);
    if op == 0 {
        return dst;
    }
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = dst[i].saturating_add(mul_div255_u8(u16::from(src[i]), op));
    }
    out
}

pub fn difference(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let to_f = |v: u8| f32::from(v) / 255.0;
    let sa = to_f(mul_div255_u8(u16::from(src[3]), op));
    let da = to_f(dst[3]);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = to_f(mul_div255_u8(u16::from(src[i]), op));
        let d = to_f(dst[i]);
        let v = s + d - 2.0 * (s * da).min(d * sa);
        out[i] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    out[3] = ((sa + da - sa * da).clamp(0.0, 1.0) * 255.0).round() as u8;
    out
}

#[cfg(test)]
#[path = "../../tests/unit/surface/blend.rs"]
mod tests;
