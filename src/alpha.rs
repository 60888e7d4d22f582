//! Per-pixel alpha premultiplication.
//!
//! Straight (unassociated) pixels carry color independent of alpha.
//! Premultiplied (associated) pixels carry color scaled by `alpha / 255`.
//!
//! Two premultiply variants exist on purpose:
//!
//! - [`multiply_bytes`] matches the standard color-model conversion and
//!   zeroes color when alpha is 0.
//! - [`multiply_bytes_preserve_colors`] uses the same rounding but leaves
//!   color untouched when alpha is 0, so hidden color survives a round trip
//!   through [`unmultiply_bytes`].
//!
//! All math goes through the 16-bit expansion (`c | c << 8`) so results are
//! bit-identical to the generic 16-bit query path. A plain `c * a / 255`
//! rounds differently for some inputs.

use rgb::Rgba;

/// Expand an 8-bit channel to 16 bits (`0xAB` → `0xABAB`).
#[inline]
const fn widen(c: u8) -> u32 {
    let c = c as u32;
    c | (c << 8)
}

/// 16-bit premultiplied channels of a straight 8-bit pixel.
///
/// This is the generic query result for a straight color: each color
/// channel is `(c | c << 8) * a / 255`, alpha is `a | a << 8`.
#[inline]
pub const fn premultiply_rgba16(px: Rgba<u8>) -> Rgba<u16> {
    let a = px.a as u32;
    Rgba {
        r: (widen(px.r) * a / 0xff) as u16,
        g: (widen(px.g) * a / 0xff) as u16,
        b: (widen(px.b) * a / 0xff) as u16,
        a: widen(px.a) as u16,
    }
}

/// Remove premultiplication from an 8-bit pixel.
///
/// Alpha 0 and 255 return the input unchanged, so color is kept even on
/// fully transparent pixels. Otherwise each color channel becomes
/// `c * 255 / a`, truncated to 8 bits without clamping: input with a color
/// channel above alpha wraps.
#[inline]
pub const fn unmultiply_bytes(px: Rgba<u8>) -> Rgba<u8> {
    if px.a == 0 || px.a == 0xff {
        return px;
    }
    let a = px.a as u32;
    Rgba {
        r: (px.r as u32 * 0xff / a) as u8,
        g: (px.g as u32 * 0xff / a) as u8,
        b: (px.b as u32 * 0xff / a) as u8,
        a: px.a,
    }
}

/// Premultiply an 8-bit pixel the way the standard color model does.
///
/// Alpha 0 yields `(0, 0, 0, 0)`: color is lost.
#[inline]
pub const fn multiply_bytes(px: Rgba<u8>) -> Rgba<u8> {
    let wide = premultiply_rgba16(px);
    Rgba {
        r: (wide.r >> 8) as u8,
        g: (wide.g >> 8) as u8,
        b: (wide.b >> 8) as u8,
        a: (wide.a >> 8) as u8,
    }
}

/// Premultiply an 8-bit pixel, keeping color when alpha is 0.
///
/// Alpha 0 and 255 return the input unchanged. Every other alpha uses the
/// same rounding as [`multiply_bytes`].
#[inline]
pub const fn multiply_bytes_preserve_colors(px: Rgba<u8>) -> Rgba<u8> {
    if px.a == 0 || px.a == 0xff {
        return px;
    }
    multiply_bytes(px)
}

/// Reduce 16-bit premultiplied channels to straight 8-bit channels.
///
/// Alpha `0` and `0xFFFF` skip the division. Otherwise each color channel
/// becomes `(c * 255 / (alpha >> 8)) >> 8`. The high byte of alpha is the
/// divisor because 16-bit sources need not repeat it in the low byte.
#[inline]
pub const fn unmultiply_rgba16(px: Rgba<u16>) -> Rgba<u8> {
    let a8 = (px.a >> 8) as u8;
    // Alpha below 0x100 has no high byte to divide by.
    if px.a == 0 || px.a == 0xffff || a8 == 0 {
        return Rgba {
            r: (px.r >> 8) as u8,
            g: (px.g >> 8) as u8,
            b: (px.b >> 8) as u8,
            a: a8,
        };
    }
    let a = a8 as u32;
    Rgba {
        r: ((px.r as u32 * 0xff / a) >> 8) as u8,
        g: ((px.g as u32 * 0xff / a) >> 8) as u8,
        b: ((px.b as u32 * 0xff / a) >> 8) as u8,
        a: a8,
    }
}

/// Apply [`multiply_bytes`] to every pixel of a tightly packed RGBA row.
pub(crate) fn multiply_row(row: &mut [u8]) {
    for px in row.chunks_exact_mut(4) {
        let out = multiply_bytes(Rgba::new(px[0], px[1], px[2], px[3]));
        px.copy_from_slice(&[out.r, out.g, out.b, out.a]);
    }
}

/// Apply [`unmultiply_bytes`] to every pixel of a tightly packed RGBA row.
pub(crate) fn unmultiply_row(row: &mut [u8]) {
    for px in row.chunks_exact_mut(4) {
        let out = unmultiply_bytes(Rgba::new(px[0], px[1], px[2], px[3]));
        px.copy_from_slice(&[out.r, out.g, out.b, out.a]);
    }
}
