//! Color kinds and normalization to straight 8-bit RGBA.
//!
//! [`Color`] is the closed set of color kinds this crate recognizes.
//! [`PixelColor`] is the capability every color value offers: the generic
//! 16-bit premultiplied query. [`to_straight`] uses the recognized kind
//! when there is one and falls back to the generic query otherwise.

use rgb::{Gray, Rgba};

use crate::alpha::{premultiply_rgba16, unmultiply_rgba16};

/// A single color value of a recognized kind.
///
/// `Rgba8` and `Rgba16` hold premultiplied channels. `Nrgba8` and
/// `Nrgba16` hold straight channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// 8-bit premultiplied RGBA.
    Rgba8(Rgba<u8>),
    /// 16-bit premultiplied RGBA.
    Rgba16(Rgba<u16>),
    /// 8-bit straight RGBA.
    Nrgba8(Rgba<u8>),
    /// 16-bit straight RGBA.
    Nrgba16(Rgba<u16>),
    /// 8-bit luma, opaque.
    Gray8(Gray<u8>),
    /// 16-bit luma, opaque.
    Gray16(Gray<u16>),
    /// 8-bit alpha over white.
    Alpha8(u8),
    /// 16-bit alpha over white.
    Alpha16(u16),
}

/// Anything that can report its color as 16-bit premultiplied channels.
///
/// Implement this for color types outside the crate. Such types are
/// normalized through [`unmultiply_rgba16`] unless they also report a
/// recognized kind via [`known`](PixelColor::known).
pub trait PixelColor {
    /// Premultiplied RGBA, each channel in `0..=0xFFFF`.
    fn rgba16(&self) -> Rgba<u16>;

    /// The recognized kind of this color, if it is one.
    fn known(&self) -> Option<Color> {
        None
    }
}

#[inline]
const fn widen(c: u8) -> u16 {
    (c as u16) | ((c as u16) << 8)
}

impl PixelColor for Color {
    fn rgba16(&self) -> Rgba<u16> {
        match *self {
            Color::Rgba8(p) => Rgba::new(widen(p.r), widen(p.g), widen(p.b), widen(p.a)),
            Color::Rgba16(p) => p,
            Color::Nrgba8(p) => premultiply_rgba16(p),
            Color::Nrgba16(p) => {
                if p.a == 0xffff {
                    return p;
                }
                let a = p.a as u32;
                Rgba::new(
                    (p.r as u32 * a / 0xffff) as u16,
                    (p.g as u32 * a / 0xffff) as u16,
                    (p.b as u32 * a / 0xffff) as u16,
                    p.a,
                )
            }
            Color::Gray8(g) => {
                let y = widen(g.value());
                Rgba::new(y, y, y, 0xffff)
            }
            Color::Gray16(g) => {
                let y = g.value();
                Rgba::new(y, y, y, 0xffff)
            }
            Color::Alpha8(a) => {
                let a = widen(a);
                Rgba::new(a, a, a, a)
            }
            Color::Alpha16(a) => Rgba::new(a, a, a, a),
        }
    }

    #[inline]
    fn known(&self) -> Option<Color> {
        Some(*self)
    }
}

impl PixelColor for Gray<u8> {
    fn rgba16(&self) -> Rgba<u16> {
        Color::Gray8(*self).rgba16()
    }

    fn known(&self) -> Option<Color> {
        Some(Color::Gray8(*self))
    }
}

impl PixelColor for Gray<u16> {
    fn rgba16(&self) -> Rgba<u16> {
        Color::Gray16(*self).rgba16()
    }

    fn known(&self) -> Option<Color> {
        Some(Color::Gray16(*self))
    }
}

impl<T: PixelColor + ?Sized> PixelColor for &T {
    fn rgba16(&self) -> Rgba<u16> {
        (**self).rgba16()
    }

    fn known(&self) -> Option<Color> {
        (**self).known()
    }
}

/// Convert any color to straight (non-premultiplied) 8-bit RGBA.
///
/// Straight, luma and alpha-only kinds are read directly. Premultiplied
/// kinds and unrecognized colors go through [`unmultiply_rgba16`], which
/// keeps color channels when alpha is 0 or fully opaque.
pub fn to_straight<C: PixelColor + ?Sized>(color: &C) -> Rgba<u8> {
    match color.known() {
        Some(Color::Nrgba8(p)) => p,
        Some(Color::Nrgba16(p)) => Rgba::new(
            (p.r >> 8) as u8,
            (p.g >> 8) as u8,
            (p.b >> 8) as u8,
            (p.a >> 8) as u8,
        ),
        Some(Color::Gray8(g)) => {
            let y = g.value();
            Rgba::new(y, y, y, 0xff)
        }
        Some(Color::Gray16(g)) => {
            let y = (g.value() >> 8) as u8;
            Rgba::new(y, y, y, 0xff)
        }
        Some(Color::Alpha8(a)) => Rgba::new(0xff, 0xff, 0xff, a),
        Some(Color::Alpha16(a)) => Rgba::new(0xff, 0xff, 0xff, (a >> 8) as u8),
        Some(Color::Rgba8(_) | Color::Rgba16(_)) | None => unmultiply_rgba16(color.rgba16()),
    }
}

/// [`to_straight`], packed as `R << 24 | G << 16 | B << 8 | A`.
pub fn to_straight_u32<C: PixelColor + ?Sized>(color: &C) -> u32 {
    let p = to_straight(color);
    u32::from_be_bytes([p.r, p.g, p.b, p.a])
}

/// [`to_straight`], wrapped back up as a [`Color::Nrgba8`].
pub fn to_straight_color<C: PixelColor + ?Sized>(color: &C) -> Color {
    Color::Nrgba8(to_straight(color))
}
