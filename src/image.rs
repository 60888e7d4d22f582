//! The closed set of image representations.
//!
//! Every image is one of:
//!
//! - [`Image::Managed`]: texture-resident, premultiplied, bulk access only
//!   (plus per-pixel get/set).
//! - [`Image::Buffer`]: CPU bytes, straight or premultiplied per the
//!   buffer's [`AlphaMode`].
//! - [`Image::Foreign`]: anything else that can report pixels by
//!   coordinate. Foreign images are read-only here.

use alloc::boxed::Box;
use core::fmt;

use crate::buffer::{AlphaMode, PixelBuffer};
use crate::color::Color;
use crate::managed::ManagedImage;

/// Per-call options for operations that create images.
///
/// # Example
///
/// ```
/// use zenalpha::ImageOptions;
///
/// let options = ImageOptions::new().with_mipmaps(true);
/// assert!(options.mipmaps);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct ImageOptions {
    /// Create managed images with mipmaps.
    pub mipmaps: bool,
}

impl ImageOptions {
    /// Defaults: no mipmaps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether managed images get mipmaps.
    pub fn with_mipmaps(mut self, mipmaps: bool) -> Self {
        self.mipmaps = mipmaps;
        self
    }
}

/// Which representation an [`Image`] uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Texture-resident premultiplied image.
    Managed,
    /// CPU buffer with straight alpha.
    StraightBuffer,
    /// CPU buffer with premultiplied alpha.
    PremultipliedBuffer,
    /// Any other read-only source.
    Foreign,
}

/// A read-only image this crate does not know the layout of.
pub trait PixelSource: Send + Sync {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// The color at `(x, y)`, with `x < width` and `y < height`.
    fn color_at(&self, x: u32, y: u32) -> Color;
}

/// An image in one of the supported representations.
pub enum Image {
    /// Texture-resident premultiplied image.
    Managed(ManagedImage),
    /// CPU pixel buffer.
    Buffer(PixelBuffer),
    /// Read-only image of some other kind.
    Foreign(Box<dyn PixelSource>),
}

impl Image {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            Image::Managed(img) => img.width(),
            Image::Buffer(buf) => buf.width(),
            Image::Foreign(src) => src.width(),
        }
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            Image::Managed(img) => img.height(),
            Image::Buffer(buf) => buf.height(),
            Image::Foreign(src) => src.height(),
        }
    }

    /// The representation tag.
    pub fn representation(&self) -> Representation {
        match self {
            Image::Managed(_) => Representation::Managed,
            Image::Buffer(buf) => match buf.alpha_mode() {
                AlphaMode::Straight => Representation::StraightBuffer,
                AlphaMode::Premultiplied => Representation::PremultipliedBuffer,
            },
            Image::Foreign(_) => Representation::Foreign,
        }
    }

    /// Whether pixels can be set by coordinate.
    pub fn is_writable(&self) -> bool {
        !matches!(self, Image::Foreign(_))
    }

    /// The color at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds for a managed or buffer image.
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        match self {
            Image::Managed(img) => img.color_at(x, y),
            Image::Buffer(buf) => buf.color_at(x, y),
            Image::Foreign(src) => src.color_at(x, y),
        }
    }

    /// The managed image, if this is one.
    pub fn as_managed(&self) -> Option<&ManagedImage> {
        match self {
            Image::Managed(img) => Some(img),
            _ => None,
        }
    }

    /// The pixel buffer, if this is one.
    pub fn as_buffer(&self) -> Option<&PixelBuffer> {
        match self {
            Image::Buffer(buf) => Some(buf),
            _ => None,
        }
    }
}

impl From<ManagedImage> for Image {
    fn from(img: ManagedImage) -> Self {
        Image::Managed(img)
    }
}

impl From<PixelBuffer> for Image {
    fn from(buf: PixelBuffer) -> Self {
        Image::Buffer(buf)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Image::Managed(img) => img.fmt(f),
            Image::Buffer(buf) => buf.fmt(f),
            Image::Foreign(src) => write!(f, "Foreign({}x{})", src.width(), src.height()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use rgb::{Gray, Rgba};

    struct Checker;

    impl PixelSource for Checker {
        fn width(&self) -> u32 {
            4
        }

        fn height(&self) -> u32 {
            2
        }

        fn color_at(&self, x: u32, y: u32) -> Color {
            Color::Gray8(Gray::new(if (x + y) % 2 == 0 { 0 } else { 0xff }))
        }
    }

    #[test]
    fn representation_tags() {
        let straight: Image = PixelBuffer::new(1, 1, AlphaMode::Straight).into();
        let premul: Image = PixelBuffer::new(1, 1, AlphaMode::Premultiplied).into();
        let managed: Image = ManagedImage::new(1, 1, ImageOptions::new()).into();
        let foreign = Image::Foreign(Box::new(Checker));

        assert_eq!(straight.representation(), Representation::StraightBuffer);
        assert_eq!(premul.representation(), Representation::PremultipliedBuffer);
        assert_eq!(managed.representation(), Representation::Managed);
        assert_eq!(foreign.representation(), Representation::Foreign);

        assert!(straight.is_writable());
        assert!(managed.is_writable());
        assert!(!foreign.is_writable());
    }

    #[test]
    fn dimensions_and_colors_dispatch() {
        let foreign = Image::Foreign(Box::new(Checker));
        assert_eq!((foreign.width(), foreign.height()), (4, 2));
        assert_eq!(foreign.color_at(1, 0), Color::Gray8(Gray::new(0xff)));

        let mut buf = PixelBuffer::new(3, 2, AlphaMode::Premultiplied);
        buf.set_pixel(2, 1, Rgba::new(1, 1, 1, 2));
        let img = Image::from(buf);
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.color_at(2, 1), Color::Rgba8(Rgba::new(1, 1, 1, 2)));
        assert!(img.as_buffer().is_some());
        assert!(img.as_managed().is_none());
    }

    #[test]
    fn debug_format() {
        let foreign = Image::Foreign(Box::new(Checker));
        assert_eq!(format!("{foreign:?}"), "Foreign(4x2)");
    }

    #[test]
    fn options_builder() {
        assert!(!ImageOptions::new().mipmaps);
        assert!(ImageOptions::new().with_mipmaps(true).mipmaps);
    }
}
