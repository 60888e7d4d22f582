//! Conversions and copies between image representations.
//!
//! Each operation takes the fastest path the source representation allows:
//!
//! 1. bulk readback/upload for managed images,
//! 2. one memory copy for buffers with matching layout,
//! 3. a row-by-row copy for buffers whose strides differ,
//! 4. a per-pixel get/set loop for everything else.
//!
//! Tiers 1–3 are byte-exact. Tier 4 goes through the destination's color
//! model: a straight destination drops the color of pixels whose alpha is
//! zero.

use alloc::vec;
use core::fmt;

use crate::alpha::{multiply_row, unmultiply_row};
use crate::buffer::{AlphaMode, PixelBuffer, native_stride};
use crate::copy::{copy_buffer, copy_lines};
use crate::image::{Image, ImageOptions};
use crate::managed::ManagedImage;

/// Errors from image bridge operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BridgeError {
    /// The destination cannot be written pixel by pixel.
    UnsupportedTarget,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedTarget => write!(
                f,
                "per-pixel copy can only write to managed images and pixel buffers"
            ),
        }
    }
}

impl core::error::Error for BridgeError {}

/// Build a managed (premultiplied) copy of `image`.
pub fn to_managed(image: &Image, options: ImageOptions) -> ManagedImage {
    let (width, height) = (image.width(), image.height());
    let mut out = ManagedImage::new(width, height, options);
    match image {
        Image::Managed(src) => {
            tracing::debug!(width, height, "to_managed: readback and upload");
            let mut pixels = vec![0u8; src.byte_len()];
            src.read_pixels(&mut pixels);
            out.write_pixels(&pixels);
        }
        Image::Buffer(src) if src.alpha_mode() == AlphaMode::Premultiplied && src.is_tight() => {
            tracing::debug!(width, height, "to_managed: direct upload");
            out.write_pixels(src.as_bytes());
        }
        Image::Buffer(src) => {
            let stride = native_stride(width);
            let mut pixels = vec![0u8; out.byte_len()];
            copy_lines(&mut pixels, stride, src.as_bytes(), src.stride());
            if src.alpha_mode() == AlphaMode::Straight {
                tracing::debug!(width, height, "to_managed: premultiply and upload");
                multiply_row(&mut pixels);
            } else {
                tracing::debug!(width, height, "to_managed: repack rows and upload");
            }
            out.write_pixels(&pixels);
        }
        Image::Foreign(_) => {
            tracing::debug!(width, height, "to_managed: per-pixel fallback");
            let mut staging = PixelBuffer::new(width, height, AlphaMode::Premultiplied);
            copy_pixels_into_buffer(&mut staging, image);
            out.write_pixels(staging.as_bytes());
        }
    }
    out
}

/// Read back a managed image into a new straight-alpha buffer.
///
/// Pixels go through [`unmultiply_bytes`](crate::unmultiply_bytes), so
/// color survives on fully transparent pixels.
pub fn to_straight_buffer(managed: &ManagedImage) -> PixelBuffer {
    let mut out = readback(managed, AlphaMode::Straight);
    for y in 0..out.height() {
        unmultiply_row(out.row_mut(y));
    }
    out
}

/// Read back a managed image into a new premultiplied buffer, unchanged.
pub fn to_premultiplied_buffer(managed: &ManagedImage) -> PixelBuffer {
    readback(managed, AlphaMode::Premultiplied)
}

fn readback(managed: &ManagedImage, alpha: AlphaMode) -> PixelBuffer {
    let (width, height) = (managed.width(), managed.height());
    let mut pixels = vec![0u8; managed.byte_len()];
    managed.read_pixels(&mut pixels);
    let mut out = PixelBuffer::new(width, height, alpha);
    let stride = out.stride();
    copy_lines(out.as_bytes_mut(), stride, &pixels, native_stride(width));
    out
}

/// Copy `image` into a new image of the same representation.
///
/// Foreign images cannot be created here, so they are copied into a new
/// straight buffer through the per-pixel path.
pub fn copy_image(image: &Image, options: ImageOptions) -> Image {
    let (width, height) = (image.width(), image.height());
    match image {
        Image::Managed(src) => {
            tracing::debug!(width, height, "copy_image: readback and upload");
            let mut pixels = vec![0u8; src.byte_len()];
            src.read_pixels(&mut pixels);
            let mut out = ManagedImage::new(width, height, options);
            out.write_pixels(&pixels);
            Image::Managed(out)
        }
        Image::Buffer(src) => {
            let mut out = PixelBuffer::new(width, height, src.alpha_mode());
            let strategy = copy_buffer(&mut out, src);
            tracing::debug!(width, height, ?strategy, "copy_image: buffer copy");
            Image::Buffer(out)
        }
        Image::Foreign(_) => {
            tracing::debug!(width, height, "copy_image: per-pixel fallback");
            let mut out = PixelBuffer::new(width, height, AlphaMode::Straight);
            copy_pixels_into_buffer(&mut out, image);
            Image::Buffer(out)
        }
    }
}

/// Copy pixels one at a time, reading `src` and writing `dst` by coordinate.
///
/// Covers the whole `dst` rectangle; `src` must be at least as large.
/// Each pixel passes through `dst`'s color model, so a straight-buffer
/// destination stores `(0, 0, 0, 0)` wherever the source alpha is zero.
///
/// # Errors
///
/// Returns [`BridgeError::UnsupportedTarget`] if `dst` is a foreign image.
/// Nothing is written in that case.
///
/// # Panics
///
/// Panics if `src` is smaller than `dst`.
pub fn slow_copy(dst: &mut Image, src: &Image) -> Result<(), BridgeError> {
    match dst {
        Image::Managed(out) => {
            tracing::trace!(width = out.width(), height = out.height(), "slow_copy");
            for y in 0..out.height() {
                for x in 0..out.width() {
                    out.set_color(x, y, &src.color_at(x, y));
                }
            }
            Ok(())
        }
        Image::Buffer(out) => {
            copy_pixels_into_buffer(out, src);
            Ok(())
        }
        Image::Foreign(_) => {
            tracing::warn!("slow_copy: destination is not writable");
            Err(BridgeError::UnsupportedTarget)
        }
    }
}

fn copy_pixels_into_buffer(out: &mut PixelBuffer, src: &Image) {
    tracing::trace!(width = out.width(), height = out.height(), "slow_copy");
    for y in 0..out.height() {
        for x in 0..out.width() {
            out.set_color(x, y, &src.color_at(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::image::{PixelSource, Representation};
    use alloc::boxed::Box;
    use alloc::string::ToString;
    use rgb::{Gray, Rgba};

    /// Red = x * 60, green = y * 90, alpha = x * 85, on a 4x3 grid.
    fn straight_pattern(stride: usize) -> PixelBuffer {
        let mut buf = PixelBuffer::with_stride(4, 3, stride, AlphaMode::Straight).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                buf.set_pixel(x, y, Rgba::new(x as u8 * 60, y as u8 * 90, 200, x as u8 * 85));
            }
        }
        buf
    }

    struct Ramp;

    impl PixelSource for Ramp {
        fn width(&self) -> u32 {
            3
        }

        fn height(&self) -> u32 {
            2
        }

        fn color_at(&self, x: u32, y: u32) -> Color {
            Color::Gray8(Gray::new((x * 100 + y) as u8))
        }
    }

    #[test]
    fn straight_buffer_to_managed_premultiplies() {
        let src = Image::Buffer(straight_pattern(16));
        let managed = to_managed(&src, ImageOptions::new());
        assert_eq!((managed.width(), managed.height()), (4, 3));
        assert_eq!(
            managed.color_at(0, 2),
            Color::Rgba8(Rgba::new(0, 0, 0, 0)),
            "alpha 0 loses color on the legacy path"
        );
        assert_eq!(
            managed.color_at(3, 1),
            Color::Rgba8(crate::multiply_bytes(Rgba::new(180, 90, 200, 255)))
        );
        assert_eq!(
            managed.color_at(1, 1),
            Color::Rgba8(crate::multiply_bytes(Rgba::new(60, 90, 200, 85)))
        );
    }

    #[test]
    fn padded_premultiplied_buffer_uploads_pixels_only() {
        let mut src = PixelBuffer::with_stride(2, 2, 12, AlphaMode::Premultiplied).unwrap();
        src.as_bytes_mut().fill(0xee);
        src.set_pixel(0, 0, Rgba::new(1, 2, 3, 4));
        src.set_pixel(1, 1, Rgba::new(5, 6, 7, 8));
        let managed = to_managed(&Image::Buffer(src), ImageOptions::new());
        let mut out = [0u8; 16];
        managed.read_pixels(&mut out);
        assert_eq!(
            out,
            [1, 2, 3, 4, 0xee, 0xee, 0xee, 0xee, 0xee, 0xee, 0xee, 0xee, 5, 6, 7, 8]
        );
    }

    #[test]
    fn tight_premultiplied_buffer_uploads_bytes() {
        let mut src = PixelBuffer::new(1, 2, AlphaMode::Premultiplied);
        src.set_pixel(0, 1, Rgba::new(42, 87, 197, 0));
        let managed = to_managed(&Image::Buffer(src), ImageOptions::new().with_mipmaps(true));
        assert!(managed.mipmaps());
        assert_eq!(managed.color_at(0, 1), Color::Rgba8(Rgba::new(42, 87, 197, 0)));
    }

    #[test]
    fn foreign_to_managed_goes_pixel_by_pixel() {
        let managed = to_managed(&Image::Foreign(Box::new(Ramp)), ImageOptions::new());
        assert_eq!(managed.color_at(2, 1), Color::Rgba8(Rgba::new(201, 201, 201, 255)));
    }

    #[test]
    fn managed_round_trips_through_straight_buffer() {
        let mut managed = ManagedImage::new(2, 1, ImageOptions::new());
        managed.write_pixels(&[100, 100, 100, 100, 42, 87, 197, 0]);
        let straight = to_straight_buffer(&managed);
        assert_eq!(straight.alpha_mode(), AlphaMode::Straight);
        assert!(straight.is_tight());
        assert_eq!(straight.pixel(0, 0), Rgba::new(255, 255, 255, 100));
        assert_eq!(straight.pixel(1, 0), Rgba::new(42, 87, 197, 0));

        let premul = to_premultiplied_buffer(&managed);
        assert_eq!(premul.alpha_mode(), AlphaMode::Premultiplied);
        assert_eq!(premul.as_bytes(), &[100, 100, 100, 100, 42, 87, 197, 0]);
    }

    #[test]
    fn copy_image_keeps_representation() {
        for stride in [16, 20] {
            let src = Image::Buffer(straight_pattern(stride));
            let copy = copy_image(&src, ImageOptions::new());
            assert_eq!(copy.representation(), Representation::StraightBuffer);
            for y in 0..3 {
                for x in 0..4 {
                    assert_eq!(copy.color_at(x, y), src.color_at(x, y));
                }
            }
        }

        let mut managed = ManagedImage::new(1, 1, ImageOptions::new());
        managed.write_pixels(&[9, 9, 9, 9]);
        let copy = copy_image(&Image::Managed(managed.clone()), ImageOptions::new());
        assert_eq!(copy.as_managed(), Some(&managed));
    }

    #[test]
    fn copy_image_of_foreign_is_straight_buffer() {
        let copy = copy_image(&Image::Foreign(Box::new(Ramp)), ImageOptions::new());
        assert_eq!(copy.representation(), Representation::StraightBuffer);
        assert_eq!(
            copy.color_at(1, 1),
            Color::Nrgba8(Rgba::new(101, 101, 101, 255))
        );
    }

    #[test]
    fn slow_copy_into_straight_buffer_drops_hidden_color() {
        let mut src = PixelBuffer::new(2, 1, AlphaMode::Straight);
        src.set_pixel(0, 0, Rgba::new(42, 87, 197, 0));
        src.set_pixel(1, 0, Rgba::new(51, 153, 204, 85));
        let src = Image::Buffer(src);

        let mut dst = Image::Buffer(PixelBuffer::new(2, 1, AlphaMode::Straight));
        slow_copy(&mut dst, &src).unwrap();
        assert_eq!(dst.color_at(0, 0), Color::Nrgba8(Rgba::new(0, 0, 0, 0)));
        assert_eq!(dst.color_at(1, 0), Color::Nrgba8(Rgba::new(51, 153, 204, 85)));
    }

    #[test]
    fn slow_copy_into_managed_premultiplies() {
        let mut src = PixelBuffer::new(1, 1, AlphaMode::Straight);
        src.set_pixel(0, 0, Rgba::new(51, 153, 204, 85));
        let mut dst = Image::Managed(ManagedImage::new(1, 1, ImageOptions::new()));
        slow_copy(&mut dst, &Image::Buffer(src)).unwrap();
        assert_eq!(dst.color_at(0, 0), Color::Rgba8(Rgba::new(17, 51, 68, 85)));
    }

    #[test]
    fn slow_copy_rejects_foreign_target() {
        let src = Image::Buffer(PixelBuffer::new(3, 2, AlphaMode::Straight));
        let mut dst = Image::Foreign(Box::new(Ramp));
        let err = slow_copy(&mut dst, &src).unwrap_err();
        assert_eq!(err, BridgeError::UnsupportedTarget);
        assert!(err.to_string().contains("per-pixel copy"));
    }
}
