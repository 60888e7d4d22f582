//! Texture-resident images.
//!
//! A [`ManagedImage`] holds premultiplied RGBA8 pixels on the rendering
//! side. Bulk access goes through [`read_pixels`](ManagedImage::read_pixels)
//! and [`write_pixels`](ManagedImage::write_pixels), which always use a
//! tightly packed `width * 4` byte row layout.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::buffer::{native_stride, premultiplied_model, BYTES_PER_PIXEL};
use crate::color::{Color, PixelColor};
use crate::copy::copy_bulk;
use crate::image::ImageOptions;
use rgb::Rgba;

/// A premultiplied image reached through bulk readback and upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ManagedImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    options: ImageOptions,
}

impl ManagedImage {
    /// Allocate a transparent image.
    pub fn new(width: u32, height: u32, options: ImageOptions) -> Self {
        Self {
            pixels: vec![0u8; native_stride(width) * height as usize],
            width,
            height,
            options,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the image was created with mipmaps.
    #[inline]
    pub fn mipmaps(&self) -> bool {
        self.options.mipmaps
    }

    /// Options the image was created with.
    #[inline]
    pub fn options(&self) -> ImageOptions {
        self.options
    }

    /// Number of bytes [`read_pixels`](Self::read_pixels) and
    /// [`write_pixels`](Self::write_pixels) expect.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    /// Read every pixel into `dst` as tightly packed premultiplied RGBA8.
    ///
    /// # Panics
    ///
    /// Panics if `dst.len() != width * height * 4`.
    pub fn read_pixels(&self, dst: &mut [u8]) {
        assert_eq!(
            dst.len(),
            self.pixels.len(),
            "read_pixels buffer length mismatch for {}x{} image",
            self.width,
            self.height
        );
        copy_bulk(dst, &self.pixels);
    }

    /// Replace every pixel from tightly packed premultiplied RGBA8.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != width * height * 4`.
    pub fn write_pixels(&mut self, src: &[u8]) {
        assert_eq!(
            src.len(),
            self.pixels.len(),
            "write_pixels buffer length mismatch for {}x{} image",
            self.width,
            self.height
        );
        copy_bulk(&mut self.pixels, src);
    }

    /// The premultiplied pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        let i = self.index(x, y);
        let p = &self.pixels[i..i + BYTES_PER_PIXEL];
        Color::Rgba8(Rgba::new(p[0], p[1], p[2], p[3]))
    }

    /// Premultiply `color` and store it at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn set_color<C: PixelColor + ?Sized>(&mut self, x: u32, y: u32, color: &C) {
        let px = premultiplied_model(color);
        let i = self.index(x, y);
        self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&[px.r, px.g, px.b, px.a]);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        y as usize * native_stride(self.width) + x as usize * BYTES_PER_PIXEL
    }
}

impl fmt::Debug for ManagedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ManagedImage({}x{}, mipmaps: {})",
            self.width, self.height, self.options.mipmaps
        )
    }
}
