//! Owned RGBA8 pixel buffers.
//!
//! A [`PixelBuffer`] is a flat byte vector of `height` rows, each `stride`
//! bytes long, holding `width` RGBA8 pixels followed by optional padding.
//! Its [`AlphaMode`] says whether the color channels are straight or
//! premultiplied. Nothing else distinguishes the two.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use imgref::{ImgRef, ImgVec};
use rgb::{ComponentBytes, Rgba};

use crate::color::{Color, PixelColor};

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Row length in bytes with no padding.
#[inline]
pub const fn native_stride(width: u32) -> usize {
    width as usize * BYTES_PER_PIXEL
}

// ---------------------------------------------------------------------------
// AlphaMode
// ---------------------------------------------------------------------------

/// Alpha channel interpretation of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlphaMode {
    /// Straight (unassociated) alpha.
    Straight = 1,
    /// Premultiplied (associated) alpha.
    Premultiplied = 2,
}

// ---------------------------------------------------------------------------
// BufferError
// ---------------------------------------------------------------------------

/// Errors from pixel buffer construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BufferError {
    /// Data vec is shorter than `stride * height`.
    InsufficientData,
    /// Stride is smaller than `width * 4`.
    StrideTooSmall,
    /// `stride * height` overflows.
    InvalidDimensions,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData => {
                write!(f, "data is too small for the given dimensions and stride")
            }
            Self::StrideTooSmall => write!(f, "stride is smaller than width * 4"),
            Self::InvalidDimensions => write!(f, "stride * height overflows"),
        }
    }
}

impl core::error::Error for BufferError {}

// ---------------------------------------------------------------------------
// PixelBuffer
// ---------------------------------------------------------------------------

/// Owned RGBA8 pixel buffer, possibly with row padding.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
    alpha: AlphaMode,
}

impl PixelBuffer {
    /// Allocate a zero-filled, tightly packed buffer.
    pub fn new(width: u32, height: u32, alpha: AlphaMode) -> Self {
        let stride = native_stride(width);
        Self {
            data: vec![0u8; stride * height as usize],
            width,
            height,
            stride,
            alpha,
        }
    }

    /// Allocate a zero-filled buffer whose rows are `stride` bytes apart.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::StrideTooSmall`] if `stride < width * 4`.
    pub fn with_stride(
        width: u32,
        height: u32,
        stride: usize,
        alpha: AlphaMode,
    ) -> Result<Self, BufferError> {
        let total = checked_len(width, height, stride)?;
        Ok(Self {
            data: vec![0u8; total],
            width,
            height,
            stride,
            alpha,
        })
    }

    /// Wrap an existing `Vec<u8>`.
    ///
    /// The vec is truncated to exactly `stride * height` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the stride is too small or the vec is too short.
    pub fn from_vec(
        mut data: Vec<u8>,
        width: u32,
        height: u32,
        stride: usize,
        alpha: AlphaMode,
    ) -> Result<Self, BufferError> {
        let total = checked_len(width, height, stride)?;
        if data.len() < total {
            return Err(BufferError::InsufficientData);
        }
        data.truncate(total);
        Ok(Self {
            data,
            width,
            height,
            stride,
            alpha,
        })
    }

    /// Copy a typed image into a new tightly packed buffer.
    ///
    /// Row padding in `img` (its stride beyond its width) is dropped.
    pub fn from_imgref(img: ImgRef<'_, Rgba<u8>>, alpha: AlphaMode) -> Self {
        let mut buf = Self::new(img.width() as u32, img.height() as u32, alpha);
        for (y, row) in img.rows().enumerate() {
            buf.row_mut(y as u32).copy_from_slice(row.as_bytes());
        }
        buf
    }

    /// Copy the pixels into a typed, tightly packed image.
    pub fn to_imgvec(&self) -> ImgVec<Rgba<u8>> {
        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            pixels.extend(
                self.row(y)
                    .chunks_exact(BYTES_PER_PIXEL)
                    .map(|p| Rgba::new(p[0], p[1], p[2], p[3])),
            );
        }
        ImgVec::new(pixels, self.width as usize, self.height as usize)
    }

    /// Consume the buffer and return the backing `Vec<u8>`.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
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

    /// Byte stride between row starts.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whether the color channels are straight or premultiplied.
    #[inline]
    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha
    }

    /// Whether rows carry no padding.
    #[inline]
    pub fn is_tight(&self) -> bool {
        self.stride == native_stride(self.width)
    }

    /// All bytes, padding included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// All bytes, padding included, mutably.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel bytes for row `y` (no padding).
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row index {y} out of bounds (height: {})",
            self.height
        );
        let start = y as usize * self.stride;
        &self.data[start..start + native_stride(self.width)]
    }

    /// Mutable pixel bytes for row `y` (no padding).
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(
            y < self.height,
            "row index {y} out of bounds (height: {})",
            self.height
        );
        let start = y as usize * self.stride;
        let len = native_stride(self.width);
        &mut self.data[start..start + len]
    }

    /// Raw channels at `(x, y)`, in whatever alpha mode the buffer uses.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        let i = self.index(x, y);
        let p = &self.data[i..i + BYTES_PER_PIXEL];
        Rgba::new(p[0], p[1], p[2], p[3])
    }

    /// Overwrite the raw channels at `(x, y)` with no conversion.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba<u8>) {
        let i = self.index(x, y);
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&[px.r, px.g, px.b, px.a]);
    }

    /// The pixel at `(x, y)` tagged with this buffer's color kind.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        let px = self.pixel(x, y);
        match self.alpha {
            AlphaMode::Straight => Color::Nrgba8(px),
            AlphaMode::Premultiplied => Color::Rgba8(px),
        }
    }

    /// Convert `color` into this buffer's color model and store it.
    ///
    /// A straight buffer stores `(0, 0, 0, 0)` for any color whose alpha is
    /// zero, even a straight color that still carries color channels.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn set_color<C: PixelColor + ?Sized>(&mut self, x: u32, y: u32, color: &C) {
        let px = match self.alpha {
            AlphaMode::Straight => straight_model(color),
            AlphaMode::Premultiplied => premultiplied_model(color),
        };
        self.set_pixel(x, y, px);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        y as usize * self.stride + x as usize * BYTES_PER_PIXEL
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PixelBuffer({}x{}, stride {}, {:?})",
            self.width, self.height, self.stride, self.alpha
        )
    }
}

// ---------------------------------------------------------------------------
// Color model conversions used by per-pixel setters
// ---------------------------------------------------------------------------

/// 8-bit premultiplied form of any color: the generic query, shifted down.
pub(crate) fn premultiplied_model<C: PixelColor + ?Sized>(color: &C) -> Rgba<u8> {
    let p = color.rgba16();
    Rgba::new(
        (p.r >> 8) as u8,
        (p.g >> 8) as u8,
        (p.b >> 8) as u8,
        (p.a >> 8) as u8,
    )
}

/// 8-bit straight form of any color, zeroing color at alpha 0.
pub(crate) fn straight_model<C: PixelColor + ?Sized>(color: &C) -> Rgba<u8> {
    if let Some(Color::Nrgba8(p)) = color.known() {
        return if p.a == 0 { Rgba::new(0, 0, 0, 0) } else { p };
    }
    let p = color.rgba16();
    match p.a {
        0xffff => Rgba::new((p.r >> 8) as u8, (p.g >> 8) as u8, (p.b >> 8) as u8, 0xff),
        0 => Rgba::new(0, 0, 0, 0),
        a => {
            let a = a as u32;
            let ch = |c: u16| ((c as u32 * 0xffff / a) >> 8) as u8;
            Rgba::new(ch(p.r), ch(p.g), ch(p.b), (a >> 8) as u8)
        }
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// `stride * height`, after checking `stride >= width * 4`.
fn checked_len(width: u32, height: u32, stride: usize) -> Result<usize, BufferError> {
    let min_stride = (width as usize)
        .checked_mul(BYTES_PER_PIXEL)
        .ok_or(BufferError::InvalidDimensions)?;
    if stride < min_stride {
        return Err(BufferError::StrideTooSmall);
    }
    stride
        .checked_mul(height as usize)
        .ok_or(BufferError::InvalidDimensions)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
