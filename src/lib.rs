//! Alpha premultiplication and stride-aware pixel copies for RGBA8 images.
//!
//! This crate converts 8-bit RGBA between straight and premultiplied alpha
//! and moves whole images between three representations:
//!
//! - [`ManagedImage`]: texture-resident, premultiplied, bulk readback/upload
//! - [`PixelBuffer`] with [`AlphaMode::Premultiplied`]
//! - [`PixelBuffer`] with [`AlphaMode::Straight`]
//!
//! Modules, leaves first:
//!
//! - per-pixel math: [`unmultiply_bytes`], [`multiply_bytes`],
//!   [`multiply_bytes_preserve_colors`], [`unmultiply_rgba16`]
//! - color normalization: [`Color`], [`PixelColor`], [`to_straight`]
//! - buffer copies: [`copy_lines`], [`copy_bulk`], [`copy_buffer`]
//! - representation bridge: [`to_managed`], [`to_straight_buffer`],
//!   [`copy_image`], [`slow_copy`]
//!
//! Everything is synchronous and stateless. Destination buffers are the
//! only thing an operation mutates.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod alpha;
mod bridge;
mod buffer;
mod color;
mod copy;
mod image;
mod managed;

pub use alpha::{
    multiply_bytes, multiply_bytes_preserve_colors, premultiply_rgba16, unmultiply_bytes,
    unmultiply_rgba16,
};
pub use bridge::{
    BridgeError, copy_image, slow_copy, to_managed, to_premultiplied_buffer, to_straight_buffer,
};
pub use buffer::{AlphaMode, BYTES_PER_PIXEL, BufferError, PixelBuffer, native_stride};
pub use color::{Color, PixelColor, to_straight, to_straight_color, to_straight_u32};
pub use copy::{CopyStrategy, copy_buffer, copy_bulk, copy_lines};
pub use image::{Image, ImageOptions, PixelSource, Representation};
pub use managed::ManagedImage;

// Re-exports for callers building pixels and images.
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb;
pub use rgb::{Gray, Rgba};
