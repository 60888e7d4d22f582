//! Stride-aware copies of whole pixel buffers.
//!
//! [`copy_bulk`] is a single memory copy for buffers that share a layout.
//! [`copy_lines`] copies row by row when strides differ. Both produce the
//! same bytes when strides are equal, so callers may pick either.

use crate::buffer::PixelBuffer;

/// Which copy tier moved the bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CopyStrategy {
    /// One memory copy of the whole buffer.
    Bulk,
    /// One memory copy per row.
    Lines,
}

/// Copy `src` into `dst` row by row.
///
/// The number of rows is `src.len() / src_stride`. Each row copies
/// `min(dst_stride, src_stride)` bytes; anything past that width in the
/// wider buffer is left as it was. Rows that do not fit in `dst` are
/// dropped. A zero stride copies nothing.
pub fn copy_lines(dst: &mut [u8], dst_stride: usize, src: &[u8], src_stride: usize) {
    if dst_stride == 0 || src_stride == 0 {
        return;
    }
    let width = dst_stride.min(src_stride);
    for (dst_row, src_row) in dst.chunks_mut(dst_stride).zip(src.chunks_exact(src_stride)) {
        let n = width.min(dst_row.len());
        dst_row[..n].copy_from_slice(&src_row[..n]);
    }
}

/// Copy `src` into `dst` in one go. Both must use the same stride.
///
/// Copies `min(dst.len(), src.len())` bytes.
pub fn copy_bulk(dst: &mut [u8], src: &[u8]) {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
}

/// Copy the bytes of `src` into `dst`, picking the fastest tier.
///
/// Dimensions and alpha modes are not checked: the caller must pass
/// buffers of the same size and meaning.
pub fn copy_buffer(dst: &mut PixelBuffer, src: &PixelBuffer) -> CopyStrategy {
    let dst_stride = dst.stride();
    if dst_stride == src.stride() {
        copy_bulk(dst.as_bytes_mut(), src.as_bytes());
        CopyStrategy::Bulk
    } else {
        copy_lines(dst.as_bytes_mut(), dst_stride, src.as_bytes(), src.stride());
        CopyStrategy::Lines
    }
}
