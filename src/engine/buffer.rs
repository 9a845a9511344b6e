// src/engine/buffer.rs
//
// Plane buffers (owned and borrowed) and the validation applied before any
// backend call.

use crate::engine::geometry::Size;
use crate::error::{ResizeError, Result};

/// Channel counts accepted for packed planes.
pub const SUPPORTED_CHANNELS: [usize; 3] = [1, 3, 4];

/// Owned plane returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    pub data: Vec<u8>,
    pub stride: usize,
    pub size: Size,
    pub channels: usize,
}

impl Plane {
    /// Tightly packed plane filled with `value`.
    ///
    /// Panics if the byte length overflows `usize`; use `try_filled` for
    /// sizes that are not known to be small.
    pub fn filled(size: Size, channels: usize, value: u8) -> Self {
        match Self::try_filled(size, channels, value) {
            Ok(plane) => plane,
            Err(err) => panic!("{err}"),
        }
    }

    /// Tightly packed plane filled with `value`, or `InvalidGeometry` when
    /// its byte length does not fit in memory.
    pub fn try_filled(size: Size, channels: usize, value: u8) -> Result<Self> {
        let overflow = || {
            ResizeError::invalid_geometry(
                "plane (byte length overflows)",
                size.width as u64,
                size.height as u64,
            )
        };
        let stride = channels
            .checked_mul(size.width as usize)
            .ok_or_else(overflow)?;
        let len = stride
            .checked_mul(size.height as usize)
            .ok_or_else(overflow)?;
        Ok(Self {
            data: vec![value; len],
            stride,
            size,
            channels,
        })
    }

    /// Wrap a caller buffer; validated like any other plane.
    pub fn from_vec(data: Vec<u8>, stride: usize, size: Size, channels: usize) -> Result<Self> {
        validate_plane("plane", data.len(), stride, size, channels)?;
        Ok(Self {
            data,
            stride,
            size,
            channels,
        })
    }

    pub fn view(&self) -> PlaneRef<'_> {
        PlaneRef {
            data: &self.data,
            stride: self.stride,
            size: self.size,
            channels: self.channels,
        }
    }

    pub fn view_mut(&mut self) -> PlaneMut<'_> {
        PlaneMut {
            data: &mut self.data,
            stride: self.stride,
            size: self.size,
            channels: self.channels,
        }
    }

    /// Pixel bytes at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = y as usize * self.stride + x as usize * self.channels;
        &self.data[start..start + self.channels]
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// Read-only view of caller-owned plane memory, borrowed for one call.
#[derive(Clone, Copy, Debug)]
pub struct PlaneRef<'a> {
    pub data: &'a [u8],
    pub stride: usize,
    pub size: Size,
    pub channels: usize,
}

impl<'a> PlaneRef<'a> {
    pub fn new(data: &'a [u8], stride: usize, size: Size, channels: usize) -> Self {
        Self {
            data,
            stride,
            size,
            channels,
        }
    }

    /// Tightly packed view (`stride == channels * width`).
    pub fn packed(data: &'a [u8], size: Size, channels: usize) -> Self {
        Self::new(data, channels * size.width as usize, size, channels)
    }

    pub fn row_bytes(&self) -> usize {
        self.channels * self.size.width as usize
    }

    /// Row `y`, limited to the visible pixels (stride padding excluded).
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    pub fn validate(&self, what: &'static str) -> Result<()> {
        validate_plane(what, self.data.len(), self.stride, self.size, self.channels)
    }
}

/// Writable view of plane memory, borrowed for one call.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    pub data: &'a mut [u8],
    pub stride: usize,
    pub size: Size,
    pub channels: usize,
}

impl<'a> PlaneMut<'a> {
    pub fn new(data: &'a mut [u8], stride: usize, size: Size, channels: usize) -> Self {
        Self {
            data,
            stride,
            size,
            channels,
        }
    }

    pub fn packed(data: &'a mut [u8], size: Size, channels: usize) -> Self {
        let stride = channels * size.width as usize;
        Self::new(data, stride, size, channels)
    }

    pub fn row_bytes(&self) -> usize {
        self.channels * self.size.width as usize
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    pub fn view(&self) -> PlaneRef<'_> {
        PlaneRef {
            data: &*self.data,
            stride: self.stride,
            size: self.size,
            channels: self.channels,
        }
    }

    pub fn validate(&self, what: &'static str) -> Result<()> {
        validate_plane(what, self.data.len(), self.stride, self.size, self.channels)
    }
}

/// Bytes a strided plane occupies: every row but the last is a full stride.
pub fn required_len(stride: usize, size: Size, channels: usize) -> Option<usize> {
    if size.is_empty() {
        return Some(0);
    }
    let row = channels.checked_mul(size.width as usize)?;
    stride
        .checked_mul(size.height as usize - 1)?
        .checked_add(row)
}

/// Reject geometry the backend must never see.
///
/// Order matters: dimensions, then channel layout, then stride, then length.
pub fn validate_plane(
    what: &'static str,
    len: usize,
    stride: usize,
    size: Size,
    channels: usize,
) -> Result<()> {
    if size.is_empty() {
        return Err(ResizeError::invalid_geometry(
            what,
            size.width as u64,
            size.height as u64,
        ));
    }
    if !SUPPORTED_CHANNELS.contains(&channels) {
        return Err(ResizeError::unsupported_format(format!(
            "{what}: {channels} channels per pixel"
        )));
    }
    let row = channels * size.width as usize;
    if stride < row {
        return Err(ResizeError::invalid_geometry(
            format!("{what} stride {stride} (row needs {row} bytes)"),
            size.width as u64,
            size.height as u64,
        ));
    }
    let required = required_len(stride, size, channels).ok_or_else(|| {
        ResizeError::invalid_geometry(
            format!("{what} (byte length overflows)"),
            size.width as u64,
            size.height as u64,
        )
    })?;
    if len < required {
        return Err(ResizeError::buffer_too_small(what, required, len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResizeError;

    #[test]
    fn accepts_tight_and_strided_planes() {
        assert!(validate_plane("src", 12, 6, Size::new(2, 2), 3).is_ok());
        // stride 8, last row only needs 6 bytes
        assert!(validate_plane("src", 14, 8, Size::new(2, 2), 3).is_ok());
    }

    #[test]
    fn rejects_zero_dimensions() {
        let err = validate_plane("src", 100, 10, Size::new(0, 5), 1).unwrap_err();
        assert!(matches!(err, ResizeError::InvalidGeometry { .. }));
        let err = validate_plane("dst", 100, 10, Size::new(5, 0), 1).unwrap_err();
        assert!(matches!(err, ResizeError::InvalidGeometry { .. }));
    }

    #[test]
    fn rejects_short_buffers() {
        let err = validate_plane("src", 11, 6, Size::new(2, 2), 3).unwrap_err();
        match err {
            ResizeError::BufferTooSmall {
                required, actual, ..
            } => {
                assert_eq!(required, 12);
                assert_eq!(actual, 11);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_narrow_stride() {
        let err = validate_plane("src", 100, 5, Size::new(2, 2), 3).unwrap_err();
        assert!(matches!(err, ResizeError::InvalidGeometry { .. }));
    }

    #[test]
    fn rejects_unsupported_channel_counts() {
        for channels in [0, 2, 5] {
            let err = validate_plane("src", 1000, 40, Size::new(4, 4), channels).unwrap_err();
            assert!(matches!(err, ResizeError::UnsupportedFormat { .. }));
        }
    }

    #[test]
    fn try_filled_reports_overflow() {
        let plane = Plane::try_filled(Size::new(3, 2), 4, 9).unwrap();
        assert_eq!(plane.stride, 12);
        assert_eq!(plane.data, vec![9; 24]);

        let err = Plane::try_filled(Size::new(u32::MAX, u32::MAX), 4, 0).unwrap_err();
        assert!(matches!(err, ResizeError::InvalidGeometry { .. }));
    }

    #[test]
    fn plane_pixel_respects_stride() {
        let data = vec![
            1, 2, 0, 0, //
            3, 4, 0, 0,
        ];
        let plane = Plane::from_vec(data, 4, Size::new(2, 2), 1).unwrap();
        assert_eq!(plane.pixel(1, 1), &[4]);
        assert_eq!(plane.view().row(1), &[3, 4]);
    }
}
