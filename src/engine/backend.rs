// src/engine/backend.rs
//
// Resampling backend seam and the default fast_image_resize implementation.
//
// The orchestrators validate everything before calling in here; the backend
// still re-checks what it relies on and reports problems as status codes,
// the way a native primitive would.

use crate::engine::buffer::{PlaneMut, PlaneRef, SUPPORTED_CHANNELS};
use crate::engine::geometry::Rect;
use crate::engine::status::{format_diagnostic, StatusCode};
use crate::ops::Interpolation;
use fast_image_resize::{
    self as fir,
    images::{Image, ImageRef},
    FilterType, ImageBufferError, PixelType, ResizeAlg, ResizeOptions,
};
use std::borrow::Cow;
use thiserror::Error;

/// Failure reported by a backend: raw status plus diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NativeError {
    pub code: StatusCode,
    pub message: String,
}

impl NativeError {
    /// Build an error whose message follows the `"{context}: {description} ({code})"` layout.
    pub fn new(code: StatusCode, context: impl AsRef<str>) -> Self {
        Self {
            code,
            message: format_diagnostic(code, context.as_ref()),
        }
    }
}

pub type NativeResult = std::result::Result<(), NativeError>;

/// Whole-buffer resampling primitive.
///
/// Implementations must be stateless between calls: the engine may call the
/// same instance from several threads at once, always with disjoint buffers.
pub trait Resampler: Send + Sync {
    /// Resample `src` into `dst`, overwriting `dst.size` pixels in place.
    fn resample(&self, src: PlaneRef<'_>, dst: &mut PlaneMut<'_>, mode: Interpolation)
        -> NativeResult;

    /// Extend the edge pixels of `inner` outward over the whole plane, in place.
    fn replicate_border(&self, plane: &mut PlaneMut<'_>, inner: Rect) -> NativeResult;
}

impl<R: Resampler + ?Sized> Resampler for &R {
    fn resample(
        &self,
        src: PlaneRef<'_>,
        dst: &mut PlaneMut<'_>,
        mode: Interpolation,
    ) -> NativeResult {
        (**self).resample(src, dst, mode)
    }

    fn replicate_border(&self, plane: &mut PlaneMut<'_>, inner: Rect) -> NativeResult {
        (**self).replicate_border(plane, inner)
    }
}

/// Backend built on `fast_image_resize`.
///
/// Channels are resampled independently (no alpha premultiplication), matching
/// what a packed-8-bit native primitive does.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirResampler;

impl FirResampler {
    pub fn new() -> Self {
        Self
    }
}

/// The single place where interpolation modes meet backend algorithms.
pub fn resize_alg(mode: Interpolation) -> ResizeAlg {
    match mode {
        Interpolation::NearestNeighbour => ResizeAlg::Nearest,
        Interpolation::Linear => ResizeAlg::Interpolation(FilterType::Bilinear),
        // Catmull-Rom is the B=0, C=1/2 two-parameter cubic
        Interpolation::Cubic => ResizeAlg::Interpolation(FilterType::CatmullRom),
        Interpolation::Lanczos => ResizeAlg::Interpolation(FilterType::Lanczos3),
        Interpolation::Super => ResizeAlg::Convolution(FilterType::Box),
        Interpolation::AntialiasingLinear => ResizeAlg::Convolution(FilterType::Bilinear),
        Interpolation::AntialiasingCubic => ResizeAlg::Convolution(FilterType::CatmullRom),
        Interpolation::AntialiasingLanczos => ResizeAlg::Convolution(FilterType::Lanczos3),
    }
}

fn pixel_type(channels: usize) -> Option<PixelType> {
    match channels {
        1 => Some(PixelType::U8),
        3 => Some(PixelType::U8x3),
        4 => Some(PixelType::U8x4),
        _ => None,
    }
}

fn buffer_error(err: ImageBufferError, context: &str) -> NativeError {
    let code = match err {
        ImageBufferError::InvalidBufferAlignment => StatusCode::STEP_ERR,
        _ => StatusCode::SIZE_ERR,
    };
    NativeError::new(code, format!("{context}: {err:?}"))
}

/// Rows of `src` without stride padding; borrows when already packed.
fn packed_rows<'a>(src: &PlaneRef<'a>) -> Cow<'a, [u8]> {
    let row = src.row_bytes();
    let height = src.size.height as usize;
    if src.stride == row {
        return Cow::Borrowed(&src.data[..row * height]);
    }
    let mut packed = Vec::with_capacity(row * height);
    for y in 0..src.size.height {
        packed.extend_from_slice(src.row(y));
    }
    Cow::Owned(packed)
}

fn scatter_rows(packed: &[u8], dst: &mut PlaneMut<'_>) {
    let row = dst.row_bytes();
    for (y, chunk) in packed.chunks_exact(row).enumerate() {
        dst.row_mut(y as u32).copy_from_slice(chunk);
    }
}

impl Resampler for FirResampler {
    fn resample(
        &self,
        src: PlaneRef<'_>,
        dst: &mut PlaneMut<'_>,
        mode: Interpolation,
    ) -> NativeResult {
        if src.channels != dst.channels {
            return Err(NativeError::new(
                StatusCode::INVALID_NUMBER_CHANNELS,
                format!("src.channels={}, dst.channels={}", src.channels, dst.channels),
            ));
        }
        let pixel_type = pixel_type(src.channels).ok_or_else(|| {
            NativeError::new(
                StatusCode::INVALID_NUMBER_CHANNELS,
                format!("src.channels={}", src.channels),
            )
        })?;

        let src_pixels = packed_rows(&src);
        let src_image = ImageRef::new(src.size.width, src.size.height, &src_pixels, pixel_type)
            .map_err(|e| buffer_error(e, "source image"))?;

        let options = ResizeOptions::new()
            .resize_alg(resize_alg(mode))
            .use_alpha(false);
        let mut resizer = fir::Resizer::new();
        let (src_size, dst_size) = (src.size, dst.size);
        let describe = move |e: fir::ResizeError| {
            NativeError::new(
                StatusCode::NOT_SUPPORTED_MODE_ERR,
                format!("resize() failed, srcSize={src_size}, dstSize={dst_size}, mode={mode}: {e:?}"),
            )
        };

        let (width, height) = (dst_size.width, dst_size.height);
        let row = dst.row_bytes();
        if dst.stride == row {
            let len = row * height as usize;
            match Image::from_slice_u8(width, height, &mut dst.data[..len], pixel_type) {
                Ok(mut dst_image) => {
                    return resizer
                        .resize(&src_image, &mut dst_image, &options)
                        .map_err(describe);
                }
                // Fall through to the owned-buffer path below
                Err(ImageBufferError::InvalidBufferAlignment) => {}
                Err(other) => return Err(buffer_error(other, "destination image")),
            }
        }

        let mut dst_image = Image::new(width, height, pixel_type);
        resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(describe)?;
        scatter_rows(dst_image.buffer(), dst);
        Ok(())
    }

    fn replicate_border(&self, plane: &mut PlaneMut<'_>, inner: Rect) -> NativeResult {
        let channels = plane.channels;
        if !SUPPORTED_CHANNELS.contains(&channels) {
            return Err(NativeError::new(
                StatusCode::INVALID_NUMBER_CHANNELS,
                format!("plane.channels={channels}"),
            ));
        }
        if inner.is_empty() || !inner.fits_within(plane.size) {
            return Err(NativeError::new(
                StatusCode::SIZE_ERR,
                format!("replicate border: inner {inner} in {}", plane.size),
            ));
        }

        let (x0, x1) = (inner.min().x as usize, inner.max().x as usize);
        let width = plane.size.width as usize;
        for y in inner.min().y..inner.max().y {
            let row = plane.row_mut(y);
            for x in 0..x0 {
                row.copy_within(x0 * channels..(x0 + 1) * channels, x * channels);
            }
            for x in x1..width {
                row.copy_within((x1 - 1) * channels..x1 * channels, x * channels);
            }
        }

        let stride = plane.stride;
        let row_len = plane.row_bytes();
        let top = inner.min().y as usize * stride;
        for y in 0..inner.min().y as usize {
            plane.data.copy_within(top..top + row_len, y * stride);
        }
        let bottom = (inner.max().y as usize - 1) * stride;
        for y in inner.max().y as usize..plane.size.height as usize {
            plane.data.copy_within(bottom..bottom + row_len, y * stride);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::{Point, Size};

    #[test]
    fn every_mode_maps_to_an_algorithm() {
        for mode in Interpolation::ALL {
            let alg = resize_alg(mode);
            if mode.is_antialiasing() || mode == Interpolation::Super {
                assert!(matches!(alg, ResizeAlg::Convolution(_)), "{mode}");
            } else {
                assert!(!matches!(alg, ResizeAlg::Convolution(_)), "{mode}");
            }
        }
    }

    #[test]
    fn nearest_downscale_of_uniform_plane() {
        let src = vec![200u8; 8 * 8 * 3];
        let mut dst = vec![0u8; 4 * 4 * 3];
        let mut dst_plane = PlaneMut::packed(&mut dst, Size::new(4, 4), 3);
        FirResampler
            .resample(
                PlaneRef::packed(&src, Size::new(8, 8), 3),
                &mut dst_plane,
                Interpolation::NearestNeighbour,
            )
            .unwrap();
        assert!(dst.iter().all(|&v| v == 200));
    }

    #[test]
    fn strided_source_and_destination() {
        // 2x2 gray with one padding byte per row
        let src = vec![10, 20, 99, 30, 40, 99];
        let mut dst = vec![7u8; 3 * 2 + 2];
        let mut dst_plane = PlaneMut::new(&mut dst, 3, Size::new(2, 2), 1);
        FirResampler
            .resample(
                PlaneRef::new(&src, 3, Size::new(2, 2), 1),
                &mut dst_plane,
                Interpolation::NearestNeighbour,
            )
            .unwrap();
        // padding byte between rows is untouched
        assert_eq!(&dst[..5], &[10, 20, 7, 30, 40]);
    }

    #[test]
    fn channel_mismatch_is_reported_as_status() {
        let src = vec![0u8; 4 * 4];
        let mut dst = vec![0u8; 2 * 2 * 3];
        let mut dst_plane = PlaneMut::packed(&mut dst, Size::new(2, 2), 3);
        let err = FirResampler
            .resample(
                PlaneRef::packed(&src, Size::new(4, 4), 1),
                &mut dst_plane,
                Interpolation::Linear,
            )
            .unwrap_err();
        assert_eq!(err.code, StatusCode::INVALID_NUMBER_CHANNELS);
        assert!(err.message.contains("src.channels=1, dst.channels=3"));
    }

    #[test]
    fn replicate_border_gray() {
        let mut pix = vec![
            0, 0, 0, 0, 0, 0, //
            0, 1, 2, 3, 4, 0, //
            0, 5, 6, 7, 8, 0, //
            0, 0, 0, 0, 0, 0,
        ];
        let inner = Rect::new(Point::new(1, 1), Point::new(5, 3)).unwrap();
        let mut plane = PlaneMut::packed(&mut pix, Size::new(6, 4), 1);
        FirResampler.replicate_border(&mut plane, inner).unwrap();
        assert_eq!(
            pix,
            vec![
                1, 1, 2, 3, 4, 4, //
                1, 1, 2, 3, 4, 4, //
                5, 5, 6, 7, 8, 8, //
                5, 5, 6, 7, 8, 8,
            ]
        );
    }

    #[test]
    fn replicate_border_rgb_keeps_pixels_whole() {
        let mut pix = vec![0u8; 3 * 3 * 3];
        pix[12..15].copy_from_slice(&[9, 8, 7]);
        let inner = Rect::new(Point::new(1, 1), Point::new(2, 2)).unwrap();
        let mut plane = PlaneMut::packed(&mut pix, Size::new(3, 3), 3);
        FirResampler.replicate_border(&mut plane, inner).unwrap();
        assert!(pix.chunks_exact(3).all(|px| px == [9, 8, 7]));
    }

    #[test]
    fn replicate_border_rejects_outside_rect() {
        let mut pix = vec![0u8; 4];
        let inner = Rect::new(Point::new(0, 0), Point::new(3, 1)).unwrap();
        let mut plane = PlaneMut::packed(&mut pix, Size::new(2, 2), 1);
        let err = FirResampler.replicate_border(&mut plane, inner).unwrap_err();
        assert_eq!(err.code, StatusCode::SIZE_ERR);
    }
}
