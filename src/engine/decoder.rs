// src/engine/decoder.rs
//
// JPEG decoding (mozjpeg, backed by libjpeg-turbo) into packed planes or
// subsampled YCbCr planes, with DCT-domain downscaling toward a target box.

use crate::engine::buffer::Plane;
use crate::engine::common::run_with_panic_policy;
use crate::engine::geometry::{largest_inner_fit, Rect, Size};
use crate::engine::planar::{SubsampledImage, SubsamplingRatio};
use crate::engine::{MAX_DIMENSION, MAX_PIXELS};
use crate::error::{ResizeError, Result};
use crate::ops::ColorSpace;
use mozjpeg::Decompress;
use tracing::debug;

// Type alias for Result - always use ResizeError to preserve error taxonomy
type DecoderResult<T> = Result<T>;

/// Denominator of libjpeg DCT scaling (the 8 in n/8); also the largest numerator.
const SCALE_DENOMINATOR: u32 = 8;

/// Decode a JPEG into a tightly packed plane in the requested layout.
///
/// With a `scale_hint`, the decoder shrinks by the smallest `n/8` that still
/// covers `largest_inner_fit(original, hint)`, so a following resize to that
/// box never upsamples.
pub fn decode_jpeg(
    data: &[u8],
    color: ColorSpace,
    scale_hint: Option<Size>,
) -> DecoderResult<Plane> {
    run_with_panic_policy("decode:mozjpeg", || {
        ensure_eoi(data)?;
        let mut decompress = Decompress::new_mem(data).map_err(|e| {
            ResizeError::decode_failed(format!("mozjpeg decompress init failed: {e:?}"))
        })?;

        let original = Size::new(decompress.width() as u32, decompress.height() as u32);
        check_dimensions(original.width, original.height)?;
        let numerator = scale_hint.map_or(SCALE_DENOMINATOR as u8, |hint| {
            scale_numerator(original, hint)
        });
        decompress.scale(numerator);
        debug!(original = %original, numerator, ?color, "decoding jpeg");

        match color {
            ColorSpace::Gray => {
                let mut started = decompress.grayscale().map_err(|e| {
                    ResizeError::decode_failed(format!("mozjpeg grayscale conversion failed: {e:?}"))
                })?;
                let size = Size::new(started.width() as u32, started.height() as u32);
                let pixels: Vec<u8> = started.read_scanlines().map_err(|e| {
                    ResizeError::decode_failed(format!("mozjpeg: failed to read scanlines: {e:?}"))
                })?;
                packed_plane(pixels, size, 1)
            }
            ColorSpace::Rgb => {
                let mut started = decompress.rgb().map_err(|e| {
                    ResizeError::decode_failed(format!("mozjpeg rgb conversion failed: {e:?}"))
                })?;
                let size = Size::new(started.width() as u32, started.height() as u32);
                let pixels: Vec<[u8; 3]> = started.read_scanlines().map_err(|e| {
                    ResizeError::decode_failed(format!("mozjpeg: failed to read scanlines: {e:?}"))
                })?;
                packed_plane(pixels.into_iter().flatten().collect(), size, 3)
            }
            ColorSpace::Rgba => {
                let mut started = decompress.rgba().map_err(|e| {
                    ResizeError::decode_failed(format!("mozjpeg rgba conversion failed: {e:?}"))
                })?;
                let size = Size::new(started.width() as u32, started.height() as u32);
                let pixels: Vec<[u8; 4]> = started.read_scanlines().map_err(|e| {
                    ResizeError::decode_failed(format!("mozjpeg: failed to read scanlines: {e:?}"))
                })?;
                packed_plane(pixels.into_iter().flatten().collect(), size, 4)
            }
        }
    })
}

/// Decode a three-component JPEG into separate Y, Cb and Cr planes.
///
/// The subsampling ratio comes from the component sampling factors; chroma
/// planes are box-averaged down from the decoder's full-resolution output.
/// `scale_hint` is an exact luma target: the decoder only shrinks by factors
/// that keep both dimensions at least that large and on chroma block
/// boundaries.
pub fn decode_jpeg_subsampled(
    data: &[u8],
    scale_hint: Option<Size>,
) -> DecoderResult<SubsampledImage> {
    run_with_panic_policy("decode:mozjpeg:ycbcr", || {
        ensure_eoi(data)?;
        let mut decompress = Decompress::new_mem(data).map_err(|e| {
            ResizeError::decode_failed(format!("mozjpeg decompress init failed: {e:?}"))
        })?;

        let original = Size::new(decompress.width() as u32, decompress.height() as u32);
        check_dimensions(original.width, original.height)?;

        let sampling: Vec<(u32, u32)> = decompress
            .components()
            .iter()
            .map(|c| (c.h_samp_factor.max(1) as u32, c.v_samp_factor.max(1) as u32))
            .collect();
        let ratio = ratio_from_sampling(&sampling)?;

        let (dw, dh) = ratio.factors();
        let numerator = scale_hint.map_or(SCALE_DENOMINATOR as u8, |target| {
            pick_numerator(original, target, |scaled| {
                scaled.width % dw == 0 && scaled.height % dh == 0
            })
        });
        decompress.scale(numerator);
        debug!(original = %original, numerator, ratio = %ratio, "decoding jpeg planes");

        let mut started = decompress
            .to_colorspace(mozjpeg::ColorSpace::JCS_YCbCr)
            .map_err(|e| {
                ResizeError::decode_failed(format!("mozjpeg ycbcr conversion failed: {e:?}"))
            })?;
        let size = Size::new(started.width() as u32, started.height() as u32);
        let pixels: Vec<[u8; 3]> = started.read_scanlines().map_err(|e| {
            ResizeError::decode_failed(format!("mozjpeg: failed to read scanlines: {e:?}"))
        })?;
        if pixels.len() != size.pixels() as usize {
            return Err(ResizeError::decode_failed(format!(
                "mozjpeg: expected {} pixels, got {}",
                size.pixels(),
                pixels.len()
            )));
        }
        split_planes(&pixels, size, ratio)
    })
}

/// Check if image dimensions are within safe limits.
/// Returns an error if the image is too large (potential decompression bomb).
pub fn check_dimensions(width: u32, height: u32) -> DecoderResult<()> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ResizeError::dimension_exceeds_limit(
            width.max(height),
            MAX_DIMENSION,
        ));
    }
    let pixels = width as u64 * height as u64;
    if pixels > MAX_PIXELS {
        return Err(ResizeError::pixel_count_exceeds_limit(pixels, MAX_PIXELS));
    }
    Ok(())
}

/// Smallest `n` in `1..=8` whose `n/8` decode still covers the proportional
/// fit of `original` into `hint`. An empty hint disables scaling.
pub fn scale_numerator(original: Size, hint: Size) -> u8 {
    if original.is_empty() || hint.is_empty() {
        return SCALE_DENOMINATOR as u8;
    }
    pick_numerator(original, largest_inner_fit(original, hint), |_| true)
}

fn pick_numerator(original: Size, needed: Size, accept: impl Fn(Size) -> bool) -> u8 {
    (1..SCALE_DENOMINATOR)
        .map(|n| {
            let scaled = Size::new(
                scaled_dimension(original.width, n),
                scaled_dimension(original.height, n),
            );
            (n, scaled)
        })
        .find(|&(_, scaled)| {
            scaled.width >= needed.width && scaled.height >= needed.height && accept(scaled)
        })
        .map_or(SCALE_DENOMINATOR, |(n, _)| n) as u8
}

/// Output dimension libjpeg produces for `n/8` scaling (rounded up).
fn scaled_dimension(dimension: u32, numerator: u32) -> u32 {
    (dimension as u64 * numerator as u64).div_ceil(SCALE_DENOMINATOR as u64) as u32
}

fn ensure_eoi(data: &[u8]) -> DecoderResult<()> {
    if !data.windows(2).any(|pair| pair == [0xFF, 0xD9]) {
        return Err(ResizeError::decode_failed("mozjpeg: missing JPEG EOI marker"));
    }
    Ok(())
}

fn packed_plane(pixels: Vec<u8>, size: Size, channels: usize) -> DecoderResult<Plane> {
    Plane::from_vec(pixels, channels * size.width as usize, size, channels)
        .map_err(|e| ResizeError::decode_failed(format!("mozjpeg: bad scanline buffer: {e}")))
}

/// Ratio for `[Y, Cb, Cr]` sampling factors. Both chroma components must
/// share one factor pair.
fn ratio_from_sampling(sampling: &[(u32, u32)]) -> DecoderResult<SubsamplingRatio> {
    let [luma, cb, cr] = sampling else {
        return Err(ResizeError::unsupported_format(format!(
            "JPEG with {} components, YCbCr planes need 3",
            sampling.len()
        )));
    };
    if cb != cr {
        return Err(ResizeError::unsupported_format(format!(
            "chroma sampling differs between Cb {cb:?} and Cr {cr:?}"
        )));
    }
    let max_h = luma.0.max(cb.0);
    let max_v = luma.1.max(cb.1);
    if max_h % cb.0 != 0 || max_v % cb.1 != 0 || luma.0 != max_h || luma.1 != max_v {
        return Err(ResizeError::unsupported_format(format!(
            "sampling factors Y {luma:?} Cb {cb:?}"
        )));
    }
    SubsamplingRatio::from_factors(max_h / cb.0, max_v / cb.1)
}

fn split_planes(
    pixels: &[[u8; 3]],
    size: Size,
    ratio: SubsamplingRatio,
) -> DecoderResult<SubsampledImage> {
    let y: Vec<u8> = pixels.iter().map(|px| px[0]).collect();
    let cb = downsample_channel(pixels, size, ratio, 1);
    let cr = downsample_channel(pixels, size, ratio, 2);
    let chroma = ratio.chroma_size(size);

    Ok(SubsampledImage {
        y: packed_plane(y, size, 1)?,
        cb: packed_plane(cb, chroma, 1)?,
        cr: packed_plane(cr, chroma, 1)?,
        ratio,
        rect: Rect::of_size(size),
    })
}

/// Box-average one channel over `factors()` blocks; edge blocks are partial.
fn downsample_channel(
    pixels: &[[u8; 3]],
    size: Size,
    ratio: SubsamplingRatio,
    channel: usize,
) -> Vec<u8> {
    let (dw, dh) = ratio.factors();
    let chroma = ratio.chroma_size(size);
    let width = size.width as usize;
    let mut out = Vec::with_capacity(chroma.pixels() as usize);

    for cy in 0..chroma.height {
        let y0 = cy * dh;
        let y1 = (y0 + dh).min(size.height);
        for cx in 0..chroma.width {
            let x0 = cx * dw;
            let x1 = (x0 + dw).min(size.width);
            let mut sum = 0u32;
            for y in y0..y1 {
                let row = &pixels[y as usize * width..(y as usize + 1) * width];
                sum += row[x0 as usize..x1 as usize]
                    .iter()
                    .map(|px| px[channel] as u32)
                    .sum::<u32>();
            }
            let count = (x1 - x0) * (y1 - y0);
            out.push(((sum + count / 2) / count) as u8);
        }
    }
    out
}
