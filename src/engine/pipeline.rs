// src/engine/pipeline.rs
//
// Packed-plane orchestration: the plane adapter, proportional and padded
// resizes, in-place border replication.

use crate::engine::backend::{NativeError, Resampler};
use crate::engine::buffer::{Plane, PlaneMut, PlaneRef};
use crate::engine::decoder::check_dimensions;
use crate::engine::geometry::{centered_offset, largest_inner_fit, Rect, Size};
use crate::error::{ResizeError, Result};
use crate::ops::Interpolation;
use tracing::{debug, trace, warn};

/// Byte value used for letterbox padding, on every channel.
pub const PAD_VALUE: u8 = 128;

// Type alias for Result - always use ResizeError to preserve error taxonomy
type PipelineResult<T> = Result<T>;

impl From<NativeError> for ResizeError {
    fn from(err: NativeError) -> Self {
        ResizeError::native_failure(err.code, err.message)
    }
}

/// Reject an empty box or one past the dimension limits.
pub(crate) fn validate_box(bbox: Size) -> PipelineResult<()> {
    if bbox.is_empty() {
        return Err(ResizeError::invalid_geometry(
            "target box",
            bbox.width as u64,
            bbox.height as u64,
        ));
    }
    check_dimensions(bbox.width, bbox.height)
}

/// Resample one plane into another with a single backend call.
///
/// Both planes are validated first; a backend failure is surfaced as
/// `NativeResampleFailure` without retrying.
pub fn resample_plane<R: Resampler + ?Sized>(
    resampler: &R,
    src: PlaneRef<'_>,
    dst: &mut PlaneMut<'_>,
    mode: Interpolation,
) -> PipelineResult<()> {
    src.validate("source")?;
    dst.validate("destination")?;
    if src.channels != dst.channels {
        return Err(ResizeError::unsupported_format(format!(
            "source has {} channels, destination has {}",
            src.channels, dst.channels
        )));
    }

    trace!(
        src = %src.size,
        dst = %dst.size,
        channels = src.channels,
        mode = %mode,
        "resample plane"
    );
    resampler.resample(src, dst, mode).map_err(|err| {
        warn!(code = err.code.0, message = %err.message, "resampling backend failed");
        ResizeError::from(err)
    })
}

/// Resize to the largest size with the source's aspect ratio that fits `bbox`.
///
/// The returned plane is tightly packed and its size always equals
/// `largest_inner_fit(src.size, bbox)`.
pub fn resize_proportional<R: Resampler + ?Sized>(
    resampler: &R,
    src: PlaneRef<'_>,
    bbox: Size,
    mode: Interpolation,
) -> PipelineResult<Plane> {
    src.validate("source")?;
    validate_box(bbox)?;

    let out_size = largest_inner_fit(src.size, bbox);
    debug!(src = %src.size, bbox = %bbox, out = %out_size, "proportional resize");

    let mut out = Plane::try_filled(out_size, src.channels, 0)?;
    resample_plane(resampler, src, &mut out.view_mut(), mode)?;
    Ok(out)
}

/// Resize into a canvas of exactly `bbox`, letterboxing with `PAD_VALUE`.
///
/// The proportional image is centered (floor division of the slack) and
/// written with the canvas row stride, so its rows land inside the canvas.
pub fn resize_padded<R: Resampler + ?Sized>(
    resampler: &R,
    src: PlaneRef<'_>,
    bbox: Size,
    mode: Interpolation,
) -> PipelineResult<Plane> {
    src.validate("source")?;
    validate_box(bbox)?;

    let channels = src.channels;
    let inner = largest_inner_fit(src.size, bbox);
    // Resampling overwrites everything when the image fills the box
    let fill = if inner == bbox { 0 } else { PAD_VALUE };
    let mut canvas = Plane::try_filled(bbox, channels, fill)?;

    let stride = canvas.stride;
    let offset = centered_offset(bbox, inner, channels, stride);
    debug!(
        src = %src.size,
        bbox = %bbox,
        inner = %inner,
        offset,
        "padded resize"
    );

    let mut window = PlaneMut::new(&mut canvas.data[offset..], stride, inner, channels);
    resample_plane(resampler, src, &mut window, mode)?;
    Ok(canvas)
}

/// Extend the edges of `inner` outward to cover the whole plane, in place.
pub fn replicate_border_in_place<R: Resampler + ?Sized>(
    resampler: &R,
    plane: &mut PlaneMut<'_>,
    inner: Rect,
) -> PipelineResult<()> {
    plane.validate("plane")?;
    if inner.is_empty() || !inner.fits_within(plane.size) {
        return Err(ResizeError::invalid_geometry(
            format!("inner rectangle {inner} of {} plane", plane.size),
            inner.width() as u64,
            inner.height() as u64,
        ));
    }

    trace!(size = %plane.size, inner = %inner, "replicate border");
    resampler.replicate_border(plane, inner).map_err(|err| {
        warn!(code = err.code.0, message = %err.message, "border replication failed");
        ResizeError::from(err)
    })
}
