// src/engine/planar.rs
//
// Chroma-subsampled YCbCr images: subsampling ratios, alignment checks and
// the three-plane resize.

use crate::engine::backend::Resampler;
use crate::engine::buffer::{Plane, PlaneRef};
use crate::engine::decoder::check_dimensions;
use crate::engine::geometry::{Rect, Size};
use crate::engine::pipeline::resample_plane;
use crate::error::{ResizeError, Result};
use crate::ops::Interpolation;
use tracing::{debug, warn};

/// Chroma subsampling ratio of a YCbCr image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubsamplingRatio {
    Ratio444,
    Ratio422,
    Ratio420,
    Ratio440,
    Ratio411,
    Ratio410,
}

impl SubsamplingRatio {
    pub const ALL: [SubsamplingRatio; 6] = [
        SubsamplingRatio::Ratio444,
        SubsamplingRatio::Ratio422,
        SubsamplingRatio::Ratio420,
        SubsamplingRatio::Ratio440,
        SubsamplingRatio::Ratio411,
        SubsamplingRatio::Ratio410,
    ];

    /// `(downres_w, downres_h)`: how many luma pixels share one chroma sample.
    pub fn factors(&self) -> (u32, u32) {
        match self {
            SubsamplingRatio::Ratio444 => (1, 1),
            SubsamplingRatio::Ratio422 => (2, 1),
            SubsamplingRatio::Ratio420 => (2, 2),
            SubsamplingRatio::Ratio440 => (1, 2),
            SubsamplingRatio::Ratio411 => (4, 1),
            SubsamplingRatio::Ratio410 => (4, 2),
        }
    }

    /// Ratio for a pair of reduction factors, e.g. derived from JPEG
    /// component sampling factors.
    pub fn from_factors(downres_w: u32, downres_h: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.factors() == (downres_w, downres_h))
            .ok_or_else(|| {
                ResizeError::unsupported_format(format!(
                    "chroma subsampling {downres_w}x{downres_h}"
                ))
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubsamplingRatio::Ratio444 => "4:4:4",
            SubsamplingRatio::Ratio422 => "4:2:2",
            SubsamplingRatio::Ratio420 => "4:2:0",
            SubsamplingRatio::Ratio440 => "4:4:0",
            SubsamplingRatio::Ratio411 => "4:1:1",
            SubsamplingRatio::Ratio410 => "4:1:0",
        }
    }

    /// Chroma plane size for a luma size, rounding partial blocks up.
    pub fn chroma_size(&self, luma: Size) -> Size {
        let (dw, dh) = self.factors();
        Size::new(luma.width.div_ceil(dw), luma.height.div_ceil(dh))
    }
}

impl std::fmt::Display for SubsamplingRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Y, Cb and Cr planes of one image.
///
/// `rect` is the full-resolution pixel rectangle. The Y plane covers
/// `rect.size()`; the chroma planes cover it scaled down by the ratio's
/// factors. All planes are single-channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubsampledImage {
    pub y: Plane,
    pub cb: Plane,
    pub cr: Plane,
    pub ratio: SubsamplingRatio,
    pub rect: Rect,
}

impl SubsampledImage {
    pub fn size(&self) -> Size {
        self.rect.size()
    }
}

/// Planes completed before a multi-plane resize stopped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialPlanes {
    pub y: Option<Plane>,
    pub cb: Option<Plane>,
    pub cr: Option<Plane>,
}

/// Error from `resize_subsampled_image`, with whatever planes were already
/// resampled. Nothing is rolled back; the caller decides what to keep.
#[derive(Debug)]
pub struct PlanarResizeFailure {
    pub error: ResizeError,
    pub partial: PartialPlanes,
}

impl std::fmt::Display for PlanarResizeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for PlanarResizeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<PlanarResizeFailure> for ResizeError {
    fn from(failure: PlanarResizeFailure) -> Self {
        failure.error
    }
}

impl From<ResizeError> for PlanarResizeFailure {
    fn from(error: ResizeError) -> Self {
        Self {
            error,
            partial: PartialPlanes::default(),
        }
    }
}

/// Check that the source rectangle and the target size sit on chroma block
/// boundaries. Misaligned geometry is rejected, never rounded.
pub fn check_alignment(ratio: SubsamplingRatio, rect: Rect, target: Size) -> Result<()> {
    let (dw, dh) = ratio.factors();
    let mut offending = Vec::new();
    let (min, max) = (rect.min(), rect.max());
    for (name, value, factor) in [
        ("rect.min.x", min.x, dw),
        ("rect.max.x", max.x, dw),
        ("rect.min.y", min.y, dh),
        ("rect.max.y", max.y, dh),
        ("target.width", target.width, dw),
        ("target.height", target.height, dh),
    ] {
        if value % factor != 0 {
            offending.push(format!("{name}={value} not a multiple of {factor}"));
        }
    }
    if offending.is_empty() {
        Ok(())
    } else {
        Err(ResizeError::unaligned_geometry(
            ratio.as_str(),
            format!("rect {rect}, target {target}: {}", offending.join(", ")),
        ))
    }
}

struct PlaneJob<'a> {
    name: &'static str,
    src: PlaneRef<'a>,
    dst_size: Size,
}

/// Resize all three planes of `image` so the luma plane becomes `target`.
///
/// Every plane is validated before the first backend call. Planes are then
/// resampled Y, Cb, Cr; the first failure stops the sequence and the planes
/// finished so far travel back in `PlanarResizeFailure::partial`.
pub fn resize_subsampled_image<R: Resampler + ?Sized>(
    resampler: &R,
    image: &SubsampledImage,
    target: Size,
    mode: Interpolation,
) -> std::result::Result<SubsampledImage, PlanarResizeFailure> {
    let ratio = image.ratio;
    let (dw, dh) = ratio.factors();
    let src_size = image.rect.size();

    if src_size.is_empty() {
        return Err(ResizeError::invalid_geometry(
            "source rectangle",
            src_size.width as u64,
            src_size.height as u64,
        )
        .into());
    }
    if target.is_empty() {
        return Err(ResizeError::invalid_geometry(
            "target size",
            target.width as u64,
            target.height as u64,
        )
        .into());
    }
    check_dimensions(target.width, target.height)?;
    check_alignment(ratio, image.rect, target)?;

    let src_chroma = Size::new(src_size.width / dw, src_size.height / dh);
    let dst_chroma = Size::new(target.width / dw, target.height / dh);
    debug!(
        ratio = %ratio,
        src = %src_size,
        target = %target,
        chroma_src = %src_chroma,
        chroma_dst = %dst_chroma,
        "subsampled resize"
    );

    let jobs = [
        PlaneJob {
            name: "Y plane",
            src: plane_view(&image.y, src_size),
            dst_size: target,
        },
        PlaneJob {
            name: "Cb plane",
            src: plane_view(&image.cb, src_chroma),
            dst_size: dst_chroma,
        },
        PlaneJob {
            name: "Cr plane",
            src: plane_view(&image.cr, src_chroma),
            dst_size: dst_chroma,
        },
    ];

    for job in &jobs {
        if job.src.channels != 1 {
            return Err(ResizeError::unsupported_format(format!(
                "{}: {} channels, subsampled planes are single-channel",
                job.name, job.src.channels
            ))
            .into());
        }
        job.src.validate(job.name)?;
    }

    let mut done: Vec<Plane> = Vec::with_capacity(jobs.len());
    for job in &jobs {
        let resampled = Plane::try_filled(job.dst_size, 1, 0).and_then(|mut out| {
            resample_plane(resampler, job.src, &mut out.view_mut(), mode).map(|()| out)
        });
        let out = match resampled {
            Ok(out) => out,
            Err(error) => {
                warn!(plane = job.name, completed = done.len(), "subsampled resize aborted");
                return Err(PlanarResizeFailure {
                    error,
                    partial: into_partial(done),
                });
            }
        };
        done.push(out);
    }

    let mut planes = done.into_iter();
    match (planes.next(), planes.next(), planes.next()) {
        (Some(y), Some(cb), Some(cr)) => Ok(SubsampledImage {
            y,
            cb,
            cr,
            ratio,
            rect: Rect::of_size(target),
        }),
        _ => Err(ResizeError::internal_panic("subsampled resize lost a plane").into()),
    }
}

/// View of a plane's buffer restricted to the size the ratio implies.
fn plane_view(plane: &Plane, size: Size) -> PlaneRef<'_> {
    PlaneRef::new(&plane.data, plane.stride, size, plane.channels)
}

fn into_partial(done: Vec<Plane>) -> PartialPlanes {
    let mut planes = done.into_iter();
    PartialPlanes {
        y: planes.next(),
        cb: planes.next(),
        cr: planes.next(),
    }
}
