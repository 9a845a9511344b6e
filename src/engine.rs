// src/engine.rs
//
// The core of planefit:
// 1. Geometry and buffer validation that runs before any backend call
// 2. Plane-level orchestrators (proportional, padded, border, YCbCr)
// 3. JPEG decode glue and the Thumbnailer entry point
//
// This file is a facade over the modules in engine/

// =============================================================================
// SECURITY LIMITS
// =============================================================================

/// Maximum allowed image dimension (width or height).
/// Images larger than 32768x32768 are rejected to prevent decompression bombs.
pub const MAX_DIMENSION: u32 = 32768;

/// Maximum allowed total pixels (width * height).
/// 100 megapixels = 400MB uncompressed RGBA. Beyond this is likely malicious.
pub const MAX_PIXELS: u64 = 100_000_000;

// =============================================================================
// MODULE DECOMPOSITION
// =============================================================================

mod api;
mod backend;
mod buffer;
mod common;
mod decoder;
mod geometry;
mod io;
mod pipeline;
mod planar;
mod status;

pub use api::Thumbnailer;
pub use backend::{resize_alg, FirResampler, NativeError, NativeResult, Resampler};
pub use buffer::{required_len, validate_plane, Plane, PlaneMut, PlaneRef, SUPPORTED_CHANNELS};
pub use common::run_with_panic_policy;
pub use decoder::{check_dimensions, decode_jpeg, decode_jpeg_subsampled, scale_numerator};
pub use geometry::{centered_offset, largest_inner_fit, smallest_outer_fit, Point, Rect, Size};
pub use io::{inspect_header_from_bytes, inspect_header_from_path, ImageHeader, Source};
pub use pipeline::{
    replicate_border_in_place, resample_plane, resize_padded, resize_proportional, PAD_VALUE,
};
pub use planar::{
    check_alignment, resize_subsampled_image, PartialPlanes, PlanarResizeFailure,
    SubsampledImage, SubsamplingRatio,
};
pub use status::{format_diagnostic, StatusCode, ERROR_MESSAGE_CAPACITY};
