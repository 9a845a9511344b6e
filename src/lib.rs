// lib.rs
//
// planefit: decode JPEGs and resize packed or chroma-subsampled planes into
// a bounding box.
//
// Design goals:
// - Every geometry and buffer check happens before the resampling backend runs
// - Proportional, letterboxed and YCbCr resizes share one plane adapter
// - The backend is a trait; the default one is fast_image_resize
// - Decode glue shrinks in the DCT domain before the exact resize

pub mod engine;
pub mod error;
pub mod ops;

pub use engine::{
    decode_jpeg, decode_jpeg_subsampled, inspect_header_from_bytes, inspect_header_from_path,
    largest_inner_fit, replicate_border_in_place, resample_plane, resize_padded,
    resize_proportional, resize_subsampled_image, smallest_outer_fit, FirResampler, ImageHeader,
    NativeError, Plane, PlaneMut, PlaneRef, Point, Rect, Resampler, Size, StatusCode,
    SubsampledImage, SubsamplingRatio, Thumbnailer,
};
pub use error::{ErrorCategory, ResizeError, Result};
pub use ops::{ColorSpace, Interpolation, Padding, PresetConfig, ThumbnailConfig};

/// Get library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
