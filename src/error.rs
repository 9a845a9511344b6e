// src/error.rs
//
// Unified error handling for planefit
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - UserError: Invalid geometry or buffers, recoverable
// - CodecError: Decode failures and unsupported formats
// - ResourceLimit: Dimension limits and file access
// - InternalBug: Backend panics (should not happen)

use crate::engine::StatusCode;
use std::borrow::Cow;
use thiserror::Error;

/// Error taxonomy used to decide how a caller should react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Invalid input, recoverable by the caller
    UserError,
    /// Format/decoding issues and resampling backend failures
    CodecError,
    /// Dimension limits, file access
    ResourceLimit,
    /// Library bugs (should not happen)
    InternalBug,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::UserError => "UserError",
            ErrorCategory::CodecError => "CodecError",
            ErrorCategory::ResourceLimit => "ResourceLimit",
            ErrorCategory::InternalBug => "InternalBug",
        }
    }
}

/// planefit error types
///
/// Every validation failure is reported before the resampling backend is
/// touched; `NativeResampleFailure` is the only variant produced after a
/// backend call has been issued.
#[derive(Debug, Clone, Error)]
pub enum ResizeError {
    // Geometry / buffer validation
    #[error("Invalid geometry for {what}: {width}x{height}")]
    InvalidGeometry {
        what: Cow<'static, str>,
        width: u64,
        height: u64,
    },

    #[error("Buffer for {what} is too small: need {required} bytes, got {actual}")]
    BufferTooSmall {
        what: Cow<'static, str>,
        required: usize,
        actual: usize,
    },

    #[error("Unaligned geometry for {ratio} subsampling: {detail}")]
    UnalignedGeometry {
        ratio: Cow<'static, str>,
        detail: Cow<'static, str>,
    },

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: Cow<'static, str> },

    // Backend
    #[error("Resampling backend failed with status {code}: {message}")]
    NativeResampleFailure { code: StatusCode, message: String },

    // Decode glue
    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: Cow<'static, str> },

    #[error("Image dimension {dimension} exceeds maximum {max}")]
    DimensionExceedsLimit { dimension: u32, max: u32 },

    #[error("Image pixel count {pixels} exceeds maximum {max}")]
    PixelCountExceedsLimit { pixels: u64, max: u64 },

    // File I/O
    #[error("Failed to read file '{path}': {message}")]
    FileReadFailed {
        path: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    #[error("Failed to memory-map file '{path}': {message}")]
    MmapFailed {
        path: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    // Configuration
    #[error("Unknown interpolation: '{name}'")]
    InvalidInterpolation { name: Cow<'static, str> },

    #[error("Unknown preset: '{name}'. Available: thumbnail, ml_input, preview")]
    InvalidPreset { name: Cow<'static, str> },

    // Internal
    #[error("Internal error: {message}")]
    InternalPanic { message: Cow<'static, str> },
}

// Constructor Helpers
impl ResizeError {
    pub fn invalid_geometry(what: impl Into<Cow<'static, str>>, width: u64, height: u64) -> Self {
        Self::InvalidGeometry {
            what: what.into(),
            width,
            height,
        }
    }

    pub fn buffer_too_small(
        what: impl Into<Cow<'static, str>>,
        required: usize,
        actual: usize,
    ) -> Self {
        Self::BufferTooSmall {
            what: what.into(),
            required,
            actual,
        }
    }

    pub fn unaligned_geometry(
        ratio: impl Into<Cow<'static, str>>,
        detail: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::UnalignedGeometry {
            ratio: ratio.into(),
            detail: detail.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<Cow<'static, str>>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn native_failure(code: StatusCode, message: impl Into<String>) -> Self {
        Self::NativeResampleFailure {
            code,
            message: message.into(),
        }
    }

    pub fn decode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn dimension_exceeds_limit(dimension: u32, max: u32) -> Self {
        Self::DimensionExceedsLimit { dimension, max }
    }

    pub fn pixel_count_exceeds_limit(pixels: u64, max: u64) -> Self {
        Self::PixelCountExceedsLimit { pixels, max }
    }

    pub fn file_read_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            message: source.to_string().into(),
        }
    }

    pub fn mmap_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::MmapFailed {
            path: path.into(),
            message: source.to_string().into(),
        }
    }

    pub fn invalid_interpolation(name: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidInterpolation { name: name.into() }
    }

    pub fn invalid_preset(name: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidPreset { name: name.into() }
    }

    pub fn internal_panic(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalPanic {
            message: message.into(),
        }
    }

    /// Backend status code, if this error came out of the resampling backend.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::NativeResampleFailure { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Check if this error is recoverable (caller can fix it)
    pub fn is_recoverable(&self) -> bool {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::ResourceLimit => true,
            ErrorCategory::CodecError | ErrorCategory::InternalBug => false,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidGeometry { .. }
            | Self::BufferTooSmall { .. }
            | Self::UnalignedGeometry { .. }
            | Self::InvalidInterpolation { .. }
            | Self::InvalidPreset { .. } => ErrorCategory::UserError,

            Self::UnsupportedFormat { .. }
            | Self::DecodeFailed { .. }
            | Self::NativeResampleFailure { .. } => ErrorCategory::CodecError,

            Self::DimensionExceedsLimit { .. }
            | Self::PixelCountExceedsLimit { .. }
            | Self::FileReadFailed { .. }
            | Self::MmapFailed { .. } => ErrorCategory::ResourceLimit,

            Self::InternalPanic { .. } => ErrorCategory::InternalBug,
        }
    }
}

// Result type alias
pub type Result<T> = std::result::Result<T, ResizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResizeError::invalid_geometry("source", 0, 10);
        assert_eq!(err.to_string(), "Invalid geometry for source: 0x10");

        let err = ResizeError::buffer_too_small("destination", 300, 12);
        assert!(err.to_string().contains("need 300 bytes, got 12"));
    }

    #[test]
    fn test_native_failure_carries_code() {
        let err = ResizeError::native_failure(StatusCode::SIZE_ERR, "resize() failed");
        assert_eq!(err.status_code(), Some(StatusCode::SIZE_ERR));
        assert!(err.to_string().contains("resize() failed"));
        assert_eq!(
            ResizeError::unsupported_format("CMYK").status_code(),
            None
        );
    }

    #[test]
    fn test_error_recoverable() {
        assert!(ResizeError::invalid_geometry("box", 0, 0).is_recoverable());
        assert!(ResizeError::unaligned_geometry("4:2:0", "width 3").is_recoverable());
        assert!(ResizeError::dimension_exceeds_limit(40000, 32768).is_recoverable());
        assert!(!ResizeError::decode_failed("truncated").is_recoverable());
        assert!(!ResizeError::internal_panic("boom").is_recoverable());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            ResizeError::buffer_too_small("source", 10, 1).category(),
            ErrorCategory::UserError
        );
        assert_eq!(
            ResizeError::native_failure(StatusCode::STEP_ERR, "x").category(),
            ErrorCategory::CodecError
        );
        assert_eq!(
            ResizeError::unsupported_format("2 channels").category(),
            ErrorCategory::CodecError
        );
        assert_eq!(
            ResizeError::pixel_count_exceeds_limit(1 << 40, 100).category(),
            ErrorCategory::ResourceLimit
        );
        assert_eq!(
            ResizeError::internal_panic("x").category(),
            ErrorCategory::InternalBug
        );
        assert_eq!(ErrorCategory::CodecError.as_str(), "CodecError");
    }
}
