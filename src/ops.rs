// src/ops.rs
//
// Caller-selected knobs: interpolation mode, output color space, padding, presets.
// These are plain values - the expensive work happens in the engine.

use crate::error::{ResizeError, Result};
use std::str::FromStr;

/// Environment variable overriding the default interpolation.
pub const INTERPOLATION_ENV: &str = "PLANEFIT_INTERPOLATION";

/// Interpolation kernel requested from the resampling backend.
///
/// Passed through unchanged; the backend owns the mapping to its own
/// algorithm identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    NearestNeighbour,
    Linear,
    Cubic,
    Lanczos,
    /// Area averaging ("super sampling")
    Super,
    AntialiasingLinear,
    AntialiasingCubic,
    #[default]
    AntialiasingLanczos,
}

impl Interpolation {
    pub const ALL: [Interpolation; 8] = [
        Interpolation::NearestNeighbour,
        Interpolation::Linear,
        Interpolation::Cubic,
        Interpolation::Lanczos,
        Interpolation::Super,
        Interpolation::AntialiasingLinear,
        Interpolation::AntialiasingCubic,
        Interpolation::AntialiasingLanczos,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Interpolation::NearestNeighbour => "NearestNeighbour",
            Interpolation::Linear => "Linear",
            Interpolation::Cubic => "Cubic",
            Interpolation::Lanczos => "Lanczos",
            Interpolation::Super => "Super",
            Interpolation::AntialiasingLinear => "AntialiasingLinear",
            Interpolation::AntialiasingCubic => "AntialiasingCubic",
            Interpolation::AntialiasingLanczos => "AntialiasingLanczos",
        }
    }

    /// Parse a name as printed by `name()`, case-insensitively.
    /// `nn`/`nearest` and `aa-*` short forms are accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let found = match lower.as_str() {
            "nn" | "nearest" => Some(Interpolation::NearestNeighbour),
            "aa-linear" => Some(Interpolation::AntialiasingLinear),
            "aa-cubic" => Some(Interpolation::AntialiasingCubic),
            "aa-lanczos" => Some(Interpolation::AntialiasingLanczos),
            _ => None,
        };
        found.or_else(|| {
            Self::ALL
                .into_iter()
                .find(|mode| mode.name().eq_ignore_ascii_case(&lower))
        })
    }

    pub fn is_antialiasing(&self) -> bool {
        matches!(
            self,
            Interpolation::AntialiasingLinear
                | Interpolation::AntialiasingCubic
                | Interpolation::AntialiasingLanczos
        )
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interpolation {
    type Err = ResizeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| ResizeError::invalid_interpolation(s.to_string()))
    }
}

/// Packed output layout requested from the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Rgba,
}

impl ColorSpace {
    pub fn channels(&self) -> usize {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Rgb => 3,
            ColorSpace::Rgba => 4,
        }
    }
}

/// What to do with the part of the target box the image does not cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Padding {
    /// Output is exactly proportional; its size varies with the aspect ratio.
    #[default]
    None,
    /// Output is always the full box, letterboxed with neutral gray.
    Gray,
}

/// Thumbnailer configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ThumbnailConfig {
    pub interpolation: Interpolation,
    pub padding: Padding,
    /// Let the JPEG decoder downscale by n/8 before the exact resize.
    pub decode_scaling: bool,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::default(),
            padding: Padding::None,
            decode_scaling: true,
        }
    }
}

impl ThumbnailConfig {
    /// Defaults, with the interpolation taken from `PLANEFIT_INTERPOLATION` when set.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(INTERPOLATION_ENV) {
            config.interpolation = value.parse()?;
        }
        Ok(config)
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_decode_scaling(mut self, enabled: bool) -> Self {
        self.decode_scaling = enabled;
        self
    }
}

// =============================================================================
// PRESETS - Common thumbnailing configurations
// =============================================================================

/// Preset configuration for common use cases.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetConfig {
    /// Target box width
    pub width: u32,
    /// Target box height
    pub height: u32,
    /// Output layout
    pub color: ColorSpace,
    pub config: ThumbnailConfig,
}

impl PresetConfig {
    /// Get the built-in preset by name
    pub fn get(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "thumbnail" => Ok(Self::thumbnail()),
            "ml_input" | "ml-input" => Ok(Self::ml_input()),
            "preview" => Ok(Self::preview()),
            _ => Err(ResizeError::invalid_preset(name.to_string())),
        }
    }

    /// Thumbnail preset: fit into 150x150 RGB, no padding
    pub fn thumbnail() -> Self {
        Self {
            width: 150,
            height: 150,
            color: ColorSpace::Rgb,
            config: ThumbnailConfig::default(),
        }
    }

    /// Fixed-size model input: 224x224 RGB, gray letterbox, linear antialiasing
    pub fn ml_input() -> Self {
        Self {
            width: 224,
            height: 224,
            color: ColorSpace::Rgb,
            config: ThumbnailConfig::default()
                .with_interpolation(Interpolation::AntialiasingLinear)
                .with_padding(Padding::Gray),
        }
    }

    /// Preview preset: fit into 1024x1024 RGBA
    pub fn preview() -> Self {
        Self {
            width: 1024,
            height: 1024,
            color: ColorSpace::Rgba,
            config: ThumbnailConfig::default().with_interpolation(Interpolation::Lanczos),
        }
    }
}
