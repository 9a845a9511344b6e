// src/engine/api.rs
//
// Thumbnailer: JPEG bytes (or a mapped file) in, resized planes out.

use crate::engine::backend::{FirResampler, Resampler};
use crate::engine::buffer::Plane;
use crate::engine::decoder::{decode_jpeg, decode_jpeg_subsampled};
use crate::engine::geometry::Size;
use crate::engine::io::Source;
use crate::engine::pipeline::{resize_padded, resize_proportional, validate_box};
use crate::engine::planar::{resize_subsampled_image, SubsampledImage};
use crate::error::Result;
use crate::ops::{ColorSpace, Padding, PresetConfig, ThumbnailConfig};
use std::path::Path;
use tracing::debug;

/// Decodes JPEGs and resizes them into a bounding box.
///
/// Usage:
/// ```no_run
/// use planefit::{Padding, Size, Thumbnailer};
///
/// # fn run(jpeg: &[u8]) -> planefit::Result<()> {
/// let thumbnailer = Thumbnailer::new();
/// let thumb = thumbnailer.jpeg_to_rgb(jpeg, Size::new(200, 200), Padding::Gray)?;
/// assert_eq!(thumb.size, Size::new(200, 200));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Thumbnailer<R = FirResampler> {
    config: ThumbnailConfig,
    resampler: R,
}

impl Thumbnailer<FirResampler> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ThumbnailConfig) -> Self {
        Self::with_resampler(config, FirResampler::new())
    }

    /// Default configuration, with overrides from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_config(ThumbnailConfig::from_env()?))
    }
}

impl<R: Resampler> Thumbnailer<R> {
    pub fn with_resampler(config: ThumbnailConfig, resampler: R) -> Self {
        Self { config, resampler }
    }

    pub fn config(&self) -> &ThumbnailConfig {
        &self.config
    }

    pub fn resampler(&self) -> &R {
        &self.resampler
    }

    /// Decode and fit into `bbox` using the configured padding.
    pub fn thumbnail(&self, jpeg: &[u8], color: ColorSpace, bbox: Size) -> Result<Plane> {
        self.decode_and_fit(jpeg, color, bbox, self.config.padding)
    }

    pub fn jpeg_to_rgba(&self, jpeg: &[u8], bbox: Size, padding: Padding) -> Result<Plane> {
        self.decode_and_fit(jpeg, ColorSpace::Rgba, bbox, padding)
    }

    pub fn jpeg_to_rgb(&self, jpeg: &[u8], bbox: Size, padding: Padding) -> Result<Plane> {
        self.decode_and_fit(jpeg, ColorSpace::Rgb, bbox, padding)
    }

    pub fn jpeg_to_gray(&self, jpeg: &[u8], bbox: Size, padding: Padding) -> Result<Plane> {
        self.decode_and_fit(jpeg, ColorSpace::Gray, bbox, padding)
    }

    /// `side` x `side` RGBA, letterboxed.
    pub fn jpeg_to_square_rgba(&self, jpeg: &[u8], side: u32) -> Result<Plane> {
        self.jpeg_to_rgba(jpeg, Size::new(side, side), Padding::Gray)
    }

    pub fn jpeg_to_square_rgb(&self, jpeg: &[u8], side: u32) -> Result<Plane> {
        self.jpeg_to_rgb(jpeg, Size::new(side, side), Padding::Gray)
    }

    pub fn jpeg_to_square_gray(&self, jpeg: &[u8], side: u32) -> Result<Plane> {
        self.jpeg_to_gray(jpeg, Size::new(side, side), Padding::Gray)
    }

    /// Decode into Y/Cb/Cr planes and resize them so luma becomes `target`.
    ///
    /// Partial planes of a failed resize are dropped here; call
    /// `resize_subsampled_image` directly to keep them.
    pub fn jpeg_to_subsampled(&self, jpeg: &[u8], target: Size) -> Result<SubsampledImage> {
        validate_box(target)?;
        let hint = self.config.decode_scaling.then_some(target);
        let decoded = decode_jpeg_subsampled(jpeg, hint)?;
        debug!(
            decoded = %decoded.size(),
            ratio = %decoded.ratio,
            target = %target,
            "jpeg to subsampled planes"
        );
        Ok(resize_subsampled_image(
            &self.resampler,
            &decoded,
            target,
            self.config.interpolation,
        )?)
    }

    /// Fit into the preset's box, layout and padding. The preset's
    /// interpolation and decode scaling replace this thumbnailer's.
    pub fn apply_preset(&self, jpeg: &[u8], preset: &PresetConfig) -> Result<Plane> {
        let thumbnailer = Thumbnailer::with_resampler(preset.config.clone(), &self.resampler);
        thumbnailer.thumbnail(jpeg, preset.color, Size::new(preset.width, preset.height))
    }

    /// `thumbnail` over a memory-mapped file.
    pub fn thumbnail_file(
        &self,
        path: impl AsRef<Path>,
        color: ColorSpace,
        bbox: Size,
    ) -> Result<Plane> {
        let source = Source::open_mapped(path)?;
        self.thumbnail(source.as_bytes(), color, bbox)
    }

    /// `jpeg_to_subsampled` over a memory-mapped file.
    pub fn subsampled_file(&self, path: impl AsRef<Path>, target: Size) -> Result<SubsampledImage> {
        let source = Source::open_mapped(path)?;
        self.jpeg_to_subsampled(source.as_bytes(), target)
    }

    fn decode_and_fit(
        &self,
        jpeg: &[u8],
        color: ColorSpace,
        bbox: Size,
        padding: Padding,
    ) -> Result<Plane> {
        validate_box(bbox)?;
        let hint = self.config.decode_scaling.then_some(bbox);
        let decoded = decode_jpeg(jpeg, color, hint)?;
        debug!(
            decoded = %decoded.size,
            bbox = %bbox,
            ?padding,
            mode = %self.config.interpolation,
            "jpeg thumbnail"
        );

        let mode = self.config.interpolation;
        match padding {
            Padding::None => resize_proportional(&self.resampler, decoded.view(), bbox, mode),
            Padding::Gray => resize_padded(&self.resampler, decoded.view(), bbox, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::planar::SubsamplingRatio;
    use crate::engine::MAX_DIMENSION;
    use crate::error::ResizeError;
    use crate::ops::Interpolation;

    fn encode_jpeg(width: u32, height: u32, sampling: (u8, u8)) -> Vec<u8> {
        let pixels: Vec<u8> = (0..width * height)
            .flat_map(|i| [(i % 200) as u8, 80, 160])
            .collect();
        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(85.0);
        comp.set_color_space(mozjpeg::ColorSpace::JCS_YCbCr);
        comp.set_chroma_sampling_pixel_sizes(sampling, sampling);

        let mut output = Vec::new();
        {
            let mut writer = comp.start_compress(&mut output).unwrap();
            for row in pixels.chunks(width as usize * 3) {
                writer.write_scanlines(row).unwrap();
            }
            writer.finish().unwrap();
        }
        output
    }

    #[test]
    fn test_proportional_and_padded_sizes() {
        let jpeg = encode_jpeg(400, 200, (2, 2));
        let thumbnailer = Thumbnailer::new();

        let rgb = thumbnailer
            .jpeg_to_rgb(&jpeg, Size::new(100, 100), Padding::None)
            .unwrap();
        assert_eq!(rgb.size, Size::new(100, 50));
        assert_eq!(rgb.data.len(), 100 * 50 * 3);

        let rgba = thumbnailer
            .jpeg_to_rgba(&jpeg, Size::new(100, 100), Padding::Gray)
            .unwrap();
        assert_eq!(rgba.size, Size::new(100, 100));
        assert_eq!(rgba.pixel(0, 0), &[128, 128, 128, 128]);
        assert_eq!(rgba.pixel(99, 99), &[128, 128, 128, 128]);

        let gray = thumbnailer.jpeg_to_square_gray(&jpeg, 64).unwrap();
        assert_eq!(gray.size, Size::new(64, 64));
        assert_eq!(gray.channels, 1);
    }

    #[test]
    fn test_decode_scaling_does_not_change_output_size() {
        let jpeg = encode_jpeg(640, 480, (2, 2));
        let bbox = Size::new(90, 90);
        let scaled = Thumbnailer::new()
            .jpeg_to_rgb(&jpeg, bbox, Padding::None)
            .unwrap();
        let full = Thumbnailer::with_config(ThumbnailConfig::default().with_decode_scaling(false))
            .jpeg_to_rgb(&jpeg, bbox, Padding::None)
            .unwrap();
        assert_eq!(scaled.size, Size::new(90, 68));
        assert_eq!(scaled.size, full.size);
    }

    #[test]
    fn test_subsampled_target() {
        let jpeg = encode_jpeg(64, 48, (2, 2));
        let thumbnailer = Thumbnailer::with_config(
            ThumbnailConfig::default().with_interpolation(Interpolation::Linear),
        );
        let image = thumbnailer.jpeg_to_subsampled(&jpeg, Size::new(32, 24)).unwrap();
        assert_eq!(image.ratio, SubsamplingRatio::Ratio420);
        assert_eq!(image.y.size, Size::new(32, 24));
        assert_eq!(image.cb.size, Size::new(16, 12));
        assert_eq!(image.cr.size, Size::new(16, 12));

        let err = thumbnailer
            .jpeg_to_subsampled(&jpeg, Size::new(31, 24))
            .unwrap_err();
        assert!(matches!(err, ResizeError::UnalignedGeometry { .. }));
    }

    #[test]
    fn test_presets() {
        let jpeg = encode_jpeg(300, 600, (1, 1));
        let thumbnailer = Thumbnailer::new();

        let ml = thumbnailer
            .apply_preset(&jpeg, &PresetConfig::ml_input())
            .unwrap();
        assert_eq!(ml.size, Size::new(224, 224));
        assert_eq!(ml.channels, 3);

        let thumb = thumbnailer
            .apply_preset(&jpeg, &PresetConfig::get("thumbnail").unwrap())
            .unwrap();
        assert_eq!(thumb.size, Size::new(75, 150));
    }

    #[test]
    fn test_rejects_empty_box_and_bad_input() {
        let jpeg = encode_jpeg(16, 16, (1, 1));
        let thumbnailer = Thumbnailer::new();
        assert!(matches!(
            thumbnailer.jpeg_to_rgb(&jpeg, Size::new(0, 10), Padding::None),
            Err(ResizeError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            thumbnailer.jpeg_to_rgb(b"not a jpeg", Size::new(10, 10), Padding::None),
            Err(ResizeError::DecodeFailed { .. })
        ));
    }

    #[test]
    fn test_box_checked_before_decoding() {
        // undecodable input still reports the bad box
        let thumbnailer = Thumbnailer::new();
        assert!(matches!(
            thumbnailer.jpeg_to_gray(b"not a jpeg", Size::new(10, 0), Padding::Gray),
            Err(ResizeError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            thumbnailer.jpeg_to_subsampled(b"not a jpeg", Size::new(0, 8)),
            Err(ResizeError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            thumbnailer.jpeg_to_subsampled(b"not a jpeg", Size::new(MAX_DIMENSION + 2, 8)),
            Err(ResizeError::DimensionExceedsLimit { .. })
        ));
    }
}
