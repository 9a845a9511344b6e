// src/engine/io.rs
//
// Memory-mapped input files and header-only inspection.

use crate::engine::geometry::Size;
use crate::error::{ResizeError, Result};
use image::{ImageFormat, ImageReader};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Memory-mapped input file (zero-copy access)
#[derive(Clone, Debug)]
pub struct Source(Arc<Mmap>);

impl Source {
    /// Map `path` read-only.
    pub fn open_mapped(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().into_owned();
        let file =
            File::open(path).map_err(|e| ResizeError::file_read_failed(path_str.clone(), e))?;

        // Safety: the file is assumed not to be truncated or rewritten while
        // the mapping is alive.
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| ResizeError::mmap_failed(path_str.clone(), e))?;
        debug!(path = %path_str, len = mmap.len(), "mapped input file");
        Ok(Source(Arc::new(mmap)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// Dimensions and container format read from an image header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageHeader {
    pub size: Size,
    pub format: Option<ImageFormat>,
}

/// Read the header of an in-memory image without decoding pixels.
pub fn inspect_header_from_bytes(bytes: &[u8]) -> Result<ImageHeader> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ResizeError::decode_failed(format!("failed to guess format: {e}")))?;
    let format = reader.format();
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ResizeError::decode_failed(format!("failed to read header: {e}")))?;
    Ok(ImageHeader {
        size: Size::new(width, height),
        format,
    })
}

/// Read the header of an image file without decoding pixels.
pub fn inspect_header_from_path(path: impl AsRef<Path>) -> Result<ImageHeader> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().into_owned();
    let file = File::open(path).map_err(|e| ResizeError::file_read_failed(path_str.clone(), e))?;
    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| ResizeError::file_read_failed(path_str, e))?;
    let format = reader.format();
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ResizeError::decode_failed(format!("failed to read header: {e}")))?;
    Ok(ImageHeader {
        size: Size::new(width, height),
        format,
    })
}
