// src/engine/geometry.rs
//
// Sizes, rectangles and proportional fit calculations.

use crate::error::{ResizeError, Result};

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Half-open rectangle `[min, max)`. `max >= min` holds component-wise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    min: Point,
    max: Point,
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Result<Self> {
        if max.x < min.x || max.y < min.y {
            return Err(ResizeError::invalid_geometry(
                format!("rectangle ({},{})-({},{})", min.x, min.y, max.x, max.y),
                max.x as u64,
                max.y as u64,
            ));
        }
        Ok(Self { min, max })
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Result<Self> {
        let max_x = origin.x.checked_add(size.width);
        let max_y = origin.y.checked_add(size.height);
        match (max_x, max_y) {
            (Some(x), Some(y)) => Ok(Self {
                min: origin,
                max: Point::new(x, y),
            }),
            _ => Err(ResizeError::invalid_geometry(
                "rectangle origin + size",
                size.width as u64,
                size.height as u64,
            )),
        }
    }

    /// Rectangle covering a whole image of `size`, anchored at the origin.
    pub const fn of_size(size: Size) -> Self {
        Self {
            min: Point::new(0, 0),
            max: Point::new(size.width, size.height),
        }
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn width(&self) -> u32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> u32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// True when the rectangle lies inside `[0, size)`.
    pub fn fits_within(&self, size: Size) -> bool {
        self.max.x <= size.width && self.max.y <= size.height
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}

/// Largest size with the aspect ratio of `src` that fits inside `bbox`
/// ("contain"). One dimension equals the box, neither is ever zero.
///
/// The comparison is strict, so equal ratios take the height-bound branch.
pub fn largest_inner_fit(src: Size, bbox: Size) -> Size {
    proportional_fit(src, bbox, |by_width, by_height| by_width < by_height)
}

/// Smallest size with the aspect ratio of `src` that covers `bbox`
/// ("cover"). One dimension equals the box, the other may exceed it.
pub fn smallest_outer_fit(src: Size, bbox: Size) -> Size {
    proportional_fit(src, bbox, |by_width, by_height| by_width > by_height)
}

fn proportional_fit(src: Size, bbox: Size, width_binds: impl Fn(f64, f64) -> bool) -> Size {
    let (src_w, src_h) = (src.width as f64, src.height as f64);
    let (box_w, box_h) = (bbox.width as f64, bbox.height as f64);

    if width_binds(box_w / src_w, box_h / src_h) {
        let height = (src_h * box_w / src_w).round() as u32;
        Size::new(bbox.width, height.max(1))
    } else {
        let width = (src_w * box_h / src_h).round() as u32;
        Size::new(width.max(1), bbox.height)
    }
}

/// Byte offset of the top-left corner of `inner` when centered in `outer`.
///
/// Uses floor division, so an odd leftover puts the extra pixel on the
/// right/bottom.
pub fn centered_offset(outer: Size, inner: Size, channels: usize, stride: usize) -> usize {
    let dx = (outer.width.saturating_sub(inner.width) / 2) as usize;
    let dy = (outer.height.saturating_sub(inner.height) / 2) as usize;
    channels * dx + stride * dy
}
