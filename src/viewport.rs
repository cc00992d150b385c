//! Coordinate spaces: page units vs. screen pixels.
//!
//! Every pointer event arrives as a [`ScreenPoint`]; every piece of document
//! geometry is a [`PagePoint`] or page-unit scalar. The two types never mix
//! implicitly: crossing between them goes through [`Viewport::to_page`] or
//! [`Viewport::to_screen`].

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{PAGE_HEIGHT, PAGE_WIDTH};

/// A point in screen space (CSS pixels, relative to the page's top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another screen point, in pixels.
    #[must_use]
    pub fn distance(self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A point in page space (PDF points, independent of zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Convert a page-space scalar to screen space.
#[must_use]
pub fn to_screen(page: f64, scale: f64) -> f64 {
    page * scale
}

/// Convert a screen-space scalar to page space.
#[must_use]
pub fn to_page(screen: f64, scale: f64) -> f64 {
    screen / scale
}

/// Zoom state plus the fixed logical page size.
///
/// `scale` is always strictly positive; [`Viewport::set_scale`] ignores
/// anything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    pub page_width: f64,
    pub page_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, page_width: PAGE_WIDTH, page_height: PAGE_HEIGHT }
    }
}

impl Viewport {
    /// Build a viewport at the given scale. Non-positive or non-finite scales fall back to 1.0.
    #[must_use]
    pub fn new(scale: f64) -> Self {
        let mut viewport = Self::default();
        viewport.set_scale(scale);
        viewport
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Update the zoom factor. Returns `false` (and leaves the scale alone) for invalid input.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() || scale <= 0.0 {
            return false;
        }
        self.scale = scale;
        true
    }

    #[must_use]
    pub fn to_screen(&self, page: PagePoint) -> ScreenPoint {
        ScreenPoint { x: to_screen(page.x, self.scale), y: to_screen(page.y, self.scale) }
    }

    #[must_use]
    pub fn to_page(&self, screen: ScreenPoint) -> PagePoint {
        PagePoint { x: to_page(screen.x, self.scale), y: to_page(screen.y, self.scale) }
    }

    /// Convert a screen-space length (pixels) to page units.
    #[must_use]
    pub fn screen_len_to_page(&self, screen_len: f64) -> f64 {
        to_page(screen_len, self.scale)
    }

    /// Snap tolerance in page units for a threshold expressed in screen pixels.
    #[must_use]
    pub fn snap_tolerance(&self, threshold_px: f64) -> f64 {
        self.screen_len_to_page(threshold_px)
    }

    /// Clamp a vertical guide position (an x value) to the page.
    #[must_use]
    pub fn clamp_x(&self, x: f64) -> f64 {
        x.clamp(0.0, self.page_width)
    }

    /// Clamp a horizontal guide position (a y value) to the page.
    #[must_use]
    pub fn clamp_y(&self, y: f64) -> f64 {
        y.clamp(0.0, self.page_height)
    }
}
