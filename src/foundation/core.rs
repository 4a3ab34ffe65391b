use std::fmt;

use crate::foundation::error::{ScrollweaveError, ScrollweaveResult};

pub use kurbo::{Point, Rect, Vec2};

/// Stable handle to a rendered element.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a handle from any string-like key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the underlying key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Rendered box of an element at query time, in viewport coordinates.
///
/// Never cached across frames: fonts, breakpoints and reflow can move it between two queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometrySnapshot {
    /// Left edge relative to the viewport.
    pub left: f64,
    /// Top edge relative to the viewport.
    pub top: f64,
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
}

impl GeometrySnapshot {
    /// Create a snapshot from edges and size.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a kurbo rectangle.
    pub fn from_rect(r: Rect) -> Self {
        Self::new(r.x0, r.y0, r.width(), r.height())
    }

    /// As a kurbo rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }

    /// Bottom edge.
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    /// Right edge.
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    /// Box center.
    pub fn center(self) -> Point {
        self.rect().center()
    }

    /// Whether the element currently occupies no area (e.g. `display: none`).
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Visible viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport.
    pub fn new(width: f64, height: f64) -> ScrollweaveResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ScrollweaveError::validation(
                "viewport width/height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Full-viewport box anchored at the origin.
    pub fn rect(self) -> GeometrySnapshot {
        GeometrySnapshot::new(0.0, 0.0, self.width, self.height)
    }
}

/// Size pair used for configured element dimensions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size2 {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
