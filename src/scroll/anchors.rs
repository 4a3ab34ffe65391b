//! Layout-derived targets that depend on live measurement.

use crate::{
    foundation::config::EngineConfig,
    foundation::core::{Point, Size2},
    scroll::geometry::GeometryProvider,
};

/// Top margin used when the navigation row has not been laid out yet.
const NAV_FALLBACK_MARGIN_PX: f64 = 16.0;

/// Where the hero pill should land once docked into the navigation row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockTarget {
    /// Center of the docked pill, viewport coordinates.
    pub center: Point,
    /// Docked pill size.
    pub size: Size2,
}

impl DockTarget {
    /// Top-left corner of the docked pill.
    pub fn top_left(self) -> Point {
        top_left_for_center(self.center, self.size)
    }
}

/// Resolve the dock target from live layout.
///
/// Resolution order: the explicit dock anchor, then the center of the navigation row, then a
/// viewport-derived guess (horizontally centered, one margin below the top edge).
pub fn pill_dock_target(geometry: &dyn GeometryProvider, cfg: &EngineConfig) -> DockTarget {
    let size = cfg.nav_pill_size;
    let center = geometry
        .query_layout_anchor(&cfg.pill_dock_anchor)
        .or_else(|| geometry.query_layout_anchor(&cfg.nav_row_anchor))
        .unwrap_or_else(|| {
            let vp = geometry.viewport();
            Point::new(vp.width / 2.0, NAV_FALLBACK_MARGIN_PX + size.height / 2.0)
        });
    DockTarget { center, size }
}

/// Top-left corner of a box of `size` centered on `center`.
pub fn top_left_for_center(center: Point, size: Size2) -> Point {
    Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/anchors.rs"]
mod tests;
