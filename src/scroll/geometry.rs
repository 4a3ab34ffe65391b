use std::collections::BTreeMap;

use crate::foundation::{
    core::{ElementId, GeometrySnapshot, Point, Viewport},
    error::{ScrollweaveError, ScrollweaveResult},
};

/// Read-only layout queries.
///
/// Implementations must answer from live layout: the engine never caches a snapshot across frames.
/// `measure` reports an element's in-flow box (for a pinned element, the box of the space it
/// reserves), and returns `None` once the element is detached from the render tree.
pub trait GeometryProvider {
    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Scroll offset of `container`, or `None` if it is detached.
    fn scroll_y(&self, container: &ElementId) -> Option<f64>;

    /// Viewport-relative box of `id`, or `None` if it is detached.
    fn measure(&self, id: &ElementId) -> Option<GeometrySnapshot>;

    /// Named layout anchor in viewport coordinates.
    fn query_layout_anchor(&self, name: &str) -> Option<Point>;

    /// Whether `id` is currently part of the render tree.
    fn is_attached(&self, id: &ElementId) -> bool {
        self.measure(id).is_some()
    }
}

/// One element in a [`SceneGeometry`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneElement {
    /// Document-space left edge.
    pub left: f64,
    /// Document-space top edge (viewport-space when `fixed`).
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Fixed elements do not move with scroll.
    #[serde(default)]
    pub fixed: bool,
}

impl SceneElement {
    /// In-flow element at document coordinates.
    pub fn flow(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            fixed: false,
        }
    }

    /// Viewport-fixed element.
    pub fn fixed(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            fixed: true,
            ..Self::flow(left, top, width, height)
        }
    }
}

/// In-memory layout model: a single scrolling document plus fixed overlays.
///
/// Used by the CLI and by tests; a browser binding would implement [`GeometryProvider`] over
/// real layout instead.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneGeometry {
    /// Viewport size.
    pub viewport: Viewport,
    /// Document scroll offset.
    #[serde(default)]
    pub scroll_y: f64,
    /// Id of the scrolling container.
    #[serde(default = "default_container")]
    pub container: ElementId,
    /// Laid-out elements.
    #[serde(default)]
    pub elements: BTreeMap<ElementId, SceneElement>,
    /// Explicit anchors (viewport coordinates).
    #[serde(default)]
    pub anchors: BTreeMap<String, Point>,
}

fn default_container() -> ElementId {
    ElementId::new("document")
}

impl SceneGeometry {
    /// Empty scene with the default `document` container.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll_y: 0.0,
            container: default_container(),
            elements: BTreeMap::new(),
            anchors: BTreeMap::new(),
        }
    }

    /// Parse and validate a JSON scene.
    pub fn from_json_str(s: &str) -> ScrollweaveResult<Self> {
        let scene: Self = serde_json::from_str(s)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Reject degenerate viewports and negative element sizes.
    pub fn validate(&self) -> ScrollweaveResult<()> {
        Viewport::new(self.viewport.width, self.viewport.height)?;
        if let Some((id, _)) = self
            .elements
            .iter()
            .find(|(_, e)| e.width < 0.0 || e.height < 0.0)
        {
            return Err(ScrollweaveError::validation(format!(
                "element '{id}' has negative size"
            )));
        }
        Ok(())
    }

    /// Builder-style element insertion.
    pub fn with(mut self, id: impl Into<ElementId>, el: SceneElement) -> Self {
        self.elements.insert(id.into(), el);
        self
    }

    /// Builder-style anchor insertion.
    pub fn with_anchor(mut self, name: impl Into<String>, at: Point) -> Self {
        self.anchors.insert(name.into(), at);
        self
    }

    /// Scroll the document.
    pub fn set_scroll(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Insert or move an element.
    pub fn insert(&mut self, id: impl Into<ElementId>, el: SceneElement) {
        self.elements.insert(id.into(), el);
    }

    /// Remove an element from the render tree.
    pub fn detach(&mut self, id: &ElementId) -> Option<SceneElement> {
        self.elements.remove(id)
    }

    /// Insert or move an anchor.
    pub fn set_anchor(&mut self, name: impl Into<String>, at: Point) {
        self.anchors.insert(name.into(), at);
    }
}

impl GeometryProvider for SceneGeometry {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_y(&self, container: &ElementId) -> Option<f64> {
        (*container == self.container || self.elements.contains_key(container))
            .then_some(self.scroll_y)
    }

    fn measure(&self, id: &ElementId) -> Option<GeometrySnapshot> {
        let el = self.elements.get(id)?;
        let top = if el.fixed {
            el.top
        } else {
            el.top - self.scroll_y
        };
        Some(GeometrySnapshot::new(el.left, top, el.width, el.height))
    }

    fn query_layout_anchor(&self, name: &str) -> Option<Point> {
        if let Some(p) = self.anchors.get(name) {
            return Some(*p);
        }
        // Anchors double as element ids: the element's live center.
        self.measure(&ElementId::new(name)).map(GeometrySnapshot::center)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/geometry.rs"]
mod tests;
