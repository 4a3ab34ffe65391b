use crate::{
    animation::value::{Property, StyleValue},
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    scroll::frame::FrameCtx,
    scroll::sink::WriteBatch,
};

/// How progress reaches dependents.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Scrub {
    /// 1:1 with scroll position.
    Direct,
    /// Exponential lag: the visual value closes ~63% of the gap every `lag_ms`.
    Smooth {
        /// Time constant in milliseconds.
        lag_ms: f64,
    },
}

/// Trigger behavior variants sharing one update path.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TriggerKind {
    /// Scroll-linked progress.
    Scrubbed(Scrub),
    /// Scroll-linked progress; the trigger element is held on screen for the whole range.
    Pinned(Scrub),
    /// Only reports entering/leaving the range.
    Toggle,
}

impl TriggerKind {
    fn scrub(self) -> Option<Scrub> {
        match self {
            Self::Scrubbed(s) | Self::Pinned(s) => Some(s),
            Self::Toggle => None,
        }
    }

    /// Whether this trigger pins its element.
    pub fn pins(self) -> bool {
        matches!(self, Self::Pinned(_))
    }
}

/// Declarative scroll position.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ScrollRule {
    /// The point at fraction `element` of the trigger's height meets the line at fraction
    /// `viewport` of the viewport height.
    Edges {
        /// 0 = trigger top, 1 = trigger bottom.
        element: f64,
        /// 0 = viewport top, 1 = viewport bottom.
        viewport: f64,
    },
    /// The trigger's `element` fraction point meets the `other_edge` fraction line of another
    /// (viewport-fixed) element.
    MeetsElement {
        /// 0 = trigger top, 1 = trigger bottom.
        element: f64,
        /// Element providing the line.
        other: ElementId,
        /// 0 = other's top, 1 = other's bottom.
        other_edge: f64,
    },
    /// `viewports` viewport-heights after the resolved start. Only valid as an end rule.
    AfterStart {
        /// Distance in viewport heights.
        viewports: f64,
    },
    /// Absolute scroll offset.
    Absolute(f64),
}

impl ScrollRule {
    /// Trigger top meets viewport top.
    pub fn top_top() -> Self {
        Self::Edges {
            element: 0.0,
            viewport: 0.0,
        }
    }

    /// Trigger bottom meets viewport bottom.
    pub fn bottom_bottom() -> Self {
        Self::Edges {
            element: 1.0,
            viewport: 1.0,
        }
    }

    /// Trigger bottom meets viewport top (trigger fully scrolled past).
    pub fn bottom_top() -> Self {
        Self::Edges {
            element: 1.0,
            viewport: 0.0,
        }
    }

    /// Trigger top meets the line at `fraction` of the viewport.
    pub fn top_at(fraction: f64) -> Self {
        Self::Edges {
            element: 0.0,
            viewport: fraction,
        }
    }

    /// `viewports` viewport-heights after start.
    pub fn after_start(viewports: f64) -> Self {
        Self::AfterStart { viewports }
    }
}

/// Inputs of a [`ScrollTrigger`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerSpec {
    /// Element whose position defines the range (and which gets pinned).
    pub trigger: ElementId,
    /// Scrolling container.
    pub container: ElementId,
    /// Range start.
    pub start: ScrollRule,
    /// Range end.
    pub end: ScrollRule,
    /// Behavior.
    pub kind: TriggerKind,
}

/// Resolved scroll range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollBounds {
    /// Scroll offset where progress starts.
    pub start: f64,
    /// Scroll offset where progress reaches 1.
    pub end: f64,
}

impl ScrollBounds {
    /// Range length in pixels.
    pub fn len(self) -> f64 {
        self.end - self.start
    }

    /// Whether the range has zero length.
    pub fn is_degenerate(self) -> bool {
        self.len() <= 0.0
    }

    /// Progress at `scroll`, derived from nothing but the bounds.
    ///
    /// A zero-length range is binary: 0 before start, 1 at or after it.
    pub fn progress_at(self, scroll: f64) -> f64 {
        if self.is_degenerate() {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / self.len()).clamp(0.0, 1.0)
    }

    /// Whether `scroll` lies inside the range.
    pub fn contains(self, scroll: f64) -> bool {
        if self.is_degenerate() {
            scroll >= self.start
        } else {
            self.start <= scroll && scroll <= self.end
        }
    }
}

/// Result of one trigger update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerUpdate {
    /// Raw progress from the live scroll position.
    pub progress: f64,
    /// Progress after scrub smoothing (equal to `progress` for direct scrub).
    pub visual: f64,
    /// Scroll position is inside the range.
    pub active: bool,
    /// Scroll position differs from the previous update.
    pub scroll_moved: bool,
    /// `Some(active)` when the range was entered or left on this update.
    pub toggled: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PinState {
    Before,
    Pinned,
    After,
}

/// Scroll-progress binder.
#[derive(Debug)]
pub struct ScrollTrigger {
    spec: TriggerSpec,
    bounds: Option<ScrollBounds>,
    doc_top: f64,
    last_emitted: Option<f64>,
    last_scroll: Option<f64>,
    last_frame_ms: Option<f64>,
    visual: f64,
    active: bool,
    pin_applied: Option<(PinState, f64)>,
    spacing: Option<f64>,
    disposed: bool,
}

impl ScrollTrigger {
    /// Resolve `spec` against live layout. Pinned triggers queue their pin writes into `batch`.
    pub fn new(
        spec: TriggerSpec,
        ctx: &FrameCtx<'_>,
        batch: &mut WriteBatch,
    ) -> ScrollweaveResult<Self> {
        if matches!(spec.start, ScrollRule::AfterStart { .. }) {
            return Err(ScrollweaveError::trigger(format!(
                "start rule of '{}' cannot be relative to itself",
                spec.trigger
            )));
        }
        let mut trigger = Self {
            spec,
            bounds: None,
            doc_top: 0.0,
            last_emitted: None,
            last_scroll: None,
            last_frame_ms: None,
            visual: 0.0,
            active: false,
            pin_applied: None,
            spacing: None,
            disposed: false,
        };
        let bounds = trigger.resolve(ctx)?;
        if trigger.spec.kind.pins()
            && let Some(scroll) = ctx.geometry.scroll_y(&trigger.spec.container)
        {
            trigger.apply_pin(scroll, bounds, batch);
        }
        Ok(trigger)
    }

    /// Trigger inputs.
    pub fn spec(&self) -> &TriggerSpec {
        &self.spec
    }

    /// Resolved bounds, if measurement has succeeded at least once.
    pub fn bounds(&self) -> Option<ScrollBounds> {
        self.bounds
    }

    /// Pure progress at `scroll` (0 until bounds are resolved).
    pub fn progress_at(&self, scroll: f64) -> f64 {
        self.bounds.map_or(0.0, |b| b.progress_at(scroll))
    }

    /// Whether the trigger element is currently held fixed.
    pub fn is_pinned(&self) -> bool {
        matches!(self.pin_applied, Some((PinState::Pinned, _)))
    }

    /// Whether the last update was inside the range.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn resolve(&mut self, ctx: &FrameCtx<'_>) -> ScrollweaveResult<ScrollBounds> {
        let g = ctx.geometry;
        let snap = g
            .measure(&self.spec.trigger)
            .ok_or_else(|| ScrollweaveError::detached(self.spec.trigger.to_string()))?;
        let scroll = g
            .scroll_y(&self.spec.container)
            .ok_or_else(|| ScrollweaveError::detached(self.spec.container.to_string()))?;
        let vh = g.viewport().height;
        let doc_top = snap.top + scroll;

        let point = |rule: &ScrollRule, start: Option<f64>| -> ScrollweaveResult<f64> {
            match rule {
                ScrollRule::Edges { element, viewport } => {
                    Ok(doc_top + element * snap.height - viewport * vh)
                }
                ScrollRule::MeetsElement {
                    element,
                    other,
                    other_edge,
                } => {
                    let o = g
                        .measure(other)
                        .ok_or_else(|| ScrollweaveError::detached(other.to_string()))?;
                    Ok(doc_top + element * snap.height - (o.top + other_edge * o.height))
                }
                ScrollRule::AfterStart { viewports } => start
                    .map(|s| s + viewports * vh)
                    .ok_or_else(|| ScrollweaveError::trigger("AfterStart used as start rule")),
                ScrollRule::Absolute(px) => Ok(*px),
            }
        };

        let start = point(&self.spec.start, None)?;
        let mut end = point(&self.spec.end, Some(start))?;
        if end < start {
            tracing::debug!(
                element = %self.spec.trigger,
                start,
                end,
                "end resolved before start; treating range as degenerate"
            );
            end = start;
        }

        let bounds = ScrollBounds { start, end };
        self.bounds = Some(bounds);
        self.doc_top = doc_top;
        Ok(bounds)
    }

    /// Re-measure bounds and re-apply pin state. Re-pinning an already pinned element is a no-op.
    pub fn refresh(&mut self, ctx: &FrameCtx<'_>, batch: &mut WriteBatch) {
        if self.disposed {
            return;
        }
        let bounds = match self.resolve(ctx) {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(element = %self.spec.trigger, error = %e, "refresh skipped");
                return;
            }
        };
        // Forces the next update to emit even if progress did not change.
        self.last_emitted = None;
        if self.spec.kind.pins()
            && let Some(scroll) = ctx.geometry.scroll_y(&self.spec.container)
        {
            self.apply_pin(scroll, bounds, batch);
        }
    }

    /// Compute progress from the live scroll position.
    ///
    /// Returns `None` when the scroll position did not move (and no smoothing is in flight),
    /// when it is outside the range and the boundary value was already emitted, or when the
    /// trigger or container is detached.
    pub fn update(&mut self, ctx: &FrameCtx<'_>, batch: &mut WriteBatch) -> Option<TriggerUpdate> {
        if self.disposed {
            return None;
        }
        let g = ctx.geometry;
        if !g.is_attached(&self.spec.trigger) {
            tracing::debug!(element = %self.spec.trigger, "trigger detached; skipping");
            return None;
        }
        let Some(scroll) = g.scroll_y(&self.spec.container) else {
            tracing::debug!(element = %self.spec.container, "container detached; skipping");
            return None;
        };
        let bounds = match self.bounds {
            Some(b) => b,
            None => self.resolve(ctx).ok()?,
        };

        let raw = bounds.progress_at(scroll);
        let eps = ctx.config.boundary_epsilon_px;
        let within = scroll >= bounds.start - eps && scroll <= bounds.end + eps;

        let dt = self
            .last_frame_ms
            .map_or(0.0, |t| (ctx.now_ms - t).max(0.0));
        self.last_frame_ms = Some(ctx.now_ms);

        let prev_visual = self.visual;
        self.visual = match self.spec.kind.scrub() {
            Some(Scrub::Smooth { lag_ms }) if lag_ms > 0.0 && self.last_emitted.is_some() => {
                let alpha = 1.0 - (-dt / lag_ms).exp();
                let v = prev_visual + (raw - prev_visual) * alpha;
                if (raw - v).abs() < ctx.config.scrub_settle_epsilon {
                    raw
                } else {
                    v
                }
            }
            _ => raw,
        };

        let scroll_moved = self
            .last_scroll
            .is_none_or(|s| (s - scroll).abs() > f64::EPSILON);
        let active = bounds.contains(scroll);
        // Crossing a boundary always emits, even when clamped progress is unchanged.
        let crossed = active != self.active;
        let fresh = (within && scroll_moved) || crossed || self.last_emitted != Some(raw);
        let settling = self.visual != prev_visual;
        if !fresh && !settling {
            return None;
        }

        let toggled = (active != self.active || self.last_emitted.is_none()).then_some(active);
        self.active = active;

        if self.spec.kind.pins() {
            self.apply_pin(scroll, bounds, batch);
        }

        self.last_scroll = Some(scroll);
        self.last_emitted = Some(raw);

        Some(TriggerUpdate {
            progress: raw,
            visual: self.visual,
            active,
            scroll_moved,
            toggled,
        })
    }

    /// Whether the smoothed visual value still trails raw progress.
    pub fn is_settling(&self) -> bool {
        self.last_emitted.is_some_and(|raw| raw != self.visual)
    }

    fn apply_pin(&mut self, scroll: f64, bounds: ScrollBounds, batch: &mut WriteBatch) {
        let id = &self.spec.trigger;
        let spacing = bounds.len().max(0.0);
        if self.spacing != Some(spacing) {
            batch.push(id, Property::PinSpacing, StyleValue::Px(spacing));
            self.spacing = Some(spacing);
        }

        let desired = if scroll < bounds.start {
            (PinState::Before, 0.0)
        } else if scroll > bounds.end {
            (PinState::After, spacing)
        } else {
            (PinState::Pinned, self.doc_top - bounds.start)
        };
        if self.pin_applied == Some(desired) {
            return;
        }

        let (state, top) = desired;
        let position = match state {
            PinState::Pinned => "fixed",
            PinState::Before | PinState::After => "relative",
        };
        batch.push(id, Property::Position, StyleValue::token(position));
        batch.push(id, Property::Top, StyleValue::Px(top));
        tracing::trace!(element = %id, ?state, top, "pin state");
        self.pin_applied = Some(desired);
    }

    /// Stop reacting to scroll and release any pin back to normal flow. Idempotent.
    ///
    /// Properties written by timelines are left untouched.
    pub fn dispose(&mut self, batch: &mut WriteBatch) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if self.spacing.take().is_some() || self.pin_applied.is_some() {
            let id = &self.spec.trigger;
            batch.push(id, Property::Position, StyleValue::token("static"));
            batch.push(id, Property::Top, StyleValue::Px(0.0));
            batch.push(id, Property::PinSpacing, StyleValue::Px(0.0));
        }
        self.pin_applied = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/trigger.rs"]
mod tests;
