use crate::{
    animation::ease::Ease,
    animation::tween::EasedTween,
    animation::value::{Property, StyleValue},
    foundation::core::{ElementId, Point},
    scroll::anchors::pill_dock_target,
    scroll::frame::FrameCtx,
    scroll::sink::WriteBatch,
};

/// What a reconciliation did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReconcileOutcome {
    /// Drift below tolerance; nothing written.
    Skipped,
    /// Idle: position written instantly.
    Jumped(Point),
    /// Active scroll: an eased position command toward the target was started.
    Eased(Point),
}

impl ReconcileOutcome {
    /// Whether a position command was issued.
    pub fn wrote(self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

/// Second control loop keeping an element locked onto a live layout target.
///
/// The scrub timeline owns size and appearance; this owns `Left`/`Top` of the same element.
/// While scroll is active it eases toward the target, while idle (e.g. a resize with a static
/// scroll position) it jumps, which a single scrubbed timeline cannot express.
#[derive(Clone, Debug)]
pub struct SyncController {
    target: ElementId,
    origin: Point,
    progress_ease: Ease,
    tolerance_px: f64,
    ease_ms: f64,
    command_ease: Ease,
    last_applied: Option<Point>,
    displayed: Option<Point>,
    tween: Option<EasedTween<Point>>,
}

impl SyncController {
    /// Controller moving `target` from `origin` (progress 0) to the dock slot (progress 1),
    /// shaped by `progress_ease`.
    pub fn new(target: ElementId, origin: Point, progress_ease: Ease, ctx: &FrameCtx<'_>) -> Self {
        Self {
            target,
            origin,
            progress_ease,
            tolerance_px: ctx.config.sync_tolerance_px,
            ease_ms: ctx.config.sync_ease_ms,
            command_ease: ctx.config.sync_ease,
            last_applied: None,
            displayed: None,
            tween: None,
        }
    }

    /// Override the noise threshold.
    pub fn with_tolerance(mut self, tolerance_px: f64) -> Self {
        self.tolerance_px = tolerance_px;
        self
    }

    /// Element being positioned.
    pub fn target(&self) -> &ElementId {
        &self.target
    }

    /// Last target a command was issued for.
    pub fn last_applied(&self) -> Option<Point> {
        self.last_applied
    }

    /// Whether an eased command is still running.
    pub fn is_easing(&self) -> bool {
        self.tween.is_some()
    }

    /// Desired top-left at `progress`, from live layout.
    pub fn desired(&self, ctx: &FrameCtx<'_>, progress: f64) -> Point {
        let dock = pill_dock_target(ctx.geometry, ctx.config).top_left();
        self.origin
            .lerp(dock, self.progress_ease.apply(progress.clamp(0.0, 1.0)))
    }

    /// Compare the live target with the last applied one and issue at most one position command.
    pub fn reconcile(
        &mut self,
        ctx: &FrameCtx<'_>,
        progress: f64,
        active: bool,
        batch: &mut WriteBatch,
    ) -> ReconcileOutcome {
        let want = self.desired(ctx, progress);
        if let Some(last) = self.last_applied
            && (want.x - last.x).abs() < self.tolerance_px
            && (want.y - last.y).abs() < self.tolerance_px
        {
            return ReconcileOutcome::Skipped;
        }
        self.last_applied = Some(want);

        if active && self.ease_ms > 0.0 {
            let tween = match self.tween {
                Some(mut t) => {
                    t.retarget(ctx.now_ms, want, self.ease_ms);
                    t
                }
                None => EasedTween::new(
                    self.displayed.unwrap_or(want),
                    want,
                    ctx.now_ms,
                    self.ease_ms,
                    self.command_ease,
                ),
            };
            self.tween = Some(tween);
            self.write(tween.sample(ctx.now_ms), batch);
            ReconcileOutcome::Eased(want)
        } else {
            self.tween = None;
            self.write(want, batch);
            ReconcileOutcome::Jumped(want)
        }
    }

    /// Step an in-flight eased command. Returns `true` while still easing.
    pub fn advance(&mut self, now_ms: f64, batch: &mut WriteBatch) -> bool {
        let Some(tween) = self.tween else {
            return false;
        };
        self.write(tween.sample(now_ms), batch);
        if tween.is_done(now_ms) {
            self.tween = None;
            return false;
        }
        true
    }

    /// Drop any in-flight command where it stands.
    pub fn cancel(&mut self) {
        self.tween = None;
    }

    fn write(&mut self, at: Point, batch: &mut WriteBatch) {
        batch.push(&self.target, Property::Left, StyleValue::Px(at.x));
        batch.push(&self.target, Property::Top, StyleValue::Px(at.y));
        self.displayed = Some(at);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/choreo/sync.rs"]
mod tests;
