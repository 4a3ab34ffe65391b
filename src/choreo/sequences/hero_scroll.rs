//! Scroll morph: with the hero pinned, the full-viewport pill shrinks into the navigation
//! button while its chrome appears and the video fades out.
//!
//! The timeline owns size and appearance. Position belongs to the sync controller, which
//! tracks the live dock slot so the pill lands on the navigation row at any layout.

use crate::{
    animation::ease::Ease,
    animation::timeline::{SegmentDef, TimeOffset, Timeline, TimelineBuilder},
    animation::value::{Property, StyleValue},
    choreo::composition::{Composition, Drive, SequenceName},
    choreo::reduced::FinalState,
    choreo::sequences::{HeroRefs, OVERLAY_OPACITY, num, px, require, require_container},
    choreo::sync::SyncController,
    foundation::core::{ElementId, Point},
    foundation::error::ScrollweaveResult,
    scroll::anchors::pill_dock_target,
    scroll::frame::FrameCtx,
    scroll::sink::WriteBatch,
    scroll::trigger::{ScrollRule, ScrollTrigger, Scrub, TriggerKind, TriggerSpec},
};

const NAME: SequenceName = SequenceName::HeroScroll;

/// Pin length in viewport heights.
pub const PIN_VIEWPORTS: f64 = 1.0;
/// Curve shared by the size tween and the position target so they stay in step.
pub const MORPH_EASE: Ease = Ease::InOutCubic;

const NAV_DROP: f64 = 16.0;
const SHADOW_NONE: &str = "none";
const SHADOW_DOCKED: &str = "nav-pill";

struct Els<'a> {
    container: &'a ElementId,
    section: &'a ElementId,
    pill: &'a ElementId,
    pill_content: &'a ElementId,
    video: &'a ElementId,
    overlay: &'a ElementId,
    nav_row: &'a ElementId,
}

fn resolve<'a>(refs: &'a HeroRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Els<'a>> {
    let g = ctx.geometry;
    Ok(Els {
        container: require_container(NAME, &refs.container, g)?,
        section: require(NAME, "section", &refs.section, g)?,
        pill: require(NAME, "pill", &refs.pill, g)?,
        pill_content: require(NAME, "pill_content", &refs.pill_content, g)?,
        video: require(NAME, "video", &refs.video, g)?,
        overlay: require(NAME, "overlay", &refs.overlay, g)?,
        nav_row: require(NAME, "nav_row", &refs.nav_row, g)?,
    })
}

fn build(els: &Els<'_>, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Timeline> {
    let vp = ctx.geometry.viewport();
    let docked = ctx.config.nav_pill_size;

    TimelineBuilder::new(NAME.as_str())
        .add(
            SegmentDef::new(els.pill.clone(), 1.0)
                .from_to(Property::Width, px(vp.width), px(docked.width))
                .from_to(Property::Height, px(vp.height), px(docked.height))
                .ease(MORPH_EASE)
                .at(TimeOffset::At(0.0)),
        )
        .add(
            SegmentDef::new(els.pill.clone(), 0.5)
                .from_to(Property::BorderRadius, px(0.0), px(docked.height / 2.0))
                .ease(Ease::OutQuad)
                .at(TimeOffset::At(0.0)),
        )
        .add(
            SegmentDef::new(els.video.clone(), 0.5)
                .from_to(Property::Opacity, num(1.0), num(0.0))
                .ease(Ease::InQuad)
                .at(TimeOffset::At(0.15)),
        )
        .add(
            SegmentDef::new(els.overlay.clone(), 0.5)
                .from_to(Property::Opacity, num(OVERLAY_OPACITY), num(0.0))
                .ease(Ease::InQuad)
                .at(TimeOffset::WithPrevious(0.0)),
        )
        .label("dock", TimeOffset::At(0.75))
        .add(
            SegmentDef::new(els.pill.clone(), 0.25)
                .from_to(Property::BorderWidth, px(0.0), px(1.0))
                .from_to(
                    Property::BoxShadow,
                    StyleValue::token(SHADOW_NONE),
                    StyleValue::token(SHADOW_DOCKED),
                )
                .at(TimeOffset::label("dock")),
        )
        .add(
            SegmentDef::new(els.pill_content.clone(), 0.25)
                .from_to(Property::Opacity, num(0.0), num(1.0))
                .at(TimeOffset::label("dock")),
        )
        .add(
            SegmentDef::new(els.nav_row.clone(), 0.25)
                .from_to(Property::Opacity, num(0.0), num(1.0))
                .from_to(Property::Y, px(-NAV_DROP), px(0.0))
                .ease(Ease::OutCubic)
                .at(TimeOffset::label("dock")),
        )
        .build()
}

/// The scroll-morph timeline (normalized to a one-second length).
pub fn timeline(refs: &HeroRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Timeline> {
    build(&resolve(refs, ctx)?, ctx)
}

#[tracing::instrument(skip_all, fields(sequence = %NAME))]
pub fn compose(
    refs: &HeroRefs,
    ctx: &FrameCtx<'_>,
    batch: &mut WriteBatch,
) -> ScrollweaveResult<Composition> {
    let els = resolve(refs, ctx)?;
    let timeline = build(&els, ctx)?;
    let trigger = ScrollTrigger::new(
        TriggerSpec {
            trigger: els.section.clone(),
            container: els.container.clone(),
            start: ScrollRule::top_top(),
            end: ScrollRule::after_start(PIN_VIEWPORTS),
            kind: TriggerKind::Pinned(Scrub::Direct),
        },
        ctx,
        batch,
    )?;

    let mut c = Composition::new(NAME);
    let t = c.add_trigger(trigger);
    c.bind(timeline, Drive::Trigger(t));
    c.sync_with(
        t,
        SyncController::new(els.pill.clone(), Point::ZERO, MORPH_EASE, ctx),
    );
    Ok(c)
}

/// Pill docked at its live slot with full chrome; video and overlay hidden.
pub fn final_state(refs: &HeroRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<FinalState> {
    let els = resolve(refs, ctx)?;
    let dock = pill_dock_target(ctx.geometry, ctx.config);
    let at = dock.top_left();
    Ok(FinalState::new(NAME)
        .set(els.pill, Property::Width, px(dock.size.width))
        .set(els.pill, Property::Height, px(dock.size.height))
        .set(els.pill, Property::Left, px(at.x))
        .set(els.pill, Property::Top, px(at.y))
        .set(els.pill, Property::BorderRadius, px(dock.size.height / 2.0))
        .set(els.pill, Property::BorderWidth, px(1.0))
        .set(
            els.pill,
            Property::BoxShadow,
            StyleValue::token(SHADOW_DOCKED),
        )
        .set(els.pill_content, Property::Opacity, num(1.0))
        .set(els.video, Property::Opacity, num(0.0))
        .set(els.overlay, Property::Opacity, num(0.0))
        .set(els.nav_row, Property::Opacity, num(1.0))
        .set(els.nav_row, Property::Y, px(0.0)))
}

#[cfg(test)]
#[path = "../../../tests/unit/choreo/sequences/hero_scroll.rs"]
mod tests;
