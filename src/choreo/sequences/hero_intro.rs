//! One-shot load animation: the compact pill grows to cover the viewport, then the background
//! video and the name/title labels are revealed. Scroll stays locked until it completes.

use crate::{
    animation::ease::Ease,
    animation::timeline::{SegmentDef, TimeOffset, Timeline, TimelineBuilder},
    animation::value::{Property, StyleValue},
    choreo::composition::{Composition, Drive, SequenceName},
    choreo::reduced::FinalState,
    choreo::sequences::{HeroRefs, OVERLAY_OPACITY, num, px, require, require_container},
    foundation::core::ElementId,
    foundation::error::ScrollweaveResult,
    scroll::frame::FrameCtx,
    scroll::sink::WriteBatch,
};

const NAME: SequenceName = SequenceName::HeroIntro;

/// Radius of the compact pill (fully rounded).
const PILL_RADIUS: f64 = 999.0;
/// Radius the corners pass through while the pill expands.
const MID_RADIUS: f64 = 32.0;
const LABEL_RISE: f64 = 40.0;

const LOCKED: &str = "locked";
const UNLOCKED: &str = "unlocked";

struct Els<'a> {
    container: &'a ElementId,
    pill: &'a ElementId,
    pill_label: &'a ElementId,
    video: &'a ElementId,
    overlay: &'a ElementId,
    name: &'a ElementId,
    title: &'a ElementId,
}

fn resolve<'a>(refs: &'a HeroRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Els<'a>> {
    let g = ctx.geometry;
    Ok(Els {
        container: require_container(NAME, &refs.container, g)?,
        pill: require(NAME, "pill", &refs.pill, g)?,
        pill_label: require(NAME, "pill_label", &refs.pill_label, g)?,
        video: require(NAME, "video", &refs.video, g)?,
        overlay: require(NAME, "overlay", &refs.overlay, g)?,
        name: require(NAME, "name_label", &refs.name_label, g)?,
        title: require(NAME, "title_label", &refs.title_label, g)?,
    })
}

/// The intro timeline, in seconds.
pub fn timeline(refs: &HeroRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Timeline> {
    let els = resolve(refs, ctx)?;
    build(&els, ctx)
}

fn build(els: &Els<'_>, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Timeline> {
    let vp = ctx.geometry.viewport();
    // `require` already checked the pill is attached.
    let compact = ctx.geometry.measure(els.pill).unwrap_or_default();

    TimelineBuilder::new(NAME.as_str())
        .add(
            SegmentDef::set(els.container.clone())
                .from_to(
                    Property::ScrollLock,
                    StyleValue::token(UNLOCKED),
                    StyleValue::token(LOCKED),
                )
                .at(TimeOffset::At(0.0)),
        )
        .label("expand", TimeOffset::At(0.4))
        .add(
            SegmentDef::new(els.pill_label.clone(), 0.3)
                .from_to(Property::Opacity, num(1.0), num(0.0))
                .ease(Ease::OutQuad)
                .at(TimeOffset::label("expand")),
        )
        .add(
            SegmentDef::new(els.pill.clone(), 1.2)
                .from_to(Property::Width, px(compact.width), px(vp.width))
                .from_to(Property::Height, px(compact.height), px(vp.height))
                .from_to(Property::Left, px(compact.left), px(0.0))
                .from_to(Property::Top, px(compact.top), px(0.0))
                .ease(Ease::InOutQuart)
                .at(TimeOffset::label("expand")),
        )
        .add(
            SegmentDef::new(els.pill.clone(), 0.6)
                .from_to(Property::BorderRadius, px(PILL_RADIUS), px(MID_RADIUS))
                .ease(Ease::OutQuad)
                .at(TimeOffset::label("expand")),
        )
        .add(
            SegmentDef::new(els.pill.clone(), 0.6)
                .to(Property::BorderRadius, px(0.0))
                .ease(Ease::InOutQuad),
        )
        .label("reveal", TimeOffset::label_plus("expand", 1.2))
        .add(
            SegmentDef::new(els.video.clone(), 0.8)
                .from_to(Property::Opacity, num(0.0), num(1.0))
                .ease(Ease::OutQuad)
                .at(TimeOffset::label("reveal")),
        )
        .add(
            SegmentDef::new(els.overlay.clone(), 0.8)
                .from_to(Property::Opacity, num(0.0), num(OVERLAY_OPACITY))
                .ease(Ease::OutQuad)
                .at(TimeOffset::WithPrevious(0.0)),
        )
        .stagger(
            &[els.name.clone(), els.title.clone()],
            0.15,
            TimeOffset::label_plus("reveal", 0.3),
            |id| {
                SegmentDef::new(id.clone(), 0.7)
                    .from_to(Property::Y, px(LABEL_RISE), px(0.0))
                    .from_to(Property::Opacity, num(0.0), num(1.0))
                    .ease(Ease::OutCubic)
            },
        )
        .label("settled", TimeOffset::AfterPrevious(0.0))
        .add(
            SegmentDef::set(els.container.clone())
                .to(Property::ScrollLock, StyleValue::token(UNLOCKED))
                .at(TimeOffset::label("settled")),
        )
        .build()
}

/// Build the intro; playback starts at `ctx.now_ms`.
#[tracing::instrument(skip_all, fields(sequence = %NAME))]
pub fn compose(
    refs: &HeroRefs,
    ctx: &FrameCtx<'_>,
    _batch: &mut WriteBatch,
) -> ScrollweaveResult<Composition> {
    let els = resolve(refs, ctx)?;
    let timeline = build(&els, ctx)?;
    let cue = timeline.label_progress("reveal").unwrap_or(1.0);
    let duration_ms = timeline.duration() * 1000.0 / ctx.config.intro_speed;

    let mut c = Composition::new(NAME);
    let b = c.bind(timeline, Drive::Playhead);
    c.cue_media(els.video.clone(), b, cue);
    c.play(ctx.now_ms, duration_ms);
    tracing::debug!(duration_ms, "intro composed");
    Ok(c)
}

/// Expanded pill, revealed video and labels, scroll unlocked.
pub fn final_state(refs: &HeroRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<FinalState> {
    let els = resolve(refs, ctx)?;
    let vp = ctx.geometry.viewport();
    let mut state = FinalState::new(NAME)
        .set(
            els.container,
            Property::ScrollLock,
            StyleValue::token(UNLOCKED),
        )
        .set(els.pill_label, Property::Opacity, num(0.0))
        .set(els.pill, Property::Width, px(vp.width))
        .set(els.pill, Property::Height, px(vp.height))
        .set(els.pill, Property::Left, px(0.0))
        .set(els.pill, Property::Top, px(0.0))
        .set(els.pill, Property::BorderRadius, px(0.0))
        .set(els.video, Property::Opacity, num(1.0))
        .set(els.overlay, Property::Opacity, num(OVERLAY_OPACITY))
        .start_media(els.video);
    for label in [els.name, els.title] {
        state = state
            .set(label, Property::Y, px(0.0))
            .set(label, Property::Opacity, num(1.0));
    }
    Ok(state)
}

#[cfg(test)]
#[path = "../../../tests/unit/choreo/sequences/hero_intro.rs"]
mod tests;
