//! Cover section: a trailing section slides over a viewport-fixed element, which drops below
//! it in stacking order while covered; meanwhile two blocks drift apart in parallax with the
//! section pinned.

use crate::{
    animation::ease::Ease,
    animation::timeline::{SegmentDef, TimeOffset, Timeline, TimelineBuilder},
    animation::value::{Property, StyleWrite},
    choreo::composition::{Composition, Drive, SequenceName},
    choreo::reduced::FinalState,
    choreo::sequences::{CoverRefs, num, px, require, require_container},
    foundation::core::ElementId,
    foundation::error::ScrollweaveResult,
    scroll::frame::FrameCtx,
    scroll::sink::WriteBatch,
    scroll::trigger::{ScrollRule, ScrollTrigger, Scrub, TriggerKind, TriggerSpec},
};

const NAME: SequenceName = SequenceName::Cover;

/// Stacking order of the floating element while covered.
pub const COVERED_Z: f64 = 1.0;
/// Stacking order of the floating element otherwise.
pub const UNCOVERED_Z: f64 = 40.0;

struct Els<'a> {
    container: &'a ElementId,
    section: &'a ElementId,
    floating: &'a ElementId,
    trailing: &'a ElementId,
    block_a: &'a ElementId,
    block_b: &'a ElementId,
}

fn resolve<'a>(refs: &'a CoverRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Els<'a>> {
    let g = ctx.geometry;
    Ok(Els {
        container: require_container(NAME, &refs.container, g)?,
        section: require(NAME, "section", &refs.section, g)?,
        floating: require(NAME, "floating", &refs.floating, g)?,
        trailing: require(NAME, "trailing", &refs.trailing, g)?,
        block_a: require(NAME, "block_a", &refs.block_a, g)?,
        block_b: require(NAME, "block_b", &refs.block_b, g)?,
    })
}

fn shift(ctx: &FrameCtx<'_>) -> f64 {
    ctx.geometry.viewport().height * ctx.config.parallax_shift_ratio
}

fn build(els: &Els<'_>, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Timeline> {
    let d = shift(ctx);
    TimelineBuilder::new(NAME.as_str())
        .add(
            SegmentDef::new(els.block_a.clone(), 1.0)
                .from_to(Property::Y, px(0.0), px(-d))
                .ease(Ease::Linear)
                .at(TimeOffset::At(0.0)),
        )
        .add(
            SegmentDef::new(els.block_b.clone(), 1.0)
                .from_to(Property::Y, px(0.0), px(d))
                .ease(Ease::Linear)
                .at(TimeOffset::WithPrevious(0.0)),
        )
        .build()
}

#[tracing::instrument(skip_all, fields(sequence = %NAME))]
pub fn compose(
    refs: &CoverRefs,
    ctx: &FrameCtx<'_>,
    batch: &mut WriteBatch,
) -> ScrollweaveResult<Composition> {
    let els = resolve(refs, ctx)?;
    let timeline = build(&els, ctx)?;

    // Covered from the moment the trailing section's top reaches the floating element's
    // bottom until its own bottom clears the floating element's top.
    let cover = ScrollTrigger::new(
        TriggerSpec {
            trigger: els.trailing.clone(),
            container: els.container.clone(),
            start: ScrollRule::MeetsElement {
                element: 0.0,
                other: els.floating.clone(),
                other_edge: 1.0,
            },
            end: ScrollRule::MeetsElement {
                element: 1.0,
                other: els.floating.clone(),
                other_edge: 0.0,
            },
            kind: TriggerKind::Toggle,
        },
        ctx,
        batch,
    )?;
    let parallax = ScrollTrigger::new(
        TriggerSpec {
            trigger: els.section.clone(),
            container: els.container.clone(),
            start: ScrollRule::top_top(),
            end: ScrollRule::after_start(1.0),
            kind: TriggerKind::Pinned(Scrub::Direct),
        },
        ctx,
        batch,
    )?;

    let mut c = Composition::new(NAME);
    let cover = c.add_trigger(cover);
    let parallax = c.add_trigger(parallax);
    c.toggle(
        cover,
        els.floating.clone(),
        [StyleWrite::new(Property::ZIndex, num(COVERED_Z))],
        [StyleWrite::new(Property::ZIndex, num(UNCOVERED_Z))],
    );
    c.bind(timeline, Drive::Trigger(parallax));
    Ok(c)
}

/// Blocks at their drifted-apart positions; floating element uncovered.
pub fn final_state(refs: &CoverRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<FinalState> {
    let els = resolve(refs, ctx)?;
    let d = shift(ctx);
    Ok(FinalState::new(NAME)
        .set(els.block_a, Property::Y, px(-d))
        .set(els.block_b, Property::Y, px(d))
        .set(els.floating, Property::ZIndex, num(UNCOVERED_Z)))
}

#[cfg(test)]
#[path = "../../../tests/unit/choreo/sequences/cover.rs"]
mod tests;
