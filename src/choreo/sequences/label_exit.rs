//! Name and title labels fade and rise out over the first part of the hero scroll, finishing
//! well before the pill reaches the middle of its morph.

use crate::{
    animation::ease::Ease,
    animation::timeline::{SegmentDef, TimeOffset, Timeline, TimelineBuilder},
    animation::value::Property,
    choreo::composition::{Composition, Drive, SequenceName},
    choreo::reduced::FinalState,
    choreo::sequences::{HeroRefs, num, px, require, require_container},
    foundation::core::ElementId,
    foundation::error::ScrollweaveResult,
    scroll::frame::FrameCtx,
    scroll::sink::WriteBatch,
    scroll::trigger::{ScrollRule, ScrollTrigger, Scrub, TriggerKind, TriggerSpec},
};

const NAME: SequenceName = SequenceName::LabelExit;

/// Scroll distance of the exit, in viewport heights.
pub const EXIT_VIEWPORTS: f64 = 0.35;
const RISE: f64 = 40.0;

struct Els<'a> {
    container: &'a ElementId,
    section: &'a ElementId,
    name: &'a ElementId,
    title: &'a ElementId,
}

fn resolve<'a>(refs: &'a HeroRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Els<'a>> {
    let g = ctx.geometry;
    Ok(Els {
        container: require_container(NAME, &refs.container, g)?,
        section: require(NAME, "section", &refs.section, g)?,
        name: require(NAME, "name_label", &refs.name_label, g)?,
        title: require(NAME, "title_label", &refs.title_label, g)?,
    })
}

fn build(els: &Els<'_>) -> ScrollweaveResult<Timeline> {
    TimelineBuilder::new(NAME.as_str())
        .stagger(
            &[els.name.clone(), els.title.clone()],
            0.1,
            TimeOffset::At(0.0),
            |id| {
                SegmentDef::new(id.clone(), 1.0)
                    .from_to(Property::Opacity, num(1.0), num(0.0))
                    .from_to(Property::Y, px(0.0), px(-RISE))
                    .ease(Ease::InQuad)
            },
        )
        .build()
}

#[tracing::instrument(skip_all, fields(sequence = %NAME))]
pub fn compose(
    refs: &HeroRefs,
    ctx: &FrameCtx<'_>,
    batch: &mut WriteBatch,
) -> ScrollweaveResult<Composition> {
    let els = resolve(refs, ctx)?;
    let timeline = build(&els)?;
    let trigger = ScrollTrigger::new(
        TriggerSpec {
            trigger: els.section.clone(),
            container: els.container.clone(),
            start: ScrollRule::top_top(),
            end: ScrollRule::after_start(EXIT_VIEWPORTS),
            kind: TriggerKind::Scrubbed(Scrub::Direct),
        },
        ctx,
        batch,
    )?;

    let mut c = Composition::new(NAME);
    let t = c.add_trigger(trigger);
    c.bind(timeline, Drive::Trigger(t));
    Ok(c)
}

pub fn final_state(refs: &HeroRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<FinalState> {
    let els = resolve(refs, ctx)?;
    let mut state = FinalState::new(NAME);
    for label in [els.name, els.title] {
        state = state
            .set(label, Property::Opacity, num(0.0))
            .set(label, Property::Y, px(-RISE));
    }
    Ok(state)
}

#[cfg(test)]
#[path = "../../../tests/unit/choreo/sequences/label_exit.rs"]
mod tests;
