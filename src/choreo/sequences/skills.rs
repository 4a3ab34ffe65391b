//! Skills entrance: heading rises in, then two rows slide in from opposite sides. Fully
//! scrubbed in both directions, and held back until the preceding section has scrolled past.

use crate::{
    animation::ease::Ease,
    animation::timeline::{SegmentDef, TimeOffset, Timeline, TimelineBuilder},
    animation::value::Property,
    choreo::composition::{Composition, Drive, SequenceName},
    choreo::reduced::FinalState,
    choreo::sequences::{SkillsRefs, num, px, require, require_container},
    foundation::core::ElementId,
    foundation::error::ScrollweaveResult,
    scroll::frame::FrameCtx,
    scroll::sink::WriteBatch,
    scroll::trigger::{ScrollRule, ScrollTrigger, Scrub, TriggerKind, TriggerSpec},
};

const NAME: SequenceName = SequenceName::SkillsEntrance;

const HEADING_RISE: f64 = 60.0;
const ROW_SLIDE: f64 = 80.0;

struct Els<'a> {
    container: &'a ElementId,
    section: &'a ElementId,
    gate: &'a ElementId,
    heading: &'a ElementId,
    row_a: &'a ElementId,
    row_b: &'a ElementId,
}

fn resolve<'a>(refs: &'a SkillsRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<Els<'a>> {
    let g = ctx.geometry;
    Ok(Els {
        container: require_container(NAME, &refs.container, g)?,
        section: require(NAME, "section", &refs.section, g)?,
        gate: require(NAME, "gate", &refs.gate, g)?,
        heading: require(NAME, "heading", &refs.heading, g)?,
        row_a: require(NAME, "row_a", &refs.row_a, g)?,
        row_b: require(NAME, "row_b", &refs.row_b, g)?,
    })
}

fn build(els: &Els<'_>) -> ScrollweaveResult<Timeline> {
    let slide = |id: &ElementId, from_x: f64| {
        SegmentDef::new(id.clone(), 0.5)
            .from_to(Property::X, px(from_x), px(0.0))
            .from_to(Property::Opacity, num(0.0), num(1.0))
            .ease(Ease::OutCubic)
    };
    TimelineBuilder::new(NAME.as_str())
        .add(
            SegmentDef::new(els.heading.clone(), 0.5)
                .from_to(Property::Y, px(HEADING_RISE), px(0.0))
                .from_to(Property::Opacity, num(0.0), num(1.0))
                .ease(Ease::OutCubic)
                .at(TimeOffset::At(0.0)),
        )
        .add(slide(els.row_a, -ROW_SLIDE).at(TimeOffset::At(0.25)))
        .add(slide(els.row_b, ROW_SLIDE).at(TimeOffset::WithPrevious(0.15)))
        .build()
}

#[tracing::instrument(skip_all, fields(sequence = %NAME))]
pub fn compose(
    refs: &SkillsRefs,
    ctx: &FrameCtx<'_>,
    batch: &mut WriteBatch,
) -> ScrollweaveResult<Composition> {
    let els = resolve(refs, ctx)?;
    let timeline = build(&els)?;
    let entrance = ScrollTrigger::new(
        TriggerSpec {
            trigger: els.section.clone(),
            container: els.container.clone(),
            start: ScrollRule::top_at(0.85),
            end: ScrollRule::top_at(0.25),
            kind: TriggerKind::Scrubbed(Scrub::Direct),
        },
        ctx,
        batch,
    )?;
    let gate = ScrollTrigger::new(
        TriggerSpec {
            trigger: els.gate.clone(),
            container: els.container.clone(),
            start: ScrollRule::bottom_top(),
            end: ScrollRule::Absolute(f64::INFINITY),
            kind: TriggerKind::Toggle,
        },
        ctx,
        batch,
    )?;

    let mut c = Composition::new(NAME);
    let trigger = c.add_trigger(entrance);
    let gate = c.add_trigger(gate);
    c.bind(timeline, Drive::Gated { trigger, gate });
    Ok(c)
}

pub fn final_state(refs: &SkillsRefs, ctx: &FrameCtx<'_>) -> ScrollweaveResult<FinalState> {
    let els = resolve(refs, ctx)?;
    Ok(FinalState::new(NAME)
        .set(els.heading, Property::Y, px(0.0))
        .set(els.heading, Property::Opacity, num(1.0))
        .set(els.row_a, Property::X, px(0.0))
        .set(els.row_a, Property::Opacity, num(1.0))
        .set(els.row_b, Property::X, px(0.0))
        .set(els.row_b, Property::Opacity, num(1.0)))
}

#[cfg(test)]
#[path = "../../../tests/unit/choreo/sequences/skills.rs"]
mod tests;
