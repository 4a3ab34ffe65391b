use super::*;
use crate::animation::timeline::{SegmentDef, TimelineBuilder};
use crate::animation::value::StyleValue;
use crate::foundation::config::EngineConfig;
use crate::foundation::core::Viewport;
use crate::scroll::geometry::{SceneElement, SceneGeometry};
use crate::scroll::sink::{InMemoryMedia, InMemoryStyleSink};
use crate::scroll::trigger::{Scrub, ScrollRule, TriggerKind, TriggerSpec};

fn scene() -> SceneGeometry {
    SceneGeometry::new(Viewport::new(1000.0, 800.0).unwrap())
        .with("hero", SceneElement::flow(0.0, 0.0, 1000.0, 800.0))
        .with("gate", SceneElement::flow(0.0, 800.0, 1000.0, 400.0))
        .with("box", SceneElement::flow(0.0, 1200.0, 100.0, 100.0))
}

fn fade(target: &str) -> Timeline {
    TimelineBuilder::new(target)
        .add(
            SegmentDef::new(ElementId::new(target), 1.0)
                .from_to(Property::Opacity, StyleValue::Number(0.0), StyleValue::Number(1.0))
                .ease(crate::animation::ease::Ease::Linear),
        )
        .build()
        .unwrap()
}

fn trigger(g: &SceneGeometry, cfg: &EngineConfig, el: &str, kind: TriggerKind) -> ScrollTrigger {
    let spec = TriggerSpec {
        trigger: ElementId::new(el),
        container: ElementId::new("document"),
        start: ScrollRule::Absolute(0.0),
        end: ScrollRule::Absolute(800.0),
        kind,
    };
    ScrollTrigger::new(spec, &FrameCtx::new(g, cfg, 0.0), &mut WriteBatch::new()).unwrap()
}

fn frame(
    c: &mut Composition,
    g: &SceneGeometry,
    cfg: &EngineConfig,
    now: f64,
    sink: &mut InMemoryStyleSink,
    media: &mut InMemoryMedia,
) {
    let mut batch = WriteBatch::new();
    c.on_frame(&FrameCtx::new(g, cfg, now), &mut batch, media);
    batch.flush(sink);
}

fn opacity(sink: &InMemoryStyleSink, id: &str) -> Option<f64> {
    sink.get_f64(&ElementId::new(id), Property::Opacity)
}

#[test]
fn sequence_names_are_kebab_case() {
    assert_eq!(SequenceName::SkillsEntrance.to_string(), "skills-entrance");
    assert_eq!(
        serde_json::to_string(&SequenceName::HeroIntro).unwrap(),
        "\"hero-intro\""
    );
}

#[test]
fn scrubbed_binding_follows_scroll() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::new();
    let mut c = Composition::new(SequenceName::LabelExit);
    let t = c.add_trigger(trigger(&g, &cfg, "hero", TriggerKind::Scrubbed(Scrub::Direct)));
    c.bind(fade("box"), Drive::Trigger(t));

    frame(&mut c, &g, &cfg, 0.0, &mut sink, &mut media);
    assert_eq!(opacity(&sink, "box"), Some(0.0));
    g.set_scroll(400.0);
    frame(&mut c, &g, &cfg, 16.0, &mut sink, &mut media);
    assert_eq!(opacity(&sink, "box"), Some(0.5));
}

#[test]
fn static_frames_write_nothing() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    g.set_scroll(200.0);
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::new();
    let mut c = Composition::new(SequenceName::LabelExit);
    let t = c.add_trigger(trigger(&g, &cfg, "hero", TriggerKind::Scrubbed(Scrub::Direct)));
    c.bind(fade("box"), Drive::Trigger(t));

    frame(&mut c, &g, &cfg, 0.0, &mut sink, &mut media);
    sink.clear_log();
    frame(&mut c, &g, &cfg, 16.0, &mut sink, &mut media);
    frame(&mut c, &g, &cfg, 32.0, &mut sink, &mut media);
    assert!(sink.log().is_empty());
}

#[test]
fn gated_binding_waits_for_gate() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::new();
    let mut c = Composition::new(SequenceName::SkillsEntrance);
    let t = c.add_trigger(trigger(&g, &cfg, "hero", TriggerKind::Scrubbed(Scrub::Direct)));
    let gate_spec = TriggerSpec {
        trigger: ElementId::new("gate"),
        container: ElementId::new("document"),
        start: ScrollRule::Absolute(600.0),
        end: ScrollRule::Absolute(f64::INFINITY),
        kind: TriggerKind::Toggle,
    };
    let gate = c.add_trigger(
        ScrollTrigger::new(gate_spec, &FrameCtx::new(&g, &cfg, 0.0), &mut WriteBatch::new())
            .unwrap(),
    );
    c.bind(fade("box"), Drive::Gated { trigger: t, gate });

    g.set_scroll(400.0);
    frame(&mut c, &g, &cfg, 0.0, &mut sink, &mut media);
    assert_eq!(opacity(&sink, "box"), Some(0.0));

    g.set_scroll(600.0);
    frame(&mut c, &g, &cfg, 16.0, &mut sink, &mut media);
    assert_eq!(opacity(&sink, "box"), Some(0.75));
}

#[test]
fn toggle_effect_writes_on_enter_and_leave() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::new();
    let mut c = Composition::new(SequenceName::Cover);
    let spec = TriggerSpec {
        trigger: ElementId::new("gate"),
        container: ElementId::new("document"),
        start: ScrollRule::Absolute(100.0),
        end: ScrollRule::Absolute(200.0),
        kind: TriggerKind::Toggle,
    };
    let t = c.add_trigger(
        ScrollTrigger::new(spec, &FrameCtx::new(&g, &cfg, 0.0), &mut WriteBatch::new()).unwrap(),
    );
    c.toggle(
        t,
        ElementId::new("box"),
        [StyleWrite::new(Property::ZIndex, StyleValue::Number(1.0))],
        [StyleWrite::new(Property::ZIndex, StyleValue::Number(40.0))],
    );
    let z = |sink: &InMemoryStyleSink| sink.get_f64(&ElementId::new("box"), Property::ZIndex);

    frame(&mut c, &g, &cfg, 0.0, &mut sink, &mut media);
    assert_eq!(z(&sink), Some(40.0));
    g.set_scroll(150.0);
    frame(&mut c, &g, &cfg, 16.0, &mut sink, &mut media);
    assert_eq!(z(&sink), Some(1.0));
    g.set_scroll(300.0);
    frame(&mut c, &g, &cfg, 32.0, &mut sink, &mut media);
    assert_eq!(z(&sink), Some(40.0));
}

#[test]
fn playhead_runs_to_completion_and_cues_media_once() {
    let cfg = EngineConfig::default();
    let g = scene();
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::new();
    let mut c = Composition::new(SequenceName::HeroIntro);
    let b = c.bind(fade("box"), Drive::Playhead);
    c.cue_media(ElementId::new("video"), b, 0.5);
    c.play(0.0, 1000.0);

    frame(&mut c, &g, &cfg, 250.0, &mut sink, &mut media);
    assert_eq!(opacity(&sink, "box"), Some(0.25));
    assert!(media.started.is_empty());

    frame(&mut c, &g, &cfg, 600.0, &mut sink, &mut media);
    assert_eq!(media.started, vec![ElementId::new("video")]);
    assert!(c.is_playing());

    frame(&mut c, &g, &cfg, 1200.0, &mut sink, &mut media);
    assert_eq!(opacity(&sink, "box"), Some(1.0));
    assert!(!c.is_playing());

    sink.clear_log();
    frame(&mut c, &g, &cfg, 1300.0, &mut sink, &mut media);
    assert!(sink.log().is_empty());
    assert_eq!(media.attempts.len(), 1);
}

#[test]
fn rejected_autoplay_does_not_interrupt_playback() {
    let cfg = EngineConfig::default();
    let g = scene();
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::rejecting();
    let mut c = Composition::new(SequenceName::HeroIntro);
    let b = c.bind(fade("box"), Drive::Playhead);
    c.cue_media(ElementId::new("video"), b, 0.0);
    c.play(0.0, 100.0);

    frame(&mut c, &g, &cfg, 10.0, &mut sink, &mut media);
    frame(&mut c, &g, &cfg, 200.0, &mut sink, &mut media);
    assert_eq!(media.attempts.len(), 1);
    assert!(media.started.is_empty());
    assert_eq!(opacity(&sink, "box"), Some(1.0));
}

#[test]
fn dispose_mid_playback_lands_on_terminal_state() {
    let cfg = EngineConfig::default();
    let g = scene();
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::new();
    let mut c = Composition::new(SequenceName::HeroIntro);
    let b = c.bind(fade("box"), Drive::Playhead);
    c.cue_media(ElementId::new("video"), b, 0.9);
    c.play(0.0, 1000.0);
    frame(&mut c, &g, &cfg, 100.0, &mut sink, &mut media);

    let mut batch = WriteBatch::new();
    c.dispose(&mut batch, &mut media);
    batch.flush(&mut sink);
    assert_eq!(opacity(&sink, "box"), Some(1.0));
    assert_eq!(media.started.len(), 1);
}

#[test]
fn dispose_is_idempotent() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::new();
    let mut c = Composition::new(SequenceName::HeroScroll);
    let t = c.add_trigger(trigger(&g, &cfg, "hero", TriggerKind::Pinned(Scrub::Direct)));
    c.bind(fade("box"), Drive::Trigger(t));
    frame(&mut c, &g, &cfg, 0.0, &mut sink, &mut media);
    assert_eq!(c.pinned_elements().count(), 1);

    let mut first = WriteBatch::new();
    c.dispose(&mut first, &mut media);
    assert!(!first.is_empty());
    assert_eq!(c.pinned_elements().count(), 0);

    for _ in 0..3 {
        let mut again = WriteBatch::new();
        c.dispose(&mut again, &mut media);
        assert!(again.is_empty());
    }

    g.set_scroll(500.0);
    sink.clear_log();
    frame(&mut c, &g, &cfg, 16.0, &mut sink, &mut media);
    assert!(sink.log().is_empty());
}

#[test]
fn refresh_reapplies_current_progress() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    g.set_scroll(400.0);
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::new();
    let mut c = Composition::new(SequenceName::LabelExit);
    let t = c.add_trigger(trigger(&g, &cfg, "hero", TriggerKind::Scrubbed(Scrub::Direct)));
    c.bind(fade("box"), Drive::Trigger(t));
    frame(&mut c, &g, &cfg, 0.0, &mut sink, &mut media);

    sink.clear_log();
    let mut batch = WriteBatch::new();
    c.refresh(&FrameCtx::new(&g, &cfg, 16.0), &mut batch, &mut media);
    batch.flush(&mut sink);
    assert_eq!(sink.log().len(), 1);
    assert_eq!(opacity(&sink, "box"), Some(0.5));
}

#[test]
fn noop_has_nothing_to_do() {
    let c = Composition::noop(SequenceName::Cover);
    assert!(c.is_noop());
    assert!(c.animated_properties().is_empty());
}
