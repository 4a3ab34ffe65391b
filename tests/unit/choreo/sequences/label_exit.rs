use super::*;
use crate::choreo::sequences::hero_scroll::PIN_VIEWPORTS;
use crate::choreo::sequences::page::*;
use crate::foundation::config::EngineConfig;
use crate::scroll::sink::{InMemoryMedia, InMemoryStyleSink};

#[test]
fn exit_finishes_before_the_morph_midpoint() {
    assert!(EXIT_VIEWPORTS < PIN_VIEWPORTS / 2.0);
}

#[test]
fn labels_fade_out_with_scroll_and_back_in() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut sink = InMemoryStyleSink::new();
    let mut media = InMemoryMedia::new();
    let mut c = compose(&hero_refs(), &FrameCtx::new(&g, &cfg, 0.0), &mut WriteBatch::new())
        .unwrap();
    assert!(c.triggers()[0].spec().kind == TriggerKind::Scrubbed(Scrub::Direct));

    let mut at = |scroll: f64, now: f64, sink: &mut InMemoryStyleSink| {
        g.set_scroll(scroll);
        let mut batch = WriteBatch::new();
        c.on_frame(&FrameCtx::new(&g, &cfg, now), &mut batch, &mut media);
        batch.flush(sink);
    };
    let name = ElementId::new("name");

    at(0.0, 0.0, &mut sink);
    assert_eq!(sink.get_f64(&name, Property::Opacity), Some(1.0));

    at(EXIT_VIEWPORTS * VH, 16.0, &mut sink);
    assert_eq!(sink.get_f64(&name, Property::Opacity), Some(0.0));
    assert_eq!(sink.get_f64(&name, Property::Y), Some(-40.0));

    at(0.0, 32.0, &mut sink);
    assert_eq!(sink.get_f64(&name, Property::Opacity), Some(1.0));
}

#[test]
fn final_state_hides_both_labels() {
    let cfg = EngineConfig::default();
    let g = scene();
    let fin = final_state(&hero_refs(), &FrameCtx::new(&g, &cfg, 0.0)).unwrap();
    for label in ["name", "title"] {
        assert_eq!(
            fin.value(&ElementId::new(label), Property::Opacity),
            Some(&num(0.0))
        );
    }
}
