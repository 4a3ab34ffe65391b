use super::*;
use crate::foundation::config::EngineConfig;
use crate::foundation::core::Viewport;
use crate::scroll::geometry::{SceneElement, SceneGeometry};

fn scene() -> SceneGeometry {
    SceneGeometry::new(Viewport::new(1000.0, 800.0).unwrap())
        .with("hero", SceneElement::flow(0.0, 0.0, 1000.0, 800.0))
        .with("next", SceneElement::flow(0.0, 800.0, 1000.0, 1200.0))
}

fn spec(kind: TriggerKind, start: ScrollRule, end: ScrollRule) -> TriggerSpec {
    TriggerSpec {
        trigger: ElementId::new("hero"),
        container: ElementId::new("document"),
        start,
        end,
        kind,
    }
}

fn absolute(kind: TriggerKind) -> TriggerSpec {
    spec(kind, ScrollRule::Absolute(0.0), ScrollRule::Absolute(1000.0))
}

fn make(g: &SceneGeometry, cfg: &EngineConfig, s: TriggerSpec) -> ScrollTrigger {
    let mut batch = WriteBatch::new();
    ScrollTrigger::new(s, &FrameCtx::new(g, cfg, 0.0), &mut batch).unwrap()
}

fn step(
    t: &mut ScrollTrigger,
    g: &mut SceneGeometry,
    cfg: &EngineConfig,
    scroll: f64,
    now: f64,
) -> (Option<TriggerUpdate>, WriteBatch) {
    g.set_scroll(scroll);
    let mut batch = WriteBatch::new();
    let u = t.update(&FrameCtx::new(&*g, cfg, now), &mut batch);
    (u, batch)
}

#[test]
fn direct_scrub_maps_scroll_linearly_and_clamps() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(&g, &cfg, absolute(TriggerKind::Scrubbed(Scrub::Direct)));

    assert_eq!(step(&mut t, &mut g, &cfg, 0.0, 0.0).0.unwrap().progress, 0.0);
    assert_eq!(step(&mut t, &mut g, &cfg, 500.0, 16.0).0.unwrap().progress, 0.5);
    assert_eq!(step(&mut t, &mut g, &cfg, 1500.0, 32.0).0.unwrap().progress, 1.0);
}

#[test]
fn progress_is_monotonic_within_range() {
    let cfg = EngineConfig::default();
    let g = scene();
    let t = make(&g, &cfg, absolute(TriggerKind::Scrubbed(Scrub::Direct)));
    let mut prev = t.progress_at(0.0);
    for s in (0..=1000).step_by(25) {
        let p = t.progress_at(f64::from(s));
        assert!(p >= prev);
        prev = p;
    }
}

#[test]
fn exactly_one_update_past_the_boundary() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(&g, &cfg, absolute(TriggerKind::Scrubbed(Scrub::Direct)));

    assert!(step(&mut t, &mut g, &cfg, 990.0, 0.0).0.is_some());
    let past = step(&mut t, &mut g, &cfg, 1200.0, 16.0).0.unwrap();
    assert_eq!(past.progress, 1.0);
    assert!(step(&mut t, &mut g, &cfg, 1300.0, 32.0).0.is_none());
    assert!(step(&mut t, &mut g, &cfg, 1400.0, 48.0).0.is_none());
    // Coming back into range emits again.
    assert!(step(&mut t, &mut g, &cfg, 800.0, 64.0).0.is_some());
}

#[test]
fn jump_yields_correct_progress_immediately() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(&g, &cfg, absolute(TriggerKind::Scrubbed(Scrub::Direct)));
    step(&mut t, &mut g, &cfg, 900.0, 0.0);
    assert_eq!(step(&mut t, &mut g, &cfg, 250.0, 16.0).0.unwrap().progress, 0.25);
}

#[test]
fn degenerate_range_is_binary() {
    let cfg = EngineConfig::default();
    let g = scene();
    let t = make(
        &g,
        &cfg,
        spec(
            TriggerKind::Scrubbed(Scrub::Direct),
            ScrollRule::Absolute(300.0),
            ScrollRule::Absolute(300.0),
        ),
    );
    assert_eq!(t.progress_at(299.0), 0.0);
    assert_eq!(t.progress_at(300.0), 1.0);
    assert_eq!(t.progress_at(5000.0), 1.0);
}

#[test]
fn end_before_start_collapses_to_degenerate() {
    let cfg = EngineConfig::default();
    let g = scene();
    let t = make(
        &g,
        &cfg,
        spec(
            TriggerKind::Scrubbed(Scrub::Direct),
            ScrollRule::Absolute(300.0),
            ScrollRule::Absolute(100.0),
        ),
    );
    assert!(t.bounds().unwrap().is_degenerate());
}

#[test]
fn edge_rules_resolve_against_layout() {
    let cfg = EngineConfig::default();
    let g = scene();
    let mut s = spec(
        TriggerKind::Scrubbed(Scrub::Direct),
        ScrollRule::top_at(0.8),
        ScrollRule::after_start(1.0),
    );
    s.trigger = ElementId::new("next");
    let t = make(&g, &cfg, s);
    let b = t.bounds().unwrap();
    assert_eq!(b.start, 800.0 - 640.0);
    assert_eq!(b.end, b.start + 800.0);
}

#[test]
fn after_start_cannot_be_a_start_rule() {
    let cfg = EngineConfig::default();
    let g = scene();
    let mut batch = WriteBatch::new();
    let err = ScrollTrigger::new(
        spec(
            TriggerKind::Toggle,
            ScrollRule::after_start(1.0),
            ScrollRule::Absolute(10.0),
        ),
        &FrameCtx::new(&g, &cfg, 0.0),
        &mut batch,
    )
    .unwrap_err();
    assert!(err.to_string().contains("trigger error:"));
}

#[test]
fn detached_trigger_skips_silently() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(&g, &cfg, absolute(TriggerKind::Scrubbed(Scrub::Direct)));
    g.detach(&ElementId::new("hero"));
    assert!(step(&mut t, &mut g, &cfg, 500.0, 16.0).0.is_none());
}

#[test]
fn pin_holds_element_for_range_and_releases_after() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(
        &g,
        &cfg,
        spec(
            TriggerKind::Pinned(Scrub::Direct),
            ScrollRule::top_top(),
            ScrollRule::after_start(1.0),
        ),
    );

    // Mounted at scroll 0, which is already inside the range.
    assert!(t.is_pinned());

    let (_, batch) = step(&mut t, &mut g, &cfg, 900.0, 0.0);
    assert!(!t.is_pinned());
    let top = batch
        .writes()
        .iter()
        .find(|w| w.property == Property::Top)
        .unwrap();
    assert_eq!(top.value, StyleValue::Px(800.0));

    let (_, batch) = step(&mut t, &mut g, &cfg, 400.0, 16.0);
    assert!(t.is_pinned());
    assert!(batch.writes().iter().any(|w| w.property == Property::Position
        && w.value == StyleValue::token("fixed")));
}

#[test]
fn refresh_does_not_duplicate_an_existing_pin() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(
        &g,
        &cfg,
        spec(
            TriggerKind::Pinned(Scrub::Direct),
            ScrollRule::top_top(),
            ScrollRule::after_start(1.0),
        ),
    );
    step(&mut t, &mut g, &cfg, 400.0, 0.0);
    assert!(t.is_pinned());

    let mut batch = WriteBatch::new();
    t.refresh(&FrameCtx::new(&g, &cfg, 16.0), &mut batch);
    assert!(batch.is_empty());
    assert!(t.is_pinned());
}

#[test]
fn refresh_after_resize_updates_spacing() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(
        &g,
        &cfg,
        spec(
            TriggerKind::Pinned(Scrub::Direct),
            ScrollRule::top_top(),
            ScrollRule::after_start(1.0),
        ),
    );
    g.set_viewport(Viewport::new(600.0, 500.0).unwrap());
    let mut batch = WriteBatch::new();
    t.refresh(&FrameCtx::new(&g, &cfg, 16.0), &mut batch);
    assert_eq!(t.bounds().unwrap().end, 500.0);
    assert!(
        batch
            .writes()
            .iter()
            .any(|w| w.property == Property::PinSpacing && w.value == StyleValue::Px(500.0))
    );
}

#[test]
fn dispose_releases_pin_once() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(
        &g,
        &cfg,
        spec(
            TriggerKind::Pinned(Scrub::Direct),
            ScrollRule::top_top(),
            ScrollRule::after_start(1.0),
        ),
    );
    step(&mut t, &mut g, &cfg, 400.0, 0.0);

    let mut batch = WriteBatch::new();
    t.dispose(&mut batch);
    assert!(!t.is_pinned());
    assert!(
        batch
            .writes()
            .iter()
            .any(|w| w.property == Property::Position && w.value == StyleValue::token("static"))
    );

    let mut again = WriteBatch::new();
    t.dispose(&mut again);
    assert!(again.is_empty());
    assert!(step(&mut t, &mut g, &cfg, 500.0, 16.0).0.is_none());
}

#[test]
fn smooth_scrub_trails_raw_progress() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(
        &g,
        &cfg,
        absolute(TriggerKind::Scrubbed(Scrub::Smooth { lag_ms: 100.0 })),
    );
    step(&mut t, &mut g, &cfg, 0.0, 0.0);
    let u = step(&mut t, &mut g, &cfg, 1000.0, 16.0).0.unwrap();
    assert_eq!(u.progress, 1.0);
    assert!(u.visual > 0.0 && u.visual < 1.0);
    assert!(t.is_settling());

    // Keeps emitting without further scroll until it settles.
    let mut now = 16.0;
    let mut last = u.visual;
    while t.is_settling() {
        now += 16.0;
        let u = step(&mut t, &mut g, &cfg, 1000.0, now).0.unwrap();
        assert!(u.visual >= last);
        last = u.visual;
        assert!(now < 10_000.0);
    }
    assert_eq!(last, 1.0);
}

#[test]
fn toggle_reports_enter_and_leave() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(
        &g,
        &cfg,
        spec(
            TriggerKind::Toggle,
            ScrollRule::Absolute(100.0),
            ScrollRule::Absolute(200.0),
        ),
    );
    assert_eq!(step(&mut t, &mut g, &cfg, 0.0, 0.0).0.unwrap().toggled, Some(false));
    assert_eq!(step(&mut t, &mut g, &cfg, 150.0, 16.0).0.unwrap().toggled, Some(true));
    assert_eq!(step(&mut t, &mut g, &cfg, 160.0, 32.0).0.unwrap().toggled, None);
    assert_eq!(step(&mut t, &mut g, &cfg, 300.0, 48.0).0.unwrap().toggled, Some(false));
}

#[test]
fn open_ended_toggle_reports_leaving_in_one_jump() {
    let cfg = EngineConfig::default();
    let mut g = scene();
    let mut t = make(
        &g,
        &cfg,
        spec(
            TriggerKind::Toggle,
            ScrollRule::Absolute(100.0),
            ScrollRule::Absolute(f64::INFINITY),
        ),
    );
    step(&mut t, &mut g, &cfg, 0.0, 0.0);
    assert_eq!(step(&mut t, &mut g, &cfg, 500.0, 16.0).0.unwrap().toggled, Some(true));
    assert!(t.is_active());

    let u = step(&mut t, &mut g, &cfg, 0.0, 32.0).0.unwrap();
    assert_eq!(u.toggled, Some(false));
    assert!(!t.is_active());
    assert!(step(&mut t, &mut g, &cfg, 0.0, 48.0).0.is_none());
}
