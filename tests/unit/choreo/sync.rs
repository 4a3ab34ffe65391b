use super::*;
use crate::foundation::config::EngineConfig;
use crate::foundation::core::Viewport;
use crate::scroll::geometry::SceneGeometry;

fn scene(dock_x: f64) -> SceneGeometry {
    SceneGeometry::new(Viewport::new(1000.0, 800.0).unwrap())
        .with_anchor("nav-pill-dock", Point::new(dock_x, 40.0))
}

fn controller(g: &SceneGeometry, cfg: &EngineConfig) -> SyncController {
    SyncController::new(
        ElementId::new("pill"),
        Point::ZERO,
        Ease::Linear,
        &FrameCtx::new(g, cfg, 0.0),
    )
}

fn left_top_writes(batch: &WriteBatch) -> usize {
    batch
        .writes()
        .iter()
        .filter(|w| w.property == Property::Left || w.property == Property::Top)
        .count()
}

#[test]
fn desired_interpolates_toward_dock_top_left() {
    let cfg = EngineConfig::default();
    let g = scene(500.0);
    let c = controller(&g, &cfg);
    let ctx = FrameCtx::new(&g, &cfg, 0.0);
    assert_eq!(c.desired(&ctx, 0.0), Point::ZERO);
    assert_eq!(c.desired(&ctx, 1.0), Point::new(426.0, 18.0));
    assert_eq!(c.desired(&ctx, 0.5), Point::new(213.0, 9.0));
}

#[test]
fn drift_below_tolerance_writes_nothing() {
    let cfg = EngineConfig::default();
    let t = cfg.sync_tolerance_px;
    let mut g = scene(500.0);
    let mut c = controller(&g, &cfg);

    let mut batch = WriteBatch::new();
    assert!(c.reconcile(&FrameCtx::new(&g, &cfg, 0.0), 1.0, false, &mut batch).wrote());

    g.set_anchor("nav-pill-dock", Point::new(500.0 + t / 2.0, 40.0));
    let mut batch = WriteBatch::new();
    let out = c.reconcile(&FrameCtx::new(&g, &cfg, 16.0), 1.0, false, &mut batch);
    assert_eq!(out, ReconcileOutcome::Skipped);
    assert!(batch.is_empty());
}

#[test]
fn drift_above_tolerance_writes_one_command() {
    let cfg = EngineConfig::default();
    let t = cfg.sync_tolerance_px;
    let mut g = scene(500.0);
    let mut c = controller(&g, &cfg);

    let mut batch = WriteBatch::new();
    c.reconcile(&FrameCtx::new(&g, &cfg, 0.0), 1.0, false, &mut batch);

    g.set_anchor("nav-pill-dock", Point::new(500.0 + 2.0 * t, 40.0));
    let mut batch = WriteBatch::new();
    let out = c.reconcile(&FrameCtx::new(&g, &cfg, 16.0), 1.0, false, &mut batch);
    assert_eq!(out, ReconcileOutcome::Jumped(Point::new(426.0 + 2.0 * t, 18.0)));
    assert_eq!(left_top_writes(&batch), 2);
}

#[test]
fn idle_reconcile_jumps_and_cancels_easing() {
    let cfg = EngineConfig::default();
    let mut g = scene(500.0);
    let mut c = controller(&g, &cfg);

    let mut batch = WriteBatch::new();
    c.reconcile(&FrameCtx::new(&g, &cfg, 0.0), 0.0, true, &mut batch);
    let mut batch = WriteBatch::new();
    let out = c.reconcile(&FrameCtx::new(&g, &cfg, 16.0), 1.0, true, &mut batch);
    assert!(matches!(out, ReconcileOutcome::Eased(_)));
    assert!(c.is_easing());

    g.set_anchor("nav-pill-dock", Point::new(600.0, 40.0));
    let mut batch = WriteBatch::new();
    let out = c.reconcile(&FrameCtx::new(&g, &cfg, 20.0), 1.0, false, &mut batch);
    assert_eq!(out, ReconcileOutcome::Jumped(Point::new(526.0, 18.0)));
    assert!(!c.is_easing());
    let left = batch
        .writes()
        .iter()
        .find(|w| w.property == Property::Left)
        .unwrap();
    assert_eq!(left.value, StyleValue::Px(526.0));
}

#[test]
fn eased_command_converges_through_advance() {
    let cfg = EngineConfig::default();
    let g = scene(500.0);
    let mut c = controller(&g, &cfg);

    let mut batch = WriteBatch::new();
    c.reconcile(&FrameCtx::new(&g, &cfg, 0.0), 0.0, false, &mut batch);
    let mut batch = WriteBatch::new();
    c.reconcile(&FrameCtx::new(&g, &cfg, 100.0), 1.0, true, &mut batch);

    let mut now = 100.0;
    let mut last_x = 0.0;
    loop {
        now += 16.0;
        let mut batch = WriteBatch::new();
        let easing = c.advance(now, &mut batch);
        let x = batch
            .writes()
            .iter()
            .find(|w| w.property == Property::Left)
            .and_then(|w| w.value.as_f64())
            .unwrap();
        assert!(x >= last_x);
        last_x = x;
        if !easing {
            break;
        }
        assert!(now < 1_000.0);
    }
    assert_eq!(last_x, 426.0);

    let mut batch = WriteBatch::new();
    assert!(!c.advance(now + 16.0, &mut batch));
    assert!(batch.is_empty());
}

#[test]
fn cancel_leaves_position_where_it_is() {
    let cfg = EngineConfig::default();
    let g = scene(500.0);
    let mut c = controller(&g, &cfg);
    let mut batch = WriteBatch::new();
    c.reconcile(&FrameCtx::new(&g, &cfg, 0.0), 1.0, true, &mut batch);
    c.cancel();
    let mut batch = WriteBatch::new();
    assert!(!c.advance(50.0, &mut batch));
    assert!(batch.is_empty());
}
