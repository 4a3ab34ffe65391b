use super::*;

#[test]
fn snapshot_edges_and_center() {
    let g = GeometrySnapshot::new(10.0, 20.0, 100.0, 40.0);
    assert_eq!(g.right(), 110.0);
    assert_eq!(g.bottom(), 60.0);
    assert_eq!(g.center(), Point::new(60.0, 40.0));
    assert_eq!(GeometrySnapshot::from_rect(g.rect()), g);
}

#[test]
fn empty_snapshot_is_detected() {
    assert!(GeometrySnapshot::new(0.0, 0.0, 0.0, 10.0).is_empty());
    assert!(!GeometrySnapshot::new(0.0, 0.0, 1.0, 1.0).is_empty());
}

#[test]
fn viewport_rejects_degenerate_sizes() {
    assert!(Viewport::new(0.0, 800.0).is_err());
    assert!(Viewport::new(1280.0, f64::NAN).is_err());
    let vp = Viewport::new(1280.0, 800.0).unwrap();
    assert_eq!(vp.rect().bottom(), 800.0);
}

#[test]
fn element_id_serializes_transparently() {
    let id = ElementId::from("hero-pill");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"hero-pill\"");
    assert_eq!(id.to_string(), "hero-pill");
}
