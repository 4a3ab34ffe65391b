use super::*;

#[test]
fn defaults_validate() {
    EngineConfig::default().validate().unwrap();
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let cfg = EngineConfig::from_json_str(r#"{ "sync_tolerance_px": 2.0 }"#).unwrap();
    assert_eq!(cfg.sync_tolerance_px, 2.0);
    assert_eq!(cfg.resize_quiet_ms, EngineConfig::default().resize_quiet_ms);
}

#[test]
fn rejects_negative_tolerance() {
    let err = EngineConfig::from_json_str(r#"{ "sync_tolerance_px": -1.0 }"#).unwrap_err();
    assert!(err.to_string().contains("sync_tolerance_px"));
}

#[test]
fn rejects_unsorted_breakpoints() {
    let cfg = EngineConfig {
        breakpoints_px: vec![1024.0, 768.0],
        ..EngineConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn breakpoint_bands() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.breakpoint_band(375.0), 0);
    assert_eq!(cfg.breakpoint_band(768.0), 1);
    assert_eq!(cfg.breakpoint_band(900.0), 1);
    assert_eq!(cfg.breakpoint_band(1440.0), 2);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = EngineConfig::from_json_str("{").unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}
