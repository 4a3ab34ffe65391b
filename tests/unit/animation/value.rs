use super::*;

#[test]
fn px_and_numbers_interpolate() {
    assert_eq!(
        StyleValue::lerp(&StyleValue::Px(0.0), &StyleValue::Px(10.0), 0.25),
        StyleValue::Px(2.5)
    );
    assert_eq!(
        StyleValue::lerp(&StyleValue::Number(1.0), &StyleValue::Number(0.0), 0.5),
        StyleValue::Number(0.5)
    );
}

#[test]
fn colors_interpolate_per_channel() {
    let a = StyleValue::Color(Rgba8::new(0, 0, 0, 0));
    let b = StyleValue::Color(Rgba8::new(255, 100, 50, 255));
    assert_eq!(
        StyleValue::lerp(&a, &b, 0.5),
        StyleValue::Color(Rgba8::new(128, 50, 25, 128))
    );
}

#[test]
fn tokens_switch_after_start() {
    let a = StyleValue::token("hidden");
    let b = StyleValue::token("visible");
    assert_eq!(StyleValue::lerp(&a, &b, 0.0), a);
    assert_eq!(StyleValue::lerp(&a, &b, 0.01), b);
    assert_eq!(StyleValue::lerp(&a, &b, 1.0), b);
}

#[test]
fn mismatched_kinds_behave_like_tokens() {
    let a = StyleValue::Px(4.0);
    let b = StyleValue::Number(1.0);
    assert_eq!(StyleValue::lerp(&a, &b, 0.0), a);
    assert_eq!(StyleValue::lerp(&a, &b, 0.5), b);
}

#[test]
fn properties_serialize_as_snake_case_keys() {
    assert_eq!(
        serde_json::to_string(&Property::BorderRadius).unwrap(),
        "\"border_radius\""
    );
    let v = StyleValue::Px(3.0);
    assert_eq!(
        serde_json::to_string(&v).unwrap(),
        r#"{"kind":"px","value":3.0}"#
    );
}

#[test]
fn numeric_lerp_is_exact_at_the_end() {
    assert_eq!(f64::lerp(&1.0, &0.45, 1.0), 0.45);
    assert_eq!(f64::lerp(&0.1, &0.7, 1.0), 0.7);
}
