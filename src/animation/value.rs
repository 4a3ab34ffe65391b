use std::fmt;

use crate::foundation::core::ElementId;

/// Interpolation contract for animatable values.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        // Exact at the end so a finished scrub lands on the authored value.
        if t >= 1.0 { *b } else { a + (b - a) * t }
    }
}

impl Lerp for crate::foundation::core::Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for crate::foundation::core::Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

/// Style properties the engine is allowed to write.
///
/// This is the whole vocabulary: no arbitrary DOM mutation goes through the sink.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Horizontal translate (px).
    X,
    /// Vertical translate (px).
    Y,
    /// Absolute left (px).
    Left,
    /// Absolute top (px).
    Top,
    /// Box width (px).
    Width,
    /// Box height (px).
    Height,
    /// Opacity in `[0, 1]`.
    Opacity,
    /// `visible` / `hidden`.
    Visibility,
    /// Uniform scale.
    Scale,
    /// Rotation (degrees).
    Rotate,
    /// Corner radius (px).
    BorderRadius,
    /// Border width (px).
    BorderWidth,
    /// Border color.
    BorderColor,
    /// Shadow design token.
    BoxShadow,
    /// Background color.
    Background,
    /// Blur filter radius (px).
    Blur,
    /// Stacking order.
    ZIndex,
    /// `static` / `fixed` positioning; written by pinning only.
    Position,
    /// Compensating document space reserved while an element is pinned.
    PinSpacing,
    /// `locked` / `unlocked` scroll input on a container.
    ScrollLock,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// A single style value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StyleValue {
    /// Length in CSS pixels.
    Px(f64),
    /// Unitless number (opacity, scale, z-index).
    Number(f64),
    /// Color.
    Color(Rgba8),
    /// Discrete keyword or design token.
    Token(String),
}

impl StyleValue {
    /// Keyword helper.
    pub fn token(s: impl Into<String>) -> Self {
        Self::Token(s.into())
    }

    /// Numeric payload of `Px`/`Number` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Px(v) | Self::Number(v) => Some(*v),
            Self::Color(_) | Self::Token(_) => None,
        }
    }
}

impl Lerp for StyleValue {
    /// Continuous kinds interpolate; discrete or mismatched kinds switch to `b` as soon as
    /// `t > 0` and back to `a` at exactly 0, so a rewound scrub restores the start keyword.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Px(x), Self::Px(y)) => Self::Px(f64::lerp(x, y, t)),
            (Self::Number(x), Self::Number(y)) => Self::Number(f64::lerp(x, y, t)),
            (Self::Color(x), Self::Color(y)) => Self::Color(Rgba8::lerp(x, y, t)),
            _ => {
                if t > 0.0 {
                    b.clone()
                } else {
                    a.clone()
                }
            }
        }
    }
}

/// One property assignment, without a target.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleWrite {
    /// Property being written.
    pub property: Property,
    /// New value.
    pub value: StyleValue,
}

impl StyleWrite {
    /// Pair a property with a value.
    pub fn new(property: Property, value: StyleValue) -> Self {
        Self { property, value }
    }
}

/// A property assignment addressed to an element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropertyWrite {
    /// Element being styled.
    pub target: ElementId,
    /// Property being written.
    pub property: Property,
    /// New value.
    pub value: StyleValue,
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
