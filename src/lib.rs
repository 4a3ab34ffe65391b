//! Scrollweave is a scroll-driven animation choreography engine.
//!
//! It maps continuous scroll position to multi-element, multi-phase visual state:
//!
//! - Author property [`Timeline`]s with labels, relative offsets and staggers
//! - Bind them to [`ScrollTrigger`]s (scrubbed, toggled or pinned ranges)
//! - Mount the page's named compositions on an [`Engine`], which serializes scroll, frame,
//!   resize and motion-preference events and tears everything down idempotently
//!
//! Layout is read through a [`GeometryProvider`]; all output goes through a [`StyleSink`].
//! Under reduced motion every composition is replaced by its terminal [`FinalState`].
#![forbid(unsafe_code)]

pub mod animation;
pub mod choreo;
pub mod foundation;
pub mod lifecycle;
pub mod scroll;

pub use crate::foundation::config::EngineConfig;
pub use crate::foundation::core::{ElementId, GeometrySnapshot, Point, Rect, Size2, Vec2, Viewport};
pub use crate::foundation::error::{ScrollweaveError, ScrollweaveResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::timeline::Timeline;
pub use crate::animation::value::{Property, StyleValue};
pub use crate::choreo::composition::{Composition, SequenceName};
pub use crate::choreo::reduced::{FinalState, apply_final_state};
pub use crate::choreo::sequences::{CoverRefs, HeroRefs, PageRefs, Sequence, SkillsRefs};
pub use crate::choreo::sync::SyncController;
pub use crate::lifecycle::engine::{Disposer, Engine, EngineEvent, EngineStats};
pub use crate::lifecycle::preference::{
    MotionPreference, MotionPreferenceSource, SharedMotionPreference,
};
pub use crate::lifecycle::scene::Scene;
pub use crate::scroll::geometry::{GeometryProvider, SceneElement, SceneGeometry};
pub use crate::scroll::sink::{InMemoryMedia, InMemoryStyleSink, MediaControl, StyleSink};
pub use crate::scroll::trigger::ScrollTrigger;
