use crate::{foundation::config::EngineConfig, scroll::geometry::GeometryProvider};

/// Everything a frame update may read.
#[derive(Clone, Copy)]
pub struct FrameCtx<'a> {
    /// Live layout.
    pub geometry: &'a dyn GeometryProvider,
    /// Engine tunables.
    pub config: &'a EngineConfig,
    /// Frame clock timestamp in milliseconds.
    pub now_ms: f64,
}

impl<'a> FrameCtx<'a> {
    /// Bundle a frame's inputs.
    pub fn new(geometry: &'a dyn GeometryProvider, config: &'a EngineConfig, now_ms: f64) -> Self {
        Self {
            geometry,
            config,
            now_ms,
        }
    }
}
