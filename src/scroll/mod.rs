pub mod anchors;
pub mod debounce;
pub mod frame;
pub mod geometry;
pub mod sink;
pub mod trigger;
