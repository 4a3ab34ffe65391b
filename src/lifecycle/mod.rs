pub mod engine;
pub mod preference;
pub mod scene;
