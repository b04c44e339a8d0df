//! Rendering-side window integration
//!
//! Only the window surface lifecycle lives here; the rendering pipeline itself
//! is owned by the engine.

pub mod window;

pub use window::{SurfaceLifecycleManager, Viewport, RenderTarget};
