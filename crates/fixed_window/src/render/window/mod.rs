//! Window surface subsystem
//!
//! Manages the single full-screen native window the host hands the engine,
//! along with the GPU surface and context rendered into it.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Engine tick / Application   │
//! └─────────────┬───────────────────┘
//!               │ create / pump_host_events / destroy_surface
//!   ┌───────────▼────────────┐        ┌──────────────────────┐
//!   │ SurfaceLifecycleManager│◄───────│ ModeChangeInbox      │◄── host posts
//!   └──┬────────┬─────────┬──┘        └──────────────────────┘
//!      │        │         │
//!      │        │   ┌─────▼──────────────┐
//!      │        │   │ ViewportNotifier   │ ── update_dimensions ──► Viewports
//!      │        │   └────────────────────┘
//!      │  ┌─────▼──────────────┐
//!      │  │ DisplayModeMonitor │ ── operation_mode ──► HostPlatform
//!      │  └────────────────────┘
//!   ┌──▼──────────────────────────┐
//!   │ DisplayDriver + ContextFactory │ ← GPU driver layer (backend.rs)
//!   └─────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - **`manager`**: the surface lifecycle state machine
//! - **`backend`**: traits for the host platform and GPU driver
//! - **`handle`**: typed driver handles with invalid sentinels
//! - **`attributes`**: the fixed framebuffer attribute list
//! - **`mode`**: operation mode to resolution mapping
//! - **`viewport`**: viewport registry and dimension fan-out
//! - **`inbox`**: single-slot mode change inbox
//! - **`headless`**: in-process host and driver for tests and demos

pub mod attributes;
pub mod backend;
pub mod error;
pub mod handle;
pub mod headless;
pub mod inbox;
pub mod manager;
pub mod mode;
pub mod viewport;

#[cfg(test)]
mod tests;

pub use attributes::{ConfigAttribute, FramebufferAttributes, RenderableType};
pub use backend::{ContextFactory, DisplayDriver, DriverCall, DriverError, GpuDriver, HostPlatform};
pub use error::{SurfaceError, SurfaceResult};
pub use handle::{ConfigHandle, ContextHandle, CropRect, DisplayHandle, NativeWindowHandle, SurfaceHandle};
pub use headless::{HeadlessDriver, HeadlessHost};
pub use inbox::{ModeChangeInbox, ModeChangeSender};
pub use manager::{MiscParams, SurfaceLifecycleManager};
pub use mode::{DisplayModeMonitor, OperationMode, Resolution};
pub use viewport::{RenderTarget, Viewport, ViewportId, ViewportNotifier};
