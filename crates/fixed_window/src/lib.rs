//! # Fixed Window
//!
//! Surface and GPU context lifecycle for platforms that hand the engine exactly
//! one full-screen native window, such as a handheld console that can be docked.
//!
//! ## Features
//!
//! - **Surface Lifecycle**: create, tear down and recreate the drawing surface
//!   and its GPU context without leaks or double frees
//! - **Display Modes**: handheld (1280x720) and docked (1920x1080) resolution
//!   switching with native cropping
//! - **Viewport Notification**: registered viewports are told when the
//!   drawable dimensions change
//! - **Headless Backends**: in-process host and driver for tests and demos
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fixed_window::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut window = SurfaceLifecycleManager::new(
//!         HeadlessHost::new(),
//!         HeadlessDriver::new(),
//!         WindowConfig::default(),
//!     );
//!     window.create("main", 800, 600, false, &MiscParams::new())?;
//!     assert_eq!((window.width(), window.height()), (1280, 720));
//!
//!     // Once per engine tick
//!     window.pump_host_events();
//!
//!     window.destroy_surface();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{GpuApi, WindowConfig},
        foundation::logging::{LogCrateSink, LogSink, MemorySink},
        render::window::{
            HeadlessDriver, HeadlessHost, MiscParams, ModeChangeSender, OperationMode,
            RenderTarget, Resolution, SurfaceError, SurfaceLifecycleManager, SurfaceResult,
            Viewport, ViewportId,
        },
    };
}
