//! Host platform and GPU driver traits
//!
//! The window manager never talks to the platform directly. Everything it
//! needs from the host (the native window, cropping, the operation mode) and
//! from the GPU driver (displays, configs, surfaces, contexts) goes through the
//! traits in this module, so the state machine can run against the real driver
//! on device and against [`headless`](super::headless) backends in tests.

use std::fmt;

use thiserror::Error;

use super::attributes::FramebufferAttributes;
use super::handle::{ConfigHandle, ContextHandle, CropRect, DisplayHandle, NativeWindowHandle, SurfaceHandle};
use crate::core::config::GpuApi;

/// Services the host operating system provides to the window
pub trait HostPlatform {
    /// The single native window the host owns for this process
    fn default_window(&mut self) -> NativeWindowHandle;

    /// Set the native window's buffer dimensions
    fn set_window_dimensions(&mut self, window: NativeWindowHandle, width: u32, height: u32);

    /// Restrict the presented region of the native window
    fn set_window_crop(&mut self, window: NativeWindowHandle, crop: CropRect);

    /// Raw operation mode value; see [`OperationMode`](super::OperationMode)
    fn operation_mode(&self) -> u32;
}

/// Display, config and surface entry points of the GPU driver
pub trait DisplayDriver {
    /// Obtain and initialize the default display
    fn open_display(&mut self) -> Result<DisplayHandle, DriverError>;

    /// Terminate a display connection
    fn terminate_display(&mut self, display: DisplayHandle) -> Result<(), DriverError>;

    /// All configs on `display` satisfying `attributes`, best match first
    fn choose_configs(
        &mut self,
        display: DisplayHandle,
        attributes: &FramebufferAttributes,
    ) -> Result<Vec<ConfigHandle>, DriverError>;

    /// Create a window surface for `window`
    fn create_window_surface(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        window: NativeWindowHandle,
    ) -> Result<SurfaceHandle, DriverError>;

    /// Destroy a window surface
    fn destroy_surface(&mut self, display: DisplayHandle, surface: SurfaceHandle) -> Result<(), DriverError>;
}

/// GPU context entry points of the driver
pub trait ContextFactory {
    /// Create a context for `api` compatible with `config`
    fn create_context(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        api: GpuApi,
    ) -> Result<ContextHandle, DriverError>;

    /// Bind `context` and `surface` to the calling thread
    ///
    /// Binding replaces whatever was current on this thread before.
    fn make_current(
        &mut self,
        display: DisplayHandle,
        surface: SurfaceHandle,
        context: ContextHandle,
    ) -> Result<(), DriverError>;

    /// Free GPU-side objects owned by `context` (buffers, textures, programs)
    fn release_resources(&mut self, context: ContextHandle) -> Result<(), DriverError>;

    /// Destroy a context
    fn destroy_context(&mut self, display: DisplayHandle, context: ContextHandle) -> Result<(), DriverError>;
}

/// Complete GPU driver as used by the window manager
pub trait GpuDriver: DisplayDriver + ContextFactory {}

impl<T> GpuDriver for T where T: DisplayDriver + ContextFactory {}

/// Driver entry points, used to report which call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverCall {
    /// [`DisplayDriver::open_display`]
    OpenDisplay,
    /// [`DisplayDriver::choose_configs`]
    ChooseConfig,
    /// [`DisplayDriver::create_window_surface`]
    CreateSurface,
    /// [`ContextFactory::create_context`]
    CreateContext,
    /// [`ContextFactory::make_current`]
    MakeCurrent,
    /// [`ContextFactory::release_resources`]
    ReleaseResources,
    /// [`DisplayDriver::destroy_surface`]
    DestroySurface,
    /// [`ContextFactory::destroy_context`]
    DestroyContext,
    /// [`DisplayDriver::terminate_display`]
    TerminateDisplay,
}

impl fmt::Display for DriverCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenDisplay => "open_display",
            Self::ChooseConfig => "choose_configs",
            Self::CreateSurface => "create_window_surface",
            Self::CreateContext => "create_context",
            Self::MakeCurrent => "make_current",
            Self::ReleaseResources => "release_resources",
            Self::DestroySurface => "destroy_surface",
            Self::DestroyContext => "destroy_context",
            Self::TerminateDisplay => "terminate_display",
        };
        f.write_str(name)
    }
}

/// Error code reported by the GPU driver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("driver error 0x{code:04X}: {message}")]
pub struct DriverError {
    /// Native error code
    pub code: u32,
    /// Human readable detail
    pub message: String,
}

impl DriverError {
    /// Display was not initialized
    pub const NOT_INITIALIZED: u32 = 0x3001;
    /// Out of resources
    pub const BAD_ALLOC: u32 = 0x3003;
    /// Invalid config
    pub const BAD_CONFIG: u32 = 0x3005;
    /// Invalid context
    pub const BAD_CONTEXT: u32 = 0x3006;
    /// Invalid display
    pub const BAD_DISPLAY: u32 = 0x3008;
    /// Invalid native window
    pub const BAD_NATIVE_WINDOW: u32 = 0x300B;
    /// Invalid surface
    pub const BAD_SURFACE: u32 = 0x300D;

    /// Build an error from a native code
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
