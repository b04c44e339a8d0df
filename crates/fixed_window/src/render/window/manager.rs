//! Surface lifecycle state machine
//!
//! [`SurfaceLifecycleManager`] owns the display, surface, config and context of
//! the platform's only window. Its states are:
//!
//! ```text
//!   Closed ──create / notify_surface_created──► Active
//!   Active ──destroy_surface──────────────────► Closed
//!   Active ──handle_mode_change───────────────► Active (size and crop only)
//! ```
//!
//! Window geometry is fixed by the platform: the window always sits at (0, 0),
//! always covers the whole screen, and its size is always one of the
//! [`Resolution`] presets picked from the host's operation mode.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::Level;

use super::attributes::FramebufferAttributes;
use super::backend::{DriverCall, DriverError, GpuDriver, HostPlatform};
use super::error::{DriverResultExt, SurfaceError, SurfaceResult};
use super::handle::{ConfigHandle, ContextHandle, CropRect, DisplayHandle, NativeWindowHandle, SurfaceHandle};
use super::inbox::{ModeChangeInbox, ModeChangeSender};
use super::mode::{DisplayModeMonitor, OperationMode, Resolution};
use super::viewport::{RenderTarget, Viewport, ViewportId, ViewportNotifier};
use crate::core::config::{GpuApi, WindowConfig};
use crate::foundation::logging::{LogCrateSink, LogSink};

/// Name/value creation parameters
pub type MiscParams = BTreeMap<String, String>;

/// Creation parameters the platform always overrides
const OVERRIDDEN_PARAMS: &[&str] = &["left", "top", "fullscreen", "gamma", "externalWindowHandle"];

/// Owner of the window's surface and GPU context
pub struct SurfaceLifecycleManager<H: HostPlatform, D: GpuDriver> {
    host: H,
    driver: D,
    logger: Box<dyn LogSink>,

    name: String,
    gpu_api: GpuApi,
    width: u32,
    height: u32,
    left: i32,
    top: i32,
    fullscreen: bool,
    hw_gamma: bool,
    external: bool,

    window: NativeWindowHandle,
    display: DisplayHandle,
    surface: SurfaceHandle,
    config: ConfigHandle,
    context: ContextHandle,
    crop: Option<CropRect>,

    active: bool,
    visible: bool,
    closed: bool,

    viewports: ViewportNotifier,
    inbox: ModeChangeInbox,
}

impl<H: HostPlatform, D: GpuDriver> SurfaceLifecycleManager<H, D> {
    /// Closed manager logging through the `log` facade
    pub fn new(host: H, driver: D, config: WindowConfig) -> Self {
        Self::with_logger(host, driver, config, LogCrateSink::default())
    }

    /// Closed manager logging through `logger`
    pub fn with_logger(host: H, driver: D, config: WindowConfig, logger: impl LogSink + 'static) -> Self {
        let Resolution { width, height } = Resolution::HANDHELD;
        Self {
            host,
            driver,
            logger: Box::new(logger),
            name: config.name,
            gpu_api: config.gpu_api,
            width,
            height,
            left: 0,
            top: 0,
            fullscreen: true,
            hw_gamma: false,
            external: false,
            window: NativeWindowHandle::INVALID,
            display: DisplayHandle::INVALID,
            surface: SurfaceHandle::INVALID,
            config: ConfigHandle::INVALID,
            context: ContextHandle::INVALID,
            crop: None,
            active: false,
            visible: false,
            closed: true,
            viewports: ViewportNotifier::new(),
            inbox: ModeChangeInbox::new(),
        }
    }

    /// Create the window's surface and context
    ///
    /// `width`, `height` and `fullscreen` are advisory: the window is always
    /// full screen at (0, 0) and sized from the host's operation mode. Any
    /// existing surface is torn down first, so calling this while active simply
    /// rebuilds everything.
    pub fn create(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        fullscreen: bool,
        params: &MiscParams,
    ) -> SurfaceResult<()> {
        self.name = name.to_string();
        self.left = 0;
        self.top = 0;
        self.fullscreen = true;
        self.external = false;
        self.hw_gamma = false;

        self.log(
            Level::Debug,
            &format!("Creating window '{name}' (requested {width}x{height}, fullscreen={fullscreen})"),
        );
        for key in params.keys().filter(|key| OVERRIDDEN_PARAMS.contains(&key.as_str())) {
            self.log(Level::Debug, &format!("Ignoring parameter '{key}', fixed by the platform"));
        }

        self.destroy_surface();
        let window = self.host.default_window();
        self.notify_surface_created(window, ConfigHandle::INVALID)
    }

    /// Tear down the surface, context and display
    ///
    /// Does nothing when already closed. Driver failures are logged and
    /// otherwise ignored; every handle is invalidated regardless.
    pub fn destroy_surface(&mut self) {
        if self.closed {
            return;
        }

        self.release_handles();

        self.active = false;
        self.visible = false;
        self.closed = true;
        self.log(Level::Debug, &format!("Window '{}' surface destroyed", self.name));
    }

    /// Bring up a surface on `window`
    ///
    /// The supplied `config` is not trusted: the config is always reselected
    /// from the fixed attribute list. If no config matches, nothing about the
    /// manager changes; an active surface stays up. The previous surface is
    /// only torn down once a config has been selected.
    pub fn notify_surface_created(&mut self, window: NativeWindowHandle, config: ConfigHandle) -> SurfaceResult<()> {
        if config.is_valid() {
            self.log(Level::Debug, &format!("Ignoring supplied {config:?}, reselecting"));
        }

        let attributes = FramebufferAttributes::fixed(self.gpu_api);
        let display = self.driver.open_display().during(DriverCall::OpenDisplay)?;
        let config = match self.select_config(display, &attributes) {
            Ok(config) => config,
            Err(err) => {
                let terminated = self.driver.terminate_display(display);
                self.suppress(DriverCall::TerminateDisplay, terminated);
                return Err(err);
            }
        };

        self.destroy_surface();

        self.window = window;
        self.host.set_window_dimensions(window, self.width, self.height);
        self.display = display;
        self.config = config;

        if let Err(err) = self.attach_surface() {
            self.log(Level::Error, &format!("Window '{}' bring-up failed: {err}", self.name));
            self.release_handles();
            return Err(err);
        }

        self.handle_mode_change();

        self.active = true;
        self.visible = true;
        self.closed = false;
        Ok(())
    }

    /// Re-read the operation mode and resize the drawable region to match
    ///
    /// The surface is kept; only the crop changes. Every registered viewport is
    /// then told, in registration order, to pull the new dimensions.
    pub fn handle_mode_change(&mut self) {
        let mode = DisplayModeMonitor::new(&self.host).current_mode();
        match mode {
            OperationMode::Handheld => self.log(Level::Info, "Switched to handheld mode."),
            OperationMode::Docked => self.log(Level::Info, "Switched to docked mode."),
        }

        let Resolution { width, height } = mode.resolution();
        self.width = width;
        self.height = height;

        if self.window.is_valid() {
            let crop = CropRect::from_origin(width, height);
            self.host.set_window_crop(self.window, crop);
            self.crop = Some(crop);
        } else {
            self.log(Level::Debug, "No native window bound, skipping crop");
        }

        self.viewports.prune();
        let notified = self.viewports.notify_dimensions_changed(&*self);
        self.log(Level::Trace, &format!("Notified {notified} viewport(s) of {width}x{height}"));
    }

    /// Drain the mode change inbox; call once per engine tick
    ///
    /// Returns true if a mode change was handled.
    pub fn pump_host_events(&mut self) -> bool {
        let Some(posts) = self.inbox.take() else {
            return false;
        };
        if posts > 1 {
            self.log(Level::Debug, &format!("Collapsed {posts} mode change events"));
        }
        self.handle_mode_change();
        true
    }

    /// Handle the host posts mode changes through
    pub fn mode_change_sender(&self) -> ModeChangeSender {
        self.inbox.sender()
    }

    /// Unsupported, the window never moves
    pub fn reposition(&mut self, left: i32, top: i32) {
        self.log(Level::Trace, &format!("Ignoring reposition to ({left}, {top})"));
    }

    /// Unsupported, the size follows the operation mode
    pub fn resize(&mut self, width: u32, height: u32) {
        self.log(Level::Trace, &format!("Ignoring resize to {width}x{height}"));
    }

    /// Unsupported, the window is always full screen
    pub fn switch_full_screen(&mut self, fullscreen: bool) {
        self.log(Level::Trace, &format!("Ignoring fullscreen={fullscreen}"));
    }

    /// Register a viewport for dimension updates
    pub fn add_viewport<V: Viewport + 'static>(&mut self, viewport: &Rc<RefCell<V>>) -> ViewportId {
        self.viewports.register(viewport)
    }

    /// Unregister a viewport
    pub fn remove_viewport(&mut self, id: ViewportId) -> bool {
        self.viewports.remove(id)
    }

    /// Registered viewports
    pub fn viewport_count(&self) -> usize {
        self.viewports.len()
    }

    /// Window name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Surface is up and being rendered to
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Surface is on screen
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Surface, context and display are all torn down
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Drawable width
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Drawable height
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Top-left corner, always (0, 0)
    pub const fn position(&self) -> (i32, i32) {
        (self.left, self.top)
    }

    /// Always true
    pub const fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Hardware gamma correction, always off
    pub const fn is_hw_gamma(&self) -> bool {
        self.hw_gamma
    }

    /// Whether the window came from outside the engine, always false
    pub const fn is_external(&self) -> bool {
        self.external
    }

    /// Crop last applied to the native window
    pub const fn crop(&self) -> Option<CropRect> {
        self.crop
    }

    /// API the context targets
    pub const fn gpu_api(&self) -> GpuApi {
        self.gpu_api
    }

    /// Native window the surface is bound to
    pub const fn native_window(&self) -> NativeWindowHandle {
        self.window
    }

    /// Display connection
    pub const fn display(&self) -> DisplayHandle {
        self.display
    }

    /// Window surface
    pub const fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    /// Selected framebuffer config
    pub const fn config(&self) -> ConfigHandle {
        self.config
    }

    /// GPU context
    pub const fn context(&self) -> ContextHandle {
        self.context
    }

    /// Host platform
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Host platform, mutably
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// GPU driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// GPU driver, mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn select_config(&mut self, display: DisplayHandle, attributes: &FramebufferAttributes) -> SurfaceResult<ConfigHandle> {
        let configs = self
            .driver
            .choose_configs(display, attributes)
            .during(DriverCall::ChooseConfig)?;

        match configs.as_slice() {
            [] => Err(SurfaceError::ConfigSelection { attributes: *attributes }),
            [config] => Ok(*config),
            [config, ..] => {
                self.log(
                    Level::Debug,
                    &format!("{} configs match {attributes}, using the first", configs.len()),
                );
                Ok(*config)
            }
        }
    }

    fn attach_surface(&mut self) -> SurfaceResult<()> {
        self.surface = self
            .driver
            .create_window_surface(self.display, self.config, self.window)
            .during(DriverCall::CreateSurface)?;
        self.context = self
            .driver
            .create_context(self.display, self.config, self.gpu_api)
            .during(DriverCall::CreateContext)?;
        self.driver
            .make_current(self.display, self.surface, self.context)
            .during(DriverCall::MakeCurrent)
    }

    /// Best-effort release of whatever handles are live
    fn release_handles(&mut self) {
        let display = self.display.take();
        let surface = self.surface.take();
        let context = self.context.take();
        self.config = ConfigHandle::INVALID;
        self.window = NativeWindowHandle::INVALID;

        if context.is_valid() {
            if surface.is_valid() {
                let bound = self.driver.make_current(display, surface, context);
                self.suppress(DriverCall::MakeCurrent, bound);
            }
            let released = self.driver.release_resources(context);
            self.suppress(DriverCall::ReleaseResources, released);
        }
        if surface.is_valid() {
            let destroyed = self.driver.destroy_surface(display, surface);
            self.suppress(DriverCall::DestroySurface, destroyed);
        }
        if context.is_valid() {
            let destroyed = self.driver.destroy_context(display, context);
            self.suppress(DriverCall::DestroyContext, destroyed);
        }
        if display.is_valid() {
            let terminated = self.driver.terminate_display(display);
            self.suppress(DriverCall::TerminateDisplay, terminated);
        }
    }

    fn suppress(&self, call: DriverCall, result: Result<(), DriverError>) {
        if let Err(err) = result {
            self.log(Level::Warn, &format!("{call} failed during teardown: {err}"));
        }
    }

    fn log(&self, level: Level, message: &str) {
        self.logger.log(level, message);
    }
}

impl<H: HostPlatform, D: GpuDriver> RenderTarget for SurfaceLifecycleManager<H, D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

impl<H: HostPlatform, D: GpuDriver> Drop for SurfaceLifecycleManager<H, D> {
    fn drop(&mut self) {
        self.destroy_surface();
    }
}
