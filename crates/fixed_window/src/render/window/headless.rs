//! In-process host and driver
//!
//! [`HeadlessHost`] and [`HeadlessDriver`] implement the backend traits without
//! touching any hardware. The driver tracks every live object it hands out, so
//! leaks and double frees show up as counts, and it can be told to fail a given
//! entry point to exercise error paths.

use std::collections::{HashMap, HashSet};

use super::attributes::{FramebufferAttributes, RenderableType};
use super::backend::{ContextFactory, DisplayDriver, DriverCall, DriverError, HostPlatform};
use super::handle::{ConfigHandle, ContextHandle, CropRect, DisplayHandle, NativeWindowHandle, SurfaceHandle};
use super::inbox::ModeChangeSender;
use super::mode::OperationMode;
use crate::core::config::GpuApi;

/// Host with one native window and a settable operation mode
#[derive(Debug)]
pub struct HeadlessHost {
    window: NativeWindowHandle,
    mode: u32,
    dimensions: Option<(u32, u32)>,
    crop: Option<CropRect>,
    crop_count: usize,
    notifier: Option<ModeChangeSender>,
}

impl HeadlessHost {
    /// Handheld host with a single window
    pub const fn new() -> Self {
        Self {
            window: NativeWindowHandle::from_raw(0x1),
            mode: OperationMode::RAW_HANDHELD,
            dimensions: None,
            crop: None,
            crop_count: 0,
            notifier: None,
        }
    }

    /// Start in `mode`
    #[must_use]
    pub fn with_mode(mut self, mode: OperationMode) -> Self {
        self.mode = mode.raw();
        self
    }

    /// Post to `sender` whenever the mode is changed
    pub fn attach(&mut self, sender: ModeChangeSender) {
        self.notifier = Some(sender);
    }

    /// Report a raw mode value, known or not
    pub fn set_raw_mode(&mut self, raw: u32) {
        self.mode = raw;
        if let Some(notifier) = &self.notifier {
            notifier.post();
        }
    }

    /// Switch to `mode`
    pub fn set_mode(&mut self, mode: OperationMode) {
        self.set_raw_mode(mode.raw());
    }

    /// Plug into the dock
    pub fn dock(&mut self) {
        self.set_mode(OperationMode::Docked);
    }

    /// Pull out of the dock
    pub fn undock(&mut self) {
        self.set_mode(OperationMode::Handheld);
    }

    /// Last dimensions set on the native window
    pub const fn window_dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Last crop applied to the native window
    pub const fn last_crop(&self) -> Option<CropRect> {
        self.crop
    }

    /// How many times the window has been cropped
    pub const fn crop_count(&self) -> usize {
        self.crop_count
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostPlatform for HeadlessHost {
    fn default_window(&mut self) -> NativeWindowHandle {
        self.window
    }

    fn set_window_dimensions(&mut self, _window: NativeWindowHandle, width: u32, height: u32) {
        self.dimensions = Some((width, height));
    }

    fn set_window_crop(&mut self, _window: NativeWindowHandle, crop: CropRect) {
        self.crop = Some(crop);
        self.crop_count += 1;
    }

    fn operation_mode(&self) -> u32 {
        self.mode
    }
}

/// Driver that hands out counters instead of GPU objects
#[derive(Debug)]
pub struct HeadlessDriver {
    next_raw: u64,
    configs: Vec<(ConfigHandle, FramebufferAttributes)>,
    displays: HashSet<DisplayHandle>,
    surfaces: HashMap<SurfaceHandle, NativeWindowHandle>,
    contexts: HashSet<ContextHandle>,
    current: Option<(SurfaceHandle, ContextHandle)>,
    released: Vec<ContextHandle>,
    calls: Vec<DriverCall>,
    failures: Vec<DriverCall>,
}

impl HeadlessDriver {
    /// Driver offering one RGBA8888/D24/S8 config for every GL flavour and one
    /// RGB565/D16 config
    pub fn new() -> Self {
        let full = FramebufferAttributes {
            renderable_type: RenderableType::OPENGL | RenderableType::OPENGL_ES2 | RenderableType::OPENGL_ES3,
            ..FramebufferAttributes::fixed(GpuApi::OpenGl)
        };
        let low = FramebufferAttributes {
            renderable_type: RenderableType::OPENGL_ES2,
            red_size: 5,
            green_size: 6,
            blue_size: 5,
            alpha_size: 0,
            depth_size: 16,
            stencil_size: 0,
        };
        Self::with_configs(vec![low, full])
    }

    /// Driver offering exactly `configs`
    pub fn with_configs(configs: Vec<FramebufferAttributes>) -> Self {
        let mut driver = Self {
            next_raw: 1,
            configs: Vec::new(),
            displays: HashSet::new(),
            surfaces: HashMap::new(),
            contexts: HashSet::new(),
            current: None,
            released: Vec::new(),
            calls: Vec::new(),
            failures: Vec::new(),
        };
        driver.set_configs(configs);
        driver
    }

    /// Replace the configs on offer; handles from earlier configs become unknown
    pub fn set_configs(&mut self, configs: Vec<FramebufferAttributes>) {
        self.configs.clear();
        for attributes in configs {
            let handle = ConfigHandle::from_raw(self.allocate());
            self.configs.push((handle, attributes));
        }
    }

    /// Make the next call to `call` fail
    pub fn fail_next(&mut self, call: DriverCall) {
        self.failures.push(call);
    }

    /// Entry points called so far, in order
    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Displays opened and not yet terminated
    pub fn live_displays(&self) -> usize {
        self.displays.len()
    }

    /// Surfaces created and not yet destroyed
    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Contexts created and not yet destroyed
    pub fn live_contexts(&self) -> usize {
        self.contexts.len()
    }

    /// Context bound on this thread, if any
    pub fn current_context(&self) -> Option<ContextHandle> {
        self.current.map(|(_, context)| context)
    }

    /// Contexts whose GPU resources were released, in order
    pub fn released_contexts(&self) -> &[ContextHandle] {
        &self.released
    }

    /// Window a live surface is bound to
    pub fn surface_window(&self, surface: SurfaceHandle) -> Option<NativeWindowHandle> {
        self.surfaces.get(&surface).copied()
    }

    /// Attributes of a config handed out by this driver
    pub fn config_attributes(&self, config: ConfigHandle) -> Option<FramebufferAttributes> {
        self.configs
            .iter()
            .find(|(handle, _)| *handle == config)
            .map(|(_, attributes)| *attributes)
    }

    fn allocate(&mut self) -> u64 {
        let raw = self.next_raw;
        self.next_raw += 1;
        raw
    }

    fn enter(&mut self, call: DriverCall) -> Result<(), DriverError> {
        self.calls.push(call);
        if let Some(index) = self.failures.iter().position(|&failing| failing == call) {
            self.failures.remove(index);
            return Err(DriverError::new(DriverError::BAD_ALLOC, format!("injected {call} failure")));
        }
        Ok(())
    }

    fn check_display(&self, display: DisplayHandle) -> Result<(), DriverError> {
        if self.displays.contains(&display) {
            Ok(())
        } else {
            Err(DriverError::new(DriverError::BAD_DISPLAY, format!("{display:?} is not open")))
        }
    }
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayDriver for HeadlessDriver {
    fn open_display(&mut self) -> Result<DisplayHandle, DriverError> {
        self.enter(DriverCall::OpenDisplay)?;
        let display = DisplayHandle::from_raw(self.allocate());
        self.displays.insert(display);
        Ok(display)
    }

    fn terminate_display(&mut self, display: DisplayHandle) -> Result<(), DriverError> {
        self.enter(DriverCall::TerminateDisplay)?;
        if self.displays.remove(&display) {
            Ok(())
        } else {
            Err(DriverError::new(DriverError::NOT_INITIALIZED, format!("{display:?} is not open")))
        }
    }

    fn choose_configs(
        &mut self,
        display: DisplayHandle,
        attributes: &FramebufferAttributes,
    ) -> Result<Vec<ConfigHandle>, DriverError> {
        self.enter(DriverCall::ChooseConfig)?;
        self.check_display(display)?;
        Ok(self
            .configs
            .iter()
            .filter(|(_, available)| attributes.is_satisfied_by(available))
            .map(|(handle, _)| *handle)
            .collect())
    }

    fn create_window_surface(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        window: NativeWindowHandle,
    ) -> Result<SurfaceHandle, DriverError> {
        self.enter(DriverCall::CreateSurface)?;
        self.check_display(display)?;
        if self.config_attributes(config).is_none() {
            return Err(DriverError::new(DriverError::BAD_CONFIG, format!("{config:?} is unknown")));
        }
        if !window.is_valid() {
            return Err(DriverError::new(DriverError::BAD_NATIVE_WINDOW, "no native window"));
        }
        let surface = SurfaceHandle::from_raw(self.allocate());
        self.surfaces.insert(surface, window);
        Ok(surface)
    }

    fn destroy_surface(&mut self, display: DisplayHandle, surface: SurfaceHandle) -> Result<(), DriverError> {
        self.enter(DriverCall::DestroySurface)?;
        self.check_display(display)?;
        if self.surfaces.remove(&surface).is_none() {
            return Err(DriverError::new(DriverError::BAD_SURFACE, format!("{surface:?} is not live")));
        }
        if matches!(self.current, Some((bound, _)) if bound == surface) {
            self.current = None;
        }
        Ok(())
    }
}

impl ContextFactory for HeadlessDriver {
    fn create_context(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        api: GpuApi,
    ) -> Result<ContextHandle, DriverError> {
        self.enter(DriverCall::CreateContext)?;
        self.check_display(display)?;
        let Some(attributes) = self.config_attributes(config) else {
            return Err(DriverError::new(DriverError::BAD_CONFIG, format!("{config:?} is unknown")));
        };
        if !attributes.renderable_type.contains(api.renderable_type()) {
            return Err(DriverError::new(DriverError::BAD_CONFIG, format!("{config:?} cannot render {api:?}")));
        }
        let context = ContextHandle::from_raw(self.allocate());
        self.contexts.insert(context);
        Ok(context)
    }

    fn make_current(
        &mut self,
        display: DisplayHandle,
        surface: SurfaceHandle,
        context: ContextHandle,
    ) -> Result<(), DriverError> {
        self.enter(DriverCall::MakeCurrent)?;
        self.check_display(display)?;
        if !self.surfaces.contains_key(&surface) {
            return Err(DriverError::new(DriverError::BAD_SURFACE, format!("{surface:?} is not live")));
        }
        if !self.contexts.contains(&context) {
            return Err(DriverError::new(DriverError::BAD_CONTEXT, format!("{context:?} is not live")));
        }
        self.current = Some((surface, context));
        Ok(())
    }

    fn release_resources(&mut self, context: ContextHandle) -> Result<(), DriverError> {
        self.enter(DriverCall::ReleaseResources)?;
        if self.current_context() != Some(context) {
            return Err(DriverError::new(DriverError::BAD_CONTEXT, format!("{context:?} is not current")));
        }
        self.released.push(context);
        Ok(())
    }

    fn destroy_context(&mut self, display: DisplayHandle, context: ContextHandle) -> Result<(), DriverError> {
        self.enter(DriverCall::DestroyContext)?;
        self.check_display(display)?;
        if !self.contexts.remove(&context) {
            return Err(DriverError::new(DriverError::BAD_CONTEXT, format!("{context:?} is not live")));
        }
        if self.current_context() == Some(context) {
            self.current = None;
        }
        Ok(())
    }
}
