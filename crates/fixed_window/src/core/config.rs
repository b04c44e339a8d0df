//! # Window Configuration
//!
//! Settings used to construct a [`SurfaceLifecycleManager`]. Most window
//! parameters are fixed by the platform; the requested size and fullscreen
//! flag are kept so they can be logged and compared, but the manager always
//! overrides them.
//!
//! [`SurfaceLifecycleManager`]: crate::render::window::SurfaceLifecycleManager

use std::collections::BTreeMap;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::render::window::RenderableType;

/// GPU API the surface's context is created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GpuApi {
    /// Desktop OpenGL
    #[default]
    OpenGl,
    /// OpenGL ES 2.x
    OpenGlEs2,
    /// OpenGL ES 3.x
    OpenGlEs3,
}

impl GpuApi {
    /// Renderable-type bit a framebuffer config must carry for this API
    pub const fn renderable_type(self) -> RenderableType {
        match self {
            Self::OpenGl => RenderableType::OPENGL,
            Self::OpenGlEs2 => RenderableType::OPENGL_ES2,
            Self::OpenGlEs3 => RenderableType::OPENGL_ES3,
        }
    }
}

/// Window construction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window name used in log messages
    pub name: String,
    /// Width the application asked for (advisory)
    pub requested_width: u32,
    /// Height the application asked for (advisory)
    pub requested_height: u32,
    /// Fullscreen flag the application asked for (advisory)
    pub fullscreen: bool,
    /// API the GPU context targets
    pub gpu_api: GpuApi,
    /// `env_logger` filter level
    pub log_level: String,
    /// Extra name/value parameters passed through to `create`
    pub options: BTreeMap<String, String>,
}

impl WindowConfig {
    /// Create a configuration with the given window name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the requested size
    #[must_use]
    pub fn with_requested_size(mut self, width: u32, height: u32) -> Self {
        self.requested_width = width;
        self.requested_height = height;
        self
    }

    /// Set the GPU API
    #[must_use]
    pub fn with_gpu_api(mut self, gpu_api: GpuApi) -> Self {
        self.gpu_api = gpu_api;
        self
    }

    /// Add a name/value parameter
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Parsed log level
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.log_level)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("window name cannot be empty".to_string()));
        }
        self.level_filter()?;
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            name: "main".to_string(),
            requested_width: 1280,
            requested_height: 720,
            fullscreen: true,
            gpu_api: GpuApi::default(),
            log_level: "info".to_string(),
            options: BTreeMap::new(),
        }
    }
}

impl Config for WindowConfig {}
