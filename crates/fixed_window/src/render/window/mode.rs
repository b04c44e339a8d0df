//! Host operation mode and the resolution it implies

use serde::{Deserialize, Serialize};

use super::backend::HostPlatform;

/// Physical display configuration reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationMode {
    /// Built-in screen
    #[default]
    Handheld,
    /// External display through the dock
    Docked,
}

impl OperationMode {
    /// Raw host value for handheld mode
    pub const RAW_HANDHELD: u32 = 0;
    /// Raw host value for docked mode
    pub const RAW_DOCKED: u32 = 1;

    /// Interpret a raw host value; anything unknown is treated as handheld
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            Self::RAW_DOCKED => Self::Docked,
            _ => Self::Handheld,
        }
    }

    /// Raw host value
    pub const fn raw(self) -> u32 {
        match self {
            Self::Handheld => Self::RAW_HANDHELD,
            Self::Docked => Self::RAW_DOCKED,
        }
    }

    /// Fixed drawable resolution for this mode
    pub const fn resolution(self) -> Resolution {
        match self {
            Self::Handheld => Resolution::HANDHELD,
            Self::Docked => Resolution::DOCKED,
        }
    }
}

/// Drawable size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// 720p handheld screen
    pub const HANDHELD: Self = Self { width: 1280, height: 720 };
    /// 1080p docked output
    pub const DOCKED: Self = Self { width: 1920, height: 1080 };
}

/// Read-only view of the host's current operation mode
pub struct DisplayModeMonitor<'a, H: HostPlatform + ?Sized> {
    host: &'a H,
}

impl<'a, H: HostPlatform + ?Sized> DisplayModeMonitor<'a, H> {
    /// Monitor `host`
    pub const fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Mode the host reports right now
    pub fn current_mode(&self) -> OperationMode {
        OperationMode::from_raw(self.host.operation_mode())
    }

    /// Resolution for the current mode
    pub fn current_resolution(&self) -> Resolution {
        self.current_mode().resolution()
    }
}
