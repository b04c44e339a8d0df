//! Window surface errors

use thiserror::Error;

use super::attributes::FramebufferAttributes;
use super::backend::{DriverCall, DriverError};

/// Failures surfaced by surface bring-up
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// The fixed attribute list matched no framebuffer config
    #[error("no framebuffer config matches {attributes}")]
    ConfigSelection {
        /// Attributes that were requested
        attributes: FramebufferAttributes,
    },

    /// A driver create/bind call failed
    #[error("{call} failed: {source}")]
    DriverCall {
        /// Entry point that failed
        call: DriverCall,
        /// Driver-reported cause
        #[source]
        source: DriverError,
    },
}

/// Result type for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Tag driver results with the entry point they came from
pub(crate) trait DriverResultExt<T> {
    fn during(self, call: DriverCall) -> SurfaceResult<T>;
}

impl<T> DriverResultExt<T> for Result<T, DriverError> {
    fn during(self, call: DriverCall) -> SurfaceResult<T> {
        self.map_err(|source| SurfaceError::DriverCall { call, source })
    }
}
