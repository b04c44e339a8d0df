//! Foundation module - Core utilities shared by the window subsystem
//!
//! - Logging facade re-exports and the injectable log sink

pub mod logging;
