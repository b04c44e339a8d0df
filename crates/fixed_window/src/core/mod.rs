//! Core engine types
//!
//! Houses the unified configuration used to construct a window.

pub mod config;
