//! Utility module
//!
//! Color helpers and file intake/download.

pub mod color;
pub mod file;
