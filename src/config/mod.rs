//! Configuration module
//!
//! Contains the JSON-backed application configuration.

mod app_config;

pub use app_config::*;
