//! Application module
//!
//! Contains the main egui application, its state and the comparison slider.

mod imagine_app;
pub mod slider;
pub mod state;

pub use imagine_app::ImagineApp;
