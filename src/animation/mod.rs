//! Animation module
//!
//! Time-driven UI state: the loading message ticker.

mod ticker;

pub use ticker::LoadingTicker;
