//! Render module
//!
//! Contains the overlay compositor, text rasterization, texture loading
//! and icon painting.

pub mod artifact;
pub mod compositor;
pub mod icons;
pub mod image_loader;
pub mod text_renderer;

pub use artifact::ImageArtifact;
pub use compositor::{apply_overlay, auto_font_size, Anchor, TextOverlaySpec};
pub use icons::{icon, paint_icon, IconId};
pub use image_loader::{contain_rect, full_uv, ImageLoader};
pub use text_renderer::{FontBook, FontFamily};
