//! Artifact decoding and texture management
//!
//! Converts encoded artifacts into egui textures, caching one texture per
//! display slot, and fits images into containers.

use std::collections::HashMap;

use egui::{Color32, ColorImage, Context, Pos2, Rect, TextureHandle, TextureOptions, Vec2};
use tracing::{info, warn};

use super::artifact::ImageArtifact;

/// A decoded texture and the artifact it came from
struct CachedTexture {
    artifact: ImageArtifact,
    handle: TextureHandle,
}

/// Texture cache keyed by display slot (e.g. "generated", "original")
#[derive(Default)]
pub struct ImageLoader {
    textures: HashMap<String, CachedTexture>,
}

impl ImageLoader {
    /// Create a new image loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `artifact` in `slot`, decoding only when the artifact changed
    pub fn texture_for(&mut self, ctx: &Context, slot: &str, artifact: &ImageArtifact) -> Option<&TextureHandle> {
        let stale = self
            .textures
            .get(slot)
            .map(|cached| !cached.artifact.shares_payload(artifact))
            .unwrap_or(true);

        if stale {
            let color_image = match artifact_to_color_image(artifact) {
                Some(image) => image,
                None => {
                    self.textures.remove(slot);
                    return None;
                }
            };
            let size = color_image.size;
            let handle = ctx.load_texture(slot, color_image, TextureOptions::LINEAR);
            info!("Loaded texture '{}' ({}x{})", slot, size[0], size[1]);
            self.textures.insert(
                slot.to_string(),
                CachedTexture {
                    artifact: artifact.clone(),
                    handle,
                },
            );
        }

        self.textures.get(slot).map(|cached| &cached.handle)
    }
}

/// Decode an artifact into an egui image
pub fn artifact_to_color_image(artifact: &ImageArtifact) -> Option<ColorImage> {
    let img = match artifact.decode() {
        Ok(img) => img,
        Err(e) => {
            warn!("Failed to decode {} artifact: {}", artifact.mime_type(), e);
            return None;
        }
    };

    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels: Vec<Color32> = rgba
        .pixels()
        .map(|p| Color32::from_rgba_unmultiplied(p[0], p[1], p[2], p[3]))
        .collect();

    Some(ColorImage { size, pixels })
}

/// Largest rect with the image's aspect ratio that fits inside `container`, centered.
///
/// Both layers of the comparison view go through this, so the same subject
/// pixel lands at the same screen position in each.
pub fn contain_rect(image_size: [usize; 2], container: Rect) -> Rect {
    let [w, h] = image_size;
    if w == 0 || h == 0 || container.width() <= 0.0 || container.height() <= 0.0 {
        return Rect::from_center_size(container.center(), Vec2::ZERO);
    }

    let scale = (container.width() / w as f32).min(container.height() / h as f32);
    let size = Vec2::new(w as f32 * scale, h as f32 * scale);
    Rect::from_center_size(container.center(), size)
}

/// Full-texture UV rect
pub fn full_uv() -> Rect {
    Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_contain_rect_wide_image() {
        let container = Rect::from_min_size(Pos2::new(100.0, 0.0), Vec2::new(400.0, 400.0));
        let fitted = contain_rect([800, 400], container);
        assert_eq!(fitted.width(), 400.0);
        assert_eq!(fitted.height(), 200.0);
        assert_eq!(fitted.center(), container.center());
    }

    #[test]
    fn test_contain_rect_tall_image() {
        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 200.0));
        let fitted = contain_rect([100, 200], container);
        assert_eq!(fitted.height(), 200.0);
        assert_eq!(fitted.width(), 100.0);
        assert_eq!(fitted.min.x, 150.0);
    }

    #[test]
    fn test_contain_rect_same_for_same_size() {
        let container = Rect::from_min_size(Pos2::new(7.0, 3.0), Vec2::new(640.0, 360.0));
        assert_eq!(contain_rect([1024, 1024], container), contain_rect([1024, 1024], container));
    }

    #[test]
    fn test_contain_rect_degenerate() {
        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(0.0, 100.0));
        assert_eq!(contain_rect([10, 10], container).area(), 0.0);
        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 100.0));
        assert_eq!(contain_rect([0, 10], container).area(), 0.0);
    }

    fn red_png(width: u32, height: u32) -> ImageArtifact {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        ImageArtifact::new(bytes, "image/png")
    }

    #[test]
    fn test_texture_reused_for_same_artifact() {
        let ctx = Context::default();
        let mut loader = ImageLoader::new();
        let artifact = red_png(4, 2);

        let first = loader.texture_for(&ctx, "original", &artifact).unwrap().id();
        let again = loader.texture_for(&ctx, "original", &artifact.clone()).unwrap().id();
        assert_eq!(first, again);

        // Equal bytes in a fresh allocation count as a new image
        let copy = ImageArtifact::new(artifact.bytes().to_vec(), "image/png");
        let replaced = loader.texture_for(&ctx, "original", &copy).unwrap();
        assert_ne!(replaced.id(), first);
        assert_eq!(replaced.size(), [4, 2]);
    }

    #[test]
    fn test_slots_are_independent() {
        let ctx = Context::default();
        let mut loader = ImageLoader::new();
        let artifact = red_png(3, 3);

        let original = loader.texture_for(&ctx, "original", &artifact).unwrap().id();
        let edited = loader.texture_for(&ctx, "edited", &artifact).unwrap().id();
        assert_ne!(original, edited);
        assert_eq!(loader.texture_for(&ctx, "original", &artifact).unwrap().id(), original);

        let bad = ImageArtifact::new(b"nope".to_vec(), "image/png");
        assert!(loader.texture_for(&ctx, "original", &bad).is_none());
    }

    #[test]
    fn test_artifact_to_color_image() {
        let color = artifact_to_color_image(&red_png(4, 2)).unwrap();
        assert_eq!(color.size, [4, 2]);
        assert_eq!(color.pixels[0], Color32::from_rgb(255, 0, 0));

        let bad = ImageArtifact::new(b"nope".to_vec(), "image/png");
        assert!(artifact_to_color_image(&bad).is_none());
    }
}
