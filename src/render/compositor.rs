//! Text overlay compositor
//!
//! Rasterizes a caption onto a copy of a base image and encodes the result
//! as a new PNG artifact. The base artifact is never touched; callers keep
//! it around so every overlay starts from a clean image.

use std::io::Cursor;
use std::time::Instant;

use image::imageops;
use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::artifact::ImageArtifact;
use super::text_renderer::{FontBook, FontFamily, LineExtent, TextMask};
use crate::error::{AppError, AppResult};
use crate::utils::color::blend_over;

/// Drop shadow opacity (black)
const SHADOW_ALPHA: f32 = 0.7;
/// Drop shadow offset in pixels, both axes
const SHADOW_OFFSET: i64 = 2;
/// Drop shadow blur; Gaussian sigma is half of it
const SHADOW_BLUR: f32 = 4.0;

/// Smallest automatic font size
pub const MIN_AUTO_FONT_SIZE: u32 = 24;
/// Font size range offered by the size slider
pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<u32> = 10..=400;

/// Horizontal part of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

/// Vertical part of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Top,
    Middle,
    Bottom,
}

/// Caption anchor: one of nine positions on the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAnchor,
}

impl Default for Anchor {
    fn default() -> Self {
        Self::new(VerticalAnchor::Bottom, HorizontalAnchor::Center)
    }
}

impl Anchor {
    pub const fn new(vertical: VerticalAnchor, horizontal: HorizontalAnchor) -> Self {
        Self { vertical, horizontal }
    }

    /// All anchors in row-major order, top-left first
    pub const ALL: [Anchor; 9] = [
        Anchor::new(VerticalAnchor::Top, HorizontalAnchor::Left),
        Anchor::new(VerticalAnchor::Top, HorizontalAnchor::Center),
        Anchor::new(VerticalAnchor::Top, HorizontalAnchor::Right),
        Anchor::new(VerticalAnchor::Middle, HorizontalAnchor::Left),
        Anchor::new(VerticalAnchor::Middle, HorizontalAnchor::Center),
        Anchor::new(VerticalAnchor::Middle, HorizontalAnchor::Right),
        Anchor::new(VerticalAnchor::Bottom, HorizontalAnchor::Left),
        Anchor::new(VerticalAnchor::Bottom, HorizontalAnchor::Center),
        Anchor::new(VerticalAnchor::Bottom, HorizontalAnchor::Right),
    ];

    /// Identifier such as `bottom-center`
    pub fn id(&self) -> String {
        let v = match self.vertical {
            VerticalAnchor::Top => "top",
            VerticalAnchor::Middle => "middle",
            VerticalAnchor::Bottom => "bottom",
        };
        let h = match self.horizontal {
            HorizontalAnchor::Left => "left",
            HorizontalAnchor::Center => "center",
            HorizontalAnchor::Right => "right",
        };
        format!("{}-{}", v, h)
    }

    /// Index into `ALL`, matching the order of the position labels
    pub fn index(&self) -> usize {
        let row = match self.vertical {
            VerticalAnchor::Top => 0,
            VerticalAnchor::Middle => 1,
            VerticalAnchor::Bottom => 2,
        };
        let col = match self.horizontal {
            HorizontalAnchor::Left => 0,
            HorizontalAnchor::Center => 1,
            HorizontalAnchor::Right => 2,
        };
        row * 3 + col
    }
}

/// Horizontal text alignment relative to the anchor x
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
    End,
}

/// Which line of the text box sits on the anchor y
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

/// Resolved anchor point and alignment for a caption
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub x: f32,
    pub y: f32,
}

/// Resolve an anchor on a `width` x `height` image.
///
/// The edge margin equals the font size.
pub fn resolve_anchor(anchor: Anchor, font_size: u32, width: u32, height: u32) -> TextPlacement {
    let margin = font_size as f32;
    let (w, h) = (width as f32, height as f32);

    let (align, x) = match anchor.horizontal {
        HorizontalAnchor::Left => (TextAlign::Start, margin),
        HorizontalAnchor::Center => (TextAlign::Center, w / 2.0),
        HorizontalAnchor::Right => (TextAlign::End, w - margin),
    };
    let (baseline, y) = match anchor.vertical {
        VerticalAnchor::Top => (TextBaseline::Top, margin),
        VerticalAnchor::Middle => (TextBaseline::Middle, h / 2.0),
        VerticalAnchor::Bottom => (TextBaseline::Bottom, h - margin),
    };

    TextPlacement { align, baseline, x, y }
}

/// Initial font size for a freshly loaded image of the given width
pub fn auto_font_size(image_width: u32) -> u32 {
    MIN_AUTO_FONT_SIZE.max(image_width / 20)
}

/// Caption text and styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlaySpec {
    pub text: String,
    pub font: FontFamily,
    /// Fill color, RGB
    pub color: [u8; 3],
    pub font_size: u32,
    pub anchor: Anchor,
}

impl Default for TextOverlaySpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontFamily::Arial,
            color: [255, 255, 255],
            font_size: 60,
            anchor: Anchor::default(),
        }
    }
}

/// Top-left corner of a full line of text placed at `placement`
fn line_origin(placement: &TextPlacement, extent: LineExtent) -> (i64, i64) {
    let (w, h) = (extent.width as f32, extent.height as f32);
    let left = match placement.align {
        TextAlign::Start => placement.x,
        TextAlign::Center => placement.x - w / 2.0,
        TextAlign::End => placement.x - w,
    };
    let top = match placement.baseline {
        TextBaseline::Top => placement.y,
        TextBaseline::Middle => placement.y - h / 2.0,
        TextBaseline::Bottom => placement.y - h,
    };
    (left.round() as i64, top.round() as i64)
}

/// Padding the blurred shadow needs around the mask
fn shadow_pad() -> i64 {
    (SHADOW_BLUR / 2.0 * 3.0).ceil() as i64
}

/// Blurred copy of the mask, padded so the blur is not clipped.
/// Returns the blurred mask and its padding.
fn shadow_mask(mask: &TextMask) -> (GrayImage, i64) {
    let sigma = SHADOW_BLUR / 2.0;
    let pad = shadow_pad() as u32;
    let mut padded = GrayImage::new(mask.width() as u32 + pad * 2, mask.height() as u32 + pad * 2);
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let value = mask.coverage(x as i64, y as i64);
            if value > 0 {
                padded.put_pixel(x as u32 + pad, y as u32 + pad, Luma([value]));
            }
        }
    }
    (imageops::blur(&padded, sigma), pad as i64)
}

/// Composite a single-channel coverage source onto the canvas
fn paint_coverage<F>(canvas: &mut RgbaImage, origin: (i64, i64), size: (usize, usize), color: [u8; 4], coverage: F)
where
    F: Fn(i64, i64) -> u8,
{
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    let x0 = origin.0.max(0);
    let y0 = origin.1.max(0);
    let x1 = (origin.0 + size.0 as i64).min(cw);
    let y1 = (origin.1 + size.1 as i64).min(ch);

    for y in y0..y1 {
        for x in x0..x1 {
            let value = coverage(x - origin.0, y - origin.1);
            if value == 0 {
                continue;
            }
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            pixel.0 = blend_over(pixel.0, color, value as f32 / 255.0);
        }
    }
}

/// Draw `spec` onto a copy of `base` and encode the result as PNG.
///
/// Empty text returns `base` unchanged without decoding it.
pub fn apply_overlay(base: &ImageArtifact, spec: &TextOverlaySpec, fonts: &FontBook) -> AppResult<ImageArtifact> {
    if spec.text.is_empty() {
        return Ok(base.clone());
    }

    let started = Instant::now();
    let mut canvas = base.decode()?.to_rgba8();
    draw_overlay(&mut canvas, spec, fonts)?;

    let (width, height) = canvas.dimensions();
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| AppError::Render(e.to_string()))?;

    debug!(
        "Overlay '{}' ({} {}px {}, {}) on {}x{} in {:?}",
        spec.text,
        spec.font,
        spec.font_size,
        if fonts.has_outline(spec.font) { "outline" } else { "bitmap" },
        spec.anchor.id(),
        width,
        height,
        started.elapsed()
    );

    Ok(ImageArtifact::new(bytes, "image/png"))
}

/// Draw the caption and its shadow onto `canvas` in place
///
/// Only the columns of the line that can reach the canvas are rasterized.
pub fn draw_overlay(canvas: &mut RgbaImage, spec: &TextOverlaySpec, fonts: &FontBook) -> AppResult<()> {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return Err(AppError::Render(format!("cannot draw on a {}x{} surface", width, height)));
    }

    let font_size = spec.font_size as f32;
    let extent = fonts.measure(&spec.text, spec.font, font_size);
    let placement = resolve_anchor(spec.anchor, spec.font_size, width, height);
    let origin = line_origin(&placement, extent);

    // The shadow blur reads this far past the canvas edge
    let reach = shadow_pad() + SHADOW_OFFSET + 1;
    let columns = (-origin.0 - reach)..(width as i64 - origin.0 + reach);
    let mask = fonts.rasterize_columns(&spec.text, spec.font, font_size, true, columns);
    let mask_origin = (origin.0 + mask.left(), origin.1);

    // Shadow first, then the fill on top of it
    if !mask.is_empty() {
        let (shadow, pad) = shadow_mask(&mask);
        let shadow_origin = (mask_origin.0 - pad + SHADOW_OFFSET, mask_origin.1 - pad + SHADOW_OFFSET);
        let shadow_color = [0, 0, 0, (SHADOW_ALPHA * 255.0).round() as u8];
        paint_coverage(
            canvas,
            shadow_origin,
            (shadow.width() as usize, shadow.height() as usize),
            shadow_color,
            |x, y| shadow.get_pixel(x as u32, y as u32)[0],
        );
    }

    let [r, g, b] = spec.color;
    paint_coverage(
        canvas,
        mask_origin,
        (mask.width(), mask.height()),
        [r, g, b, 255],
        |x, y| mask.coverage(x, y),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid_png(width: u32, height: u32, color: [u8; 4]) -> ImageArtifact {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        ImageArtifact::new(bytes, "image/png")
    }

    fn spec(text: &str, anchor: Anchor) -> TextOverlaySpec {
        TextOverlaySpec {
            text: text.to_string(),
            font_size: 16,
            anchor,
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_anchor_bottom_center() {
        let anchor = Anchor::default();
        let placement = resolve_anchor(anchor, 60, 1000, 500);
        assert_eq!(placement.baseline, TextBaseline::Bottom);
        assert_eq!(placement.align, TextAlign::Center);
        assert_eq!(placement.x, 500.0);
        assert_eq!(placement.y, 440.0);
    }

    #[test]
    fn test_resolve_anchor_corners() {
        let top_left = resolve_anchor(Anchor::ALL[0], 30, 800, 600);
        assert_eq!((top_left.align, top_left.baseline), (TextAlign::Start, TextBaseline::Top));
        assert_eq!((top_left.x, top_left.y), (30.0, 30.0));

        let middle_right = resolve_anchor(Anchor::ALL[5], 30, 800, 600);
        assert_eq!((middle_right.align, middle_right.baseline), (TextAlign::End, TextBaseline::Middle));
        assert_eq!((middle_right.x, middle_right.y), (770.0, 300.0));
    }

    #[test]
    fn test_anchor_ids() {
        for (index, anchor) in Anchor::ALL.iter().enumerate() {
            assert_eq!(anchor.index(), index);
        }
        assert_eq!(Anchor::default().id(), "bottom-center");
        assert_eq!(Anchor::ALL[0].id(), "top-left");
    }

    #[test]
    fn test_auto_font_size() {
        assert_eq!(auto_font_size(800), 40);
        assert_eq!(auto_font_size(810), 40);
        assert_eq!(auto_font_size(300), 24);
        assert_eq!(auto_font_size(0), 24);
    }

    #[test]
    fn test_empty_text_returns_base() {
        let base = solid_png(20, 20, [1, 2, 3, 255]);
        let out = apply_overlay(&base, &spec("", Anchor::default()), &FontBook::bitmap_only()).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn test_overlay_draws_text_and_keeps_base() {
        let base = solid_png(200, 100, [0, 0, 255, 255]);
        let before = base.clone();
        let fonts = FontBook::bitmap_only();
        let out = apply_overlay(&base, &spec("HELLO", Anchor::default()), &fonts).unwrap();

        assert_eq!(base, before);
        assert_ne!(out, base);
        assert_eq!(out.mime_type(), "image/png");

        let img = out.decode().unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (200, 100));
        // White fill somewhere in the caption row above the bottom margin
        let has_white = (60..84).any(|y| (0..200).any(|x| img.get_pixel(x, y).0 == [255, 255, 255, 255]));
        assert!(has_white);
        // Top-left corner is untouched
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_shadow_darkens_below_right() {
        let base = solid_png(120, 60, [255, 255, 255, 255]);
        let spec = TextOverlaySpec {
            text: "I".to_string(),
            color: [255, 255, 255],
            font_size: 24,
            anchor: Anchor::new(VerticalAnchor::Middle, HorizontalAnchor::Center),
            ..Default::default()
        };
        let out = apply_overlay(&base, &spec, &FontBook::bitmap_only()).unwrap();
        let img = out.decode().unwrap().to_rgba8();
        // White text on white: only the shadow can change pixels
        let darkened = img.pixels().any(|p| p.0[0] < 200);
        assert!(darkened);
    }

    #[test]
    fn test_overlays_do_not_compound_from_base() {
        let base = solid_png(160, 80, [20, 20, 20, 255]);
        let fonts = FontBook::bitmap_only();
        let a = spec("AAAA", Anchor::ALL[0]);
        let b = spec("B", Anchor::ALL[8]);

        let from_base = apply_overlay(&base, &b, &fonts).unwrap();
        let again = apply_overlay(&base, &b, &fonts).unwrap();
        assert_eq!(from_base, again);

        // Stacking on an annotated image keeps the old caption
        let stacked = apply_overlay(&apply_overlay(&base, &a, &fonts).unwrap(), &b, &fonts).unwrap();
        assert_ne!(stacked, from_base);
    }

    #[test]
    fn test_zero_size_surface_is_render_error() {
        let mut canvas = RgbaImage::new(0, 0);
        let result = draw_overlay(&mut canvas, &spec("x", Anchor::default()), &FontBook::bitmap_only());
        assert!(matches!(result, Err(AppError::Render(_))));
    }

    #[test]
    fn test_long_caption_clipped_to_canvas() {
        let fonts = FontBook::bitmap_only();
        let caption = |text: String| TextOverlaySpec {
            text,
            font_size: 64,
            anchor: Anchor::new(VerticalAnchor::Middle, HorizontalAnchor::Center),
            ..Default::default()
        };

        // Both lines are centered on a W cell, so the canvas sees the same pixels
        let mut long = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 255, 255]));
        draw_overlay(&mut long, &caption("W".repeat(1001)), &fonts).unwrap();
        let mut short = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 255, 255]));
        draw_overlay(&mut short, &caption("WWW".to_string()), &fonts).unwrap();

        assert_eq!(long, short);
        assert!(long.pixels().any(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_pasted_caption_on_small_image() {
        let base = solid_png(64, 64, [0, 0, 0, 255]);
        let spec = TextOverlaySpec {
            text: "W".repeat(1000),
            font_size: 200,
            ..Default::default()
        };
        let out = apply_overlay(&base, &spec, &FontBook::bitmap_only()).unwrap();
        assert_eq!(out.dimensions().unwrap(), (64, 64));
    }

    #[test]
    fn test_decode_error() {
        let base = ImageArtifact::new(b"definitely not a png".to_vec(), "image/png");
        let result = apply_overlay(&base, &spec("x", Anchor::default()), &FontBook::bitmap_only());
        assert!(matches!(result, Err(AppError::Decode(_))));
    }
}
