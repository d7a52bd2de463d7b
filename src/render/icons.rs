//! Icon painter
//!
//! Every icon is a short list of primitives in a 24x24 view box, painted
//! by one function. Adding a glyph means adding a table entry.

use egui::{Color32, Painter, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2};

use crate::api::AspectRatio;

/// View box edge length the primitive coordinates are expressed in
const VIEW_BOX: f32 = 24.0;
/// Stroke width in view box units
const STROKE_WIDTH: f32 = 1.5;

/// Icon identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconId {
    Logo,
    Generate,
    Edit,
    Image,
    MagicWand,
    Upload,
    RemoveBg,
    Upscale,
    ColorPalette,
    Download,
    Text,
    Slider,
    Ratio1x1,
    Ratio16x9,
    Ratio9x16,
    Ratio4x3,
    Ratio3x4,
}

impl IconId {
    /// Icon drawn on an aspect-ratio button
    pub fn for_aspect_ratio(ratio: AspectRatio) -> Self {
        match ratio {
            AspectRatio::Square => IconId::Ratio1x1,
            AspectRatio::Landscape16x9 => IconId::Ratio16x9,
            AspectRatio::Portrait9x16 => IconId::Ratio9x16,
            AspectRatio::Landscape4x3 => IconId::Ratio4x3,
            AspectRatio::Portrait3x4 => IconId::Ratio3x4,
        }
    }
}

/// Drawing primitive in view box coordinates
#[derive(Debug, Clone, Copy)]
enum Primitive {
    /// Open stroked path
    Line(&'static [(f32, f32)]),
    /// Filled convex polygon
    Fill(&'static [(f32, f32)]),
    /// Stroked rectangle: x, y, width, height
    Frame(f32, f32, f32, f32),
    /// Stroked circle: center x, center y, radius
    Ring(f32, f32, f32),
}

use Primitive::{Fill, Frame, Line, Ring};

static LOGO: &[Primitive] = &[
    Fill(&[(12.0, 12.0), (10.0, 10.0), (12.0, 2.0), (14.0, 10.0)]),
    Fill(&[(12.0, 12.0), (14.0, 10.0), (22.0, 12.0), (14.0, 14.0)]),
    Fill(&[(12.0, 12.0), (14.0, 14.0), (12.0, 22.0), (10.0, 14.0)]),
    Fill(&[(12.0, 12.0), (10.0, 14.0), (2.0, 12.0), (10.0, 10.0)]),
];

static GENERATE: &[Primitive] = &[
    Line(&[
        (9.0, 5.25), (10.5, 10.5), (15.75, 12.0), (10.5, 13.5),
        (9.0, 18.75), (7.5, 13.5), (2.25, 12.0), (7.5, 10.5), (9.0, 5.25),
    ]),
    Line(&[(18.0, 2.25), (18.75, 5.25), (21.75, 6.0), (18.75, 6.75), (18.0, 9.75), (17.25, 6.75), (14.25, 6.0), (17.25, 5.25), (18.0, 2.25)]),
];

static EDIT: &[Primitive] = &[
    Line(&[(16.9, 4.5), (19.5, 7.1), (9.0, 17.6), (6.0, 18.0), (6.4, 15.0), (16.9, 4.5)]),
    Line(&[(18.0, 14.0), (18.0, 21.0), (3.0, 21.0), (3.0, 6.0), (10.0, 6.0)]),
];

static IMAGE: &[Primitive] = &[
    Frame(2.25, 4.5, 19.5, 15.0),
    Line(&[(2.25, 15.75), (7.4, 10.6), (15.75, 19.5)]),
    Line(&[(14.25, 14.25), (16.9, 11.6), (21.75, 16.5)]),
    Ring(14.25, 8.25, 0.75),
];

static MAGIC_WAND: &[Primitive] = &[
    Line(&[(3.0, 21.0), (13.5, 10.5)]),
    Line(&[(17.0, 3.0), (18.0, 6.0), (21.0, 7.0), (18.0, 8.0), (17.0, 11.0), (16.0, 8.0), (13.0, 7.0), (16.0, 6.0), (17.0, 3.0)]),
];

static UPLOAD: &[Primitive] = &[
    Line(&[(3.0, 16.5), (3.0, 21.0), (21.0, 21.0), (21.0, 16.5)]),
    Line(&[(7.5, 7.5), (12.0, 3.0), (16.5, 7.5)]),
    Line(&[(12.0, 3.0), (12.0, 16.5)]),
];

static DOWNLOAD: &[Primitive] = &[
    Line(&[(3.0, 16.5), (3.0, 21.0), (21.0, 21.0), (21.0, 16.5)]),
    Line(&[(7.5, 12.0), (12.0, 16.5), (16.5, 12.0)]),
    Line(&[(12.0, 16.5), (12.0, 3.0)]),
];

static REMOVE_BG: &[Primitive] = &[
    Ring(12.0, 12.75, 3.75),
    Ring(12.0, 12.0, 7.5),
    Line(&[(5.0, 19.5), (19.0, 19.5)]),
];

static UPSCALE: &[Primitive] = &[
    Line(&[(3.75, 8.25), (3.75, 3.75), (8.25, 3.75)]),
    Line(&[(3.75, 3.75), (9.0, 9.0)]),
    Line(&[(20.25, 8.25), (20.25, 3.75), (15.75, 3.75)]),
    Line(&[(20.25, 3.75), (15.0, 9.0)]),
    Line(&[(3.75, 15.75), (3.75, 20.25), (8.25, 20.25)]),
    Line(&[(3.75, 20.25), (9.0, 15.0)]),
    Line(&[(20.25, 15.75), (20.25, 20.25), (15.75, 20.25)]),
    Line(&[(20.25, 20.25), (15.0, 15.0)]),
];

static COLOR_PALETTE: &[Primitive] = &[
    Ring(6.75, 17.25, 3.0),
    Line(&[(8.9, 15.1), (15.8, 8.2)]),
    Ring(19.5, 19.5, 0.5),
    Ring(14.6, 14.6, 0.5),
    Ring(19.5, 14.6, 0.5),
    Ring(14.6, 19.5, 0.5),
];

static TEXT: &[Primitive] = &[
    Ring(12.0, 12.0, 9.0),
    Line(&[(7.5, 8.25), (16.5, 8.25)]),
    Line(&[(7.5, 11.25), (12.0, 11.25)]),
    Line(&[(6.75, 14.25), (15.75, 14.25)]),
];

static SLIDER: &[Primitive] = &[
    Line(&[(9.0, 8.25), (5.25, 12.0), (9.0, 15.75)]),
    Line(&[(15.0, 8.25), (18.75, 12.0), (15.0, 15.75)]),
];

static RATIO_1X1: &[Primitive] = &[Frame(4.0, 4.0, 16.0, 16.0)];
static RATIO_16X9: &[Primitive] = &[Frame(2.0, 6.0, 20.0, 11.25)];
static RATIO_9X16: &[Primitive] = &[Frame(7.0, 2.0, 10.0, 20.0)];
static RATIO_4X3: &[Primitive] = &[Frame(3.0, 6.0, 18.0, 13.5)];
static RATIO_3X4: &[Primitive] = &[Frame(6.0, 3.0, 12.0, 18.0)];

fn primitives(icon: IconId) -> &'static [Primitive] {
    match icon {
        IconId::Logo => LOGO,
        IconId::Generate => GENERATE,
        IconId::Edit => EDIT,
        IconId::Image => IMAGE,
        IconId::MagicWand => MAGIC_WAND,
        IconId::Upload => UPLOAD,
        IconId::RemoveBg => REMOVE_BG,
        IconId::Upscale => UPSCALE,
        IconId::ColorPalette => COLOR_PALETTE,
        IconId::Download => DOWNLOAD,
        IconId::Text => TEXT,
        IconId::Slider => SLIDER,
        IconId::Ratio1x1 => RATIO_1X1,
        IconId::Ratio16x9 => RATIO_16X9,
        IconId::Ratio9x16 => RATIO_9X16,
        IconId::Ratio4x3 => RATIO_4X3,
        IconId::Ratio3x4 => RATIO_3X4,
    }
}

/// Paint `icon` into `rect`, keeping the square view box centered
pub fn paint_icon(painter: &Painter, rect: Rect, icon: IconId, color: Color32) {
    let side = rect.width().min(rect.height());
    let scale = side / VIEW_BOX;
    let origin = rect.center() - Vec2::splat(side / 2.0);
    let map = |(x, y): (f32, f32)| Pos2::new(origin.x + x * scale, origin.y + y * scale);
    let stroke = Stroke::new((STROKE_WIDTH * scale).max(1.0), color);

    for primitive in primitives(icon) {
        match *primitive {
            Line(points) => {
                painter.add(Shape::line(points.iter().copied().map(map).collect(), stroke));
            }
            Fill(points) => {
                painter.add(Shape::convex_polygon(
                    points.iter().copied().map(map).collect(),
                    color,
                    Stroke::NONE,
                ));
            }
            Frame(x, y, w, h) => {
                let frame = Rect::from_min_max(map((x, y)), map((x + w, y + h)));
                painter.rect_stroke(frame, 2.0 * scale, stroke);
            }
            Ring(cx, cy, r) => {
                painter.circle_stroke(map((cx, cy)), r * scale, stroke);
            }
        }
    }
}

/// Allocate a square of `size` points and paint `icon` in it
pub fn icon(ui: &mut Ui, icon: IconId, size: f32) -> Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
    if ui.is_rect_visible(rect) {
        let color = ui.visuals().text_color();
        paint_icon(ui.painter(), rect, icon, color);
    }
    response
}
