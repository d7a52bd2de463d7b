//! Text rasterizer for overlay captions
//!
//! Uses fontdue to rasterize text into a horizontal coverage mask. Font
//! families are resolved against font files on disk; a family with no
//! matching file falls back to the built-in 8x8 bitmap face scaled to the
//! requested size, so rendering never fails for lack of fonts.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use fontdue::{Font, FontSettings};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Maximum directory depth scanned below each font directory
const MAX_SCAN_DEPTH: usize = 4;

/// Font families offered in the overlay panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontFamily {
    #[default]
    Arial,
    Verdana,
    Georgia,
    TimesNewRoman,
    CourierNew,
    Impact,
    Sora,
    Roboto,
    OpenSans,
    Lato,
    Montserrat,
    Oswald,
    Merriweather,
    PlayfairDisplay,
    RobotoSlab,
    Lobster,
    Pacifico,
    DancingScript,
    Bangers,
    PermanentMarker,
}

impl FontFamily {
    /// All families in menu order
    pub const ALL: [FontFamily; 20] = [
        FontFamily::Arial,
        FontFamily::Verdana,
        FontFamily::Georgia,
        FontFamily::TimesNewRoman,
        FontFamily::CourierNew,
        FontFamily::Impact,
        FontFamily::Sora,
        FontFamily::Roboto,
        FontFamily::OpenSans,
        FontFamily::Lato,
        FontFamily::Montserrat,
        FontFamily::Oswald,
        FontFamily::Merriweather,
        FontFamily::PlayfairDisplay,
        FontFamily::RobotoSlab,
        FontFamily::Lobster,
        FontFamily::Pacifico,
        FontFamily::DancingScript,
        FontFamily::Bangers,
        FontFamily::PermanentMarker,
    ];

    /// Family name as shown in the font menu
    pub fn display_name(&self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Verdana => "Verdana",
            FontFamily::Georgia => "Georgia",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::CourierNew => "Courier New",
            FontFamily::Impact => "Impact",
            FontFamily::Sora => "Sora",
            FontFamily::Roboto => "Roboto",
            FontFamily::OpenSans => "Open Sans",
            FontFamily::Lato => "Lato",
            FontFamily::Montserrat => "Montserrat",
            FontFamily::Oswald => "Oswald",
            FontFamily::Merriweather => "Merriweather",
            FontFamily::PlayfairDisplay => "Playfair Display",
            FontFamily::RobotoSlab => "Roboto Slab",
            FontFamily::Lobster => "Lobster",
            FontFamily::Pacifico => "Pacifico",
            FontFamily::DancingScript => "Dancing Script",
            FontFamily::Bangers => "Bangers",
            FontFamily::PermanentMarker => "Permanent Marker",
        }
    }

    /// Short file-name prefix used by the Windows core fonts
    fn core_font_alias(&self) -> Option<&'static str> {
        match self {
            FontFamily::Arial => Some("arial"),
            FontFamily::Verdana => Some("verdana"),
            FontFamily::Georgia => Some("georgia"),
            FontFamily::TimesNewRoman => Some("times"),
            FontFamily::CourierNew => Some("cour"),
            FontFamily::Impact => Some("impact"),
            _ => None,
        }
    }

    /// Normalized file stems to try, bold faces first.
    /// The flag is true when the stem names a bold face.
    fn candidate_stems(&self) -> Vec<(String, bool)> {
        let key = normalize_stem(self.display_name());
        let mut stems = vec![
            (format!("{}bold", key), true),
            (format!("{}bd", key), true),
        ];
        if let Some(alias) = self.core_font_alias() {
            stems.push((format!("{}bd", alias), true));
            stems.push((format!("{}b", alias), true));
        }
        stems.push((key.clone(), false));
        stems.push((format!("{}regular", key), false));
        if let Some(alias) = self.core_font_alias() {
            stems.push((alias.to_string(), false));
        }
        stems
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lowercase and strip everything but ASCII letters and digits
fn normalize_stem(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A resolved face for one family
enum Face {
    /// Outline font from disk; `bold` is true when the file itself is bold
    Outline { font: Font, bold: bool },
    /// Built-in 8x8 bitmap glyphs
    Bitmap,
}

/// Full size of a line of text before any clipping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineExtent {
    pub width: usize,
    pub height: usize,
}

/// Horizontal coverage mask of a rasterized line of text, or of a run of
/// its columns starting at `left`
#[derive(Debug, Clone, PartialEq)]
pub struct TextMask {
    left: i64,
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl TextMask {
    fn blank(left: i64, width: usize, height: usize) -> Self {
        Self {
            left,
            width,
            height,
            alpha: vec![0; width * height],
        }
    }

    /// Line column of the mask's first column
    pub fn left(&self) -> i64 {
        self.left
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Coverage at (x, y) in mask coordinates; zero outside the mask
    pub fn coverage(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.alpha[y as usize * self.width + x as usize]
    }

    /// True when no pixel has any coverage
    pub fn is_empty(&self) -> bool {
        self.alpha.iter().all(|&a| a == 0)
    }

    /// Max-blend a value at a line column; writes outside the mask are dropped
    fn stamp(&mut self, line_x: i64, y: i64, value: u8) {
        let x = line_x - self.left;
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.alpha[idx] = self.alpha[idx].max(value);
    }

    /// Faux bold: smear the mask `strength` pixels to the right
    fn embolden(&mut self, strength: usize) {
        if strength == 0 {
            return;
        }
        let source = self.alpha.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let value = source[y * self.width + x];
                if value == 0 {
                    continue;
                }
                for dx in 1..=strength {
                    self.stamp(self.left + (x + dx) as i64, y as i64, value);
                }
            }
        }
    }

    /// Drop the first `count` columns
    fn crop_left(&mut self, count: usize) {
        let count = count.min(self.width);
        if count == 0 {
            return;
        }
        let width = self.width - count;
        let mut alpha = Vec::with_capacity(width * self.height);
        for row in self.alpha.chunks(self.width) {
            alpha.extend_from_slice(&row[count..]);
        }
        self.left += count as i64;
        self.width = width;
        self.alpha = alpha;
    }
}

/// Faux bold strength for a given size, matching a double render at small sizes
fn faux_bold_strength(font_size: f32) -> usize {
    ((font_size / 32.0).ceil() as usize).max(1)
}

/// Font lookup with a per-family cache
pub struct FontBook {
    dirs: Vec<PathBuf>,
    /// Normalized file stem -> font file, built on first lookup
    index: OnceLock<HashMap<String, PathBuf>>,
    faces: RwLock<HashMap<FontFamily, Arc<Face>>>,
}

impl FontBook {
    /// Create a font book searching `extra_dirs` followed by the platform font directories
    pub fn new(extra_dirs: &[PathBuf]) -> Self {
        let mut dirs = extra_dirs.to_vec();
        dirs.extend(platform_font_dirs());
        Self::with_dirs(dirs)
    }

    /// Create a font book that searches exactly `dirs`
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            index: OnceLock::new(),
            faces: RwLock::new(HashMap::new()),
        }
    }

    /// Font book that always uses the built-in bitmap face
    #[cfg(test)]
    pub fn bitmap_only() -> Self {
        Self::with_dirs(Vec::new())
    }

    /// True when `family` resolves to a font file rather than the bitmap face
    pub fn has_outline(&self, family: FontFamily) -> bool {
        matches!(*self.face(family), Face::Outline { .. })
    }

    fn index(&self) -> &HashMap<String, PathBuf> {
        self.index.get_or_init(|| {
            let mut index = HashMap::new();
            for dir in &self.dirs {
                scan_font_dir(dir, 0, &mut index);
            }
            info!("Indexed {} font files in {} directories", index.len(), self.dirs.len());
            index
        })
    }

    fn face(&self, family: FontFamily) -> Arc<Face> {
        if let Some(face) = self.faces.read().get(&family) {
            return face.clone();
        }

        let face = Arc::new(self.load_face(family));
        self.faces.write().entry(family).or_insert(face).clone()
    }

    fn load_face(&self, family: FontFamily) -> Face {
        let index = self.index();
        for (stem, bold) in family.candidate_stems() {
            let Some(path) = index.get(&stem) else {
                continue;
            };
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Failed to read font '{}': {}", path.display(), e);
                    continue;
                }
            };
            match Font::from_bytes(bytes, FontSettings::default()) {
                Ok(font) => {
                    info!("Font {} -> {} (bold: {})", family, path.display(), bold);
                    return Face::Outline { font, bold };
                }
                Err(e) => warn!("Failed to parse font '{}': {}", path.display(), e),
            }
        }
        debug!("Font {} not found, using bitmap face", family);
        Face::Bitmap
    }

    /// Width and height `rasterize` would produce, without rasterizing
    pub fn measure(&self, text: &str, family: FontFamily, font_size: f32) -> LineExtent {
        let font_size = font_size.max(1.0);
        match &*self.face(family) {
            Face::Outline { font, .. } => OutlineLine::layout(font, text, font_size).extent(),
            Face::Bitmap => bitmap_extent(text.chars().count(), font_size),
        }
    }

    /// Rasterize one line of text.
    ///
    /// The mask height spans the font's ascent plus descent, so aligning
    /// its top, middle or bottom matches the em box of the line.
    #[cfg(test)]
    pub fn rasterize(&self, text: &str, family: FontFamily, font_size: f32, bold: bool) -> TextMask {
        self.rasterize_columns(text, family, font_size, bold, 0..i64::MAX)
    }

    /// Rasterize only the line columns in `columns`.
    ///
    /// Glyphs outside the range are never rasterized, so the cost follows
    /// the range rather than the length of the text.
    pub fn rasterize_columns(
        &self,
        text: &str,
        family: FontFamily,
        font_size: f32,
        bold: bool,
        columns: Range<i64>,
    ) -> TextMask {
        let font_size = font_size.max(1.0);
        let face = self.face(family);
        let face_is_bold = matches!(&*face, Face::Outline { bold: true, .. });
        let strength = if bold && !face_is_bold {
            faux_bold_strength(font_size)
        } else {
            0
        };

        let outline = match &*face {
            Face::Outline { font, .. } => Some((font, OutlineLine::layout(font, text, font_size))),
            Face::Bitmap => None,
        };
        let extent = match &outline {
            Some((_, line)) => line.extent(),
            None => bitmap_extent(text.chars().count(), font_size),
        };

        let start = columns.start.max(0);
        let end = columns.end.min(extent.width as i64).max(start);
        // Faux bold smears rightwards, so start early enough to catch it
        let inner_start = (start - strength as i64).max(0);

        let mut mask = TextMask::blank(inner_start, (end - inner_start) as usize, extent.height);
        match &outline {
            Some((font, line)) => line.draw(font, &mut mask),
            None => draw_bitmap(text, font_size, &mut mask),
        }
        mask.embolden(strength);
        mask.crop_left((start - inner_start) as usize);
        mask
    }
}

/// Glyph pen positions of one line set in an outline font
struct OutlineLine<'a> {
    text: &'a str,
    font_size: f32,
    ascent: f32,
    descent: f32,
    min_x: f32,
    max_x: f32,
}

impl<'a> OutlineLine<'a> {
    fn layout(font: &Font, text: &'a str, font_size: f32) -> Self {
        let (ascent, descent) = font
            .horizontal_line_metrics(font_size)
            .map(|m| (m.ascent, -m.descent))
            .unwrap_or((font_size * 0.8, font_size * 0.2));

        let mut line = Self {
            text,
            font_size,
            ascent,
            descent,
            min_x: 0.0,
            max_x: 0.0,
        };
        let (mut min_x, mut max_x) = (0.0f32, 0.0f32);
        line.for_each_glyph(font, |_, pen_x, metrics| {
            let left = pen_x + metrics.xmin as f32;
            min_x = min_x.min(left);
            max_x = max_x
                .max(left + metrics.width as f32)
                .max(pen_x + metrics.advance_width);
        });
        line.min_x = min_x;
        line.max_x = max_x;
        line
    }

    /// Walk the glyphs with kerning, reporting each pen position
    fn for_each_glyph(&self, font: &Font, mut visit: impl FnMut(char, f32, fontdue::Metrics)) {
        let mut pen_x: f32 = 0.0;
        let mut prev: Option<char> = None;
        for ch in self.text.chars() {
            if let Some(prev) = prev {
                pen_x += font.horizontal_kern(prev, ch, self.font_size).unwrap_or(0.0);
            }
            let metrics = font.metrics(ch, self.font_size);
            visit(ch, pen_x, metrics);
            pen_x += metrics.advance_width;
            prev = Some(ch);
        }
    }

    fn extent(&self) -> LineExtent {
        // Room on the right for faux bold
        let pad = faux_bold_strength(self.font_size);
        let width = (self.max_x - self.min_x).ceil() as usize + pad;
        LineExtent {
            width: if width <= pad { 1 } else { width },
            height: (self.ascent + self.descent).ceil().max(1.0) as usize,
        }
    }

    fn draw(&self, font: &Font, mask: &mut TextMask) {
        let (start, end) = (mask.left(), mask.left() + mask.width() as i64);
        let baseline = self.ascent.round() as i64;

        self.for_each_glyph(font, |ch, pen_x, metrics| {
            let glyph_x = (pen_x - self.min_x).round() as i64 + metrics.xmin as i64;
            if glyph_x + metrics.width as i64 <= start || glyph_x >= end {
                return;
            }
            let (metrics, bitmap) = font.rasterize(ch, self.font_size);
            let glyph_y = baseline - metrics.height as i64 - metrics.ymin as i64;
            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let value = bitmap[gy * metrics.width + gx];
                    if value > 0 {
                        mask.stamp(glyph_x + gx as i64, glyph_y + gy as i64, value);
                    }
                }
            }
        });
    }
}

fn bitmap_extent(char_count: usize, font_size: f32) -> LineExtent {
    let height = (font_size.ceil() as usize).max(1);
    if char_count == 0 {
        return LineExtent { width: 1, height };
    }
    LineExtent {
        width: (font_size * char_count as f32).ceil() as usize + faux_bold_strength(font_size),
        height,
    }
}

fn draw_bitmap(text: &str, font_size: f32, mask: &mut TextMask) {
    let scale = font_size / 8.0;
    let (start, end) = (mask.left(), mask.left() + mask.width() as i64);
    if end <= start {
        return;
    }
    // Every cell is `font_size` wide, so the visible ones can be indexed directly
    let first = (start as f32 / font_size).floor() as usize;
    let last = (end as f32 / font_size).ceil() as usize;

    for (index, ch) in text.chars().enumerate().skip(first).take(last.saturating_sub(first)) {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .or_else(|| BASIC_FONTS.get('?'));
        let Some(glyph) = glyph else {
            continue;
        };

        let origin = index as f32 * font_size;
        let x_start = (origin.floor() as i64).max(start);
        let x_end = ((origin + font_size).ceil() as i64).min(end);
        for py in 0..mask.height() {
            let row = ((py as f32 / scale) as usize).min(7);
            let bits = glyph[row];
            for px in x_start..x_end {
                let col = (((px as f32 - origin) / scale).max(0.0) as usize).min(7);
                if (bits >> col) & 1 == 1 {
                    mask.stamp(px, py as i64, 255);
                }
            }
        }
    }
}

fn scan_font_dir(dir: &Path, depth: usize, index: &mut HashMap<String, PathBuf>) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_font_dir(&path, depth + 1, index);
            continue;
        }
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf"))
            .unwrap_or(false);
        if !is_font {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            // First directory wins, so configured dirs shadow system fonts
            index.entry(normalize_stem(stem)).or_insert(path);
        }
    }
}

fn platform_font_dirs() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut dirs = Vec::new();

    #[cfg(target_os = "windows")]
    {
        let windir = std::env::var_os("WINDIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("C:\\Windows"));
        dirs.push(windir.join("Fonts"));
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join("Microsoft").join("Windows").join("Fonts"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = &home {
            dirs.push(home.join("Library").join("Fonts"));
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = &home {
            dirs.push(home.join(".local").join("share").join("fonts"));
            dirs.push(home.join(".fonts"));
        }
    }

    let _ = home;
    dirs
}
