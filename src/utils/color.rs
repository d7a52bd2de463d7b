//! Color utilities
//!
//! Helper functions for color conversion and blending on RGBA pixels.

/// Parse hex color string to RGB tuple
///
/// Accepts formats: "#RRGGBB" or "RRGGBB"
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');

    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Convert RGB to hex string
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Source-over composite of `fg` with an extra coverage factor onto `bg`.
///
/// `coverage` scales the foreground alpha (0.0 - 1.0), which is how glyph
/// masks and shadow masks are applied.
pub fn blend_over(bg: [u8; 4], fg: [u8; 4], coverage: f32) -> [u8; 4] {
    let fg_alpha = (fg[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if fg_alpha <= 0.0 {
        return bg;
    }
    let bg_alpha = bg[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
    if out_alpha < 0.001 {
        return [0, 0, 0, 0];
    }

    let channel = |f: u8, b: u8| -> u8 {
        let v = (f as f32 * fg_alpha + b as f32 * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        v.round().clamp(0.0, 255.0) as u8
    };

    [
        channel(fg[0], bg[0]),
        channel(fg[1], bg[1]),
        channel(fg[2], bg[2]),
        (out_alpha * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF0000"), Some((255, 0, 0)));
        assert_eq!(parse_hex_color("00FF00"), Some((0, 255, 0)));
        assert_eq!(parse_hex_color("#ffffff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex(255, 0, 0), "#FF0000");
        assert_eq!(rgb_to_hex(0, 128, 255), "#0080FF");
    }

    #[test]
    fn test_blend_over() {
        let bg = [0, 0, 0, 255];
        // Full coverage replaces
        assert_eq!(blend_over(bg, [255, 255, 255, 255], 1.0), [255, 255, 255, 255]);
        // Zero coverage keeps background
        assert_eq!(blend_over(bg, [255, 255, 255, 255], 0.0), bg);
        // Half coverage
        let mid = blend_over(bg, [200, 200, 200, 255], 0.5);
        assert!(mid[0] >= 95 && mid[0] <= 105);
        assert_eq!(mid[3], 255);
    }
}
