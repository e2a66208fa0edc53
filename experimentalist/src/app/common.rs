//! Hex colour strings as used by colour pickers, palettes and the plot.

use std::fmt::Write;

/// Parse `#rrggbb` or `#rgb` (case-insensitive).
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            Some([channel(0)?, channel(2)?, channel(4)?])
        }
        3 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|c| c * 17);
            Some([channel(0)?, channel(1)?, channel(2)?])
        }
        _ => None,
    }
}

pub fn is_hex_color(hex: &str) -> bool {
    parse_hex_color(hex).is_some()
}

pub fn to_hex(rgb: [u8; 3]) -> String {
    let mut hex = String::with_capacity(7);
    hex.push('#');
    for channel in rgb {
        write!(hex, "{channel:02x}").expect("Unable to write to string buffer.");
    }
    hex
}

/// Colour with opacity for drawing with egui. Invalid colours yield `None`.
pub fn color32(hex: &str, alpha: f64) -> Option<egui::Color32> {
    let [r, g, b] = parse_hex_color(hex)?;
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Some(egui::Color32::from_rgba_unmultiplied(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1f77b4"), Some([0x1f, 0x77, 0xb4]));
        assert_eq!(parse_hex_color("#FF7F0E"), Some([0xff, 0x7f, 0x0e]));
        assert_eq!(parse_hex_color("#fff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("1f77b4"), None);
        assert_eq!(parse_hex_color("#1f77bz"), None);
        assert_eq!(parse_hex_color("#1f77b"), None);
        assert_eq!(parse_hex_color("blue"), None);
    }

    #[test]
    fn test_to_hex_is_lowercase() {
        assert_eq!(to_hex([0x1f, 0x77, 0xb4]), "#1f77b4");
        assert_eq!(to_hex([255, 0, 10]), "#ff000a");
    }

    #[test]
    fn test_color32_applies_alpha() {
        let c = color32("#ff0000", 1.0).unwrap();
        assert_eq!(c, egui::Color32::from_rgb(255, 0, 0));
        let transparent = color32("#ff0000", 0.0).unwrap();
        assert_eq!(transparent.a(), 0);
        assert!(color32("nope", 0.5).is_none());
    }
}
