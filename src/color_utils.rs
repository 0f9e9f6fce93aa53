//issue-import/src/color_utils.rs

// Utilities for generating display colors for newly created projects and tags.
// Colors are random but kept away from near-black so labels stay readable.

/// Lowest value any channel may take.
pub const MIN_CHANNEL: u8 = 55;

/// Generates a random `#rrggbb` color with each channel in `[MIN_CHANNEL, 255]`.
pub fn random_color() -> String {
    random_color_with(&mut fastrand::Rng::new())
}

/// Same as `random_color` but drawing from the given generator (seedable in tests).
pub fn random_color_with(rng: &mut fastrand::Rng) -> String {
    let r = rng.u8(MIN_CHANNEL..=255);
    let g = rng.u8(MIN_CHANNEL..=255);
    let b = rng.u8(MIN_CHANNEL..=255);
    to_hex(r, g, b)
}

pub fn to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Determines if text on top of this color should be black or white.
/// Input components are expected in [0.0, 1.0] range.
pub fn is_dark(r: f32, g: f32, b: f32) -> bool {
    // Perceptual luminance approximation
    let brightness = 0.299 * r + 0.587 * g + 0.114 * b;
    brightness < 0.5
}

/// Parse a hex color string like "#RRGGBB" or "RRGGBB" into u8 tuple.
pub fn parse_hex_to_u8(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Text color ("black" or "white") that contrasts with the given hex background.
pub fn contrast_text(hex: &str) -> Option<&'static str> {
    let (r, g, b) = parse_hex_to_u8(hex)?;
    let dark = is_dark(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    Some(if dark { "white" } else { "black" })
}
