//! Hex color tokens.
//!
//! Accepted syntax is `#` followed by 3, 4, 6 or 8 hex digits (`#f0a`,
//! `#f0a8`, `#ff00aa`, `#ff00aa80`), case-insensitive. The 4 and 8 digit
//! forms carry an alpha channel, which per-particle colors ignore.
//!
//! Normalized channels are rounded to two decimals. Downstream shading is
//! tuned against that quantization, so `#808080` is `0.5`, not `0.50196`.

use glam::Vec3;

/// Opaque white, used for tokens that are not valid hex colors.
pub const FALLBACK_COLOR: Vec3 = Vec3::ONE;

/// A decoded color. Channels are `0..=255`, alpha is `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Rgb {
    /// Channels divided by 255 and rounded to two decimals.
    pub fn normalized(&self) -> Vec3 {
        Vec3::new(
            normalize_channel(self.red),
            normalize_channel(self.green),
            normalize_channel(self.blue),
        )
    }
}

/// Whether `token` is a hex color this module can decode.
pub fn is_hex_color(token: &str) -> bool {
    match token.strip_prefix('#') {
        Some(digits) => matches!(digits.len(), 3 | 4 | 6 | 8) && digits.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Decode a hex color, or `None` if the token is not valid.
pub fn hex_to_rgb(token: &str) -> Option<Rgb> {
    if !is_hex_color(token) {
        return None;
    }
    let digits = &token[1..];

    // Shorthand forms repeat each digit: #f0a -> #ff00aa
    let expanded: String = if digits.len() <= 4 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    let bytes = hex::decode(expanded).ok()?;
    let alpha = bytes.get(3).map_or(1.0, |a| *a as f32 / 255.0);

    Some(Rgb {
        red: bytes[0],
        green: bytes[1],
        blue: bytes[2],
        alpha,
    })
}

/// `channel / 255`, rounded to two decimals.
pub fn normalize_channel(channel: u8) -> f32 {
    let unit = channel as f64 / 255.0;
    ((unit * 100.0).round() / 100.0) as f32
}

/// Normalized color for a per-particle token, white if the token is invalid.
pub fn particle_color(token: &str) -> Vec3 {
    match hex_to_rgb(token) {
        Some(rgb) => rgb.normalized(),
        None => {
            log::trace!("Color token {:?} is not a hex color, using white", token);
            FALLBACK_COLOR
        }
    }
}
