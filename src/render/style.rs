use anyhow::{bail, Context, Result};
use image::Rgb;
use serde::{Deserialize, Serialize};

/// Rendering configuration.
///
/// Example YAML:
/// ```yaml
/// render:
///   dpi: 60
///   accent: "#007bff"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Pixels per figure inch. Figure sizes are given in inches.
    pub dpi: u32,
    pub background: String,
    pub accent: String,
    pub success: String,
    pub error: String,
    pub warning: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 60,
            background: "#f8f9fa".to_string(),
            accent: "#007bff".to_string(),
            success: "#28a745".to_string(),
            error: "#dc3545".to_string(),
            warning: "#ffc107".to_string(),
        }
    }
}

/// Resolved colors shared by every drawing routine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub accent: Rgb<u8>,
    pub success: Rgb<u8>,
    pub error: Rgb<u8>,
    pub warning: Rgb<u8>,
}

impl Palette {
    pub const INK: Rgb<u8> = Rgb([51, 51, 51]);
    pub const GRAY: Rgb<u8> = Rgb([128, 128, 128]);
    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const GOLD: Rgb<u8> = Rgb([255, 215, 0]);
    pub const PANEL_NOTE: Rgb<u8> = Rgb([240, 248, 255]);

    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        Ok(Self {
            background: parse_hex_color(&config.background).context("render.background")?,
            accent: parse_hex_color(&config.accent).context("render.accent")?,
            success: parse_hex_color(&config.success).context("render.success")?,
            error: parse_hex_color(&config.error).context("render.error")?,
            warning: parse_hex_color(&config.warning).context("render.warning")?,
        })
    }

    /// Accent, success, warning, error: the cycle most figures step through
    pub fn cycle(&self) -> [Rgb<u8>; 4] {
        [self.accent, self.success, self.warning, self.error]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb([0xf8, 0xf9, 0xfa]),
            accent: Rgb([0x00, 0x7b, 0xff]),
            success: Rgb([0x28, 0xa7, 0x45]),
            error: Rgb([0xdc, 0x35, 0x45]),
            warning: Rgb([0xff, 0xc1, 0x07]),
        }
    }
}

/// Parse a `#rrggbb` color.
pub fn parse_hex_color(s: &str) -> Result<Rgb<u8>> {
    let hex = s.trim();
    let Some(digits) = hex.strip_prefix('#') else {
        bail!("color must start with '#': {}", s)
    };
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("color must be #rrggbb: {}", s)
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

/// Validate render configuration at startup.
/// Returns all validation errors at once.
pub fn validate_render(config: &RenderConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !(10..=300).contains(&config.dpi) {
        errors.push(format!("render.dpi: {} is outside 10..=300", config.dpi));
    }

    for (name, value) in [
        ("background", &config.background),
        ("accent", &config.accent),
        ("success", &config.success),
        ("error", &config.error),
        ("warning", &config.warning),
    ] {
        if let Err(e) = parse_hex_color(value) {
            errors.push(format!("render.{}: {}", name, e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Linear blend between two colors, `t` in `[0, 1]`.
pub fn mix(from: Rgb<u8>, to: Rgb<u8>, t: f32) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgb([
        lerp(from[0], to[0]),
        lerp(from[1], to[1]),
        lerp(from[2], to[2]),
    ])
}

/// Sample of the viridis colormap at `t` in `[0, 1]`.
pub fn viridis(t: f32) -> Rgb<u8> {
    const STOPS: [[u8; 3]; 5] = [
        [68, 1, 84],
        [59, 82, 139],
        [33, 145, 140],
        [94, 201, 98],
        [253, 231, 37],
    ];
    let t = t.clamp(0.0, 1.0) * (STOPS.len() - 1) as f32;
    let i = (t.floor() as usize).min(STOPS.len() - 2);
    mix(Rgb(STOPS[i]), Rgb(STOPS[i + 1]), t - i as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#007bff").unwrap(), Rgb([0, 123, 255]));
        assert_eq!(parse_hex_color(" #FFC107 ").unwrap(), Rgb([255, 193, 7]));
    }

    #[test]
    fn test_parse_hex_color_rejects_bad_input() {
        assert!(parse_hex_color("007bff").is_err());
        assert!(parse_hex_color("#07bff").is_err());
        assert!(parse_hex_color("#00zbff").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }

    #[test]
    fn test_default_palette_matches_default_config() {
        let palette = Palette::from_config(&RenderConfig::default()).unwrap();
        assert_eq!(palette, Palette::default());
    }

    #[test]
    fn test_validate_render_collects_errors() {
        let config = RenderConfig {
            dpi: 5,
            accent: "blue".to_string(),
            ..RenderConfig::default()
        };
        let errors = validate_render(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("render.dpi"));
        assert!(errors[1].contains("render.accent"));
    }

    #[test]
    fn test_mix_endpoints() {
        let a = Rgb([0, 0, 0]);
        let b = Rgb([200, 100, 50]);
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 1.0), b);
        assert_eq!(mix(a, b, 0.5), Rgb([100, 50, 25]));
    }

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis(0.0), Rgb([68, 1, 84]));
        assert_eq!(viridis(1.0), Rgb([253, 231, 37]));
    }
}
