//! Theme support for the TUI.
//!
//! Provides the built-in color themes and hex overrides from the config file.

use ratatui::style::Color;

use crate::core::CustomColorsConfig;

/// A complete color theme for the TUI.
///
/// Themes are runtime-only - configuration happens through the config file
/// with hex color strings which are parsed into Theme at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name for display and configuration
    pub name: String,
    /// Primary accent color (brand, active step, headings)
    pub primary: Color,
    /// Secondary accent color (gauges, bullets)
    pub secondary: Color,
    /// Tertiary accent color (sentiment badge, breathing cue)
    pub accent: Color,
    /// Main text color
    pub text: Color,
    /// Dimmed text color (descriptions)
    pub text_dim: Color,
    /// Muted text color (hints, footer)
    pub text_muted: Color,
    /// Background color (Reset uses terminal default)
    pub background: Color,
    /// Border color
    pub border: Color,
    /// Success indicator color
    pub success: Color,
    /// Warning indicator color
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dusk()
    }
}

impl Theme {
    /// Dusk theme - deep navy with purple and indigo accents.
    pub fn dusk() -> Self {
        Self {
            name: "dusk".to_string(),
            primary: Color::Rgb(168, 85, 247),    // Purple-500
            secondary: Color::Rgb(129, 140, 248), // Indigo-400
            accent: Color::Rgb(192, 132, 252),    // Purple-400
            text: Color::White,
            text_dim: Color::Rgb(148, 163, 184),  // Slate-400
            text_muted: Color::Rgb(71, 85, 105),  // Slate-600
            background: Color::Rgb(6, 9, 16),
            border: Color::Rgb(30, 41, 59),       // Slate-800
            success: Color::Rgb(52, 211, 153),    // Emerald-400
            warning: Color::Rgb(251, 191, 36),    // Amber-400
        }
    }

    /// Dracula theme - dark purple and pink.
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            primary: Color::Rgb(189, 147, 249),   // Purple
            secondary: Color::Rgb(139, 233, 253), // Cyan
            accent: Color::Rgb(255, 121, 198),    // Pink
            text: Color::Rgb(248, 248, 242),      // Foreground
            text_dim: Color::Rgb(189, 147, 249),  // Purple (dimmed)
            text_muted: Color::Rgb(98, 114, 164), // Comment
            background: Color::Rgb(40, 42, 54),   // Background
            border: Color::Rgb(68, 71, 90),       // Selection
            success: Color::Rgb(80, 250, 123),    // Green
            warning: Color::Rgb(255, 184, 108),   // Orange
        }
    }

    /// Nord theme - arctic, bluish colors.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            primary: Color::Rgb(136, 192, 208),   // Nord8 (Frost)
            secondary: Color::Rgb(129, 161, 193), // Nord9
            accent: Color::Rgb(180, 142, 173),    // Nord15 (Aurora Purple)
            text: Color::Rgb(236, 239, 244),      // Nord6 (Snow Storm)
            text_dim: Color::Rgb(216, 222, 233),  // Nord5
            text_muted: Color::Rgb(76, 86, 106),  // Nord3 (Polar Night)
            background: Color::Rgb(46, 52, 64),   // Nord0
            border: Color::Rgb(67, 76, 94),       // Nord2
            success: Color::Rgb(163, 190, 140),   // Nord14
            warning: Color::Rgb(235, 203, 139),   // Nord13
        }
    }

    /// Mono theme - terminal defaults only, for low-color terminals.
    pub fn mono() -> Self {
        Self {
            name: "mono".to_string(),
            primary: Color::White,
            secondary: Color::Gray,
            accent: Color::White,
            text: Color::Reset,
            text_dim: Color::Gray,
            text_muted: Color::DarkGray,
            background: Color::Reset,
            border: Color::DarkGray,
            success: Color::White,
            warning: Color::White,
        }
    }

    /// Get a theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dusk" | "default" => Some(Self::dusk()),
            "dracula" => Some(Self::dracula()),
            "nord" => Some(Self::nord()),
            "mono" | "monochrome" => Some(Self::mono()),
            _ => None,
        }
    }

    /// List all available built-in theme names.
    pub fn available_themes() -> Vec<&'static str> {
        vec!["dusk", "dracula", "nord", "mono"]
    }

    /// Apply hex color overrides. Invalid values are logged and skipped.
    pub fn apply_overrides(&mut self, custom: &CustomColorsConfig) {
        let slots = [
            ("primary", &custom.primary, &mut self.primary),
            ("secondary", &custom.secondary, &mut self.secondary),
            ("text", &custom.text, &mut self.text),
            ("text_dim", &custom.text_dim, &mut self.text_dim),
            ("border", &custom.border, &mut self.border),
        ];

        for (key, hex, slot) in slots {
            let Some(hex) = hex else { continue };
            match parse_hex_color(hex) {
                Some(color) => *slot = color,
                None => tracing::warn!(key, value = %hex, "Ignoring invalid hex color"),
            }
        }
    }
}

/// Parse a hex color string (#RRGGBB or RRGGBB) into a Color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color::Rgb(r, g, b))
}
