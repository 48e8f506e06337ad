use crate::token::TokenType;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Built-in dark theme id. This is the default theme unless a language says otherwise.
pub const DARK_THEME: &str = "dark";
/// Built-in light theme id.
pub const LIGHT_THEME: &str = "light";

/// A color, written `#rgb`, `#rrggbb` or `#aarrggbb` (alpha first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Color with an explicit alpha channel.
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Error returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidColor;

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').ok_or(InvalidColor)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidColor);
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| InvalidColor);
        match hex.len() {
            3 => {
                let short = |i: usize| {
                    u8::from_str_radix(&hex[i..=i], 16)
                        .map(|v| v * 0x11)
                        .map_err(|_| InvalidColor)
                };
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::argb(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(InvalidColor),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a != 0xff {
            write!(f, "#{:02x}", self.a)?;
        } else {
            f.write_str("#")?;
        }
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Visual attributes for one token type.
///
/// `StyleRecord::default()` is the neutral style: no colors, regular weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleRecord {
    /// Text color; `None` keeps the host's default.
    pub foreground: Option<Color>,
    /// Background color; `None` keeps the host's default.
    pub background: Option<Color>,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
}

impl StyleRecord {
    /// Foreground-only style.
    pub fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            ..Self::default()
        }
    }

    /// Set the bold flag.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the italic flag.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

/// Per-theme token styles.
///
/// Lookups never fail: a theme without an entry for a token type falls back to the default
/// theme's entry, then to [`StyleRecord::default`].
#[derive(Debug, Clone)]
pub struct ThemeStyleTable {
    default_theme: String,
    // Registration order.
    themes: Vec<String>,
    styles: HashMap<String, HashMap<TokenType, StyleRecord>>,
}

impl Default for ThemeStyleTable {
    fn default() -> Self {
        Self::new(DARK_THEME)
    }
}

impl ThemeStyleTable {
    /// Create an empty table whose fallback theme is `default_theme`.
    pub fn new(default_theme: impl Into<String>) -> Self {
        Self {
            default_theme: default_theme.into(),
            themes: Vec::new(),
            styles: HashMap::new(),
        }
    }

    /// Theme used when a lookup misses.
    pub fn default_theme(&self) -> &str {
        &self.default_theme
    }

    /// Registered theme ids, in registration order.
    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    /// Returns `true` if at least one style was registered for `theme`.
    pub fn has_theme(&self, theme: &str) -> bool {
        self.styles.contains_key(theme)
    }

    /// Set (or replace) the style of `token_type` in `theme`.
    pub fn set_style(&mut self, theme: &str, token_type: TokenType, style: StyleRecord) {
        if !self.has_theme(theme) {
            self.themes.push(theme.to_string());
        }
        self.styles
            .entry(theme.to_string())
            .or_default()
            .insert(token_type, style);
    }

    /// Resolve the style of `token_type` in `theme`.
    pub fn style(&self, theme: &str, token_type: TokenType) -> StyleRecord {
        self.lookup(theme, token_type)
            .or_else(|| {
                log::trace!("no '{token_type}' style in theme '{theme}', using default theme");
                self.lookup(&self.default_theme, token_type)
            })
            .unwrap_or_default()
    }

    fn lookup(&self, theme: &str, token_type: TokenType) -> Option<StyleRecord> {
        self.styles.get(theme)?.get(&token_type).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!("#98c379".parse::<Color>(), Ok(Color::rgb(0x98, 0xc3, 0x79)));
        assert_eq!("#9B0F83".parse::<Color>(), Ok(Color::rgb(0x9b, 0x0f, 0x83)));
        assert_eq!("98c379".parse::<Color>(), Err(InvalidColor));
        assert_eq!("#98c37".parse::<Color>(), Err(InvalidColor));
        assert_eq!("#".parse::<Color>(), Err(InvalidColor));
        assert_eq!("#98c37g".parse::<Color>(), Err(InvalidColor));
        assert_eq!("#ééé".parse::<Color>(), Err(InvalidColor));
        assert_eq!(Color::rgb(0x5c, 0x63, 0x70).to_string(), "#5c6370");
    }

    #[test]
    fn test_short_and_alpha_color_forms() {
        assert_eq!("#f0a".parse::<Color>(), Ok(Color::rgb(0xff, 0x00, 0xaa)));
        assert_eq!("#F0A".parse::<Color>(), "#ff00aa".parse::<Color>());
        assert_eq!(
            "#80112233".parse::<Color>(),
            Ok(Color::argb(0x80, 0x11, 0x22, 0x33))
        );
        assert_eq!("#ff112233".parse::<Color>(), Ok(Color::rgb(0x11, 0x22, 0x33)));
        assert_eq!("#12345".parse::<Color>(), Err(InvalidColor));
        assert_eq!(Color::argb(0x80, 0x11, 0x22, 0x33).to_string(), "#80112233");
        assert_eq!(Color::rgb(0xff, 0x00, 0xaa).to_string(), "#ff00aa");
    }

    #[test]
    fn test_style_falls_back_to_default_theme_then_neutral() {
        let mut table = ThemeStyleTable::new(DARK_THEME);
        let comment = StyleRecord::fg(Color::rgb(0x5c, 0x63, 0x70)).italic(true);
        let string_light = StyleRecord::fg(Color::rgb(0x23, 0x88, 0x00));
        table.set_style(DARK_THEME, TokenType::Comment, comment);
        table.set_style(LIGHT_THEME, TokenType::String, string_light);

        assert_eq!(table.style(LIGHT_THEME, TokenType::String), string_light);
        assert_eq!(table.style(LIGHT_THEME, TokenType::Comment), comment);
        assert_eq!(table.style("solarized", TokenType::Comment), comment);
        assert_eq!(
            table.style(LIGHT_THEME, TokenType::Keyword),
            StyleRecord::default()
        );
        assert_eq!(table.themes(), &[DARK_THEME.to_string(), LIGHT_THEME.to_string()]);
    }
}
