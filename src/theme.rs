//! Visual theme for board rendering
//!
//! A theme collects the drawing constants of the board: grid proportions,
//! radii, font sizes and a colour palette. Themes are written in TOML; any
//! key a theme omits is taken from the built-in default, which reproduces the
//! classic black-and-white board.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing themes
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse theme TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Drawing constants and palette for a board
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Optional name for the theme
    pub name: Option<String>,
    /// Fraction of the canvas side covered by the grid
    pub grid_ratio: f64,
    pub stone_radius: f64,
    pub marker_radius: f64,
    pub star_radius: f64,
    pub grid_stroke_width: f64,
    /// CSS font size of coordinate labels
    pub label_font_size: String,
    /// CSS font size of text drawn on stones
    pub stone_font_size: String,
    /// Colour mappings: token name -> CSS colour
    pub colors: HashMap<String, String>,
}

/// TOML structure for deserializing themes
#[derive(Deserialize)]
struct TomlTheme {
    metadata: Option<TomlMetadata>,
    board: Option<TomlBoard>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

#[derive(Deserialize)]
struct TomlBoard {
    grid_ratio: Option<f64>,
    stone_radius: Option<f64>,
    marker_radius: Option<f64>,
    star_radius: Option<f64>,
    grid_stroke_width: Option<f64>,
    label_font_size: Option<String>,
    stone_font_size: Option<String>,
}

/// Default theme - the classic black and white board
const DEFAULT_THEME: &str = r##"
[metadata]
name = "classic"

[board]
grid_ratio = 0.8
stone_radius = 18
marker_radius = 10
star_radius = 2.8
grid_stroke_width = 1.5
label_font_size = "1.4rem"
stone_font_size = "1.2rem"

[colors]
background = "white"
grid = "black"
dark-stone = "black"
light-stone = "white"
stone-outline = "black"
marker-fill = "white"
marker-text = "black"
"##;

impl Theme {
    /// Load theme from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load theme from TOML string, filling gaps from the default theme
    pub fn from_str(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;
        Ok(Self::overlay(Self::builtin(), parsed))
    }

    fn builtin() -> Self {
        let parsed: TomlTheme =
            toml::from_str(DEFAULT_THEME).expect("Default theme should be valid TOML");
        let board = parsed.board.expect("Default theme has a [board] table");
        Theme {
            name: parsed.metadata.and_then(|m| m.name),
            grid_ratio: board.grid_ratio.unwrap_or(0.8),
            stone_radius: board.stone_radius.unwrap_or(18.0),
            marker_radius: board.marker_radius.unwrap_or(10.0),
            star_radius: board.star_radius.unwrap_or(2.8),
            grid_stroke_width: board.grid_stroke_width.unwrap_or(1.5),
            label_font_size: board.label_font_size.unwrap_or_default(),
            stone_font_size: board.stone_font_size.unwrap_or_default(),
            colors: parsed.colors,
        }
    }

    fn overlay(mut base: Self, parsed: TomlTheme) -> Self {
        if let Some(name) = parsed.metadata.and_then(|m| m.name) {
            base.name = Some(name);
        }
        if let Some(board) = parsed.board {
            base.grid_ratio = board.grid_ratio.unwrap_or(base.grid_ratio);
            base.stone_radius = board.stone_radius.unwrap_or(base.stone_radius);
            base.marker_radius = board.marker_radius.unwrap_or(base.marker_radius);
            base.star_radius = board.star_radius.unwrap_or(base.star_radius);
            base.grid_stroke_width = board.grid_stroke_width.unwrap_or(base.grid_stroke_width);
            if let Some(size) = board.label_font_size {
                base.label_font_size = size;
            }
            if let Some(size) = board.stone_font_size {
                base.stone_font_size = size;
            }
        }
        base.colors.extend(parsed.colors);
        base
    }

    /// Resolve a colour token to a concrete value
    ///
    /// Returns None if the token is not defined in this theme.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a colour token, falling back to black for unknown tokens
    pub fn color(&self, token: &str) -> &str {
        self.resolve(token).unwrap_or("black")
    }

    pub fn with_grid_ratio(mut self, ratio: f64) -> Self {
        self.grid_ratio = ratio;
        self
    }

    pub fn with_color(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.colors.insert(token.into(), value.into());
        self
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::builtin()
    }
}
