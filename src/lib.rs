//! goban-svg - Go board diagrams as SVG, plus a couple of data chores
//!
//! The core of this library renders a 19x19 board described in JSON
//! (stones, markers, coordinate labels) to a static SVG document. The
//! [`tools`] module holds the SQL batch generator and the image downloader.
//!
//! # Example
//!
//! ```rust
//! use goban_svg::render;
//!
//! let svg = render(r#"{
//!     "size": 722,
//!     "label": true,
//!     "view": { "offset": { "x": 0, "y": 0 } },
//!     "position": { "chess": [{ "intersection": "D4", "type": true }], "markers": [] }
//! }"#).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod board;
pub mod error;
pub mod renderer;
pub mod theme;
pub mod tools;

pub use board::{BoardConfig, CoordinateSystem, Intersection};
pub use error::ConfigError;
pub use renderer::{render_board, render_board_with, SvgConfig};
pub use theme::Theme;

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// The configuration could not be read or failed strict validation
    #[error("config errors: {}", format_config_errors(.0))]
    Config(Vec<ConfigError>),
}

impl From<Vec<ConfigError>> for RenderError {
    fn from(errors: Vec<ConfigError>) -> Self {
        RenderError::Config(errors)
    }
}

impl From<ConfigError> for RenderError {
    fn from(error: ConfigError) -> Self {
        RenderError::Config(vec![error])
    }
}

fn format_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Drawing constants and colours
    pub theme: Theme,
    /// Reject malformed intersections instead of drawing them off the grid
    pub strict: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Enable or disable strict intersection checking
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Render a JSON board configuration to SVG with default configuration
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, &RenderConfig::default())
}

/// Render a JSON board configuration to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use goban_svg::{render_with_config, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_svg(SvgConfig::new().with_pretty_print(true))
///     .with_strict(true);
///
/// let json = r#"{"size": 400, "label": false, "view": {"offset": {"x": 0, "y": 0}},
///               "position": {"chess": [{"intersection": "I5", "type": false}], "markers": []}}"#;
/// assert!(render_with_config(json, &config).is_err());
/// ```
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let board = BoardConfig::from_json(source)?;

    if config.strict {
        board.validate()?;
    }

    Ok(render_board_with(&board, &config.theme, &config.svg))
}
