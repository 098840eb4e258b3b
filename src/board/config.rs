//! Board state configuration, as read from JSON

use serde::{Deserialize, Serialize};

use super::coords::parse_intersection;
use crate::error::ConfigError;

/// Everything needed to render one board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Canvas side length in pixels
    pub size: f64,
    /// Draw coordinate labels around the grid
    pub label: bool,
    pub view: View,
    pub position: Position,
}

/// Visible region of the canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub offset: Offset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Stones and markers on the board, in drawing order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub chess: Vec<Stone>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stone {
    pub intersection: String,
    /// `true` for a dark stone, `false` for a light one
    #[serde(rename = "type")]
    pub dark: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Stone {
    pub fn new(intersection: impl Into<String>, dark: bool) -> Self {
        Self {
            intersection: intersection.into(),
            dark,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub intersection: String,
    pub text: String,
}

impl Marker {
    pub fn new(intersection: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            intersection: intersection.into(),
            text: text.into(),
        }
    }
}

impl BoardConfig {
    /// An empty board of the given size, labels on, no crop
    pub fn new(size: f64) -> Self {
        Self {
            size,
            label: true,
            view: View::default(),
            position: Position::default(),
        }
    }

    pub fn with_label(mut self, label: bool) -> Self {
        self.label = label;
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.view.offset = Offset { x, y };
        self
    }

    pub fn with_stone(mut self, stone: Stone) -> Self {
        self.position.chess.push(stone);
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.position.markers.push(marker);
        self
    }

    /// Parse a configuration from JSON text
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(ConfigError::from)
    }

    /// Whether any stone sits on exactly this intersection label
    pub fn has_stone_at(&self, intersection: &str) -> bool {
        self.position
            .chess
            .iter()
            .any(|stone| stone.intersection == intersection)
    }

    /// Check every intersection label, collecting one error per malformed label.
    ///
    /// Rendering never calls this; malformed labels render off the grid.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let stones = self
            .position
            .chess
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("position.chess[{i}].intersection"), &s.intersection));
        let markers = self
            .position
            .markers
            .iter()
            .enumerate()
            .map(|(i, m)| (format!("position.markers[{i}].intersection"), &m.intersection));

        let errors: Vec<ConfigError> = stones
            .chain(markers)
            .filter(|(_, label)| !parse_intersection(label).is_valid())
            .map(|(field, label)| ConfigError::InvalidIntersection {
                field,
                value: label.clone(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
