//! Error types for loading and validating board configurations

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error at line {line}, column {column}: {message}")]
    Json {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid intersection {value:?} in {field}")]
    InvalidIntersection { field: String, value: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json appends " at line L column C" to Display; keep the bare message
        let full = err.to_string();
        let message = match full.rfind(" at line ") {
            Some(idx) => full[..idx].to_string(),
            None => full,
        };
        ConfigError::Json {
            message,
            line: err.line(),
            column: err.column(),
        }
    }
}

impl ConfigError {
    /// Byte range of the offending text within `source`, if it can be located
    pub fn span(&self, source: &str) -> Option<Span> {
        match self {
            ConfigError::Json { line, column, .. } => {
                let start = line_column_offset(source, *line, *column)?;
                let end = source[start..]
                    .chars()
                    .next()
                    .map_or(start, |c| start + c.len_utf8());
                Some(start..end)
            }
            ConfigError::InvalidIntersection { value, .. } => {
                let quoted = format!("\"{}\"", value);
                source
                    .find(&quoted)
                    .map(|start| start..start + quoted.len())
            }
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span(source).unwrap_or(0..0);
        let (message, note) = match self {
            ConfigError::Json { message, .. } => (message.clone(), "JSON error here".to_string()),
            ConfigError::InvalidIntersection { field, value } => (
                format!("Invalid intersection {:?}", value),
                format!("{} must be a column A-T (no I) and a row 1-19", field),
            ),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(note)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Convert serde_json's 1-based line and column into a byte offset
fn line_column_offset(source: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let mut offset = 0;
    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let col = column.saturating_sub(1).min(text.len());
            return Some(offset + floor_char_boundary(text, col));
        }
        offset += text.len();
    }
    Some(source.len())
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
