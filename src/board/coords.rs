//! Board coordinate system
//!
//! Maps board notation such as `"D16"` to pixel positions on a square canvas.
//! Column letters run left to right and skip `I`; rows are numbered from the
//! bottom, so row `19` is the top line of the grid.

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of lines in each direction
pub const BOARD_LINES: usize = 19;

/// Column letters, left to right
pub const HORIZONTAL_LABELS: [&str; BOARD_LINES] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T",
];

/// Row numbers, top to bottom
pub const VERTICAL_LABELS: [&str; BOARD_LINES] = [
    "19", "18", "17", "16", "15", "14", "13", "12", "11", "10", "9", "8", "7", "6", "5", "4", "3",
    "2", "1",
];

/// The nine conventional star points of a 19x19 board
pub const STAR_POINTS: [&str; 9] = ["D16", "K16", "Q16", "D10", "K10", "Q10", "D4", "K4", "Q4"];

static INTERSECTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ABCDEFGHJKLMNOPQRST])(1?\d)$").expect("static pattern"));

/// A 2D point in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Result of parsing a board notation label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intersection {
    /// Column and row indices, both in `0..19`, row 0 being the top line
    Valid { col: usize, row: usize },
    /// The label did not name a point on the board
    Invalid,
}

impl Intersection {
    /// Column/row indices, with `(-1, -1)` standing in for an invalid label.
    ///
    /// Geometry built from the sentinel lands one step outside the grid.
    pub fn indices(&self) -> (i32, i32) {
        match *self {
            Intersection::Valid { col, row } => (col as i32, row as i32),
            Intersection::Invalid => (-1, -1),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Intersection::Valid { .. })
    }
}

/// Parse board notation (`"A19"` through `"T1"`)
pub fn parse_intersection(label: &str) -> Intersection {
    let Some(caps) = INTERSECTION_PATTERN.captures(label) else {
        return Intersection::Invalid;
    };
    let col = HORIZONTAL_LABELS.iter().position(|h| *h == &caps[1]);
    let row = VERTICAL_LABELS.iter().position(|v| *v == &caps[2]);
    match (col, row) {
        (Some(col), Some(row)) => Intersection::Valid { col, row },
        _ => Intersection::Invalid,
    }
}

/// Board notation for a column/row index pair, if both are on the board
pub fn intersection_label(col: i32, row: i32) -> Option<String> {
    if !in_range(col) || !in_range(row) {
        return None;
    }
    Some(format!(
        "{}{}",
        HORIZONTAL_LABELS[col as usize], VERTICAL_LABELS[row as usize]
    ))
}

fn in_range(index: i32) -> bool {
    index >= 0 && (index as usize) < BOARD_LINES
}

/// One of the four board edges that carry coordinate labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];
}

/// Pixel geometry of a 19x19 grid centred on a square canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSystem {
    size: f64,
    grid_size: f64,
    margin_width: f64,
    label_baseline: f64,
    offset: f64,
    step_length: f64,
}

impl CoordinateSystem {
    /// Derive the grid geometry for a canvas of `size` pixels whose grid
    /// covers `ratio` of the side length.
    pub fn new(size: f64, ratio: f64) -> Self {
        let grid_size = size * ratio;
        let margin_width = (size - grid_size) / 2.0;
        let label_baseline = margin_width / 2.0;
        let offset = margin_width;
        let step_length = grid_size / 18.0;

        tracing::debug!(
            size,
            grid_size,
            margin_width,
            step_length,
            "derived board coordinate system"
        );

        Self {
            size,
            grid_size,
            margin_width,
            label_baseline,
            offset,
            step_length,
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn margin_width(&self) -> f64 {
        self.margin_width
    }

    pub fn label_baseline(&self) -> f64 {
        self.label_baseline
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn step_length(&self) -> f64 {
        self.step_length
    }

    /// Pixel position of a board notation label.
    ///
    /// Invalid labels are not rejected: they are placed at the sentinel index
    /// `(-1, -1)`, one step above and left of the grid.
    pub fn intersection_to_pixel(&self, label: &str) -> Point {
        let (col, row) = parse_intersection(label).indices();
        self.project(col, row)
    }

    /// Pixel position of a column/row index pair, or the origin when either
    /// index is off the board
    pub fn index_to_pixel(&self, col: i32, row: i32) -> Point {
        if in_range(col) && in_range(row) {
            self.project(col, row)
        } else {
            Point::new(0.0, 0.0)
        }
    }

    fn project(&self, col: i32, row: i32) -> Point {
        Point::new(
            f64::from(col) * self.step_length + self.offset,
            f64::from(row) * self.step_length + self.offset,
        )
    }

    /// Label text and anchor position for line `index` along `edge`
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..19`.
    pub fn label_for_edge(&self, edge: Edge, index: usize) -> (&'static str, Point) {
        let along = index as f64 * self.step_length + self.offset;
        match edge {
            Edge::Top => (HORIZONTAL_LABELS[index], Point::new(along, self.label_baseline)),
            Edge::Bottom => (
                HORIZONTAL_LABELS[index],
                Point::new(along, self.size - self.label_baseline),
            ),
            Edge::Left => (VERTICAL_LABELS[index], Point::new(self.label_baseline, along)),
            Edge::Right => (
                VERTICAL_LABELS[index],
                Point::new(self.size - self.label_baseline, along),
            ),
        }
    }

    /// Path data for all 38 grid lines as move/line pairs
    pub fn grid_path_data(&self) -> String {
        let last = BOARD_LINES as i32 - 1;
        let mut segments = Vec::with_capacity(BOARD_LINES * 2);
        for i in 0..BOARD_LINES as i32 {
            let horizontal = (self.index_to_pixel(0, i), self.index_to_pixel(last, i));
            let vertical = (self.index_to_pixel(i, 0), self.index_to_pixel(i, last));
            for (begin, end) in [horizontal, vertical] {
                segments.push(format!(
                    "M {} {} L {} {}",
                    fmt_num(begin.x),
                    fmt_num(begin.y),
                    fmt_num(end.x),
                    fmt_num(end.y)
                ));
            }
        }
        segments.join(" ")
    }

    pub fn star_points(&self) -> [Point; 9] {
        STAR_POINTS.map(|label| self.intersection_to_pixel(label))
    }
}

/// Format a number for SVG output.
///
/// Uses the shortest representation that round-trips, without a fractional
/// part for integral values. Negative zero is written as `0`.
pub fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact() -> CoordinateSystem {
        // 360 * 0.5 keeps every derived scalar exact
        CoordinateSystem::new(360.0, 0.5)
    }

    #[test]
    fn test_derived_scalars() {
        let cs = exact();
        assert_eq!(cs.grid_size(), 180.0);
        assert_eq!(cs.margin_width(), 90.0);
        assert_eq!(cs.label_baseline(), 45.0);
        assert_eq!(cs.offset(), 90.0);
        assert_eq!(cs.step_length(), 10.0);
    }

    #[test]
    fn test_parse_corners() {
        assert_eq!(
            parse_intersection("A19"),
            Intersection::Valid { col: 0, row: 0 }
        );
        assert_eq!(
            parse_intersection("T1"),
            Intersection::Valid { col: 18, row: 18 }
        );
        assert_eq!(
            parse_intersection("J10"),
            Intersection::Valid { col: 8, row: 9 }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for label in ["", "I5", "D0", "D20", "D01", "d4", "D4 ", "AA1", "4D", "U3"] {
            assert_eq!(parse_intersection(label), Intersection::Invalid, "{label:?}");
        }
    }

    #[test]
    fn test_invalid_indices_are_sentinel() {
        assert_eq!(Intersection::Invalid.indices(), (-1, -1));
        assert!(!Intersection::Invalid.is_valid());
    }

    #[test]
    fn test_intersection_label() {
        assert_eq!(intersection_label(3, 15), Some("D4".to_string()));
        assert_eq!(intersection_label(8, 0), Some("J19".to_string()));
        assert_eq!(intersection_label(19, 0), None);
        assert_eq!(intersection_label(0, -1), None);
    }

    #[test]
    fn test_intersection_to_pixel() {
        let cs = exact();
        assert_eq!(cs.intersection_to_pixel("A19"), Point::new(90.0, 90.0));
        assert_eq!(cs.intersection_to_pixel("D4"), Point::new(120.0, 240.0));
        assert_eq!(cs.intersection_to_pixel("Z9"), Point::new(80.0, 80.0));
    }

    #[test]
    fn test_index_to_pixel_clamps_to_origin() {
        let cs = exact();
        assert_eq!(cs.index_to_pixel(18, 18), Point::new(270.0, 270.0));
        assert_eq!(cs.index_to_pixel(-1, 3), Point::new(0.0, 0.0));
        assert_eq!(cs.index_to_pixel(3, 19), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_label_for_edge() {
        let cs = exact();
        assert_eq!(cs.label_for_edge(Edge::Top, 8), ("J", Point::new(170.0, 45.0)));
        assert_eq!(
            cs.label_for_edge(Edge::Bottom, 0),
            ("A", Point::new(90.0, 315.0))
        );
        assert_eq!(cs.label_for_edge(Edge::Left, 0), ("19", Point::new(45.0, 90.0)));
        assert_eq!(
            cs.label_for_edge(Edge::Right, 18),
            ("1", Point::new(315.0, 270.0))
        );
    }

    #[test]
    fn test_grid_path_data() {
        let d = exact().grid_path_data();
        assert_eq!(d.matches('M').count(), 38);
        assert_eq!(d.matches('L').count(), 38);
        assert!(d.starts_with("M 90 90 L 270 90 M 90 90 L 90 270 M 90 100 L 270 100"));
        assert!(d.ends_with("M 270 90 L 270 270"));
    }

    #[test]
    fn test_star_points() {
        let stars = exact().star_points();
        assert_eq!(stars.len(), 9);
        assert_eq!(stars[0], Point::new(120.0, 120.0));
        assert_eq!(stars[4], Point::new(180.0, 180.0));
        assert_eq!(stars[8], Point::new(240.0, 240.0));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(361.0), "361");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(72.2), "72.2");
        assert_eq!(fmt_num(-1.5), "-1.5");
    }
}
