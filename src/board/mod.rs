//! Board model: configuration types and the coordinate system

pub mod config;
pub mod coords;

pub use config::{BoardConfig, Marker, Offset, Position, Stone, View};
pub use coords::{
    intersection_label, parse_intersection, CoordinateSystem, Edge, Intersection, Point,
};
