//! SVG renderer for board configurations
//!
//! This module turns a BoardConfig into an SVG string made of four layers:
//! background, grid, stones and markers.

pub mod board;
pub mod config;
pub mod svg;

pub use board::{render_board, render_board_with, BoardRenderer};
pub use config::SvgConfig;
pub use svg::{SvgBuilder, SvgNode, ViewBox};
