//! Layered board rendering

use crate::board::coords::{fmt_num, parse_intersection, CoordinateSystem, Edge, BOARD_LINES};
use crate::board::{BoardConfig, Marker, Stone};
use crate::theme::Theme;

use super::svg::{Element, SvgBuilder, ViewBox};
use super::SvgConfig;

const CENTERED: &str = "text-anchor:middle;dominant-baseline:central;";

/// Renders one board configuration into an SVG document.
///
/// Each renderer owns its coordinate system and output buffer, so renderers
/// for different configurations can run on separate threads freely.
pub struct BoardRenderer<'a> {
    config: &'a BoardConfig,
    theme: &'a Theme,
    coords: CoordinateSystem,
    builder: SvgBuilder,
}

impl<'a> BoardRenderer<'a> {
    pub fn new(config: &'a BoardConfig, theme: &'a Theme, svg: SvgConfig) -> Self {
        Self {
            config,
            theme,
            coords: CoordinateSystem::new(config.size, theme.grid_ratio),
            builder: SvgBuilder::new(svg),
        }
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coords
    }

    /// Produce the document: background, board, stones, then markers
    pub fn render(mut self) -> String {
        self.render_background_layer();
        self.render_board_layer();
        self.render_stones_layer();
        self.render_markers_layer();

        tracing::debug!(
            stones = self.config.position.chess.len(),
            markers = self.config.position.markers.len(),
            label = self.config.label,
            "rendered board layers"
        );

        let size = self.config.size;
        let offset = self.config.view.offset;
        let viewbox = ViewBox::new(offset.x, offset.y, size - offset.x, size - offset.y);
        self.builder.build(viewbox)
    }

    fn render_background_layer(&mut self) {
        let size = self.config.size;
        self.builder.start_group("background_layer");
        self.builder.add(
            Element::new("rect")
                .attr("style", format!("fill: {};", self.theme.color("background")))
                .attr("x", 0.0)
                .attr("y", 0.0)
                .attr("width", size)
                .attr("height", size),
        );
        self.builder.end_group();
    }

    fn render_board_layer(&mut self) {
        let theme = self.theme;
        let grid = theme.color("grid");
        let grid_style = format!(
            "stroke:{};stroke-width:{};shape-rendering:crispEdges;vector-effect:non-scaling-stroke;",
            grid,
            fmt_num(theme.grid_stroke_width)
        );

        self.builder.start_group("board_layer");
        self.builder.add(
            Element::new("path")
                .attr("style", grid_style)
                .attr("d", self.coords.grid_path_data()),
        );

        for star in self.coords.star_points() {
            let mut dot = Element::new("circle")
                .at("cx", "cy", star)
                .attr("r", self.theme.star_radius);
            // black is the SVG default fill
            if grid != "black" {
                dot = dot.attr("style", format!("fill:{}", grid));
            }
            self.builder.add(dot);
        }

        if self.config.label {
            for i in 0..BOARD_LINES {
                for edge in Edge::ALL {
                    let (text, at) = self.coords.label_for_edge(edge, i);
                    let anchor = match edge {
                        Edge::Top | Edge::Bottom => "middle",
                        Edge::Left => "end",
                        Edge::Right => "start",
                    };
                    self.builder.add(
                        Element::new("text")
                            .attr("font-size", self.theme.label_font_size.as_str())
                            .attr(
                                "style",
                                format!("text-anchor:{};dominant-baseline:central;", anchor),
                            )
                            .at("x", "y", at)
                            .content(text),
                    );
                }
            }
        }
        self.builder.end_group();
    }

    fn render_stones_layer(&mut self) {
        let config = self.config;
        self.builder.start_group("stones_layer");
        for stone in &config.position.chess {
            self.render_stone(stone);
        }
        self.builder.end_group();
    }

    fn render_stone(&mut self, stone: &Stone) {
        warn_if_invalid("stone", &stone.intersection);
        let at = self.coords.intersection_to_pixel(&stone.intersection);
        let theme = self.theme;
        let (fill, text_fill) = if stone.dark {
            (theme.color("dark-stone"), theme.color("light-stone"))
        } else {
            (theme.color("light-stone"), theme.color("dark-stone"))
        };

        self.builder.add(
            Element::new("circle")
                .at("cx", "cy", at)
                .attr("r", self.theme.stone_radius)
                .attr(
                    "style",
                    format!("fill:{};stroke:{};", fill, self.theme.color("stone-outline")),
                )
                .tight(),
        );

        if let Some(text) = stone.text.as_deref().filter(|t| !t.is_empty()) {
            self.builder.add(
                Element::new("text")
                    .at("x", "y", at)
                    .attr("style", format!("fill:{};{}", text_fill, CENTERED))
                    .attr("font-size", self.theme.stone_font_size.as_str())
                    .content(text),
            );
        }
    }

    fn render_markers_layer(&mut self) {
        let config = self.config;
        self.builder.start_group("markers_layer");
        for marker in &config.position.markers {
            self.render_marker(marker);
        }
        self.builder.end_group();
    }

    /// Markers without text, or sitting under a stone, draw nothing
    fn render_marker(&mut self, marker: &Marker) {
        if marker.text.is_empty() || self.config.has_stone_at(&marker.intersection) {
            return;
        }
        warn_if_invalid("marker", &marker.intersection);
        let at = self.coords.intersection_to_pixel(&marker.intersection);

        self.builder.add(
            Element::new("circle")
                .at("cx", "cy", at)
                .attr("r", self.theme.marker_radius)
                .attr("style", format!("fill:{}", self.theme.color("marker-fill")))
                .tight(),
        );
        self.builder.add(
            Element::new("text")
                .at("x", "y", at)
                .attr(
                    "style",
                    format!("fill:{};{}", self.theme.color("marker-text"), CENTERED),
                )
                .content(marker.text.as_str()),
        );
    }
}

fn warn_if_invalid(kind: &str, intersection: &str) {
    if !parse_intersection(intersection).is_valid() {
        tracing::warn!(kind, intersection, "malformed intersection drawn off the grid");
    }
}

/// Render a board with the default theme and compact output
pub fn render_board(config: &BoardConfig) -> String {
    render_board_with(config, &Theme::default(), &SvgConfig::default())
}

/// Render a board with a custom theme and output options
pub fn render_board_with(config: &BoardConfig, theme: &Theme, svg: &SvgConfig) -> String {
    BoardRenderer::new(config, theme, svg.clone()).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// 360px canvas, half covered by the grid: offset 90, step 10
    fn exact_theme() -> Theme {
        Theme::default().with_grid_ratio(0.5)
    }

    fn layer<'s>(svg: &'s str, class: &str) -> &'s str {
        let open = format!(r#"<g class="{}">"#, class);
        let start = svg.find(&open).expect("layer present");
        let end = start + svg[start..].find("</g>").expect("layer closed") + "</g>".len();
        &svg[start..end]
    }

    fn render_exact(config: &BoardConfig) -> String {
        render_board_with(config, &exact_theme(), &SvgConfig::default())
    }

    #[test]
    fn test_document_frame() {
        let svg = render_board(&BoardConfig::new(722.0));
        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" height="100%" viewBox="0 0 722 722"><g class="background_layer">"#
        ));
        assert!(svg.ends_with("</g></svg>"));
    }

    #[test]
    fn test_background_layer() {
        let svg = render_board(&BoardConfig::new(722.0));
        assert_eq!(
            layer(&svg, "background_layer"),
            r#"<g class="background_layer"><rect style="fill: white;" x="0" y="0" width="722" height="722" /></g>"#
        );
    }

    #[test]
    fn test_viewbox_crops_trailing_edge() {
        let svg = render_board(&BoardConfig::new(722.0).with_offset(40.0, 60.5));
        assert!(svg.contains(r#"viewBox="40 60.5 682 661.5""#));
    }

    #[test]
    fn test_stone_layer_exact() {
        let config = BoardConfig::new(360.0)
            .with_stone(Stone::new("D4", true).with_text("A"))
            .with_stone(Stone::new("K10", false));
        let svg = render_exact(&config);
        insta::assert_snapshot!(layer(&svg, "stones_layer"), @r#"<g class="stones_layer"><circle cx="120" cy="240" r="18" style="fill:black;stroke:black;"/><text x="120" y="240" style="fill:white;text-anchor:middle;dominant-baseline:central;" font-size="1.2rem">A</text><circle cx="180" cy="180" r="18" style="fill:white;stroke:black;"/></g>"#);
    }

    #[test]
    fn test_light_stone_text_is_dark() {
        let config = BoardConfig::new(360.0).with_stone(Stone::new("A1", false).with_text("7"));
        let svg = render_exact(&config);
        assert!(svg.contains(
            r#"<text x="90" y="270" style="fill:black;text-anchor:middle;dominant-baseline:central;" font-size="1.2rem">7</text>"#
        ));
    }

    #[test]
    fn test_empty_stone_text_is_omitted() {
        let config = BoardConfig::new(360.0).with_stone(Stone::new("A1", true).with_text(""));
        let svg = render_exact(&config);
        assert_eq!(layer(&svg, "stones_layer").matches("<text").count(), 0);
    }

    #[test]
    fn test_marker_layer_exact() {
        let config = BoardConfig::new(360.0).with_marker(Marker::new("T19", "a"));
        let svg = render_exact(&config);
        insta::assert_snapshot!(layer(&svg, "markers_layer"), @r#"<g class="markers_layer"><circle cx="270" cy="90" r="10" style="fill:white"/><text x="270" y="90" style="fill:black;text-anchor:middle;dominant-baseline:central;">a</text></g>"#);
    }

    #[test]
    fn test_marker_under_stone_is_suppressed() {
        let config = BoardConfig::new(360.0)
            .with_stone(Stone::new("D4", true))
            .with_marker(Marker::new("D4", "1"))
            .with_marker(Marker::new("E5", ""));
        let svg = render_exact(&config);
        assert_eq!(
            layer(&svg, "markers_layer"),
            r#"<g class="markers_layer"></g>"#
        );
    }

    #[test]
    fn test_board_layer_counts() {
        let svg = render_exact(&BoardConfig::new(360.0));
        let board = layer(&svg, "board_layer");
        assert_eq!(board.matches("<path").count(), 1);
        assert_eq!(board.matches(r#"r="2.8" />"#).count(), 9);
        assert_eq!(board.matches("<text").count(), 76);
        assert!(board.contains(
            r#"<text font-size="1.4rem" style="text-anchor:middle;dominant-baseline:central;" x="90" y="45">A</text>"#
        ));
        assert!(board.contains(
            r#"<text font-size="1.4rem" style="text-anchor:end;dominant-baseline:central;" x="45" y="90">19</text>"#
        ));
        assert!(board.contains(
            r#"<text font-size="1.4rem" style="text-anchor:start;dominant-baseline:central;" x="315" y="270">1</text>"#
        ));
    }

    #[test]
    fn test_labels_off() {
        let svg = render_exact(&BoardConfig::new(360.0).with_label(false));
        assert_eq!(layer(&svg, "board_layer").matches("<text").count(), 0);
    }

    #[test]
    fn test_grid_style() {
        let svg = render_exact(&BoardConfig::new(360.0));
        assert!(svg.contains(
            r#"<path style="stroke:black;stroke-width:1.5;shape-rendering:crispEdges;vector-effect:non-scaling-stroke;" d="M 90 90 L 270 90 "#
        ));
    }

    #[test]
    fn test_invalid_intersection_drawn_at_sentinel() {
        let config = BoardConfig::new(360.0).with_stone(Stone::new("I9", true));
        let svg = render_exact(&config);
        assert!(svg.contains(r#"<circle cx="80" cy="80" r="18""#));
    }

    #[test]
    fn test_themed_colors() {
        let theme = exact_theme()
            .with_color("background", "#dcb35c")
            .with_color("grid", "#222");
        let svg = render_board_with(&BoardConfig::new(360.0), &theme, &SvgConfig::default());
        assert!(svg.contains(r##"<rect style="fill: #dcb35c;""##));
        assert!(svg.contains(r##"style="stroke:#222;"##));
        assert_eq!(svg.matches(r##"r="2.8" style="fill:#222" />"##).count(), 9);
    }
}
