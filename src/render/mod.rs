//! Presentation adapter: turns a [`KnowledgeGraph`] into a self-contained
//! HTML fragment driven by a D3 force layout.

use askama::Template;
use serde_json::json;

use crate::error::Result;
use crate::graph::{KnowledgeGraph, NodeKind};

/// Externally hosted rendering library
pub const D3_URL: &str = "https://d3js.org/d3.v7.min.js";

/// Shown instead of a graph when there is nothing to draw
pub const NO_GRAPH_HTML: &str = "<div class='error'>No graph data available</div>";

const LINK_DISTANCE: u32 = 150;
const CHARGE_STRENGTH: i32 = -300;
const COLLISION_RADIUS: u32 = 60;
const LABEL_MAX_WIDTH: u32 = 100;

const DEFAULT_COLOR: &str = "rgb(234, 67, 53)";

/// Fill colour for a node kind; `Related` uses the default colour
pub fn node_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Main => "rgb(66, 133, 244)",
        NodeKind::Person => "rgb(52, 168, 83)",
        NodeKind::Location => "rgb(66, 197, 244)",
        NodeKind::Image => "rgb(251, 188, 5)",
        NodeKind::Related => DEFAULT_COLOR,
    }
}

const LEGEND: [(&str, Option<NodeKind>); 5] = [
    ("Main Entity", Some(NodeKind::Main)),
    ("Person", Some(NodeKind::Person)),
    ("Location", Some(NodeKind::Location)),
    ("Image", Some(NodeKind::Image)),
    ("Other", None),
];

/// Graph payload as the layout script reads it (`nodes` + `links`).
///
/// `</` is escaped so the JSON is safe inside a `<script>` element.
pub fn graph_json(graph: &KnowledgeGraph) -> Result<String> {
    Ok(serde_json::to_string(graph)?.replace("</", "<\\/"))
}

/// One legend line
struct LegendEntry {
    name: &'static str,
    color: &'static str,
}

#[derive(Template)]
#[template(path = "graph.html")]
struct GraphTemplate {
    legend: Vec<LegendEntry>,
    d3_url: &'static str,
    color_map: String,
    link_distance: u32,
    charge_strength: i32,
    collision_radius: u32,
    label_max_width: u32,
    graph_json: String,
}

/// Render the visualisation fragment, or a "no data" placeholder for an
/// empty graph
pub fn render_graph_html(graph: &KnowledgeGraph) -> Result<String> {
    if graph.is_empty() {
        return Ok(NO_GRAPH_HTML.to_string());
    }

    let color_map = json!({
        "main": node_color(NodeKind::Main),
        "person": node_color(NodeKind::Person),
        "location": node_color(NodeKind::Location),
        "image": node_color(NodeKind::Image),
        "default": DEFAULT_COLOR,
    });

    let template = GraphTemplate {
        legend: LEGEND
            .iter()
            .map(|&(name, kind)| LegendEntry {
                name,
                color: kind.map(node_color).unwrap_or(DEFAULT_COLOR),
            })
            .collect(),
        d3_url: D3_URL,
        color_map: color_map.to_string(),
        link_distance: LINK_DISTANCE,
        charge_strength: CHARGE_STRENGTH,
        collision_radius: COLLISION_RADIUS,
        label_max_width: LABEL_MAX_WIDTH,
        graph_json: graph_json(graph)?,
    };

    Ok(template.render()?)
}
