//! Output formatting.
//!
//! Human-readable terminal output plus JSON for scripting, for both the
//! search and graph commands.

use serde::Serialize;

use ideoscope_core::graph::GraphNode;
use ideoscope_core::highlight::node_color;
use ideoscope_core::search::SearchResult;

/// Maximum characters shown in a preview snippet.
const SNIPPET_MAX_LEN: usize = 200;

/// JSON output for the search command.
#[derive(Serialize)]
pub struct SearchJson<'a> {
    pub query: &'a str,
    pub reference: Option<&'a str>,
    pub results: &'a [SearchResult],
}

/// Formats search results as JSON.
pub fn format_search_json(
    query: &str,
    reference: Option<&str>,
    results: &[SearchResult],
) -> String {
    let output = SearchJson {
        query,
        reference,
        results,
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats search results for the terminal.
///
/// Relevance is shown as `1 - contextual distance` so bigger reads as
/// better; the alignment column appears only for ranked results.
pub fn format_search_human(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for \"{}\"", query);
    }

    let mut output = String::new();
    output.push_str(&format!(
        "Found {} article{} for \"{}\":\n\n",
        results.len(),
        if results.len() == 1 { "" } else { "s" },
        query
    ));

    for (i, result) in results.iter().enumerate() {
        let title = if result.title.is_empty() {
            result.key.as_str()
        } else {
            result.title.as_str()
        };
        output.push_str(&format!(
            "{}. {} (relevance: {:.2})\n",
            i + 1,
            title,
            1.0 - result.contextual_score
        ));
        if let Some(alignment) = result.ideological_score {
            output.push_str(&format!("   [alignment: {:+.2}]\n", alignment));
        }
        if !result.preview.is_empty() {
            output.push_str(&format!(
                "   {}\n",
                truncate_text(&result.preview, SNIPPET_MAX_LEN)
            ));
        }
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// One graph node in JSON output, with its resolved render color.
#[derive(Serialize)]
pub struct GraphNodeJson<'a> {
    #[serde(flatten)]
    pub node: &'a GraphNode,
    pub color: String,
}

/// Formats graph nodes as JSON, colors resolved with no active highlight.
pub fn format_graph_json(nodes: &[GraphNode], reference: Option<&str>) -> String {
    let entries: Vec<GraphNodeJson> = nodes
        .iter()
        .map(|node| GraphNodeJson {
            node,
            color: node_color(node, None, reference).to_css(),
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}

/// Formats graph nodes for the terminal.
pub fn format_graph_human(nodes: &[GraphNode], reference: Option<&str>) -> String {
    if nodes.is_empty() {
        return "Graph is empty".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{} nodes:\n\n", nodes.len()));
    for node in nodes {
        let color = node_color(node, None, reference).to_css();
        output.push_str(&format!(
            "{:<10} {:<28} ({:>7.2}, {:>7.2}, {:>7.2})  {}\n",
            format!("{:?}", node.kind).to_lowercase(),
            node.label,
            node.x,
            node.y,
            node.z,
            color
        ));
    }
    output.trim_end().to_string()
}

/// Truncates text at a word boundary, adding an ellipsis if needed.
fn truncate_text(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_len).collect();
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &truncated[..last_space]),
        None => format!("{}...", truncated),
    }
}
