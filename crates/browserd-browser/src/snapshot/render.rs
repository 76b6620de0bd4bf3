//! Deterministic, length-bounded rendering.

use super::node::SnapshotNode;

/// Appended when output was cut.
pub const TRUNCATION_MARKER: &str = "... (truncated)";

/// Rendered snapshot text plus truncation bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content: String,
    pub truncated: bool,
    pub nodes_total: usize,
    pub nodes_included: usize,
}

/// Render a header and one line per node, never exceeding `max_length`
/// characters. When everything fits the full text is returned; otherwise
/// whole lines are kept in order while they fit alongside the marker line.
pub fn render(title: &str, url: &str, nodes: &[SnapshotNode], max_length: usize) -> Rendered {
    let header = [
        format!("Page: {}", title),
        format!("URL: {}", url),
        String::new(),
    ];
    let lines: Vec<String> = nodes.iter().map(SnapshotNode::line).collect();
    let nodes_total = lines.len();

    let full_length: usize = header
        .iter()
        .chain(lines.iter())
        .map(|l| l.chars().count())
        .sum::<usize>()
        + (header.len() + lines.len()).saturating_sub(1);

    if full_length <= max_length {
        let content = header
            .iter()
            .chain(lines.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        return Rendered {
            content,
            truncated: false,
            nodes_total,
            nodes_included: nodes_total,
        };
    }

    let marker_length = TRUNCATION_MARKER.chars().count();
    if max_length <= marker_length {
        return Rendered {
            content: TRUNCATION_MARKER.chars().take(max_length).collect(),
            truncated: true,
            nodes_total,
            nodes_included: 0,
        };
    }

    // Kept lines plus their newlines must leave room for the marker.
    let budget = max_length - marker_length;
    let mut content = String::new();
    let mut used = 0;
    let mut emitted: usize = 0;
    for line in header.iter().chain(lines.iter()) {
        let cost = line.chars().count() + 1;
        if used + cost > budget {
            break;
        }
        content.push_str(line);
        content.push('\n');
        used += cost;
        emitted += 1;
    }
    content.push_str(TRUNCATION_MARKER);

    Rendered {
        content,
        truncated: true,
        nodes_total,
        nodes_included: emitted.saturating_sub(header.len()),
    }
}

/// Cut `text` to at most `max_length` characters, marker included.
pub fn truncate_chars(text: &str, max_length: usize) -> (String, bool) {
    if text.chars().count() <= max_length {
        return (text.to_string(), false);
    }

    let marker_length = TRUNCATION_MARKER.chars().count();
    if max_length <= marker_length {
        return (TRUNCATION_MARKER.chars().take(max_length).collect(), true);
    }

    let keep = max_length - marker_length - 1;
    let mut out: String = text.chars().take(keep).collect();
    out.push('\n');
    out.push_str(TRUNCATION_MARKER);
    (out, true)
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
