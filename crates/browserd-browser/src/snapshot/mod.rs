//! Bounded textual summaries of the active page.

mod collect;
mod node;
mod render;

use serde::Serialize;

use crate::error::BrowserError;
use crate::session::Session;

pub use node::{Role, SnapshotNode};
pub use render::{Rendered, TRUNCATION_MARKER, render, truncate_chars};

/// Structured page summary.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub title: String,
    pub url: String,
    pub content: String,
    /// Length of `content` in characters.
    pub length: usize,
    pub truncated: bool,
    pub nodes_total: usize,
    pub nodes_included: usize,
}

/// Flat page text.
#[derive(Debug, Clone, Serialize)]
pub struct PageText {
    pub text: String,
    pub length: usize,
    pub truncated: bool,
}

/// Walk the active page and render a summary of at most `max_length` characters.
pub async fn snapshot(session: &mut Session, max_length: usize) -> Result<Snapshot, BrowserError> {
    let page = session.current_page().await?;
    let title = page.get_title().await?;
    let url = page.get_url().await?;
    let nodes = collect::collect_nodes(&page).await?;

    let rendered = render(&title, &url, &nodes, max_length);
    Ok(Snapshot {
        title,
        url,
        length: rendered.content.chars().count(),
        content: rendered.content,
        truncated: rendered.truncated,
        nodes_total: rendered.nodes_total,
        nodes_included: rendered.nodes_included,
    })
}

/// `document.body.innerText`, capped at `max_length` characters.
pub async fn page_text(session: &mut Session, max_length: usize) -> Result<PageText, BrowserError> {
    let page = session.current_page().await?;
    let raw = page
        .evaluate("document.body ? document.body.innerText : ''")
        .await?;
    let (text, truncated) = truncate_chars(raw.as_str().unwrap_or(""), max_length);
    Ok(PageText {
        length: text.chars().count(),
        text,
        truncated,
    })
}
