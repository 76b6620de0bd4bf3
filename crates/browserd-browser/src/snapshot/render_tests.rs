use super::*;
use crate::snapshot::node::{RawNode, Role};

fn node(role: Role, label: &str) -> SnapshotNode {
    SnapshotNode::from_raw(RawNode {
        role: Some(role),
        label: label.to_string(),
        level: Some(1),
        href: Some("https://example.com/x".to_string()),
        css_path: Some("body > a:nth-of-type(1)".to_string()),
        ..RawNode::default()
    })
    .unwrap()
}

fn page() -> Vec<SnapshotNode> {
    let mut nodes = vec![node(Role::Heading, "Example Domain")];
    for i in 0..40 {
        nodes.push(node(Role::Text, &format!("Paragraph number {} with some filler text.", i)));
        nodes.push(node(Role::Link, &format!("Link {}", i)));
    }
    nodes.push(node(Role::Button, "Submit"));
    nodes
}

#[test]
fn test_fits_verbatim() {
    let nodes = vec![node(Role::Heading, "Hi"), node(Role::Button, "Go")];
    let out = render("T", "https://example.com/", &nodes, 80_000);
    assert_eq!(
        out.content,
        "Page: T\nURL: https://example.com/\n\n[h1] Hi\n[button] Go  {text=Go}"
    );
    assert!(!out.truncated);
    assert_eq!(out.nodes_included, 2);
}

#[test]
fn test_exact_fit_is_not_truncated() {
    let nodes = vec![node(Role::Text, "abc")];
    let full = render("T", "u", &nodes, 80_000).content;
    let out = render("T", "u", &nodes, full.chars().count());
    assert!(!out.truncated);
    assert_eq!(out.content, full);
}

#[test]
fn test_never_exceeds_max_length() {
    let nodes = page();
    for max in [0, 1, 5, 15, 16, 17, 30, 100, 257, 1000, 2048] {
        let out = render("Example", "https://example.com/", &nodes, max);
        assert!(
            out.content.chars().count() <= max,
            "max {} produced {}",
            max,
            out.content.chars().count()
        );
        assert!(out.truncated);
    }
}

#[test]
fn test_truncation_is_deterministic() {
    let nodes = page();
    let a = render("Example", "https://example.com/", &nodes, 700);
    let b = render("Example", "https://example.com/", &nodes, 700);
    assert_eq!(a, b);
}

#[test]
fn test_truncation_keeps_whole_lines_in_order() {
    let nodes = page();
    let out = render("Example", "https://example.com/", &nodes, 500);
    assert!(out.truncated);
    assert!(out.content.ends_with(TRUNCATION_MARKER));

    let kept: Vec<&str> = out.content.lines().collect();
    let body = &kept[3..kept.len() - 1];
    assert_eq!(body.len(), out.nodes_included);
    for (line, node) in body.iter().zip(nodes.iter()) {
        assert_eq!(*line, node.line());
    }
    assert_eq!(out.nodes_total, nodes.len());
    assert!(out.nodes_included < out.nodes_total);
}

#[test]
fn test_tiny_limit_gets_marker_prefix() {
    let out = render("Example", "https://example.com/", &page(), 3);
    assert_eq!(out.content, "...");
    assert_eq!(out.nodes_included, 0);
}

#[test]
fn test_counts_characters_not_bytes() {
    let nodes = vec![node(Role::Text, "héllo wörld ünïcode")];
    let full = render("Ünïcode", "u", &nodes, 80_000).content;
    let out = render("Ünïcode", "u", &nodes, full.chars().count());
    assert!(!out.truncated);
    assert!(full.len() > full.chars().count());
}

#[test]
fn test_truncate_chars_short_text() {
    assert_eq!(truncate_chars("hello", 10), ("hello".to_string(), false));
    assert_eq!(truncate_chars("", 0), (String::new(), false));
}

#[test]
fn test_truncate_chars_long_text() {
    let text = "x".repeat(100);
    let (out, truncated) = truncate_chars(&text, 50);
    assert!(truncated);
    assert_eq!(out.chars().count(), 50);
    assert!(out.ends_with("\n... (truncated)"));
    assert!(out.starts_with(&"x".repeat(34)));
}

#[test]
fn test_truncate_chars_multibyte() {
    let text = "ü".repeat(60_000);
    let (out, truncated) = truncate_chars(&text, 50_000);
    assert!(truncated);
    assert_eq!(out.chars().count(), 50_000);
}

#[test]
fn test_truncate_chars_tiny_limit() {
    assert_eq!(truncate_chars("abcdef", 2), ("..".to_string(), true));
}
