//! Snapshot nodes and selector hints.

use serde::{Deserialize, Serialize};

/// Maximum characters of a text block line.
pub(crate) const TEXT_BLOCK_LIMIT: usize = 500;

/// Labels at most this long may be used as `text=` hints.
const TEXT_HINT_LIMIT: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Heading,
    Link,
    Button,
    Input,
    Text,
}

/// Element as reported by the in-page collector.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawNode {
    pub role: Option<Role>,
    #[serde(default)]
    pub label: String,
    pub level: Option<u8>,
    pub href: Option<String>,
    pub input_type: Option<String>,
    pub value: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub aria_label: Option<String>,
    /// Normalized `textContent`, the text `text=` selectors match against.
    pub text_content: Option<String>,
    /// Raw `value` attribute, set on `<input type=submit>` style buttons.
    pub value_attr: Option<String>,
    pub css_path: Option<String>,
}

/// One line of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotNode {
    pub role: Role,
    pub label: String,
    /// Selector usable in follow-up requests; absent for headings and text.
    pub hint: Option<String>,
    pub level: Option<u8>,
    pub href: Option<String>,
    pub input_type: Option<String>,
    pub value: Option<String>,
}

impl SnapshotNode {
    /// Build from a raw node, dropping entries without a role.
    pub(crate) fn from_raw(raw: RawNode) -> Option<Self> {
        let role = raw.role?;
        let mut label = collapse_whitespace(&raw.label);
        if role == Role::Text {
            if label.is_empty() {
                return None;
            }
            label = label.chars().take(TEXT_BLOCK_LIMIT).collect();
        }
        let hint = match role {
            Role::Link | Role::Button | Role::Input => Some(selector_hint(&raw, role)),
            Role::Heading | Role::Text => None,
        };
        Some(Self {
            role,
            label,
            hint,
            level: raw.level,
            href: raw.href,
            input_type: raw.input_type,
            value: raw.value,
        })
    }

    /// Rendered line, without trailing newline.
    pub fn line(&self) -> String {
        let hint = self
            .hint
            .as_deref()
            .map(|h| format!("  {{{}}}", h))
            .unwrap_or_default();
        match self.role {
            Role::Heading => format!("[h{}] {}", self.level.unwrap_or(1).clamp(1, 6), self.label),
            Role::Link => format!(
                "[link] {} -> {}{}",
                self.label,
                self.href.as_deref().unwrap_or(""),
                hint
            ),
            Role::Button => format!("[button] {}{}", self.label, hint),
            Role::Input => format!(
                "[input:{}] {} = \"{}\"{}",
                self.input_type.as_deref().unwrap_or("text"),
                self.label,
                collapse_whitespace(self.value.as_deref().unwrap_or("")),
                hint
            ),
            Role::Text => self.label.clone(),
        }
    }
}

/// Most specific selector for an element: `#id`, `@name=`, `@aria-label=`,
/// `text=` for short link/button text content, `@value=` for value-labelled
/// buttons, else the `css:` path.
///
/// The displayed label may come from `innerText`, `title` or `alt`, none of
/// which a `text=` lookup sees, so text hints use the text content only.
pub(crate) fn selector_hint(raw: &RawNode, role: Role) -> String {
    let usable = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.contains(char::is_whitespace))
            .map(str::to_string)
    };

    if let Some(id) = usable(&raw.id) {
        return format!("#{}", id);
    }
    if let Some(name) = usable(&raw.name) {
        return format!("@name={}", name);
    }
    if let Some(aria) = raw.aria_label.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        return format!("@aria-label={}", aria);
    }
    if matches!(role, Role::Link | Role::Button) {
        let text = raw
            .text_content
            .as_deref()
            .map(collapse_whitespace)
            .filter(|t| !t.is_empty() && t.chars().count() <= TEXT_HINT_LIMIT);
        if let Some(text) = text {
            return format!("text={}", text);
        }
    }
    if role == Role::Button {
        if let Some(value) = raw.value_attr.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            return format!("@value={}", value);
        }
    }
    format!("css:{}", raw.css_path.as_deref().unwrap_or("*"))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
