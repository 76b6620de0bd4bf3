//! Wait conditions and their single-shot predicates.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BrowserError;
use crate::selector::{self, Selector};
use crate::session::Session;

/// Target element state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    /// At least one match is visible.
    #[default]
    Displayed,
    /// At least one match is attached.
    Exists,
    /// No match is visible, including when nothing matches.
    Hidden,
    /// Nothing matches.
    Removed,
}

impl FromStr for ElementState {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "displayed" | "visible" => Ok(ElementState::Displayed),
            "exists" | "attached" => Ok(ElementState::Exists),
            "hidden" => Ok(ElementState::Hidden),
            "removed" | "detached" => Ok(ElementState::Removed),
            other => Err(BrowserError::InvalidInput(format!(
                "unknown element state '{}', expected displayed, exists, hidden or removed",
                other
            ))),
        }
    }
}

impl ElementState {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementState::Displayed => "displayed",
            ElementState::Exists => "exists",
            ElementState::Hidden => "hidden",
            ElementState::Removed => "removed",
        }
    }

    /// Whether the observed counts satisfy this state.
    pub fn holds(self, presence: selector::Presence) -> bool {
        match self {
            ElementState::Displayed => presence.visible > 0,
            ElementState::Exists => presence.count > 0,
            ElementState::Hidden => presence.visible == 0,
            ElementState::Removed => presence.count == 0,
        }
    }
}

/// How the page URL is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlMatch {
    Exact,
    Contains,
}

impl UrlMatch {
    pub fn matches(self, url: &str, pattern: &str) -> bool {
        match self {
            UrlMatch::Exact => url == pattern,
            UrlMatch::Contains => url.contains(pattern),
        }
    }
}

/// Something to wait for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    Element {
        selector: Selector,
        state: ElementState,
    },
    Text(String),
    Url { pattern: String, mode: UrlMatch },
}

impl WaitCondition {
    /// Evaluate once against the active page.
    pub async fn check(&self, session: &mut Session) -> Result<bool, BrowserError> {
        let page = session.current_page().await?;
        match self {
            WaitCondition::Element { selector, state } => {
                let presence = selector::presence(&page, selector).await?;
                Ok(state.holds(presence))
            }
            WaitCondition::Text(text) => {
                let expression = format!(
                    "!!(document.body && document.body.innerText.includes({}))",
                    serde_json::Value::String(text.clone())
                );
                Ok(page.evaluate(&expression).await?.as_bool().unwrap_or(false))
            }
            WaitCondition::Url { pattern, mode } => {
                let url = page.get_url().await?;
                Ok(mode.matches(&url, pattern))
            }
        }
    }

    /// Short description for logs and timeout messages.
    pub fn describe(&self) -> String {
        match self {
            WaitCondition::Element { selector, state } => {
                format!("element {} to be {}", selector, state.as_str())
            }
            WaitCondition::Text(text) => format!("text {:?}", text),
            WaitCondition::Url { pattern, mode } => match mode {
                UrlMatch::Exact => format!("url == {:?}", pattern),
                UrlMatch::Contains => format!("url containing {:?}", pattern),
            },
        }
    }
}
