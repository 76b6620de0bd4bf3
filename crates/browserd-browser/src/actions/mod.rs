//! Page and element actions.
//!
//! Every action runs against the session's active tab. Element actions
//! re-validate their handle against the current document right before
//! dispatching input, so a navigation in between yields `StaleContext`.

mod cookies;
mod element;
mod keyboard;
mod navigation;
mod page;

pub use cookies::{clear_cookies, get_cookies, set_cookies};
pub use element::{ElementHtml, ElementText, click, element_html, element_text, elements_text, hover, type_text};
pub use keyboard::press;
pub use navigation::{PageInfo, back, forward, navigate, normalize_url, page_info, refresh};
pub use page::{ScrollPosition, Screenshot, evaluate, screenshot, scroll, wrap_script};

/// How an element action is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Synthesized pointer and keyboard input through the browser.
    #[default]
    Native,
    /// In-page script, for elements that resist native input.
    Script,
}

impl ExecutionMode {
    pub fn from_by_js(by_js: bool) -> Self {
        if by_js {
            ExecutionMode::Script
        } else {
            ExecutionMode::Native
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_mode_from_flag() {
        assert_eq!(ExecutionMode::from_by_js(false), ExecutionMode::Native);
        assert_eq!(ExecutionMode::from_by_js(true), ExecutionMode::Script);
        assert_eq!(ExecutionMode::default(), ExecutionMode::Native);
    }
}
