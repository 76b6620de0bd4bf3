//! Element-targeted actions: click, type, hover and content reads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::cdp::PageSession;
use crate::error::BrowserError;
use crate::selector::{self, ElementHandle, Selector};
use crate::session::Session;

use super::ExecutionMode;

const CLICK_FN: &str = "function() { this.click(); }";

const EDITABLE_FN: &str = r#"function() {
    if (this.isContentEditable) return true;
    if (this.disabled || this.readOnly) return false;
    if (this.tagName === 'TEXTAREA') return true;
    if (this.tagName !== 'INPUT') return false;
    const type = (this.getAttribute('type') || 'text').toLowerCase();
    return !['button', 'submit', 'reset', 'checkbox', 'radio', 'file',
             'image', 'hidden', 'range', 'color'].includes(type);
}"#;

/// Assign through the prototype setter so framework-managed inputs observe it.
const SET_VALUE_FN: &str = r#"function(text, append) {
    if (this.isContentEditable) {
        this.textContent = append ? this.textContent + text : text;
    } else {
        const proto = this.tagName === 'TEXTAREA'
            ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
        const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
        setter.call(this, append ? this.value + text : text);
    }
    this.dispatchEvent(new Event('input', { bubbles: true }));
}"#;

const CARET_END_FN: &str = r#"function() {
    if (this.isContentEditable) {
        const range = document.createRange();
        range.selectNodeContents(this);
        range.collapse(false);
        const sel = window.getSelection();
        sel.removeAllRanges();
        sel.addRange(range);
        return;
    }
    try {
        const end = this.value.length;
        this.setSelectionRange(end, end);
    } catch (e) {}
}"#;

const CHANGE_FN: &str =
    "function() { this.dispatchEvent(new Event('change', { bubbles: true })); }";

const TEXT_FN: &str = r#"function() {
    const text = this.innerText ?? this.textContent ?? '';
    return { text: text.trim(), tag: this.tagName.toLowerCase() };
}"#;

const HTML_FN: &str =
    "function() { return { html: this.outerHTML, tag: this.tagName.toLowerCase() }; }";

/// Text content of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementText {
    pub text: String,
    pub tag: String,
}

/// Markup of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementHtml {
    pub html: String,
    pub tag: String,
}

/// Resolve the first match on the active tab.
async fn first_match(
    session: &mut Session,
    selector: &Selector,
) -> Result<(Arc<PageSession>, ElementHandle), BrowserError> {
    let page = session.current_page().await?;
    let context = session.page_context().await?;
    let handle = selector::resolve_first(&page, &context, selector).await?;
    Ok((page, handle))
}

/// Scroll the element into view and return the centre of its first visible box.
async fn visible_center(
    page: &PageSession,
    handle: &ElementHandle,
    selector: &Selector,
) -> Result<(f64, f64), BrowserError> {
    page.scroll_into_view(handle.object_id()).await?;
    let quads = page.content_quads(handle.object_id()).await?;
    PageSession::first_visible_center(&quads).ok_or_else(|| {
        BrowserError::ActionFailed(format!(
            "{} has no visible box to interact with; retry with by_js",
            selector
        ))
    })
}

async fn call_on(
    page: &PageSession,
    handle: &ElementHandle,
    function: &str,
    args: Vec<Value>,
) -> Result<Value, BrowserError> {
    Ok(page
        .call_function_on(handle.object_id(), function, args)
        .await?)
}

pub async fn click(
    session: &mut Session,
    selector: &Selector,
    mode: ExecutionMode,
) -> Result<(), BrowserError> {
    let (page, handle) = first_match(session, selector).await?;
    let result = click_handle(session, &page, &handle, selector, mode).await;
    page.release_object(handle.object_id()).await;
    result
}

async fn click_handle(
    session: &mut Session,
    page: &PageSession,
    handle: &ElementHandle,
    selector: &Selector,
    mode: ExecutionMode,
) -> Result<(), BrowserError> {
    match mode {
        ExecutionMode::Native => {
            let (x, y) = visible_center(page, handle, selector).await?;
            session.validate(handle).await?;
            page.click(x, y).await?;
            debug!("Clicked {} at ({:.0}, {:.0})", selector, x, y);
        }
        ExecutionMode::Script => {
            session.validate(handle).await?;
            call_on(page, handle, CLICK_FN, Vec::new()).await?;
            debug!("Clicked {} by script", selector);
        }
    }
    Ok(())
}

/// Type into an input, textarea or contenteditable element.
pub async fn type_text(
    session: &mut Session,
    selector: &Selector,
    text: &str,
    clear: bool,
    mode: ExecutionMode,
) -> Result<(), BrowserError> {
    let (page, handle) = first_match(session, selector).await?;
    let result = type_into(session, &page, &handle, selector, text, clear, mode).await;
    page.release_object(handle.object_id()).await;
    result
}

async fn type_into(
    session: &mut Session,
    page: &PageSession,
    handle: &ElementHandle,
    selector: &Selector,
    text: &str,
    clear: bool,
    mode: ExecutionMode,
) -> Result<(), BrowserError> {
    let editable = call_on(page, handle, EDITABLE_FN, Vec::new()).await?;
    if editable != Value::Bool(true) {
        return Err(BrowserError::NotEditable(selector.to_string()));
    }

    session.validate(handle).await?;
    match mode {
        ExecutionMode::Native => {
            page.focus_object(handle.object_id()).await?;
            if clear {
                call_on(page, handle, SET_VALUE_FN, vec![json!(""), json!(false)]).await?;
            }
            call_on(page, handle, CARET_END_FN, Vec::new()).await?;
            if !text.is_empty() {
                page.insert_text(text).await?;
            }
            call_on(page, handle, CHANGE_FN, Vec::new()).await?;
        }
        ExecutionMode::Script => {
            call_on(page, handle, SET_VALUE_FN, vec![json!(text), json!(!clear)]).await?;
            call_on(page, handle, CHANGE_FN, Vec::new()).await?;
        }
    }
    debug!("Typed {} chars into {}", text.chars().count(), selector);
    Ok(())
}

/// Move the pointer over the element without clicking.
pub async fn hover(session: &mut Session, selector: &Selector) -> Result<(), BrowserError> {
    let (page, handle) = first_match(session, selector).await?;
    let result = hover_handle(session, &page, &handle, selector).await;
    page.release_object(handle.object_id()).await;
    result
}

async fn hover_handle(
    session: &mut Session,
    page: &PageSession,
    handle: &ElementHandle,
    selector: &Selector,
) -> Result<(), BrowserError> {
    let (x, y) = visible_center(page, handle, selector).await?;
    session.validate(handle).await?;
    page.mouse_move(x, y).await?;
    debug!("Hovered {} at ({:.0}, {:.0})", selector, x, y);
    Ok(())
}

async fn read_text(page: &PageSession, handle: &ElementHandle) -> Result<ElementText, BrowserError> {
    let value = call_on(page, handle, TEXT_FN, Vec::new()).await?;
    serde_json::from_value(value)
        .map_err(|e| BrowserError::ActionFailed(format!("unexpected element text: {}", e)))
}

/// Visible text of the first match.
pub async fn element_text(
    session: &mut Session,
    selector: &Selector,
) -> Result<ElementText, BrowserError> {
    let (page, handle) = first_match(session, selector).await?;
    let result = read_text(&page, &handle).await;
    page.release_object(handle.object_id()).await;
    result
}

/// Outer HTML of the first match.
pub async fn element_html(
    session: &mut Session,
    selector: &Selector,
) -> Result<ElementHtml, BrowserError> {
    let (page, handle) = first_match(session, selector).await?;
    let result = call_on(&page, &handle, HTML_FN, Vec::new()).await;
    page.release_object(handle.object_id()).await;
    serde_json::from_value(result?)
        .map_err(|e| BrowserError::ActionFailed(format!("unexpected element markup: {}", e)))
}

/// Text of up to `limit` matches in document order. No match is an empty list.
pub async fn elements_text(
    session: &mut Session,
    selector: &Selector,
    limit: usize,
) -> Result<Vec<ElementText>, BrowserError> {
    let page = session.current_page().await?;
    let context = session.page_context().await?;
    let handles = selector::resolve(&page, &context, selector, None).await?;

    let mut texts = Vec::with_capacity(handles.len().min(limit));
    let mut failure = None;
    for handle in handles.iter().take(limit) {
        match read_text(&page, handle).await {
            Ok(text) => texts.push(text),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    for handle in &handles {
        page.release_object(handle.object_id()).await;
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(texts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_text_from_script_result() {
        let value = json!({"text": "Sign in", "tag": "button"});
        let text: ElementText = serde_json::from_value(value).unwrap();
        assert_eq!(
            text,
            ElementText {
                text: "Sign in".to_string(),
                tag: "button".to_string()
            }
        );
    }

    #[test]
    fn test_scripts_are_function_declarations() {
        for script in [CLICK_FN, EDITABLE_FN, SET_VALUE_FN, CARET_END_FN, CHANGE_FN, TEXT_FN, HTML_FN] {
            assert!(script.starts_with("function("), "{}", script);
            assert!(script.trim_end().ends_with('}'));
        }
    }

    #[test]
    fn test_editable_rejects_non_text_inputs() {
        for kind in ["checkbox", "radio", "submit", "file", "hidden"] {
            assert!(EDITABLE_FN.contains(&format!("'{}'", kind)));
        }
        assert!(!EDITABLE_FN.contains("'email'"));
    }
}
