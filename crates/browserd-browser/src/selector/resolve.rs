//! Resolve selectors against the live page.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::cdp::{CdpError, PageSession, PropertyDescriptor};
use crate::error::BrowserError;

use super::handle::{ElementHandle, PageContext};
use super::parse::Selector;
use super::scripts::{FIND_FN, VISIBLE_FN};

/// Match counts used by element-state waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Presence {
    pub count: usize,
    pub visible: usize,
}

/// Script errors while finding mean the selector itself is malformed
/// (bad CSS or XPath syntax).
fn lookup_error(e: CdpError, selector: &Selector) -> BrowserError {
    if e.is_context_lost() {
        return e.into();
    }
    match e {
        CdpError::JavaScript(msg) => BrowserError::InvalidSelector(format!("{}: {}", selector, msg)),
        other => other.into(),
    }
}

/// Resolve a selector to every matching element, in document order.
///
/// An empty result is not an error. With `scope`, only descendants of that
/// element are searched; a stale scope fails with `StaleContext`.
pub async fn resolve(
    page: &PageSession,
    context: &PageContext,
    selector: &Selector,
    scope: Option<&ElementHandle>,
) -> Result<Vec<ElementHandle>, BrowserError> {
    let query = selector.query();

    let array = match scope {
        None => {
            page.evaluate_handle(&format!("({}).call(document, {})", FIND_FN, query))
                .await
        }
        Some(scope) => {
            context.check(scope)?;
            page.call_function_on_handle(scope.object_id(), FIND_FN, vec![query])
                .await
        }
    }
    .map_err(|e| lookup_error(e, selector))?;

    let Some(array_id) = array.object_id else {
        return Ok(Vec::new());
    };

    let props = page.get_properties(&array_id).await;
    page.release_object(&array_id).await;

    let handles: Vec<ElementHandle> = element_ids(props?)
        .into_iter()
        .map(|id| ElementHandle::new(id, context.clone()))
        .collect();

    debug!(
        "Selector {} ({}) matched {} element(s)",
        selector,
        selector.kind(),
        handles.len()
    );
    Ok(handles)
}

/// First match, or `ElementNotFound`.
pub async fn resolve_first(
    page: &PageSession,
    context: &PageContext,
    selector: &Selector,
) -> Result<ElementHandle, BrowserError> {
    let mut handles = resolve(page, context, selector, None).await?;
    if handles.is_empty() {
        return Err(BrowserError::ElementNotFound(selector.to_string()));
    }
    let first = handles.swap_remove(0);
    for extra in &handles {
        page.release_object(extra.object_id()).await;
    }
    Ok(first)
}

/// Count matches and visible matches without creating handles.
pub async fn presence(page: &PageSession, selector: &Selector) -> Result<Presence, BrowserError> {
    let expression = format!(
        "(() => {{ const els = ({find}).call(document, {query}); const visible = {visible}; \
         return {{ count: els.length, visible: els.filter((el) => visible(el)).length }}; }})()",
        find = FIND_FN,
        visible = VISIBLE_FN,
        query = selector.query(),
    );
    let value = page
        .evaluate(&expression)
        .await
        .map_err(|e| lookup_error(e, selector))?;
    parse_presence(value)
}

/// An unreadable result is an error, never zero matches.
fn parse_presence(value: Value) -> Result<Presence, BrowserError> {
    serde_json::from_value(value)
        .map_err(|e| BrowserError::ActionFailed(format!("unexpected match counts: {}", e)))
}

/// Object ids of the array-index properties, ordered by index.
pub(crate) fn element_ids(props: Vec<PropertyDescriptor>) -> Vec<String> {
    let mut indexed: Vec<(usize, String)> = props
        .into_iter()
        .filter_map(|p| {
            let index = p.name.parse::<usize>().ok()?;
            let id = p.value?.object_id?;
            Some((index, id))
        })
        .collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(json: &str) -> Vec<PropertyDescriptor> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_element_ids_sorted_by_index() {
        let descriptors = props(
            r#"[
                {"name": "10", "value": {"type": "object", "objectId": "e10"}},
                {"name": "2", "value": {"type": "object", "objectId": "e2"}},
                {"name": "length", "value": {"type": "number", "value": 11}},
                {"name": "0", "value": {"type": "object", "objectId": "e0"}},
                {"name": "__proto__", "value": {"type": "object", "objectId": "proto"}}
            ]"#,
        );
        assert_eq!(element_ids(descriptors), vec!["e0", "e2", "e10"]);
    }

    #[test]
    fn test_element_ids_empty_array() {
        let descriptors = props(r#"[{"name": "length", "value": {"type": "number", "value": 0}}]"#);
        assert!(element_ids(descriptors).is_empty());
    }

    #[test]
    fn test_script_error_becomes_invalid_selector() {
        let selector = Selector::parse("css:div[[");
        let err = lookup_error(
            CdpError::JavaScript("SyntaxError: 'div[[' is not a valid selector".into()),
            &selector,
        );
        assert!(matches!(err, BrowserError::InvalidSelector(_)));

        let err = lookup_error(CdpError::SessionClosed, &selector);
        assert!(matches!(err, BrowserError::StaleContext(_)));
    }

    #[test]
    fn test_parse_presence() {
        let presence = parse_presence(serde_json::json!({"count": 3, "visible": 1})).unwrap();
        assert_eq!(presence, Presence { count: 3, visible: 1 });
    }

    #[test]
    fn test_unexpected_presence_is_an_error() {
        // Reading this as zero matches would satisfy hidden/removed waits.
        for value in [serde_json::json!(null), serde_json::json!({"count": "many"})] {
            let err = parse_presence(value).unwrap_err();
            assert!(matches!(err, BrowserError::ActionFailed(_)));
        }
    }
}
