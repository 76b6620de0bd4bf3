//! Element handles and the page context they are bound to.

use crate::error::BrowserError;

/// Identity of the document a handle was resolved in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Browser launch counter; bumped by every (re)start.
    pub generation: u64,
    pub target_id: String,
    /// Main-frame loader id; changes on every cross-document navigation.
    pub loader_id: String,
}

impl PageContext {
    /// Reject a handle that was resolved in a different context.
    pub fn check(&self, handle: &ElementHandle) -> Result<(), BrowserError> {
        let then = &handle.context;
        let reason = if then.generation != self.generation {
            "browser was restarted after the element was resolved"
        } else if then.target_id != self.target_id {
            "active tab changed after the element was resolved"
        } else if then.loader_id != self.loader_id {
            "page navigated after the element was resolved"
        } else {
            return Ok(());
        };
        Err(BrowserError::StaleContext(reason.to_string()))
    }
}

/// Reference to a live DOM element, valid only within its [`PageContext`].
#[derive(Debug, Clone)]
pub struct ElementHandle {
    object_id: String,
    context: PageContext,
}

impl ElementHandle {
    pub(crate) fn new(object_id: String, context: PageContext) -> Self {
        Self { object_id, context }
    }

    /// Runtime remote object id.
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }
}
