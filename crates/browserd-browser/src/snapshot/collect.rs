//! In-page walk producing raw snapshot nodes in document order.

use tracing::debug;

use crate::cdp::PageSession;
use crate::error::BrowserError;
use crate::selector::VISIBLE_FN;

use super::node::{RawNode, SnapshotNode};

const COLLECT_JS: &str = r#"(() => {
  const visible = __VISIBLE__;
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim();
  const attr = (el, name) => { const v = el.getAttribute(name); return v && norm(v) ? norm(v) : null; };
  const esc = (s) => (window.CSS && CSS.escape) ? CSS.escape(s) : s;
  const SKIP = new Set(['SCRIPT', 'STYLE', 'NOSCRIPT', 'TEMPLATE', 'SVG', 'HEAD', 'IFRAME']);
  const TEXT = new Set(['P', 'LI', 'TD', 'TH', 'BLOCKQUOTE', 'PRE', 'DD', 'DT', 'FIGCAPTION', 'CAPTION']);
  const BUTTON_INPUTS = new Set(['submit', 'button', 'reset', 'image']);

  const cssPath = (el) => {
    const parts = [];
    for (let n = el; n && n.nodeType === 1 && n !== document.documentElement; n = n.parentElement) {
      const tag = n.tagName.toLowerCase();
      if (n.id && !/\s/.test(n.id)) { parts.unshift('#' + esc(n.id)); break; }
      let i = 1;
      for (let s = n.previousElementSibling; s; s = s.previousElementSibling) if (s.tagName === n.tagName) i++;
      parts.unshift(tag === 'body' ? 'body' : tag + ':nth-of-type(' + i + ')');
    }
    return parts.join(' > ');
  };

  const fieldLabel = (el) => {
    const aria = attr(el, 'aria-label');
    if (aria) return aria;
    if (el.id) {
      const l = document.querySelector('label[for="' + esc(el.id) + '"]');
      if (l && norm(l.innerText)) return norm(l.innerText);
    }
    const wrap = el.closest('label');
    if (wrap && norm(wrap.innerText)) return norm(wrap.innerText);
    return attr(el, 'placeholder') || attr(el, 'title') || attr(el, 'name') || '';
  };

  const controlLabel = (el) =>
    attr(el, 'aria-label') || norm(el.innerText) || attr(el, 'value') || attr(el, 'title') ||
    (el.querySelector('img[alt]') ? attr(el.querySelector('img[alt]'), 'alt') : null) || '';

  const base = (el, role, label) => ({
    role, label,
    id: el.id || null,
    name: el.getAttribute('name'),
    ariaLabel: el.getAttribute('aria-label'),
    textContent: norm(el.textContent) || null,
    valueAttr: el.getAttribute('value'),
    cssPath: cssPath(el),
  });

  const out = [];
  const walker = document.createTreeWalker(document.body || document.documentElement, NodeFilter.SHOW_ELEMENT, {
    acceptNode: (n) => SKIP.has(n.tagName.toUpperCase()) ? NodeFilter.FILTER_REJECT : NodeFilter.FILTER_ACCEPT,
  });
  for (let el = walker.currentNode; el; el = walker.nextNode()) {
    const tag = el.tagName;
    if (/^H[1-6]$/.test(tag)) {
      if (!visible(el)) continue;
      const label = norm(el.innerText);
      if (label) out.push({ role: 'heading', label, level: Number(tag[1]) });
    } else if (tag === 'A' && el.hasAttribute('href')) {
      if (!visible(el)) continue;
      out.push(Object.assign(base(el, 'link', controlLabel(el)), { href: el.href }));
    } else if (tag === 'BUTTON' || el.getAttribute('role') === 'button' ||
               (tag === 'INPUT' && BUTTON_INPUTS.has((el.type || '').toLowerCase()))) {
      if (!visible(el)) continue;
      out.push(base(el, 'button', controlLabel(el)));
    } else if (tag === 'INPUT' || tag === 'TEXTAREA' || tag === 'SELECT') {
      const type = tag === 'INPUT' ? (el.type || 'text').toLowerCase() : tag.toLowerCase();
      if (type === 'hidden' || !visible(el)) continue;
      let value = '';
      if (tag === 'SELECT') value = el.selectedOptions.length ? norm(el.selectedOptions[0].text) : '';
      else if (type === 'checkbox' || type === 'radio') value = el.checked ? 'checked' : 'unchecked';
      else if (type !== 'password') value = el.value || '';
      out.push(Object.assign(base(el, 'input', fieldLabel(el)), { inputType: type, value }));
    } else if (TEXT.has(tag)) {
      const parent = el.parentElement && el.parentElement.closest('p, li, td, th, blockquote, pre, dd, dt, figcaption, caption');
      if (parent || !visible(el)) continue;
      const label = norm(el.innerText);
      if (label) out.push({ role: 'text', label });
    }
  }
  return out;
})()"#;

/// Collect visible headings, links, buttons, inputs and text blocks.
pub(crate) async fn collect_nodes(page: &PageSession) -> Result<Vec<SnapshotNode>, BrowserError> {
    let script = COLLECT_JS.replace("__VISIBLE__", VISIBLE_FN);
    let value = page.evaluate(&script).await?;
    let raw: Vec<RawNode> = serde_json::from_value(value)
        .map_err(|e| BrowserError::ActionFailed(format!("unexpected snapshot data: {}", e)))?;

    let nodes: Vec<SnapshotNode> = raw.into_iter().filter_map(SnapshotNode::from_raw).collect();
    debug!("Collected {} snapshot nodes", nodes.len());
    Ok(nodes)
}
