//! In-page finder functions.

/// `function(q)` with `this` bound to the search root. Returns matching
/// elements as an array in document order.
///
/// Text queries match the innermost element whose whitespace-normalized
/// text satisfies the query, so a container never shadows the control
/// inside it.
pub(crate) const FIND_FN: &str = r#"function (q) {
  const root = this;
  const doc = root.ownerDocument || root;
  const all = () => Array.from(root.querySelectorAll('*'));
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim();
  switch (q.type) {
    case 'css':
      return Array.from(root.querySelectorAll(q.value));
    case 'tag':
      return Array.from(root.getElementsByTagName(q.value));
    case 'xpath': {
      const r = doc.evaluate(q.value, root, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
      const out = [];
      for (let i = 0; i < r.snapshotLength; i++) {
        const n = r.snapshotItem(i);
        if (n.nodeType === Node.ELEMENT_NODE) out.push(n);
      }
      return out;
    }
    case 'attr':
      return all().filter((el) => {
        const v = el.getAttribute(q.name);
        if (v === null) return false;
        return q.exact ? v.trim() === q.value.trim() : v.includes(q.value);
      });
    case 'class': {
      const classes = q.value.split('.').filter(Boolean);
      if (!classes.length) return [];
      return all().filter((el) => classes.every((c) => el.classList.contains(c)));
    }
    case 'text': {
      const skip = new Set(['SCRIPT', 'STYLE', 'NOSCRIPT', 'TEMPLATE', 'HEAD', 'TITLE']);
      const want = norm(q.value);
      const hit = (el) => {
        if (skip.has(el.tagName)) return false;
        const t = norm(el.textContent);
        return q.exact ? t === want : t.includes(want);
      };
      return all().filter((el) => hit(el) && !Array.from(el.children).some(hit));
    }
  }
  return [];
}"#;

/// `function(el)`: whether the element is rendered with a non-empty box.
pub(crate) const VISIBLE_FN: &str = r#"function (el) {
  if (!el.isConnected) return false;
  const s = getComputedStyle(el);
  if (s.display === 'none' || s.visibility === 'hidden' || s.visibility === 'collapse') return false;
  if (parseFloat(s.opacity) === 0) return false;
  const r = el.getBoundingClientRect();
  return r.width > 0 && r.height > 0;
}"#;
