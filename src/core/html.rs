// src/core/html.rs
//
// Tolerant, hand-rolled HTML scanning. Not a DOM: we only need "text of the
// direct children of some container", and the source pages are simple.
// Tag/attribute names are matched ASCII case-insensitively.

use crate::error::SourceError;

use super::sanitize::{decode_entities, normalize_ws};

/// ASCII-only lowercasing; byte offsets stay identical to the input.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Tags that separate words when the browser renders them.
const BREAKS: &[&str] = &["br", "p", "/p", "div", "/div", "li", "/li", "tr", "/tr", "td", "/td"];

/// Remove all `<...>` tags, decode entities, collapse whitespace.
/// Roughly what a browser (or jsoup's `text()`) shows for an element.
pub fn element_text<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for (i, ch) in s.char_indices() {
        match ch {
            '<' if !in_tag && starts_tag(&s[i + 1..]) => {
                in_tag = true;
                if is_break(&s[i + 1..]) { out.push(' '); }
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&out))
}

fn starts_tag(after_lt: &str) -> bool {
    after_lt.starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!')
}

fn is_break(after_lt: &str) -> bool {
    let head: String = after_lt.chars().take(5).map(|c| c.to_ascii_lowercase()).collect();
    BREAKS.iter().any(|t| {
        head.starts_with(t)
            && !head[t.len()..].starts_with(|c: char| c.is_ascii_alphanumeric())
    })
}

/// `tag`, `tag.class` or `parent>child` (one child combinator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    pub parent: Option<Simple>,
    pub target: Simple,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Simple {
    pub tag: String,
    pub class: Option<String>,
}

impl Simple {
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (tag, class) = match s.split_once('.') {
            Some((t, c)) => (t, Some(c)),
            None => (s, None),
        };
        let valid = |x: &str| !x.is_empty() && x.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid(tag) { return None; }
        if let Some(c) = class {
            if !valid(c) { return None; }
        }
        Some(Self { tag: to_lower(tag), class: class.map(str::to_string) })
    }

    fn matches(&self, el: &Element<'_>) -> bool {
        el.tag == self.tag
            && self.class.as_deref().is_none_or(|want| {
                el.attr("class")
                    .is_some_and(|v| v.split_whitespace().any(|c| c == want))
            })
    }
}

impl Selector {
    pub fn parse(s: &str) -> Result<Self, SourceError> {
        let bad = || SourceError::InvalidSelector(s.to_string());
        let mut parts = s.split('>');
        let first = parts.next().ok_or_else(bad)?;
        match (parts.next(), parts.next()) {
            (None, _) => Ok(Self { parent: None, target: Simple::parse(first).ok_or_else(bad)? }),
            (Some(child), None) => Ok(Self {
                parent: Some(Simple::parse(first).ok_or_else(bad)?),
                target: Simple::parse(child).ok_or_else(bad)?,
            }),
            _ => Err(bad()),
        }
    }

    /// Text of every matching element, in document order.
    pub fn select_text(&self, doc: &str) -> Vec<String> {
        let elements = scan(doc);
        let mut out = Vec::new();
        for (i, el) in elements.iter().enumerate() {
            if !self.target.matches(el) { continue; }
            let ok = match (&self.parent, el.parent) {
                (None, _) => true,
                (Some(p), Some(pi)) => p.matches(&elements[pi]),
                (Some(_), None) => false,
            };
            if ok {
                out.push(element_text(elements[i].inner(doc)));
            }
        }
        out
    }
}

/// One element found while scanning: byte ranges into the source document.
#[derive(Debug)]
struct Element<'a> {
    tag: String,
    open_tag: &'a str,
    inner_start: usize,
    inner_end: usize,
    parent: Option<usize>,
}

impl<'a> Element<'a> {
    fn inner<'d>(&self, doc: &'d str) -> &'d str {
        &doc[self.inner_start..self.inner_end]
    }

    /// Attribute value from the opening tag (quoted or bare).
    fn attr(&self, name: &str) -> Option<&'a str> {
        let open: &'a str = self.open_tag;
        let lc = to_lower(open);
        let mut from = 0;
        while let Some(rel) = lc[from..].find(name) {
            let at = from + rel;
            from = at + name.len();
            let boundary = lc[..at].ends_with(|c: char| c.is_ascii_whitespace());
            let rest = lc[from..].trim_start();
            if !boundary || !rest.starts_with('=') { continue; }
            let val_start = open.len() - rest.len() + 1;
            let val = open[val_start..].trim_start();
            return Some(match val.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &val[1..];
                    &body[..body.find(q).unwrap_or(body.len())]
                }
                _ => {
                    let end = val.find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/').unwrap_or(val.len());
                    &val[..end]
                }
            });
        }
        None
    }
}

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];
const RAW_TEXT: &[&str] = &["script", "style"];

/// Single pass over the document building a flat element list with parent links.
/// Unclosed elements are closed at end of document; stray closers pop up to
/// the nearest open element with the same tag, or are ignored.
fn scan(doc: &str) -> Vec<Element<'_>> {
    let lc = to_lower(doc);
    let b = doc.as_bytes();
    let n = b.len();
    let mut elements: Vec<Element<'_>> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut i = 0usize;

    while i < n {
        if b[i] != b'<' { i += 1; continue; }

        if lc[i..].starts_with("<!--") {
            i = lc[i..].find("-->").map(|e| i + e + 3).unwrap_or(n);
            continue;
        }
        if lc[i..].starts_with("<!") || lc[i..].starts_with("<?") {
            i = doc[i..].find('>').map(|e| i + e + 1).unwrap_or(n);
            continue;
        }

        let closing = b.get(i + 1) == Some(&b'/');
        let name_start = if closing { i + 2 } else { i + 1 };
        let name_end = lc[name_start..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .map(|e| name_start + e)
            .unwrap_or(n);
        if !lc[name_start..].starts_with(|c: char| c.is_ascii_alphabetic()) { i += 1; continue; }
        let tag = &lc[name_start..name_end];
        let tag_end = find_tag_end(b, name_end).unwrap_or(n);

        if closing {
            if let Some(pos) = stack.iter().rposition(|&e| elements[e].tag == tag) {
                for &e in &stack[pos..] {
                    if elements[e].inner_end == usize::MAX { elements[e].inner_end = i; }
                }
                stack.truncate(pos);
            }
            i = tag_end;
            continue;
        }

        let self_closing = tag_end >= 2 && b[tag_end - 2] == b'/';
        let is_void = VOID.contains(&tag) || self_closing;
        let idx = elements.len();
        elements.push(Element {
            tag: tag.to_string(),
            open_tag: &doc[i..tag_end],
            inner_start: tag_end,
            inner_end: if is_void { tag_end } else { usize::MAX },
            parent: stack.last().copied(),
        });

        if RAW_TEXT.contains(&tag) {
            let close = join!("</", tag);
            let end = lc[tag_end..].find(&close).map(|e| tag_end + e).unwrap_or(n);
            elements[idx].inner_end = end;
            i = doc[end..].find('>').map(|e| end + e + 1).unwrap_or(n);
            continue;
        }
        if !is_void { stack.push(idx); }
        i = tag_end;
    }

    for e in stack {
        elements[e].inner_end = n;
    }
    elements
}

/// Index just past the `>` that ends a tag, respecting quoted attribute values.
fn find_tag_end(b: &[u8], from: usize) -> Option<usize> {
    let mut in_s = false;
    let mut in_d = false;
    let mut i = from;
    while i < b.len() {
        match b[i] {
            b'\'' if !in_d => in_s = !in_s,
            b'"' if !in_s => in_d = !in_d,
            b'>' if !in_s && !in_d => return Some(i + 1),
            _ => {}
        }
        i += 1;
    }
    None
}
