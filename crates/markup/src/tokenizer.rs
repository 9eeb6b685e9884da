//! Lenient markup tokenizer producing a balanced event stream.
//!
//! Supported tag/attribute name characters (ASCII only): `[A-Za-z0-9:_-]`; names are
//! ASCII-lowercased. This is not an HTML5 state machine and never reports errors.
//!
//! Structural policy:
//! - Void elements and `<x/>` produce a `Start` immediately followed by its `End`.
//! - An end tag closes the nearest open element with the same name; elements opened
//!   after it are closed implicitly first. End tags with no open match are dropped.
//! - Elements still open at end of input are closed there.
//! - `script`/`style` bodies are rawtext, emitted as `TextKind::Markup`.
//!
//! Namespace policy:
//! - `xmlns:p="uri"` / `xmlns="uri"` declarations are scoped to the element that
//!   carries them and resolve `p:` prefixes on tag and attribute names.
//! - Declarations stay on the element as attributes in the XMLNS namespace.
//! - Prefixes with no declaration leave the name unqualified (`svg:rect` stays a
//!   plain `svg:rect`).
//! - Unprefixed attributes never take the default namespace.

use crate::attrs::Attrs;
use crate::entities::decode_entities;
use crate::types::{EndTag, Event, Other, QName, Span, StartTag, Text, TextKind, XML_URI, XMLNS_URI};
use memchr::memchr;
use std::sync::Arc;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

// it only attempts matches starting at ASCII <
// < cannot appear in UTF-8 continuation bytes
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

/// Prefixes bound before the first byte is read.
#[derive(Clone, Debug, Default)]
pub struct TokenizerConfig {
    namespaces: Vec<(String, String)>,
}

impl TokenizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `uri` for the whole document. An empty prefix sets the
    /// default element namespace.
    pub fn declare(mut self, prefix: &str, uri: &str) -> Self {
        self.namespaces.push((prefix.to_string(), uri.to_string()));
        self
    }
}

pub fn tokenize(input: &str) -> Vec<Event> {
    tokenize_with(input, &TokenizerConfig::default())
}

pub fn tokenize_with(input: &str, config: &TokenizerConfig) -> Vec<Event> {
    let mut tokenizer = Tokenizer::new(input, config);
    tokenizer.run();
    tokenizer.out
}

struct OpenElement {
    raw: String,
    name: QName,
    scope_len: usize,
}

struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: Vec<Event>,
    open: Vec<OpenElement>,
    /// `(prefix, uri)` bindings, innermost last; `""` is the default namespace.
    scopes: Vec<(Arc<str>, Arc<str>)>,
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn find_rawtext_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    let hay = haystack.as_bytes();
    let len = hay.len();
    let n = close_tag.len();
    debug_assert!(close_tag.starts_with(b"</") && close_tag.is_ascii());
    let mut i = 0;
    while i + n <= len {
        i += memchr(b'<', &hay[i..])?;
        if i + n > len {
            return None;
        }
        if hay[i + 1] == b'/' && starts_with_ignore_ascii_case_at(hay, i, close_tag) {
            // Only ASCII whitespace may sit between the name and `>`.
            let mut k = i + n;
            while k < len && hay[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && hay[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, config: &TokenizerConfig) -> Self {
        let mut scopes: Vec<(Arc<str>, Arc<str>)> =
            vec![(Arc::from("xml"), Arc::from(XML_URI))];
        scopes.extend(
            config
                .namespaces
                .iter()
                .map(|(prefix, uri)| (Arc::from(prefix.as_str()), Arc::from(uri.as_str()))),
        );
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            out: Vec::new(),
            open: Vec::new(),
            scopes,
        }
    }

    fn run(&mut self) {
        // Invariant: slices are only cut at ASCII structural bytes or after ASCII-only
        // name scans, so every slice endpoint is a UTF-8 boundary.
        while self.pos < self.bytes.len() {
            debug_assert!(self.input.is_char_boundary(self.pos));
            if self.bytes[self.pos] != b'<' {
                self.text();
            } else if self.input[self.pos..].starts_with(COMMENT_START) {
                self.comment();
            } else if starts_with_ignore_ascii_case_at(self.bytes, self.pos, b"<!doctype") {
                self.doctype();
            } else if self.bytes.get(self.pos + 1) == Some(&b'/') {
                self.end_tag();
            } else {
                self.start_tag();
            }
        }
        while !self.open.is_empty() {
            if let Some(top) = self.open.last() {
                log::trace!(
                    target: "markup.tokenizer",
                    "closing <{}> at end of input",
                    top.raw
                );
            }
            self.close_top(None);
        }
    }

    fn push_text(&mut self, content: String, span: Span) {
        if content.is_empty() {
            return;
        }
        if let Some(Event::Text(prev)) = self.out.last_mut()
            && prev.kind == TextKind::Plain
        {
            prev.content.push_str(&content);
            prev.span = prev.span.map(|s| Span::new(s.start, span.end));
            return;
        }
        self.out.push(Event::Text(Text {
            content,
            kind: TextKind::Plain,
            span: Some(span),
        }));
    }

    fn text(&mut self) {
        let start = self.pos;
        let end = memchr(b'<', &self.bytes[start..]).map_or(self.bytes.len(), |rel| start + rel);
        let decoded = decode_entities(&self.input[start..end]);
        self.push_text(decoded, Span::new(start, end));
        self.pos = end;
    }

    fn comment(&mut self) {
        let body_start = self.pos + COMMENT_START.len();
        match self.input[body_start..].find(COMMENT_END) {
            Some(rel) => {
                let body = &self.input[body_start..body_start + rel];
                self.out.push(Event::Other(Other::Comment(body.to_string())));
                self.pos = body_start + rel + COMMENT_END.len();
            }
            None => {
                let body = &self.input[body_start..];
                self.out.push(Event::Other(Other::Comment(body.to_string())));
                self.pos = self.bytes.len();
            }
        }
    }

    fn doctype(&mut self) {
        let rest = &self.input[self.pos + 2..];
        match rest.find('>') {
            Some(end) => {
                self.out
                    .push(Event::Other(Other::Doctype(rest[..end].trim().to_string())));
                self.pos += 2 + end + 1;
            }
            None => {
                log::trace!(target: "markup.tokenizer", "dropping unterminated doctype");
                self.pos = self.bytes.len();
            }
        }
    }

    fn scan_name(&self, from: usize) -> usize {
        let mut j = from;
        while j < self.bytes.len() && is_name_char(self.bytes[j]) {
            j += 1;
        }
        j
    }

    fn end_tag(&mut self) {
        let start = self.pos;
        let name_end = self.scan_name(start + 2);
        let raw = self.input[start + 2..name_end].to_ascii_lowercase();
        let mut j = name_end;
        while j < self.bytes.len() && self.bytes[j] != b'>' {
            j += 1;
        }
        if j < self.bytes.len() {
            j += 1;
        }
        self.pos = j;
        let span = Span::new(start, j);

        let Some(index) = self.open.iter().rposition(|open| open.raw == raw) else {
            log::trace!(target: "markup.tokenizer", "dropping stray </{raw}> at {span}");
            return;
        };
        while self.open.len() > index + 1 {
            if let Some(top) = self.open.last() {
                log::trace!(
                    target: "markup.tokenizer",
                    "implicitly closing <{}> before </{raw}>",
                    top.raw
                );
            }
            self.close_top(None);
        }
        self.close_top(Some(span));
    }

    fn close_top(&mut self, span: Option<Span>) {
        if let Some(open) = self.open.pop() {
            self.scopes.truncate(open.scope_len);
            self.out.push(Event::End(EndTag {
                name: open.name,
                span,
            }));
        }
    }

    fn start_tag(&mut self) {
        let start = self.pos;
        let name_end = self.scan_name(start + 1);
        if name_end == start + 1 {
            // A bare `<` is character data.
            self.push_text("<".to_string(), Span::new(start, start + 1));
            self.pos += 1;
            return;
        }
        let raw = self.input[start + 1..name_end].to_ascii_lowercase();
        let (raw_attrs, self_closing, content_start) = self.scan_attributes(name_end);
        let span = Span::new(start, content_start);

        let scope_len = self.scopes.len();
        for (attr, value) in &raw_attrs {
            let uri = value.as_deref().unwrap_or("");
            if attr == "xmlns" {
                self.scopes.push((Arc::from(""), Arc::from(uri)));
            } else if let Some(prefix) = attr.strip_prefix("xmlns:") {
                self.scopes.push((Arc::from(prefix), Arc::from(uri)));
            }
        }

        let name = self.resolve_element(&raw);
        let attrs: Attrs = raw_attrs
            .into_iter()
            .map(|(attr, value)| {
                // Minimized attributes (`checked`) take their own name as value.
                let value = value.unwrap_or_else(|| attr.clone());
                (self.resolve_attr(&attr), value)
            })
            .collect();

        self.out.push(Event::Start(StartTag {
            name: name.clone(),
            attrs,
            span: Some(span),
        }));
        self.pos = content_start;

        if self_closing || is_void_element(&raw) {
            self.scopes.truncate(scope_len);
            self.out.push(Event::End(EndTag { name, span: None }));
            return;
        }

        if raw == "script" || raw == "style" {
            let close_tag = if raw == "script" {
                SCRIPT_CLOSE_TAG
            } else {
                STYLE_CLOSE_TAG
            };
            let body = &self.input[content_start..];
            let (body_end, next) = match find_rawtext_close_tag(body, close_tag) {
                Some((rel_start, rel_end)) => (content_start + rel_start, content_start + rel_end),
                None => (self.bytes.len(), self.bytes.len()),
            };
            if body_end > content_start {
                self.out.push(Event::Text(Text {
                    content: self.input[content_start..body_end].to_string(),
                    kind: TextKind::Markup,
                    span: Some(Span::new(content_start, body_end)),
                }));
            }
            self.scopes.truncate(scope_len);
            self.out.push(Event::End(EndTag {
                name,
                span: Some(Span::new(body_end, next)),
            }));
            self.pos = next;
            return;
        }

        self.open.push(OpenElement {
            raw,
            name,
            scope_len,
        });
    }

    /// Scan attributes after a tag name. Returns the raw `(name, value)` pairs, the
    /// self-closing flag, and the offset just past the tag.
    fn scan_attributes(&self, from: usize) -> (Vec<(String, Option<String>)>, bool, usize) {
        let bytes = self.bytes;
        let len = bytes.len();
        let mut k = from;
        let mut attributes = Vec::new();
        let mut self_closing = false;

        let skip_whitespace = |k: &mut usize| {
            while *k < len && bytes[*k].is_ascii_whitespace() {
                *k += 1;
            }
        };

        loop {
            skip_whitespace(&mut k);
            if k >= len {
                break;
            }
            if bytes[k] == b'>' {
                k += 1;
                break;
            }
            if bytes[k] == b'/' {
                if k + 1 < len && bytes[k + 1] == b'>' {
                    self_closing = true;
                    k += 2;
                    break;
                }
                k += 1;
                continue;
            }
            let name_start = k;
            k = self.scan_name(k);
            if name_start == k {
                k += 1;
                continue;
            }
            let attr_name = self.input[name_start..k].to_ascii_lowercase();

            skip_whitespace(&mut k);
            let mut value = None;
            if k < len && bytes[k] == b'=' {
                k += 1;
                skip_whitespace(&mut k);
                if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                    let quote = bytes[k];
                    k += 1;
                    let vstart = k;
                    k = memchr(quote, &bytes[k..]).map_or(len, |rel| k + rel);
                    value = Some(decode_entities(&self.input[vstart..k]));
                    if k < len {
                        k += 1;
                    }
                } else {
                    let vstart = k;
                    while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                        if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                            break;
                        }
                        k += 1;
                    }
                    value = Some(decode_entities(&self.input[vstart..k]));
                }
            }
            attributes.push((attr_name, value));
        }

        (attributes, self_closing, k)
    }

    fn lookup(&self, prefix: &str) -> Option<Arc<str>> {
        self.scopes
            .iter()
            .rev()
            .find(|(p, _)| &**p == prefix)
            .map(|(_, uri)| Arc::clone(uri))
    }

    fn resolve_element(&self, raw: &str) -> QName {
        match raw.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
                match self.lookup(prefix) {
                    Some(uri) => QName::prefixed(uri, prefix, local),
                    None => QName::new(raw),
                }
            }
            Some(_) => QName::new(raw),
            None => match self.lookup("") {
                Some(uri) if !uri.is_empty() => QName::namespaced(uri, raw),
                _ => QName::new(raw),
            },
        }
    }

    fn resolve_attr(&self, raw: &str) -> QName {
        if raw == "xmlns" {
            return QName::namespaced(XMLNS_URI, "xmlns");
        }
        match raw.split_once(':') {
            Some(("xmlns", local)) => QName::prefixed(XMLNS_URI, "xmlns", local),
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
                match self.lookup(prefix) {
                    Some(uri) => QName::prefixed(uri, prefix, local),
                    None => QName::new(raw),
                }
            }
            _ => QName::new(raw),
        }
    }
}
