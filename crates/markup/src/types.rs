//! Markup event model.
//!
//! Determinism contract:
//! - Events are produced in source order.
//! - A well-formed stream has every `Start` matched by exactly one `End` at the same
//!   nesting depth; void and self-closing elements are a `Start` immediately followed
//!   by its `End`.
//! - Events are plain values. Rewriting an event produces a new value; nothing here
//!   is shared mutably between producers and consumers.

use crate::attrs::Attrs;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Namespace URI bound to `xmlns` / `xmlns:*` declaration attributes.
pub const XMLNS_URI: &str = "http://www.w3.org/2000/xmlns/";

/// Namespace URI bound to the reserved `xml:` prefix.
pub const XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// Byte span into the source text an event was tokenized from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A namespace identified by its URI.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Namespace {
    uri: Arc<str>,
}

impl Namespace {
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// True when `name` lives in this namespace.
    pub fn contains(&self, name: &QName) -> bool {
        name.namespace() == Some(self.uri())
    }

    /// Build a name in this namespace.
    pub fn qname(&self, local: &str) -> QName {
        QName {
            namespace: Some(Arc::clone(&self.uri)),
            prefix: None,
            local: Arc::from(local),
        }
    }
}

/// Namespace-qualified name.
///
/// Equality and hashing use `(namespace, local)` only. The prefix is carried for
/// serialization and never participates in matching.
#[derive(Clone, Debug)]
pub struct QName {
    namespace: Option<Arc<str>>,
    prefix: Option<Arc<str>>,
    local: Arc<str>,
}

impl QName {
    /// Name without a namespace (plain HTML tags and attributes).
    pub fn new(local: &str) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local: Arc::from(local),
        }
    }

    pub fn namespaced(namespace: impl Into<Arc<str>>, local: &str) -> Self {
        Self {
            namespace: Some(namespace.into()),
            prefix: None,
            local: Arc::from(local),
        }
    }

    pub fn prefixed(namespace: impl Into<Arc<str>>, prefix: &str, local: &str) -> Self {
        Self {
            namespace: Some(namespace.into()),
            prefix: Some(Arc::from(prefix)),
            local: Arc::from(local),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// True for a namespace-less name whose local part matches `name`
    /// (ASCII case-insensitive).
    pub fn is_plain(&self, name: &str) -> bool {
        self.namespace.is_none() && self.local.eq_ignore_ascii_case(name)
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local == other.local
    }
}

impl Eq for QName {}

impl Hash for QName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.local.hash(state);
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartTag {
    pub name: QName,
    pub attrs: Attrs,
    pub span: Option<Span>,
}

impl StartTag {
    pub fn new(name: QName, attrs: Attrs) -> Self {
        Self {
            name,
            attrs,
            span: None,
        }
    }

    /// Same tag and span with a replacement attribute set.
    pub fn with_attrs(self, attrs: Attrs) -> Self {
        Self { attrs, ..self }
    }

    pub fn local_name(&self) -> &str {
        self.name.local_name()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndTag {
    pub name: QName,
    pub span: Option<Span>,
}

impl EndTag {
    pub fn new(name: QName) -> Self {
        Self { name, span: None }
    }
}

/// How a text run is written back out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKind {
    /// Character data; escaped on output.
    Plain,
    /// Pre-rendered markup (rawtext bodies, injected content); emitted verbatim.
    Markup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    pub content: String,
    pub kind: TextKind,
    pub span: Option<Span>,
}

impl Text {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: TextKind::Plain,
            span: None,
        }
    }

    pub fn markup(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: TextKind::Markup,
            span: None,
        }
    }
}

/// Events that carry no structure: passed through untouched by every consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Other {
    Comment(String),
    /// Declaration body without the surrounding `<!` and `>`.
    Doctype(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start(StartTag),
    End(EndTag),
    Text(Text),
    Other(Other),
}

impl Event {
    pub fn span(&self) -> Option<Span> {
        match self {
            Event::Start(tag) => tag.span,
            Event::End(tag) => tag.span,
            Event::Text(text) => text.span,
            Event::Other(_) => None,
        }
    }
}

impl From<StartTag> for Event {
    fn from(tag: StartTag) -> Self {
        Event::Start(tag)
    }
}

impl From<EndTag> for Event {
    fn from(tag: EndTag) -> Self {
        Event::End(tag)
    }
}

impl From<Text> for Event {
    fn from(text: Text) -> Self {
        Event::Text(text)
    }
}
