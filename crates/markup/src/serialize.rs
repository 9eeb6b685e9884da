//! Event stream back to markup text.
//!
//! Output rules:
//! - Plain text and attribute values are escaped; `TextKind::Markup` is verbatim.
//! - Attributes are double-quoted in stored order.
//! - A void HTML element or a namespaced element whose `End` directly follows its
//!   `Start` is written as `<x/>`; everything else keeps an explicit end tag.
//! - Namespace declarations whose URI is listed in `SerializeOptions` are dropped.

use crate::entities::{escape_attr, escape_text};
use crate::types::{Event, Other, QName, StartTag, TextKind, XMLNS_URI};
use std::fmt;

#[derive(Clone, Debug, Default)]
pub struct SerializeOptions {
    drop_declarations: Vec<String>,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit `xmlns`/`xmlns:*` attributes that bind `uri`.
    pub fn drop_declarations_for(mut self, uri: &str) -> Self {
        self.drop_declarations.push(uri.to_string());
        self
    }

    fn keeps(&self, name: &QName, value: &str) -> bool {
        name.namespace() != Some(XMLNS_URI)
            || !self.drop_declarations.iter().any(|uri| uri == value)
    }
}

fn is_void_html(tag: &StartTag) -> bool {
    tag.name.namespace().is_none()
        && matches!(
            tag.local_name(),
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

fn collapses(tag: &StartTag) -> bool {
    is_void_html(tag) || tag.name.namespace().is_some()
}

fn write_start<W: fmt::Write>(
    out: &mut W,
    tag: &StartTag,
    options: &SerializeOptions,
    self_closing: bool,
) -> fmt::Result {
    write!(out, "<{}", tag.name)?;
    let mut value_buf = String::new();
    for (name, value) in tag.attrs.iter() {
        if !options.keeps(name, value) {
            continue;
        }
        value_buf.clear();
        escape_attr(value, &mut value_buf);
        write!(out, " {name}=\"{value_buf}\"")?;
    }
    out.write_str(if self_closing { "/>" } else { ">" })
}

pub fn write_events<W: fmt::Write>(
    out: &mut W,
    events: &[Event],
    options: &SerializeOptions,
) -> fmt::Result {
    let mut text_buf = String::new();
    let mut i = 0;
    while i < events.len() {
        match &events[i] {
            Event::Start(tag) => {
                let closes_next =
                    matches!(events.get(i + 1), Some(Event::End(end)) if end.name == tag.name);
                if closes_next && collapses(tag) {
                    write_start(out, tag, options, true)?;
                    i += 2;
                    continue;
                }
                write_start(out, tag, options, false)?;
            }
            Event::End(tag) => write!(out, "</{}>", tag.name)?,
            Event::Text(text) => match text.kind {
                TextKind::Markup => out.write_str(&text.content)?,
                TextKind::Plain => {
                    text_buf.clear();
                    escape_text(&text.content, &mut text_buf);
                    out.write_str(&text_buf)?;
                }
            },
            Event::Other(Other::Comment(body)) => write!(out, "<!--{body}-->")?,
            Event::Other(Other::Doctype(body)) => write!(out, "<!{body}>")?,
        }
        i += 1;
    }
    Ok(())
}

pub fn serialize_with(events: &[Event], options: &SerializeOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_events(&mut out, events, options);
    out
}

pub fn serialize(events: &[Event]) -> String {
    serialize_with(events, &SerializeOptions::default())
}
