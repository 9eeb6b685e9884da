//! One-line-per-event rendering used by tests and golden fixtures.
//!
//! Format:
//! - `START <name> attrs=[k="v" ...]`
//! - `END <name>`
//! - `TEXT "<escaped>"` / `MARKUP "<escaped>"`
//! - `COMMENT "<escaped>"` / `DOCTYPE "<escaped>"`
//!
//! Names are rendered with their source prefix. Escaping is the test-visible
//! `\\ \" \n \r \t \u{XX}` form, not markup escaping.

use crate::types::{Event, Other, TextKind};
use std::fmt::Write;

pub fn escape_snapshot_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

pub fn event_line(event: &Event) -> String {
    match event {
        Event::Start(tag) => {
            let mut line = String::new();
            let _ = write!(&mut line, "START {} attrs=[", tag.name);
            for (i, (name, value)) in tag.attrs.iter().enumerate() {
                if i > 0 {
                    line.push(' ');
                }
                let _ = write!(&mut line, "{name}=\"{}\"", escape_snapshot_text(value));
            }
            line.push(']');
            line
        }
        Event::End(tag) => format!("END {}", tag.name),
        Event::Text(text) => {
            let label = match text.kind {
                TextKind::Plain => "TEXT",
                TextKind::Markup => "MARKUP",
            };
            format!("{label} \"{}\"", escape_snapshot_text(&text.content))
        }
        Event::Other(Other::Comment(body)) => {
            format!("COMMENT \"{}\"", escape_snapshot_text(body))
        }
        Event::Other(Other::Doctype(body)) => {
            format!("DOCTYPE \"{}\"", escape_snapshot_text(body))
        }
    }
}

pub fn event_lines(events: &[Event]) -> Vec<String> {
    events.iter().map(event_line).collect()
}
