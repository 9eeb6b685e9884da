//! Namespace-aware markup events: tokenize text into a balanced stream, rewrite it
//! as plain values, and serialize it back.

mod attrs;
mod entities;
pub mod serialize;
pub mod snapshot;
mod tokenizer;
mod types;

pub use attrs::Attrs;
pub use entities::{escape_attr, escape_text};
pub use serialize::{SerializeOptions, serialize, serialize_with, write_events};
pub use tokenizer::{TokenizerConfig, tokenize, tokenize_with};
pub use types::{
    EndTag, Event, Namespace, Other, QName, Span, StartTag, Text, TextKind, XML_URI, XMLNS_URI,
};

/// Make deterministic form-heavy markup for benches and fuzz seeds.
pub fn make_form_blocks(count: usize) -> String {
    let mut out = String::with_capacity(count.saturating_mul(96));
    for i in 0..count {
        out.push_str("<fieldset class=row><label>Field ");
        out.push_str(&i.to_string());
        out.push_str("</label><input type=text name=field value=x>");
        out.push_str("<select><option value=a>A</option><option>B</option></select></fieldset>");
    }
    out
}
