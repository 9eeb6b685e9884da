//! Fixed-order matchers deciding which directive, if any, a start tag opens.
//! The first match wins.

use super::DirectiveKind;
use crate::decorate::has_for_placeholder;
use markup::{Namespace, StartTag};

pub type Matcher = fn(&StartTag, &Namespace) -> Option<DirectiveKind>;

pub const MATCHERS: &[Matcher] = &[match_with, match_set, match_decorated, match_unknown];

pub fn match_with(tag: &StartTag, ns: &Namespace) -> Option<DirectiveKind> {
    (ns.contains(&tag.name) && tag.local_name() == "with").then_some(DirectiveKind::With)
}

pub fn match_set(tag: &StartTag, ns: &Namespace) -> Option<DirectiveKind> {
    (ns.contains(&tag.name) && tag.local_name() == "set").then_some(DirectiveKind::Set)
}

/// Any other element carrying a directive attribute, or a label with the
/// `for="auto"` placeholder.
pub fn match_decorated(tag: &StartTag, ns: &Namespace) -> Option<DirectiveKind> {
    let decorated = !ns.contains(&tag.name)
        && (tag.attrs.any_in(ns) || has_for_placeholder(tag.local_name(), &tag.attrs));
    decorated.then_some(DirectiveKind::Element)
}

pub fn match_unknown(tag: &StartTag, ns: &Namespace) -> Option<DirectiveKind> {
    ns.contains(&tag.name).then_some(DirectiveKind::Unknown)
}

pub fn match_directive(tag: &StartTag, ns: &Namespace) -> Option<DirectiveKind> {
    MATCHERS.iter().find_map(|matcher| matcher(tag, ns))
}
