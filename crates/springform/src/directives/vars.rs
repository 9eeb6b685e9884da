//! Attribute-to-context copying shared by `set` and `with`.

use crate::context::{Context, keys};
use crate::scalar::{parse_bool, parse_int};
use markup::{Attrs, Namespace};

fn lookup<'a>(attrs: &'a Attrs, ns: &Namespace, key: &str) -> Option<&'a str> {
    attrs.get_plain(key).or_else(|| attrs.get(&ns.qname(key)))
}

/// Copy recognized settings into the innermost frame. Toggles that do not parse
/// are stored as false; a `tabindex` that does not parse is ignored.
pub(crate) fn copy_vars(attrs: &Attrs, ns: &Namespace, ctx: &mut Context) {
    for key in keys::TOGGLES {
        if let Some(raw) = lookup(attrs, ns, key) {
            let value = parse_bool(raw).unwrap_or(false);
            log::debug!(target: "springform.directives", "{key} = {value}");
            ctx.set(key, value);
        }
    }
    if let Some(start) = lookup(attrs, ns, "tabindex").and_then(parse_int) {
        log::debug!(target: "springform.directives", "tabindex counter = {start}");
        ctx.set(keys::TABINDEX_VALUE, start);
    }
    if let Some(format) = lookup(attrs, ns, "domid-format") {
        log::debug!(target: "springform.directives", "domid format = {format:?}");
        ctx.set(keys::DOMID_FORMAT, format);
    }
}
