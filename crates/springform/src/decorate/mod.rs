//! Attribute decorations applied to bound form controls.
//!
//! Each decoration consumes its own `auto-*` override attribute, reads its scope
//! flag, and applies `Override::decide`. An effective decoration only fills a
//! missing attribute unless the override is `True`.

pub mod options;
pub mod value;

use crate::binding::BoundNode;
use crate::context::{Context, keys};
use crate::scalar::{Override, parse_override};
use markup::{Attrs, Namespace, QName};

pub(crate) const TABINDEXABLE: &[&str] = &["input", "button", "select", "textarea"];
pub(crate) const DOMID_ELIGIBLE: &[&str] = &["input", "button", "select", "textarea"];
pub(crate) const NAME_ELIGIBLE: &[&str] = &["input", "button", "select", "textarea"];

pub(crate) fn is_one_of(tag: &str, kinds: &[&str]) -> bool {
    kinds.iter().any(|kind| tag.eq_ignore_ascii_case(kind))
}

/// Remove the directive attribute `local` and parse it; absent is `Maybe`.
pub(crate) fn consume_override(attrs: Attrs, ns: &Namespace, local: &str) -> (Attrs, Override) {
    let (attrs, raw) = attrs.take(&ns.qname(local));
    let value = raw.as_deref().map_or(Override::Maybe, parse_override);
    (attrs, value)
}

/// Whether an effective decoration may write `target`.
fn may_write(attrs: &Attrs, target: &str, value: Override) -> bool {
    attrs.get_plain(target).is_none() || value.is_forced()
}

/// Substitute `name` for the first `%s` in `format`; `%%` is a literal `%`.
/// A format without `%s` is used as a prefix.
pub fn format_domid(format: &str, name: &str) -> String {
    let mut out = String::with_capacity(format.len() + name.len());
    let mut substituted = false;
    let mut chars = format.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '%' {
            match chars.peek() {
                Some('%') => {
                    chars.next();
                    out.push('%');
                    continue;
                }
                Some('s') if !substituted => {
                    chars.next();
                    out.push_str(name);
                    substituted = true;
                    continue;
                }
                _ => {}
            }
        }
        out.push(ch);
    }
    if !substituted {
        out.push_str(name);
    }
    out
}

pub(crate) fn tabindex(tag: &str, attrs: Attrs, ns: &Namespace, ctx: &mut Context) -> Attrs {
    let scoped = ctx.flag(keys::AUTO_TABINDEX);
    let (attrs, value) = consume_override(attrs, ns, "auto-tabindex");
    let current = ctx.tabindex();
    if current == 0
        || !value.decide(scoped, is_one_of(tag, TABINDEXABLE))
        || !may_write(&attrs, "tabindex", value)
    {
        return attrs;
    }
    // An exhausted counter hands out nothing further.
    let Some(next) = current.checked_add(1) else {
        log::warn!(target: "springform.decorate", "tabindex counter exhausted at <{tag}>");
        return attrs;
    };
    log::trace!(target: "springform.decorate", "<{tag}> tabindex={current}");
    ctx.set(keys::TABINDEX_VALUE, next);
    attrs.with_set(QName::new("tabindex"), current.to_string())
}

pub(crate) fn domid(
    tag: &str,
    attrs: Attrs,
    ns: &Namespace,
    ctx: &Context,
    node: Option<&dyn BoundNode>,
) -> Attrs {
    let scoped = ctx.flag(keys::AUTO_DOMID);
    let (attrs, value) = consume_override(attrs, ns, "auto-domid");
    if !value.decide(scoped, is_one_of(tag, DOMID_ELIGIBLE)) || !may_write(&attrs, "id", value) {
        return attrs;
    }
    let id = match node {
        Some(node) => Some(format_domid(ctx.domid_format(), &node.flattened_name())),
        None if is_one_of(tag, DOMID_ELIGIBLE) => attrs
            .get_plain("name")
            .map(|name| format_domid(ctx.domid_format(), name)),
        None => None,
    };
    match id {
        Some(id) => {
            log::trace!(target: "springform.decorate", "<{tag}> id={id}");
            attrs.with_set(QName::new("id"), id)
        }
        None => attrs,
    }
}

pub(crate) fn name(
    tag: &str,
    attrs: Attrs,
    ns: &Namespace,
    ctx: &Context,
    node: Option<&dyn BoundNode>,
) -> Attrs {
    let scoped = ctx.flag(keys::AUTO_NAME);
    let (attrs, value) = consume_override(attrs, ns, "auto-name");
    let Some(node) = node else {
        return attrs;
    };
    if !value.decide(scoped, is_one_of(tag, NAME_ELIGIBLE)) || !may_write(&attrs, "name", value) {
        return attrs;
    }
    attrs.with_set(QName::new("name"), node.flattened_name())
}

/// True for the `for="auto"` placeholder on a label.
pub(crate) fn has_for_placeholder(tag: &str, attrs: &Attrs) -> bool {
    tag.eq_ignore_ascii_case("label")
        && attrs
            .get_plain("for")
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("auto"))
}

/// `target` is the flattened name of the node the label describes.
pub(crate) fn label_for(
    tag: &str,
    attrs: Attrs,
    ns: &Namespace,
    ctx: &Context,
    target: Option<&str>,
) -> Attrs {
    let scoped = ctx.flag(keys::AUTO_DOMID);
    let (attrs, value) = consume_override(attrs, ns, "auto-for");
    if !tag.eq_ignore_ascii_case("label") {
        return attrs;
    }
    let attrs = if has_for_placeholder(tag, &attrs) {
        attrs.with_removed(&QName::new("for"))
    } else {
        attrs
    };
    let Some(target) = target else {
        return attrs;
    };
    if !value.decide(scoped, true) || !may_write(&attrs, "for", value) {
        return attrs;
    }
    attrs.with_set(QName::new("for"), format_domid(ctx.domid_format(), target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::StaticNode;
    use crate::directives::NAMESPACE;

    fn ns() -> Namespace {
        Namespace::new(NAMESPACE)
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attrs {
        let ns = ns();
        pairs
            .iter()
            .map(|(k, v)| match k.strip_prefix("f:") {
                Some(local) => (ns.qname(local), v.to_string()),
                None => (QName::new(k), v.to_string()),
            })
            .collect()
    }

    #[test]
    fn format_domid_substitutes_first_placeholder() {
        assert_eq!(format_domid("f_%s", "user"), "f_user");
        assert_eq!(format_domid("%s-%s", "a"), "a-%s");
        assert_eq!(format_domid("100%%_%s", "a"), "100%_a");
        assert_eq!(format_domid("field-", "a"), "field-a");
    }

    #[test]
    fn tabindex_counts_up_and_respects_literal() {
        let mut ctx = Context::new();
        ctx.set(keys::AUTO_TABINDEX, true);
        ctx.set(keys::TABINDEX_VALUE, 5_i64);
        let first = tabindex("input", attrs(&[]), &ns(), &mut ctx);
        assert_eq!(first.get_plain("tabindex"), Some("5"));
        let kept = tabindex("select", attrs(&[("tabindex", "1")]), &ns(), &mut ctx);
        assert_eq!(kept.get_plain("tabindex"), Some("1"));
        let forced = tabindex(
            "div",
            attrs(&[("tabindex", "1"), ("f:auto-tabindex", "on")]),
            &ns(),
            &mut ctx,
        );
        assert_eq!(forced.get_plain("tabindex"), Some("6"));
        assert!(!forced.any_in(&ns()));
        assert_eq!(ctx.tabindex(), 7);
    }

    #[test]
    fn tabindex_stops_at_counter_limit() {
        let mut ctx = Context::new();
        ctx.set(keys::AUTO_TABINDEX, true);
        ctx.set(keys::TABINDEX_VALUE, i64::MAX - 1);
        let last = tabindex("input", attrs(&[]), &ns(), &mut ctx);
        let expected = (i64::MAX - 1).to_string();
        assert_eq!(last.get_plain("tabindex"), Some(expected.as_str()));
        let exhausted = tabindex("input", attrs(&[]), &ns(), &mut ctx);
        assert_eq!(exhausted.get_plain("tabindex"), None);
        assert_eq!(ctx.tabindex(), i64::MAX);
    }

    #[test]
    fn tabindex_zero_counter_disables_even_forced() {
        let mut ctx = Context::new();
        let out = tabindex("input", attrs(&[("f:auto-tabindex", "yes")]), &ns(), &mut ctx);
        assert_eq!(out.get_plain("tabindex"), None);
        assert!(out.is_empty());
    }

    #[test]
    fn domid_for_bound_and_unbound_controls() {
        let mut ctx = Context::new();
        ctx.set(keys::AUTO_DOMID, true);
        let node = StaticNode::new("user_name", "Ada");
        let bound = domid("input", attrs(&[]), &ns(), &ctx, Some(&node));
        assert_eq!(bound.get_plain("id"), Some("f_user_name"));

        let unbound = domid("input", attrs(&[("name", "q")]), &ns(), &ctx, None);
        assert_eq!(unbound.get_plain("id"), Some("f_q"));

        let nameless = domid("input", attrs(&[]), &ns(), &ctx, None);
        assert_eq!(nameless.get_plain("id"), None);

        let ineligible = domid("div", attrs(&[]), &ns(), &ctx, Some(&node));
        assert_eq!(ineligible.get_plain("id"), None);
    }

    #[test]
    fn name_requires_node_and_honors_false_override() {
        let mut ctx = Context::new();
        ctx.set(keys::AUTO_NAME, true);
        let node = StaticNode::new("user", "Ada");
        let out = name("textarea", attrs(&[]), &ns(), &ctx, Some(&node));
        assert_eq!(out.get_plain("name"), Some("user"));
        let off = name("input", attrs(&[("f:auto-name", "off")]), &ns(), &ctx, Some(&node));
        assert_eq!(off.get_plain("name"), None);
        assert!(off.is_empty());
        let unbound = name("input", attrs(&[("f:auto-name", "on")]), &ns(), &ctx, None);
        assert!(unbound.is_empty());
    }

    #[test]
    fn label_for_replaces_placeholder() {
        let mut ctx = Context::new();
        ctx.set(keys::AUTO_DOMID, true);
        let out = label_for("label", attrs(&[("for", "auto")]), &ns(), &ctx, Some("user-name"));
        assert_eq!(out.get_plain("for"), Some("f_user-name"));

        let literal = label_for("label", attrs(&[("for", "x")]), &ns(), &ctx, Some("user-name"));
        assert_eq!(literal.get_plain("for"), Some("x"));

        let no_target = label_for("label", attrs(&[("for", "auto")]), &ns(), &ctx, None);
        assert_eq!(no_target.get_plain("for"), None);
    }
}
