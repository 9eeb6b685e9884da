use super::{consume_override, is_one_of, options};
use crate::binding::BoundNode;
use crate::context::{Context, keys};
use crate::error::Error;
use crate::scalar::Override;
use markup::{Attrs, Event, Namespace, QName, Text};

pub(crate) const VALUE_ELIGIBLE: &[&str] = &["input", "select", "textarea"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Action,
    Checkbox,
    Radio,
    File,
    Other,
}

pub fn input_kind(attrs: &Attrs) -> InputKind {
    let ty = attrs
        .get_plain("type")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("text")
        .to_ascii_lowercase();
    match ty.as_str() {
        "text" | "password" | "hidden" | "email" | "number" | "search" | "tel" | "url"
        | "date" | "datetime-local" | "month" | "week" | "time" | "color" | "range" => {
            InputKind::Text
        }
        "submit" | "image" | "button" => InputKind::Action,
        "checkbox" => InputKind::Checkbox,
        "radio" => InputKind::Radio,
        "file" => InputKind::File,
        _ => InputKind::Other,
    }
}

fn set_simple(attrs: Attrs, value: Override, node_value: String) -> Attrs {
    if attrs.get_plain("value").is_some() && !value.is_forced() {
        return attrs;
    }
    attrs.with_set(QName::new("value"), node_value)
}

fn toggle(attrs: Attrs, flag: &str, on: bool) -> Attrs {
    if on {
        attrs.with_set(QName::new(flag), flag)
    } else {
        attrs.with_removed(&QName::new(flag))
    }
}

fn set_input(attrs: Attrs, value: Override, node_value: String) -> Attrs {
    match input_kind(&attrs) {
        InputKind::Text => set_simple(attrs, value, node_value),
        InputKind::Action if value.is_forced() => set_simple(attrs, value, node_value),
        InputKind::Checkbox => {
            let literal = attrs.get_plain("value").map(str::to_string);
            let (attrs, literal) = match literal {
                Some(literal) => (attrs, literal),
                None => (attrs.with_set(QName::new("value"), "on"), "on".to_string()),
            };
            toggle(attrs, "checked", literal == node_value)
        }
        InputKind::Radio => {
            let checked = attrs.get_plain("value") == Some(node_value.as_str());
            toggle(attrs, "checked", checked)
        }
        InputKind::Action | InputKind::File | InputKind::Other => attrs,
    }
}

/// Content-or-attribute value (`button`): without a literal `value` the node
/// value becomes the element content, emitted as markup.
fn set_mixed(attrs: Attrs, node_value: String) -> (Attrs, Vec<Event>) {
    if attrs.get_plain("value").is_none() {
        (attrs, vec![Event::Text(Text::markup(node_value))])
    } else {
        (attrs.with_set(QName::new("value"), node_value), Vec::new())
    }
}

pub(crate) fn apply(
    tag: &str,
    attrs: Attrs,
    interior: Vec<Event>,
    ns: &Namespace,
    ctx: &mut Context,
    node: Option<&dyn BoundNode>,
) -> Result<(Attrs, Vec<Event>), Error> {
    let scoped = ctx.flag(keys::AUTO_VALUE);
    let (attrs, value) = consume_override(attrs, ns, "auto-value");
    let Some(node) = node else {
        return Ok((attrs, interior));
    };
    if !value.decide(scoped, is_one_of(tag, VALUE_ELIGIBLE)) {
        return Ok((attrs, interior));
    }
    let node_value = node.value();
    log::trace!(target: "springform.decorate", "<{tag}> value={node_value:?}");
    let kind = tag.to_ascii_lowercase();
    let out = match kind.as_str() {
        "textarea" => (attrs, vec![Event::Text(Text::plain(node_value))]),
        "select" => (attrs, options::toggle_options(interior, &node_value, ctx)?),
        "button" => set_mixed(attrs, node_value),
        "input" => (set_input(attrs, value, node_value), interior),
        _ => (set_simple(attrs, value, node_value), interior),
    };
    Ok(out)
}
