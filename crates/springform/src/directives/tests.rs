use super::*;
use crate::binding::{EvalError, StaticNode};
use crate::context::keys;
use markup::{EndTag, Event, QName, TokenizerConfig, serialize, tokenize_with};

/// `(expression, flattened name, value)`; expressions containing `!` fail.
struct Bindings(&'static [(&'static str, &'static str, &'static str)]);

impl Evaluator for Bindings {
    fn evaluate(&self, expr: &str, _ctx: &Context) -> Result<Option<Box<dyn BoundNode>>, EvalError> {
        if expr.contains('!') {
            return Err(EvalError::new(format!("bad expression {expr}")));
        }
        Ok(self
            .0
            .iter()
            .find(|(e, _, _)| *e == expr)
            .map(|(_, name, value)| StaticNode::boxed(*name, *value)))
    }
}

const DATA: Bindings = Bindings(&[
    ("user.name", "user-name", "Ada"),
    ("a", "a", "1"),
    ("b", "b", "2"),
    ("c", "c", "3"),
    ("flag", "flag", "on"),
    ("choice", "choice", "b"),
    ("bio", "bio", "a<b"),
]);

fn events(input: &str) -> Vec<Event> {
    let config = TokenizerConfig::new().declare("f", NAMESPACE);
    tokenize_with(input, &config)
}

fn render_with(input: &str, ctx: &mut Context) -> Result<String, Error> {
    let out = crate::rewrite(events(input), ctx, &DATA)?;
    Ok(serialize(&out))
}

fn render(input: &str) -> String {
    let mut ctx = Context::new();
    let out = render_with(input, &mut ctx).expect("rewrite");
    assert_eq!(ctx.depth(), 1, "frames leaked for {input:?}");
    out
}

#[test]
fn matchers_run_in_order() {
    let ns = Namespace::new(NAMESPACE);
    let kind = |input: &str| {
        let events = events(input);
        let Some(Event::Start(tag)) = events.first() else {
            panic!("no start tag in {input:?}");
        };
        matchers::match_directive(tag, &ns)
    };
    assert_eq!(kind("<f:with/>"), Some(DirectiveKind::With));
    assert_eq!(kind("<f:set f:bind=x/>"), Some(DirectiveKind::Set));
    assert_eq!(kind("<input f:bind=x>"), Some(DirectiveKind::Element));
    assert_eq!(kind("<label for=auto>"), Some(DirectiveKind::Element));
    assert_eq!(kind("<f:other>"), Some(DirectiveKind::Unknown));
    assert_eq!(kind("<input name=x>"), None);
    assert_eq!(kind("<label for=x>"), None);
}

#[test]
fn binds_name_and_value() {
    assert_eq!(
        render(r#"<f:with auto-name="on" auto-value="on"><input f:bind="user.name"/></f:with>"#),
        r#"<input name="user-name" value="Ada"/>"#
    );
}

#[test]
fn label_follows_most_recent_bound_control() {
    assert_eq!(
        render(
            r#"<f:with auto-domid="on"><input f:bind="user.name"/><label for="auto">Name</label></f:with>"#
        ),
        r#"<input id="f_user-name"/><label for="f_user-name">Name</label>"#
    );
}

#[test]
fn label_placeholder_is_dropped_without_target() {
    assert_eq!(
        render(r#"<f:with auto-domid="on"><label for="auto">Name</label></f:with>"#),
        "<label>Name</label>"
    );
}

#[test]
fn label_with_its_own_binding_never_borrows_a_target() {
    assert_eq!(
        render(concat!(
            r#"<f:with auto-domid="on"><input f:bind="a"/>"#,
            r#"<label f:bind="missing.path">X</label>"#,
            r#"<label f:bind="b" for="auto">Y</label>"#,
            "</f:with>"
        )),
        r#"<input id="f_a"/><label>X</label><label for="f_b">Y</label>"#
    );
}

#[test]
fn set_applies_to_the_current_frame() {
    assert_eq!(
        render(r#"<div><f:set auto-name="yes"/><input f:bind="a"/></div><input f:bind="b"/>"#),
        r#"<div><input name="a"/></div><input name="b"/>"#
    );
}

#[test]
fn with_scope_ends_at_its_end_tag() {
    assert_eq!(
        render(r#"<f:with auto-name="yes"><input f:bind="a"/></f:with><input f:bind="b"/>"#),
        r#"<input name="a"/><input/>"#
    );
}

#[test]
fn set_inside_with_is_bounded_by_the_with() {
    assert_eq!(
        render(
            r#"<f:with><f:set auto-name="on"/><input f:bind="a"/></f:with><input f:bind="b"/>"#
        ),
        r#"<input name="a"/><input/>"#
    );
}

#[test]
fn tabindex_increments_and_does_not_leak() {
    assert_eq!(
        render(concat!(
            r#"<f:with tabindex="1" auto-tabindex="on">"#,
            r#"<input f:bind="a"/><p>x</p><select f:bind="b"></select><textarea f:bind="zz"></textarea>"#,
            r#"</f:with><input f:bind="c"/>"#
        )),
        concat!(
            r#"<input tabindex="1"/><p>x</p><select tabindex="2"></select><textarea tabindex="3"></textarea>"#,
            "<input/>"
        )
    );
}

#[test]
fn exhausted_tabindex_counter_assigns_nothing() {
    assert_eq!(
        render(concat!(
            r#"<f:with tabindex="9223372036854775807" auto-tabindex="on">"#,
            r#"<input f:bind="a"/><input f:bind="b"/>"#,
            "</f:with>"
        )),
        "<input/><input/>"
    );
}

#[test]
fn tabindex_counter_is_written_to_innermost_frame() {
    let mut ctx = Context::new();
    ctx.set(keys::TABINDEX_VALUE, 10_i64);
    ctx.set(keys::AUTO_TABINDEX, true);
    let out = render_with(
        r#"<f:with><input f:bind="a"/><input f:bind="b"/></f:with><input f:bind="c"/>"#,
        &mut ctx,
    )
    .expect("rewrite");
    assert_eq!(
        out,
        r#"<input tabindex="10"/><input tabindex="11"/><input tabindex="10"/>"#
    );
    assert_eq!(ctx.tabindex(), 11);
}

#[test]
fn unparseable_settings_fall_back() {
    let mut ctx = Context::new();
    ctx.set(keys::AUTO_NAME, true);
    ctx.set(keys::TABINDEX_VALUE, 4_i64);
    let out = render_with(
        r#"<f:set auto-name="maybe" tabindex="soon"/><input f:bind="a" f:auto-tabindex="on"/>"#,
        &mut ctx,
    )
    .expect("rewrite");
    assert_eq!(out, r#"<input tabindex="4"/>"#);
    assert!(!ctx.flag(keys::AUTO_NAME));
}

#[test]
fn overrides_take_precedence() {
    assert_eq!(
        render(concat!(
            r#"<f:with auto-name="on">"#,
            r#"<input f:bind="a" name="literal"/>"#,
            r#"<input f:bind="a" name="literal" f:auto-name="on"/>"#,
            r#"<input f:bind="a" f:auto-name="off"/>"#,
            r#"</f:with>"#,
            r#"<input f:bind="a" f:auto-name="true"/>"#,
            r#"<div f:bind="a" f:auto-name="auto"></div>"#
        )),
        concat!(
            r#"<input name="literal"/>"#,
            r#"<input name="a"/>"#,
            "<input/>",
            r#"<input name="a"/>"#,
            "<div></div>"
        )
    );
}

#[test]
fn checkbox_and_radio_reflect_bound_value() {
    assert_eq!(
        render(concat!(
            r#"<f:set auto-value="on"/>"#,
            r#"<input type="checkbox" f:bind="flag"/>"#,
            r#"<input type="radio" value="b" f:bind="choice"/>"#,
            r#"<input type="radio" value="c" checked f:bind="choice"/>"#,
            r#"<input type="radio" f:bind="choice"/>"#
        )),
        concat!(
            r#"<input type="checkbox" value="on" checked="checked"/>"#,
            r#"<input type="radio" value="b" checked="checked"/>"#,
            r#"<input type="radio" value="c"/>"#,
            r#"<input type="radio"/>"#
        )
    );
}

#[test]
fn select_marks_matching_option() {
    assert_eq!(
        render(concat!(
            r#"<f:with auto-value="on"><select f:bind="choice">"#,
            r#"<option value="a">A</option><option value="b">B</option><option value="c" selected>C</option>"#,
            "</select></f:with>"
        )),
        concat!(
            "<select>",
            r#"<option value="a">A</option><option value="b" selected="selected">B</option><option value="c">C</option>"#,
            "</select>"
        )
    );
}

#[test]
fn textarea_content_is_replaced_and_escaped() {
    assert_eq!(
        render(r#"<textarea f:bind="bio" f:auto-value="on">old</textarea>"#),
        "<textarea>a&lt;b</textarea>"
    );
}

#[test]
fn domid_uses_scoped_format_and_literal_name() {
    assert_eq!(
        render(concat!(
            r#"<f:with auto-domid="on" domid-format="id-%s">"#,
            r#"<select f:bind="choice"></select><input name="q" f:auto-name="auto"/>"#,
            "</f:with>"
        )),
        r#"<select id="id-choice"></select><input name="q" id="id-q"/>"#
    );
}

#[test]
fn unbound_controls_keep_node_free_decorations() {
    let mut ctx = Context::new();
    ctx.set(keys::AUTO_TABINDEX, true);
    ctx.set(keys::AUTO_NAME, true);
    ctx.set(keys::TABINDEX_VALUE, 1_i64);
    let out = render_with(r#"<input f:bind="missing.path"/>"#, &mut ctx).expect("rewrite");
    assert_eq!(out, r#"<input tabindex="1"/>"#);
}

#[test]
fn unknown_directive_attributes_are_stripped() {
    assert_eq!(
        render(r#"<p><input f:bind="a" f:colour="red"/></p>"#),
        "<p><input/></p>"
    );
}

#[test]
fn untracked_content_passes_through() {
    let input = "<!DOCTYPE html><form action=\"/go\"><!-- note --><p>Hi &amp; bye</p></form>";
    assert_eq!(render(input), input);
}

#[test]
fn output_is_a_fixed_point() {
    let input = concat!(
        r#"<f:with auto-name="on" auto-value="on" auto-domid="on" tabindex="5" auto-tabindex="on">"#,
        r#"<input f:bind="user.name"/><label for="auto">Name</label>"#,
        r#"<select f:bind="choice"><option>a</option><option>b</option></select>"#,
        "</f:with>"
    );
    let mut ctx = Context::new();
    let once = crate::rewrite(events(input), &mut ctx, &DATA).expect("first pass");
    let twice = crate::rewrite(once.clone(), &mut ctx, &DATA).expect("second pass");
    assert_eq!(once, twice);
    assert_eq!(
        serialize(&once),
        concat!(
            r#"<input tabindex="5" id="f_user-name" name="user-name" value="Ada"/>"#,
            r#"<label for="f_user-name">Name</label>"#,
            r#"<select tabindex="6" id="f_choice" name="choice"><option>a</option><option selected="selected">b</option></select>"#
        )
    );
}

#[test]
fn evaluation_errors_are_fatal_and_restore_context() {
    let mut ctx = Context::new();
    let err = render_with(
        r#"<f:with auto-name="on"><p><input f:bind="bad!"/></p></f:with>"#,
        &mut ctx,
    )
    .expect_err("bad binding");
    assert!(matches!(&err, Error::Evaluation { expr, .. } if expr == "bad!"));
    assert_eq!(ctx.depth(), 1);
}

#[test]
fn unknown_directive_elements_are_rejected() {
    let err = render_with("<div><f:frobnicate/></div>", &mut Context::new())
        .expect_err("unknown directive");
    assert!(matches!(err, Error::UnknownDirective { ref name, .. } if name.local_name() == "frobnicate"));
}

#[test]
fn structural_imbalance_is_fatal() {
    let mut unclosed = events(r#"<input f:bind="a"/>"#);
    unclosed.pop();
    let err = crate::rewrite(unclosed, &mut Context::new(), &DATA).expect_err("unclosed");
    assert!(matches!(err, Error::Unclosed { open: 1, .. }));

    let mut stray = events("<p></p>");
    stray.push(Event::End(EndTag::new(QName::new("p"))));
    let err = crate::rewrite(stray, &mut Context::new(), &DATA).expect_err("stray end");
    assert!(matches!(err, Error::UnexpectedEnd { .. }));
}
