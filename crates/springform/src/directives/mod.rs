//! The form-decorating listener: `with` / `set` scope directives and
//! decorated elements.

mod element;
pub mod matchers;
mod vars;

#[cfg(test)]
mod tests;

use crate::binding::{BoundNode, Evaluator};
use crate::context::Context;
use crate::error::Error;
use crate::listener::{Closed, Listener, Rewrite};
use markup::{Namespace, StartTag};

/// Directive namespace URI.
pub const NAMESPACE: &str = "http://code.discorporate.us/springy-form";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `<f:with>`: push a frame, copy settings, pop at the end.
    With,
    /// `<f:set>`: copy settings into the current frame.
    Set,
    /// Any element carrying directive attributes.
    Element,
    /// Directive-namespace element with an unrecognized name.
    Unknown,
}

/// What a decorated element's `bind` resolved to.
#[derive(Default)]
pub struct Binding {
    /// The element carried a `bind` expression.
    pub requested: bool,
    pub node: Option<Box<dyn BoundNode>>,
}

pub struct SpringForm<'e> {
    ns: Namespace,
    evaluator: &'e dyn Evaluator,
    /// Flattened name of the most recently closed bound element, for labels.
    last_bound: Option<String>,
}

impl<'e> SpringForm<'e> {
    pub fn new(evaluator: &'e dyn Evaluator) -> Self {
        Self::with_namespace(Namespace::new(NAMESPACE), evaluator)
    }

    pub fn with_namespace(ns: Namespace, evaluator: &'e dyn Evaluator) -> Self {
        Self {
            ns,
            evaluator,
            last_bound: None,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }
}

impl Listener for SpringForm<'_> {
    type Handler = DirectiveKind;
    type History = Binding;

    fn inspect(&self, tag: &StartTag, _ctx: &Context) -> Option<DirectiveKind> {
        matchers::match_directive(tag, &self.ns)
    }

    fn start(
        &mut self,
        kind: DirectiveKind,
        tag: StartTag,
        ctx: &mut Context,
    ) -> Result<(Option<StartTag>, Self::History), Error> {
        match kind {
            DirectiveKind::With => {
                ctx.push();
                vars::copy_vars(&tag.attrs, &self.ns, ctx);
                Ok((None, Binding::default()))
            }
            DirectiveKind::Set => {
                vars::copy_vars(&tag.attrs, &self.ns, ctx);
                Ok((None, Binding::default()))
            }
            DirectiveKind::Element => self.start_element(tag, ctx),
            DirectiveKind::Unknown => Err(Error::UnknownDirective {
                name: tag.name,
                span: tag.span,
            }),
        }
    }

    fn end(
        &mut self,
        kind: DirectiveKind,
        closed: Closed<Self::History>,
        ctx: &mut Context,
    ) -> Result<Rewrite, Error> {
        match kind {
            DirectiveKind::With => {
                ctx.pop()?;
                Ok(Rewrite::elide(closed.interior))
            }
            DirectiveKind::Set => Ok(Rewrite::elide(closed.interior)),
            DirectiveKind::Element => self.end_element(closed, ctx),
            DirectiveKind::Unknown => Err(Error::UnknownDirective {
                name: closed.end.name,
                span: closed.end.span,
            }),
        }
    }
}
