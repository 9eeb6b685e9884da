use super::{Binding, SpringForm};
use crate::context::Context;
use crate::decorate::{self, value};
use crate::error::Error;
use crate::listener::{Closed, Rewrite};
use markup::StartTag;

impl SpringForm<'_> {
    pub(super) fn start_element(
        &mut self,
        tag: StartTag,
        ctx: &mut Context,
    ) -> Result<(Option<StartTag>, Binding), Error> {
        let requested = tag.attrs.get(&self.ns.qname("bind")).is_some();
        let node = match tag.attrs.get(&self.ns.qname("bind")) {
            Some(expr) => {
                let node = self
                    .evaluator
                    .evaluate(expr, ctx)
                    .map_err(|source| Error::Evaluation {
                        expr: expr.to_string(),
                        span: tag.span,
                        source,
                    })?;
                log::debug!(
                    target: "springform.directives",
                    "<{}> bind {expr:?} -> {}",
                    tag.name,
                    node.as_ref().map_or_else(|| "nothing".to_string(), |n| n.flattened_name())
                );
                node
            }
            None => None,
        };

        let StartTag { name, attrs, span } = tag;
        let local = name.local_name();
        let attrs = decorate::tabindex(local, attrs, &self.ns, ctx);
        let attrs = decorate::domid(local, attrs, &self.ns, ctx, node.as_deref());
        Ok((Some(StartTag { name, attrs, span }), Binding { requested, node }))
    }

    pub(super) fn end_element(
        &mut self,
        closed: Closed<Binding>,
        ctx: &mut Context,
    ) -> Result<Rewrite, Error> {
        let Closed {
            start,
            end,
            interior,
            history: Binding { requested, node },
        } = closed;
        let Some(StartTag { name, attrs, span }) = start else {
            return Ok(Rewrite::headless(end, interior));
        };
        let local = name.local_name();
        let node = node.as_deref();

        let attrs = attrs.with_removed(&self.ns.qname("bind"));
        let attrs = decorate::name(local, attrs, &self.ns, ctx, node);
        // A label with its own `bind` never borrows another control's target.
        let target = match node {
            Some(node) => Some(node.flattened_name()),
            None if requested => None,
            None => self.last_bound.clone(),
        };
        let attrs = decorate::label_for(local, attrs, &self.ns, ctx, target.as_deref());
        let (attrs, interior) = value::apply(local, attrs, interior, &self.ns, ctx, node)?;

        let (attrs, leftover) = attrs.partition_namespace(&self.ns);
        for (attr, _) in leftover.iter() {
            log::warn!(
                target: "springform.directives",
                "dropping unknown directive attribute {attr} on <{name}>"
            );
        }

        if let Some(node) = node {
            self.last_bound = Some(node.flattened_name());
        }
        Ok(Rewrite {
            start: Some(StartTag { name, attrs, span }),
            end: Some(end),
            interior,
        })
    }
}
