//! Auto-decoration of HTML form controls over a markup event stream.
//!
//! Elements carrying attributes in the directive namespace are bound to data
//! nodes through an [`Evaluator`] and get `name`, `value`, `id`, `tabindex` and
//! label `for` attributes filled in. `<f:with>` and `<f:set>` toggle those
//! decorations for a subtree or for the rest of the current scope.
//!
//! ```
//! use markup::{TokenizerConfig, serialize, tokenize_with};
//! use springform::{Context, EvalError, NAMESPACE, StaticNode, rewrite};
//!
//! let config = TokenizerConfig::new().declare("f", NAMESPACE);
//! let events = tokenize_with(
//!     "<f:with auto-name=on auto-value=on><input f:bind=user.name></f:with>",
//!     &config,
//! );
//! let evaluator =
//!     |_: &str, _: &Context| Ok::<_, EvalError>(Some(StaticNode::boxed("user-name", "Ada")));
//! let mut ctx = Context::new();
//! let out = rewrite(events, &mut ctx, &evaluator).unwrap();
//! assert_eq!(serialize(&out), r#"<input name="user-name" value="Ada"/>"#);
//! ```

pub mod binding;
pub mod config;
pub mod context;
pub mod decorate;
pub mod directives;
mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod listener;
pub mod scalar;

pub use binding::{BoundNode, EvalError, Evaluator, NoBindings, StaticNode};
pub use config::Config;
pub use context::{Context, ContextError, Lookup, Value};
pub use directives::{DirectiveKind, NAMESPACE, SpringForm};
pub use error::Error;
pub use listener::{Closed, Listener, Rewrite, Transform};
pub use scalar::Override;

use markup::{Event, Namespace};

/// Lazily decorate `events` using the default directive namespace.
pub fn transform<'c, 'e, I>(
    events: I,
    ctx: &'c mut Context,
    evaluator: &'e dyn Evaluator,
) -> Transform<'c, I::IntoIter, SpringForm<'e>>
where
    I: IntoIterator<Item = Event>,
{
    Transform::new(events.into_iter(), SpringForm::new(evaluator), ctx)
}

/// [`transform`] with a custom directive namespace.
pub fn transform_in<'c, 'e, I>(
    events: I,
    ns: Namespace,
    ctx: &'c mut Context,
    evaluator: &'e dyn Evaluator,
) -> Transform<'c, I::IntoIter, SpringForm<'e>>
where
    I: IntoIterator<Item = Event>,
{
    Transform::new(
        events.into_iter(),
        SpringForm::with_namespace(ns, evaluator),
        ctx,
    )
}

/// Decorate `events` eagerly.
pub fn rewrite<I>(events: I, ctx: &mut Context, evaluator: &dyn Evaluator) -> Result<Vec<Event>, Error>
where
    I: IntoIterator<Item = Event>,
{
    transform(events, ctx, evaluator).collect()
}
