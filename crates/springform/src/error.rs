use crate::binding::EvalError;
use crate::context::ContextError;
use markup::{QName, Span};

fn at(span: &Option<Span>) -> String {
    match span {
        Some(span) => format!(" at {span}"),
        None => String::new(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("end tag </{name}>{} has no open element", at(.span))]
    UnexpectedEnd { name: QName, span: Option<Span> },

    #[error("input ended with {open} unclosed region(s); innermost <{name}>{}", at(.span))]
    Unclosed {
        name: QName,
        span: Option<Span>,
        open: usize,
    },

    #[error("end tag </{found}>{} closes region <{expected}>", at(.span))]
    MismatchedEnd {
        expected: QName,
        found: QName,
        span: Option<Span>,
    },

    #[error("cannot evaluate binding {expr:?}{}", at(.span))]
    Evaluation {
        expr: String,
        span: Option<Span>,
        #[source]
        source: EvalError,
    },

    #[error("unknown directive element <{name}>{}", at(.span))]
    UnknownDirective { name: QName, span: Option<Span> },

    #[error(transparent)]
    Context(#[from] ContextError),
}
