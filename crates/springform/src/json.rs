//! Binding evaluator over a JSON document.
//!
//! Expressions are dotted paths: `user.name`, `items.0.label`. A segment is an
//! object key or, on arrays, a decimal index. Segments may contain ASCII letters,
//! digits, `_` and `-`.

use crate::binding::{BoundNode, EvalError, Evaluator};
use crate::context::Context;
use serde_json::Value;

pub const DEFAULT_SEPARATOR: &str = "_";

pub struct JsonEvaluator {
    data: Value,
    separator: String,
}

struct JsonNode {
    name: String,
    value: String,
}

impl BoundNode for JsonNode {
    fn flattened_name(&self) -> String {
        self.name.clone()
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

fn is_segment_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

fn parse_path(expr: &str) -> Result<Vec<&str>, EvalError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(EvalError::new("empty binding expression"));
    }
    expr.split('.')
        .map(|segment| {
            if segment.is_empty() {
                Err(EvalError::new(format!("empty path segment in {expr:?}")))
            } else if let Some(bad) = segment.chars().find(|&ch| !is_segment_char(ch)) {
                Err(EvalError::new(format!(
                    "unexpected character {bad:?} in {expr:?}"
                )))
            } else {
                Ok(segment)
            }
        })
        .collect()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

impl JsonEvaluator {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Separator joining path segments into a flattened name.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    fn resolve(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.data, |current, segment| match current {
            Value::Object(map) => map.get(*segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

impl Evaluator for JsonEvaluator {
    fn evaluate(&self, expr: &str, _ctx: &Context) -> Result<Option<Box<dyn BoundNode>>, EvalError> {
        let path = parse_path(expr)?;
        let Some(found) = self.resolve(&path) else {
            log::debug!(target: "springform.json", "no value at {expr:?}");
            return Ok(None);
        };
        Ok(Some(Box::new(JsonNode {
            name: path.join(self.separator.as_str()),
            value: scalar(found),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(evaluator: &JsonEvaluator, expr: &str) -> Option<(String, String)> {
        evaluator
            .evaluate(expr, &Context::new())
            .expect("evaluate")
            .map(|node| (node.flattened_name(), node.value()))
    }

    #[test]
    fn resolves_nested_keys_and_indices() {
        let evaluator = JsonEvaluator::new(json!({
            "user": {"name": "Ada", "age": 36, "admin": true, "nick": null},
            "tags": ["x", "y"],
        }));
        assert_eq!(eval(&evaluator, "user.name"), Some(("user_name".into(), "Ada".into())));
        assert_eq!(eval(&evaluator, "user.age"), Some(("user_age".into(), "36".into())));
        assert_eq!(eval(&evaluator, "user.admin").map(|n| n.1), Some("true".into()));
        assert_eq!(eval(&evaluator, "user.nick").map(|n| n.1), Some(String::new()));
        assert_eq!(eval(&evaluator, "tags.1"), Some(("tags_1".into(), "y".into())));
        assert_eq!(eval(&evaluator, "user").map(|n| n.1), Some(String::new()));
    }

    #[test]
    fn missing_paths_bind_nothing() {
        let evaluator = JsonEvaluator::new(json!({"tags": ["x"]}));
        assert_eq!(eval(&evaluator, "user.name"), None);
        assert_eq!(eval(&evaluator, "tags.5"), None);
        assert_eq!(eval(&evaluator, "tags.first"), None);
    }

    #[test]
    fn malformed_expressions_are_errors() {
        let evaluator = JsonEvaluator::new(json!({}));
        for expr in ["", "  ", "user..name", "user.", "user name", "user[0]"] {
            assert!(
                evaluator.evaluate(expr, &Context::new()).is_err(),
                "{expr:?} should fail"
            );
        }
    }

    #[test]
    fn separator_is_configurable() {
        let evaluator = JsonEvaluator::new(json!({"user": {"name": "Ada"}})).with_separator("-");
        assert_eq!(eval(&evaluator, "user.name").map(|n| n.0), Some("user-name".into()));
    }
}
