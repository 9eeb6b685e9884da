//! Dynamically scoped variables for one traversal.
//!
//! Invariants:
//! - There is always at least the root frame; `pop` refuses to remove it.
//! - Reads search innermost to outermost; writes only touch the innermost frame,
//!   so popping a frame discards exactly the keys written at that depth.

use crate::scalar::{parse_bool, parse_int};
use std::collections::HashMap;

pub mod keys {
    pub const AUTO_TABINDEX: &str = "auto-tabindex";
    pub const TABINDEX_VALUE: &str = "auto-tabindex_value";
    pub const AUTO_DOMID: &str = "auto-domid";
    pub const DOMID_FORMAT: &str = "auto-domid_format";
    pub const AUTO_NAME: &str = "auto-name";
    pub const AUTO_VALUE: &str = "auto-value";

    /// Boolean flags a `set`/`with` directive may toggle.
    pub const TOGGLES: [&str; 4] = [AUTO_TABINDEX, AUTO_DOMID, AUTO_NAME, AUTO_VALUE];
}

pub const DEFAULT_DOMID_FORMAT: &str = "f_%s";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a Value),
    Missing,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("cannot pop the root context frame")]
    RootFrame,
}

#[derive(Clone, Debug)]
pub struct Context {
    frames: Vec<HashMap<String, Value>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop(&mut self) -> Result<(), ContextError> {
        if self.frames.len() <= 1 {
            return Err(ContextError::RootFrame);
        }
        self.frames.pop();
        Ok(())
    }

    /// Number of frames, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drop frames above `depth`. The root frame always survives.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth.max(1));
    }

    pub fn get(&self, key: &str) -> Lookup<'_> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(key))
            .map_or(Lookup::Missing, Lookup::Found)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.get(key).found().unwrap_or(default)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(key.to_string(), value.into());
        }
    }

    /// Boolean reading of `key`; missing or unparseable is false.
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Lookup::Found(Value::Bool(value)) => *value,
            Lookup::Found(Value::Int(value)) => *value != 0,
            Lookup::Found(Value::Str(value)) => parse_bool(value).unwrap_or(false),
            Lookup::Missing => false,
        }
    }

    /// Running tabindex counter; 0 means disabled.
    pub fn tabindex(&self) -> i64 {
        match self.get(keys::TABINDEX_VALUE) {
            Lookup::Found(Value::Int(value)) => *value,
            Lookup::Found(Value::Str(value)) => parse_int(value).unwrap_or(0),
            _ => 0,
        }
    }

    pub fn domid_format(&self) -> &str {
        match self.get(keys::DOMID_FORMAT) {
            Lookup::Found(Value::Str(format)) => format,
            _ => DEFAULT_DOMID_FORMAT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fall_through_and_writes_stay_innermost() {
        let mut ctx = Context::new();
        ctx.set(keys::AUTO_NAME, true);
        ctx.push();
        assert!(ctx.flag(keys::AUTO_NAME));
        ctx.set(keys::AUTO_NAME, false);
        assert!(!ctx.flag(keys::AUTO_NAME));
        ctx.pop().expect("pop inner frame");
        assert!(ctx.flag(keys::AUTO_NAME));
    }

    #[test]
    fn pop_refuses_root_frame() {
        let mut ctx = Context::new();
        assert_eq!(ctx.pop(), Err(ContextError::RootFrame));
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn truncate_keeps_root() {
        let mut ctx = Context::new();
        ctx.push();
        ctx.push();
        ctx.truncate(0);
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn get_or_and_typed_defaults() {
        let mut ctx = Context::new();
        let fallback = Value::Int(7);
        assert_eq!(ctx.get("missing"), Lookup::Missing);
        assert_eq!(ctx.get_or("missing", &fallback), &Value::Int(7));
        assert_eq!(ctx.tabindex(), 0);
        assert_eq!(ctx.domid_format(), DEFAULT_DOMID_FORMAT);
        assert!(!ctx.flag(keys::AUTO_VALUE));

        ctx.set(keys::TABINDEX_VALUE, 100_i64);
        ctx.set(keys::DOMID_FORMAT, "id-%s");
        ctx.set(keys::AUTO_VALUE, "yes");
        assert_eq!(ctx.tabindex(), 100);
        assert_eq!(ctx.domid_format(), "id-%s");
        assert!(ctx.flag(keys::AUTO_VALUE));
    }
}
