//! Lenient parsers for directive attribute values.
//!
//! Nothing here fails: unrecognized text maps to "unknown" (`None` or
//! `Override::Maybe`) and the caller falls back to its scoped default.

const YES: &[&str] = &["1", "true", "t", "on", "yes"];
const NO: &[&str] = &["0", "false", "nil", "off", "no"];
const MAYBE: &[&str] = &["auto"];

/// Element-local tri-state override for one decoration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Override {
    /// Force the decoration, even over a literal attribute.
    True,
    /// Suppress the decoration.
    False,
    /// Defer to the scope flag.
    #[default]
    Maybe,
}

impl Override {
    /// `(override != False && scoped && eligible) || override == True`
    pub fn decide(self, scoped: bool, eligible: bool) -> bool {
        (self != Override::False && scoped && eligible) || self == Override::True
    }

    pub fn is_forced(self) -> bool {
        self == Override::True
    }
}

fn is_one_of(value: &str, set: &[&str]) -> bool {
    set.iter().any(|candidate| value.eq_ignore_ascii_case(candidate))
}

pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if is_one_of(value, YES) {
        Some(true)
    } else if is_one_of(value, NO) {
        Some(false)
    } else {
        None
    }
}

pub fn parse_override(value: &str) -> Override {
    let value = value.trim();
    if is_one_of(value, MAYBE) {
        return Override::Maybe;
    }
    match parse_bool(value) {
        Some(true) => Override::True,
        Some(false) => Override::False,
        None => Override::Maybe,
    }
}

pub fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}
