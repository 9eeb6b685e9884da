//! Golden fixture files.
//!
//! Each `*.toml` file in a fixture directory holds a `format` marker and a list of
//! `[[case]]` tables:
//!
//! ```toml
//! format = "springform-golden-v1"
//!
//! [[case]]
//! name = "binds-name"
//! input = '<input f:bind="user.name"/>'
//! expected = '<input name="user_name"/>'
//! [case.config]
//! auto-name = true
//! [case.data]
//! user = { name = "Ada" }
//! ```
//!
//! A case carries either `expected` output or an `expected-error` kind.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const GOLDEN_FORMAT_V1: &str = "springform-golden-v1";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    #[default]
    Active,
    Xfail,
    Skip,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GoldenCase {
    pub name: String,
    pub input: String,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub expected_error: Option<String>,
    #[serde(default)]
    pub status: FixtureStatus,
    #[serde(default)]
    pub reason: Option<String>,
    /// Settings table, deserialized by the caller.
    #[serde(default)]
    pub config: Option<toml::Table>,
    /// Data the bindings resolve against.
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub separator: Option<String>,
    /// Directive prefix predeclared for the tokenizer.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    "f".to_string()
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GoldenFile {
    format: String,
    #[serde(default, rename = "case")]
    cases: Vec<GoldenCase>,
}

#[derive(Clone, Debug)]
pub struct LoadedCase {
    pub file: PathBuf,
    pub case: GoldenCase,
}

pub struct FixtureFilter {
    raw: Option<String>,
}

impl FixtureFilter {
    pub fn from_env(key: &str) -> Self {
        Self {
            raw: std::env::var(key).ok().filter(|value| !value.trim().is_empty()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let Some(filter) = &self.raw else {
            return true;
        };
        name.contains(filter.as_str())
    }
}

/// Load every case under `root`, files in name order, cases in file order.
/// Panics on unreadable or malformed fixtures and on duplicate case names.
pub fn load_golden_cases(root: &Path) -> Vec<LoadedCase> {
    let mut entries: Vec<_> = fs::read_dir(root)
        .unwrap_or_else(|err| panic!("failed to read fixture root {root:?}: {err}"))
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    entries.sort();

    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for path in entries {
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"));
        let file: GoldenFile = toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse fixture {path:?}: {err}"));
        assert_eq!(
            file.format, GOLDEN_FORMAT_V1,
            "unsupported fixture format in {path:?}"
        );
        for case in file.cases {
            assert!(
                case.expected.is_some() != case.expected_error.is_some(),
                "case '{}' in {path:?} needs exactly one of expected / expected-error",
                case.name
            );
            if case.status == FixtureStatus::Xfail {
                assert!(
                    case.reason.is_some(),
                    "xfail case '{}' in {path:?} needs a reason",
                    case.name
                );
            }
            assert!(
                seen.insert(case.name.clone()),
                "duplicate case name '{}' in {path:?}",
                case.name
            );
            out.push(LoadedCase {
                file: path.clone(),
                case,
            });
        }
    }
    out
}
