use crate::context::{Context, DEFAULT_DOMID_FORMAT, keys};
use crate::directives::NAMESPACE;
use markup::Namespace;
use serde::Deserialize;

/// Root-frame defaults for a traversal, usually read from TOML:
///
/// ```toml
/// auto-name = true
/// auto-value = true
/// tabindex-start = 100
/// domid-format = "f_%s"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub auto_tabindex: bool,
    pub auto_domid: bool,
    pub auto_name: bool,
    pub auto_value: bool,
    /// First tabindex handed out; 0 disables tabindex assignment.
    pub tabindex_start: i64,
    pub domid_format: String,
    /// Directive namespace URI.
    pub namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_tabindex: false,
            auto_domid: false,
            auto_name: false,
            auto_value: false,
            tabindex_start: 0,
            domid_format: DEFAULT_DOMID_FORMAT.to_string(),
            namespace: NAMESPACE.to_string(),
        }
    }
}

impl Config {
    /// Context whose root frame holds these settings.
    pub fn context(&self) -> Context {
        let mut ctx = Context::new();
        ctx.set(keys::AUTO_TABINDEX, self.auto_tabindex);
        ctx.set(keys::AUTO_DOMID, self.auto_domid);
        ctx.set(keys::AUTO_NAME, self.auto_name);
        ctx.set(keys::AUTO_VALUE, self.auto_value);
        ctx.set(keys::TABINDEX_VALUE, self.tabindex_start);
        ctx.set(keys::DOMID_FORMAT, self.domid_format.as_str());
        ctx
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.namespace.as_str())
    }
}
