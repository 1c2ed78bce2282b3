//! Key notation variables (`mapleader`, `maplocalleader`).

use std::collections::HashMap;

use crate::config::KeysConfig;

/// Special tokens and the variable each one reads, in lookup order.
pub(crate) const SPECIAL_KEYS: &[(&str, &str)] = &[
    ("<leader>", "mapleader"),
    ("<localleader>", "maplocalleader"),
];

/// Built-in values used when no override is set.
const DEFAULTS: &[(&str, &str)] = &[("mapleader", "\\"), ("maplocalleader", "\\")];

/// Variables consulted while expanding key sequences.
///
/// Overrides set with [`VariableStore::set`] shadow the built-in defaults
/// until [`VariableStore::clear`] drops them again.
#[derive(Debug, Clone)]
pub struct VariableStore {
    overrides: HashMap<String, String>,
    defaults: &'static [(&'static str, &'static str)],
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableStore {
    pub fn new() -> Self {
        Self::with_defaults(DEFAULTS)
    }

    /// Create a store with a host-specific defaults table.
    pub fn with_defaults(defaults: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            overrides: HashMap::new(),
            defaults,
        }
    }

    /// Build a store holding the leaders from a config file.
    pub fn from_config(config: &KeysConfig) -> Self {
        let mut store = Self::new();
        store.apply_config(config);
        store
    }

    /// Look up a variable by name or by special token.
    ///
    /// `"<Leader>"`, `"<leader>"` and `"mapleader"` all read the same value.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        let name = canonical_name(&name).unwrap_or(name.as_str());

        self.overrides
            .get(name)
            .map(String::as_str)
            .or_else(|| self.default_value(name))
    }

    /// Override a variable. The name is stored as given.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(name.into(), value.into());
    }

    /// Drop every override, reverting to the defaults.
    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    /// Returns true if `name` is one of the special tokens.
    pub fn is_special(&self, name: &str) -> bool {
        canonical_name(&name.to_lowercase()).is_some()
    }

    /// Reload from config: existing overrides are cleared first.
    pub fn apply_config(&mut self, config: &KeysConfig) {
        self.clear();
        if let Some(leader) = &config.leader {
            self.set("mapleader", leader.clone());
        }
        if let Some(local_leader) = &config.local_leader {
            self.set("maplocalleader", local_leader.clone());
        }
    }

    fn default_value(&self, name: &str) -> Option<&'static str> {
        self.defaults
            .iter()
            .find(|(default, _)| *default == name)
            .map(|(_, value)| *value)
    }
}

fn canonical_name(token: &str) -> Option<&'static str> {
    SPECIAL_KEYS
        .iter()
        .find(|(special, _)| *special == token)
        .map(|(_, name)| *name)
}
