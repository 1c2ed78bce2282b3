//! Expansion of special tokens such as `<leader>` in key sequences.

use super::variables::{VariableStore, SPECIAL_KEYS};

/// Upper bound on substitutions in a single expansion. Only reachable when a
/// value contains its own token (e.g. `mapleader = "<leader>"`).
const MAX_SUBSTITUTIONS: usize = 256;

/// Replace every special token in `keys` with its value from `store`.
///
/// Tokens match case-insensitively; the rest of the sequence keeps its case.
/// If a token has no value the sequence is returned as expanded so far.
///
/// ```
/// use vimbridge::keys::{expand_keys, VariableStore};
///
/// let mut store = VariableStore::new();
/// store.set("mapleader", ",");
/// assert_eq!(expand_keys("<Leader>w", &store), ",w");
/// ```
pub fn expand_keys(keys: &str, store: &VariableStore) -> String {
    let mut expanded = keys.to_string();
    // ASCII lowering keeps byte offsets aligned with `expanded`.
    let mut lower = expanded.to_ascii_lowercase();
    let mut substitutions = 0;

    for (token, _) in SPECIAL_KEYS {
        while let Some(start) = lower.find(token) {
            let Some(value) = store.get(token) else {
                log::debug!("no value for {token}, stopping expansion of {keys:?}");
                return expanded;
            };

            if substitutions == MAX_SUBSTITUTIONS {
                log::warn!("{token} expands to itself, stopping expansion of {keys:?}");
                return expanded;
            }
            substitutions += 1;

            expanded.replace_range(start..start + token.len(), value);
            lower = expanded.to_ascii_lowercase();
        }
    }

    expanded
}

/// Returns true if `name` is a special token, ignoring case.
pub fn is_key_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    SPECIAL_KEYS.iter().any(|(token, _)| *token == name)
}
