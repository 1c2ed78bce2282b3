//! Key notation variables and their expansion.
//!
//! Key sequences may reference the configurable leader keys through the
//! special tokens `<leader>` and `<localleader>`. Their values live in a
//! [`VariableStore`] owned by the caller and passed to [`expand_keys`]
//! explicitly.

mod notation;
mod variables;

pub use notation::{expand_keys, is_key_name};
pub use variables::VariableStore;
