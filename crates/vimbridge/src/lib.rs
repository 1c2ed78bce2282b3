//! Shell filtering and key-notation expansion for modal editors.
//!
//! - [`shell`]: run external commands and replace buffer regions with
//!   their output (`:'<,'>!sort` style filtering)
//! - [`keys`]: expand `<leader>` / `<localleader>` in key sequences
//! - [`config`]: TOML configuration for both

pub mod buffer;
pub mod config;
pub mod keys;
pub mod mode;
pub mod shell;

pub use buffer::{Region, StringBuffer, TextBuffer};
pub use mode::Mode;
