//! External command execution.
//!
//! # Architecture
//!
//! - `ShellBackend`: the operations editing code needs from the OS
//!   (open a terminal, run a command, pipe text through a command)
//! - `LinuxShell`, `MacShell`, `WindowsShell`: one backend per platform,
//!   picked once at startup by [`select_backend`]
//! - `filter_regions`: replaces buffer regions with command output
//!
//! Read-only operations never fail from the caller's point of view: errors
//! are logged and an empty result is returned. [`ShellBackend::filter`]
//! returns a `Result` because its output overwrites buffer text.

mod filter;
mod linux;
mod macos;
mod process;
mod template;
mod windows;

pub use filter::{filter_regions, normalize_output, FilterError, ModeChange};
pub use linux::LinuxShell;
pub use macos::MacShell;
pub use process::ShellProgram;
pub use template::{CommandContext, QuoteStyle};
pub use windows::WindowsShell;

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::ShellConfig;

/// Errors raised while running external commands.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while running `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid terminal command: {0:?}")]
    InvalidTerminal(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

/// Platform-specific process execution.
pub trait ShellBackend {
    /// Launch an interactive terminal rooted at `cwd`. Does not wait for it.
    fn open_interactive(&self, cwd: &Path, terminal: &str);

    /// Run `command` and return its stdout, or its stderr when stdout is
    /// empty. Failures are logged and produce an empty string.
    fn run_capture(&self, command: &str) -> String;

    /// Run `command` with `input` on stdin and return stdout followed by
    /// stderr, decoded lossily.
    fn filter(&self, input: &str, command: &str) -> Result<String, ShellError>;

    /// Terminal launched when none is configured.
    fn default_terminal(&self) -> &'static str;
}

/// Operating systems with a shell backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// The platform this process runs on.
    pub fn detect() -> Result<Self, ShellError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a platform.
    pub fn from_os(os: &str) -> Result<Self, ShellError> {
        match os {
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::MacOs),
            other => Err(ShellError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// Build the backend for `platform`.
pub fn select_backend(
    platform: Platform,
    config: &ShellConfig,
    context: CommandContext,
) -> Box<dyn ShellBackend> {
    log::debug!("using {:?} shell backend", platform);
    match platform {
        Platform::Windows => Box::new(WindowsShell::new(config, context)),
        Platform::Linux => Box::new(LinuxShell::new(config, context)),
        Platform::MacOs => Box::new(MacShell::new(config, context)),
    }
}

/// Build the backend for the current platform.
pub fn detect_backend(
    config: &ShellConfig,
    context: CommandContext,
) -> Result<Box<dyn ShellBackend>, ShellError> {
    Ok(select_backend(Platform::detect()?, config, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_os() {
        assert_eq!(Platform::from_os("linux").unwrap(), Platform::Linux);
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::MacOs);
        assert_eq!(Platform::from_os("windows").unwrap(), Platform::Windows);

        let err = Platform::from_os("plan9").unwrap_err();
        assert!(matches!(err, ShellError::UnsupportedPlatform(ref os) if os == "plan9"));
        assert_eq!(err.to_string(), "Unsupported platform: plan9");
    }

    #[test]
    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    fn test_detect_backend_on_supported_platform() {
        let backend = detect_backend(&ShellConfig::default(), CommandContext::default()).unwrap();
        assert!(!backend.default_terminal().is_empty());
    }

    #[test]
    fn test_select_backend_default_terminals() {
        let config = ShellConfig::default();
        let terminal = |p| select_backend(p, &config, CommandContext::default()).default_terminal();

        assert_eq!(terminal(Platform::Linux), "x-terminal-emulator");
        assert_eq!(terminal(Platform::MacOs), "Terminal");
        assert_eq!(terminal(Platform::Windows), "cmd.exe");
    }
}
