//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    /// External command settings
    pub shell: ShellConfig,
    /// Key notation settings
    pub keys: KeysConfig,
}

/// Settings for running external commands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Terminal program used when opening an interactive shell.
    /// May include arguments (e.g., "alacritty --hold").
    pub terminal: Option<String>,
    /// Shell used to run commands instead of the platform default
    pub program: Option<String>,
}

impl ShellConfig {
    /// The terminal program to launch.
    ///
    /// Falls back to the `TERMINAL` environment variable, then to the given
    /// platform default.
    pub fn terminal_or(&self, platform_default: &str) -> String {
        if let Some(terminal) = self.terminal.as_deref().filter(|t| !t.trim().is_empty()) {
            return terminal.to_string();
        }
        match std::env::var("TERMINAL") {
            Ok(t) if !t.trim().is_empty() => t,
            _ => platform_default.to_string(),
        }
    }
}

/// Leader key overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Value of `<leader>` (stored as `mapleader`)
    pub leader: Option<String>,
    /// Value of `<localleader>` (stored as `maplocalleader`)
    pub local_leader: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[shell]
terminal = "alacritty --hold"
program = "/bin/bash"

[keys]
leader = ","
local_leader = " "
"#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.shell.terminal.as_deref(), Some("alacritty --hold"));
        assert_eq!(config.shell.program.as_deref(), Some("/bin/bash"));
        assert_eq!(config.keys.leader.as_deref(), Some(","));
        assert_eq!(config.keys.local_leader.as_deref(), Some(" "));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str("[keys]\nleader = \"x\"\n").unwrap();
        assert_eq!(config.keys.leader.as_deref(), Some("x"));
        assert_eq!(config.keys.local_leader, None);
        assert_eq!(config.shell, ShellConfig::default());
    }

    #[test]
    fn test_serialize_config() {
        let config = Config {
            keys: KeysConfig {
                leader: Some(",".to_string()),
                local_leader: None,
            },
            ..Config::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[keys]"));
        assert!(toml_str.contains("leader = \",\""));
    }

    #[test]
    #[serial]
    fn test_terminal_fallbacks() {
        let previous = std::env::var_os("TERMINAL");

        let configured = ShellConfig {
            terminal: Some("kitty".to_string()),
            program: None,
        };
        std::env::set_var("TERMINAL", "foot");
        assert_eq!(configured.terminal_or("xterm"), "kitty");
        assert_eq!(ShellConfig::default().terminal_or("xterm"), "foot");

        std::env::remove_var("TERMINAL");
        assert_eq!(ShellConfig::default().terminal_or("xterm"), "xterm");

        if let Some(v) = previous {
            std::env::set_var("TERMINAL", v);
        }
    }
}
