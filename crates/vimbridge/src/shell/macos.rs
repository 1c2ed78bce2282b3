//! macOS backend: commands run through `/bin/zsh -c`, terminals are opened
//! as applications with `open -a`.

use std::path::Path;
use std::process::Command;

use super::process::{self, ShellProgram};
use super::template::{CommandContext, QuoteStyle};
use super::{ShellBackend, ShellError};
use crate::config::ShellConfig;

#[derive(Debug, Clone)]
pub struct MacShell {
    shell: ShellProgram,
    context: CommandContext,
}

impl MacShell {
    pub fn new(config: &ShellConfig, context: CommandContext) -> Self {
        Self {
            shell: ShellProgram::from_setting(
                config.program.as_deref(),
                "-c",
                ShellProgram::new("/bin/zsh", &["-c"]),
            ),
            context,
        }
    }

    /// `open -a <terminal> <cwd>`; the application name is passed whole.
    fn interactive_command(&self, cwd: &Path, terminal: &str) -> Command {
        let mut command = Command::new("open");
        command.arg("-a").arg(terminal.trim()).arg(cwd);
        command
    }
}

impl ShellBackend for MacShell {
    fn open_interactive(&self, cwd: &Path, terminal: &str) {
        let command = self.interactive_command(cwd, terminal);
        process::spawn_detached(command, cwd, terminal);
    }

    fn run_capture(&self, command: &str) -> String {
        let command = self.context.expand(command, QuoteStyle::Posix);
        process::run_capture(self.shell.command(&command), &command)
    }

    fn filter(&self, input: &str, command: &str) -> Result<String, ShellError> {
        let command = self.context.expand(command, QuoteStyle::Posix);
        let output = process::run(self.shell.command(&command), &command, Some(input))?;
        Ok(process::combined_text(&output))
    }

    fn default_terminal(&self) -> &'static str {
        "Terminal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_command() {
        let shell = MacShell::new(&ShellConfig::default(), CommandContext::default());
        let command = shell.interactive_command(Path::new("/Users/me/src"), "iTerm");
        assert_eq!(command.get_program(), "open");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["-a", "iTerm", "/Users/me/src"]);
    }

    #[test]
    fn test_shell_override() {
        let config = ShellConfig {
            terminal: None,
            program: Some("/opt/homebrew/bin/fish".to_string()),
        };
        let shell = MacShell::new(&config, CommandContext::default());
        assert_eq!(
            shell.shell,
            ShellProgram::new("/opt/homebrew/bin/fish", &["-c"])
        );
    }

    #[test]
    #[cfg(target_os = "macos")]
    fn test_filter_pipes_input() {
        let shell = MacShell::new(&ShellConfig::default(), CommandContext::default());
        assert_eq!(shell.filter("b\na\n", "sort").unwrap(), "a\nb\n");
    }
}
