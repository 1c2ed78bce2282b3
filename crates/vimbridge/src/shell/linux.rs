//! Linux backend: commands run through `/bin/sh -c`, terminals are started
//! directly.

use std::path::Path;

use super::process::{self, terminal_command, ShellProgram};
use super::template::{CommandContext, QuoteStyle};
use super::{ShellBackend, ShellError};
use crate::config::ShellConfig;

#[derive(Debug, Clone)]
pub struct LinuxShell {
    shell: ShellProgram,
    context: CommandContext,
}

impl LinuxShell {
    pub fn new(config: &ShellConfig, context: CommandContext) -> Self {
        Self {
            shell: ShellProgram::from_setting(
                config.program.as_deref(),
                "-c",
                ShellProgram::new("/bin/sh", &["-c"]),
            ),
            context,
        }
    }
}

impl ShellBackend for LinuxShell {
    fn open_interactive(&self, cwd: &Path, terminal: &str) {
        match terminal_command(terminal) {
            Ok(command) => process::spawn_detached(command, cwd, terminal),
            Err(err) => log::error!("{}", err),
        }
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
        "x-terminal-emulator"
    }
}
