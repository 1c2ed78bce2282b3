//! Windows backend: commands run through `cmd.exe /C`.

use std::path::Path;
use std::process::Command;

use super::process::{self, terminal_command, ShellProgram};
use super::template::{CommandContext, QuoteStyle};
use super::{ShellBackend, ShellError};
use crate::config::ShellConfig;

#[derive(Debug, Clone)]
pub struct WindowsShell {
    shell: ShellProgram,
    context: CommandContext,
}

impl WindowsShell {
    pub fn new(config: &ShellConfig, context: CommandContext) -> Self {
        Self {
            shell: ShellProgram::from_setting(
                config.program.as_deref(),
                "/C",
                ShellProgram::new("cmd.exe", &["/C"]),
            ),
            context,
        }
    }

    /// `cmd.exe /C start "" <terminal...>` so the terminal gets its own
    /// console window.
    fn interactive_command(&self, terminal: &str) -> Result<Command, ShellError> {
        let program = terminal_command(terminal)?;
        let mut command = Command::new("cmd.exe");
        command
            .args(["/C", "start", ""])
            .arg(program.get_program())
            .args(program.get_args());
        Ok(command)
    }

    /// `cmd.exe` does not undo the MSVC escaping `Command::arg` applies, so
    /// the script goes on its command line untouched.
    fn script_command(&self, script: &str) -> Command {
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;

            if runs_through_cmd(&self.shell.program) {
                let mut command = Command::new(&self.shell.program);
                command.args(&self.shell.args).raw_arg(script);
                return command;
            }
        }
        self.shell.command(script)
    }
}

/// True when `program` names `cmd.exe`, with or without a directory.
#[cfg_attr(not(windows), allow(dead_code))]
fn runs_through_cmd(program: &str) -> bool {
    let name = program.rsplit(['\\', '/']).next().unwrap_or(program);
    name.eq_ignore_ascii_case("cmd") || name.eq_ignore_ascii_case("cmd.exe")
}

impl ShellBackend for WindowsShell {
    fn open_interactive(&self, cwd: &Path, terminal: &str) {
        match self.interactive_command(terminal) {
            Ok(command) => process::spawn_detached(command, cwd, terminal),
            Err(err) => log::error!("{}", err),
        }
    }

    fn run_capture(&self, command: &str) -> String {
        let command = self.context.expand(command, QuoteStyle::Windows);
        process::run_capture(self.script_command(&command), &command)
    }

    fn filter(&self, input: &str, command: &str) -> Result<String, ShellError> {
        let command = self.context.expand(command, QuoteStyle::Windows);
        let output = process::run(self.script_command(&command), &command, Some(input))?;
        Ok(process::combined_text(&output))
    }

    fn default_terminal(&self) -> &'static str {
        "cmd.exe"
    }
}
