//! Process plumbing shared by the platform backends.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};

use super::ShellError;

/// A shell program and the arguments placed before the command string,
/// e.g. `/bin/sh -c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellProgram {
    pub program: String,
    pub args: Vec<String>,
}

impl ShellProgram {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Build from a configured shell such as `"bash"` or `"bash -lc"`.
    ///
    /// A bare program gets `default_flag` appended. Falls back to `fallback`
    /// when the setting is missing or cannot be split.
    pub fn from_setting(setting: Option<&str>, default_flag: &str, fallback: Self) -> Self {
        let Some(setting) = setting.filter(|s| !s.trim().is_empty()) else {
            return fallback;
        };

        match shlex::split(setting) {
            Some(mut words) if !words.is_empty() => {
                let program = words.remove(0);
                if words.is_empty() {
                    words.push(default_flag.to_string());
                }
                Self {
                    program,
                    args: words,
                }
            }
            _ => {
                log::warn!("ignoring unparsable shell setting {:?}", setting);
                fallback
            }
        }
    }

    /// A `Command` that runs `script` through this shell.
    pub fn command(&self, script: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(script);
        command
    }
}

/// Split a terminal setting such as `"alacritty --hold"` into a command.
pub(crate) fn terminal_command(terminal: &str) -> Result<Command, ShellError> {
    let words = shlex::split(terminal)
        .filter(|w| !w.is_empty())
        .ok_or_else(|| ShellError::InvalidTerminal(terminal.to_string()))?;
    let mut command = Command::new(&words[0]);
    command.args(&words[1..]);
    Ok(command)
}

/// Run `command` to completion and collect its output.
///
/// With `input`, the text is written to the child's stdin from a helper
/// thread while the output pipes are drained, so large inputs cannot
/// deadlock against a full stdout pipe.
pub(crate) fn run(
    mut command: Command,
    label: &str,
    input: Option<&str>,
) -> Result<Output, ShellError> {
    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| ShellError::Spawn {
        command: label.to_string(),
        source,
    })?;

    let writer = match (input, child.stdin.take()) {
        (Some(input), Some(mut stdin)) => {
            let input = input.to_string();
            Some(std::thread::spawn(move || -> io::Result<()> {
                stdin.write_all(input.as_bytes())?;
                // Dropping stdin closes the pipe so the child sees EOF.
                Ok(())
            }))
        }
        _ => None,
    };

    let output = child.wait_with_output().map_err(|source| ShellError::Io {
        command: label.to_string(),
        source,
    })?;

    if let Some(writer) = writer {
        match writer.join() {
            Ok(Ok(())) => {}
            // The command exited without reading all of its input.
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("`{}` closed stdin early", label);
            }
            Ok(Err(source)) => {
                return Err(ShellError::Io {
                    command: label.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(ShellError::Io {
                    command: label.to_string(),
                    source: io::Error::other("stdin writer panicked"),
                })
            }
        }
    }

    if !output.status.success() {
        log::warn!("`{}` exited with {}", label, output.status);
    }

    Ok(output)
}

/// stdout if it has any content, else stderr, else empty.
pub(crate) fn capture_text(output: &Output) -> String {
    if !output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stdout).into_owned()
    } else if !output.stderr.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::new()
    }
}

/// stdout then stderr as one text; invalid UTF-8 is replaced.
pub(crate) fn combined_text(output: &Output) -> String {
    let mut bytes = output.stdout.clone();
    bytes.extend_from_slice(&output.stderr);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Best-effort `run` + `capture_text`: failures are logged, never returned.
pub(crate) fn run_capture(command: Command, label: &str) -> String {
    match run(command, label, None) {
        Ok(output) => capture_text(&output),
        Err(err) => {
            log::error!("{} ({:?})", err, err);
            String::new()
        }
    }
}

/// Start `command` in `cwd` without waiting for it. Failures are logged.
pub(crate) fn spawn_detached(mut command: Command, cwd: &Path, label: &str) {
    let spawned: io::Result<Child> = command
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match spawned {
        Ok(mut child) => {
            log::debug!("opened `{}` in {}", label, cwd.display());
            // Reap in the background to avoid a zombie once it exits.
            std::thread::spawn(move || {
                let _ = child.wait();
            });
        }
        Err(source) => {
            let err = ShellError::Spawn {
                command: label.to_string(),
                source,
            };
            log::error!("{} ({:?})", err, err);
        }
    }
}
