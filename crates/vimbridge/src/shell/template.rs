//! Command-line templates: `%` stands for the current file.

use std::path::PathBuf;

/// How a file path is quoted when substituted into a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// POSIX shell quoting (`sh`, `bash`, `zsh`).
    Posix,
    /// Double quotes for `cmd.exe`.
    Windows,
}

/// Editor state a command template may refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    /// File backing the buffer being edited, if any.
    pub file: Option<PathBuf>,
}

impl CommandContext {
    pub fn for_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
        }
    }

    /// Substitute the quoted file path for each `%`. `\%` yields a literal
    /// `%`. Without a file (or with an unquotable one) `%` is kept as-is.
    pub fn expand(&self, command: &str, style: QuoteStyle) -> String {
        let quoted = self.file.as_ref().and_then(|file| {
            let file = file.to_string_lossy();
            let quoted = quote(&file, style);
            if quoted.is_none() {
                log::warn!("cannot quote {:?} for the shell, leaving % unexpanded", file);
            }
            quoted
        });

        let mut expanded = String::with_capacity(command.len());
        let mut chars = command.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'%') => {
                    chars.next();
                    expanded.push('%');
                }
                '%' => match &quoted {
                    Some(quoted) => expanded.push_str(quoted),
                    None => expanded.push('%'),
                },
                c => expanded.push(c),
            }
        }
        expanded
    }
}

fn quote(path: &str, style: QuoteStyle) -> Option<String> {
    match style {
        QuoteStyle::Posix => shlex::try_quote(path).ok().map(|q| q.into_owned()),
        QuoteStyle::Windows if path.contains('"') => None,
        QuoteStyle::Windows => Some(format!("\"{}\"", path)),
    }
}
