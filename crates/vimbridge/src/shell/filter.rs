//! Replace buffer regions with the output of an external command.

use thiserror::Error;

use super::{ShellBackend, ShellError};
use crate::buffer::{Region, TextBuffer};
use crate::mode::Mode;

/// Errors from [`filter_regions`]. Regions before the failing one have
/// already been replaced when this is returned.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Region {region} is outside the buffer (length {len})")]
    OutOfBounds { region: Region, len: usize },

    #[error("Filtering region {index} failed: {source}")]
    Shell {
        index: usize,
        #[source]
        source: ShellError,
    },
}

/// What the host should do once filtering finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    /// Mode to switch to.
    pub mode: Mode,
    /// One cursor per filtered region, at the start of its replacement.
    pub cursors: Vec<usize>,
}

/// Trim trailing whitespace and end with exactly one newline.
pub fn normalize_output(output: &str) -> String {
    format!("{}\n", output.trim_end())
}

/// Pipe each region through `command` and replace it with the output.
///
/// `regions` must be sorted by `begin` and must not overlap. They are
/// processed front to back; each is shifted by the net length change of the
/// replacements before it.
pub fn filter_regions<B>(
    buffer: &mut B,
    regions: &[Region],
    command: &str,
    backend: &dyn ShellBackend,
) -> Result<ModeChange, FilterError>
where
    B: TextBuffer + ?Sized,
{
    let mut delta: isize = 0;
    let mut cursors = Vec::with_capacity(regions.len());

    for (index, region) in regions.iter().enumerate() {
        let len = buffer.len_chars();
        let current = region
            .shifted(delta)
            .filter(|r| r.end <= len)
            .ok_or(FilterError::OutOfBounds {
                region: *region,
                len,
            })?;

        let input = buffer.text_in(current);
        let output = backend
            .filter(&input, command)
            .map_err(|source| FilterError::Shell { index, source })?;
        let output = normalize_output(&output);

        buffer.replace(current, &output);
        cursors.push(current.begin);

        let written = output.chars().count() as isize;
        delta += written - current.len() as isize;
        log::debug!("filtered {} -> {} chars at {}", current.len(), written, current.begin);
    }

    Ok(ModeChange {
        mode: Mode::Normal,
        cursors,
    })
}
