//! Text buffers and the regions filtered inside them.
//!
//! Offsets count Unicode scalar values (`char`s), matching how the host
//! editor addresses positions, not UTF-8 bytes.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// A half-open span `[begin, end)` of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub begin: usize,
    pub end: usize,
}

impl Region {
    /// Create a region. A reversed pair (anchor after cursor) is normalized.
    pub fn new(begin: usize, end: usize) -> Self {
        Self {
            begin: begin.min(end),
            end: begin.max(end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Move both ends by `delta` characters. Returns `None` if the region
    /// would start before the beginning of the buffer.
    pub fn shifted(&self, delta: isize) -> Option<Self> {
        Some(Self {
            begin: self.begin.checked_add_signed(delta)?,
            end: self.end.checked_add_signed(delta)?,
        })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.begin, self.end)
    }
}

impl FromStr for Region {
    type Err = String;

    /// Parse `"BEGIN:END"`, e.g. `"0:12"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (begin, end) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("Invalid region (expected BEGIN:END): {}", s))?;
        let begin = begin
            .parse()
            .map_err(|_| format!("Invalid region start: {}", begin))?;
        let end = end
            .parse()
            .map_err(|_| format!("Invalid region end: {}", end))?;
        Ok(Self::new(begin, end))
    }
}

/// The buffer operations the shell filter needs from a host editor.
pub trait TextBuffer {
    /// Length in characters.
    fn len_chars(&self) -> usize;

    /// Text covered by `region`. Callers keep `region.end <= len_chars()`.
    fn text_in(&self, region: Region) -> String;

    /// Replace the text covered by `region` with `text`.
    fn replace(&mut self, region: Region, text: &str);
}

/// A [`TextBuffer`] backed by a `String`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringBuffer {
    text: String,
}

impl StringBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a file, replacing invalid UTF-8 sequences.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self::new(String::from_utf8_lossy(&bytes)))
    }

    /// Write the buffer back to `path`.
    /// Uses atomic write (temp file + rename) so a crash never leaves a
    /// half-written file behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;
        tmp.write_all(self.text.as_bytes())
            .context("Failed to write temp file")?;
        tmp.flush().context("Failed to flush temp file")?;
        tmp.persist(path)
            .map_err(|e| anyhow::anyhow!("Failed to persist {}: {}", path.display(), e))?;

        Ok(())
    }

    /// Grow `region` to whole lines, including the trailing newline of the
    /// last line when there is one.
    pub fn line_span(&self, region: Region) -> Region {
        let chars: Vec<char> = self.text.chars().collect();
        let mut begin = region.begin.min(chars.len());
        let mut end = region.end.min(chars.len());

        while begin > 0 && chars[begin - 1] != '\n' {
            begin -= 1;
        }
        if end == begin || chars[end - 1] != '\n' {
            while end < chars.len() && chars[end] != '\n' {
                end += 1;
            }
            if end < chars.len() {
                end += 1;
            }
        }

        Region::new(begin, end)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte offset of the character at `char_idx` (or the end of the text).
    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn byte_range(&self, region: Region) -> std::ops::Range<usize> {
        let start = self.byte_offset(region.begin);
        let end = start
            + self.text[start..]
                .char_indices()
                .nth(region.len())
                .map_or(self.text.len() - start, |(i, _)| i);
        start..end
    }
}

impl TextBuffer for StringBuffer {
    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    fn text_in(&self, region: Region) -> String {
        self.text[self.byte_range(region)].to_string()
    }

    fn replace(&mut self, region: Region, text: &str) {
        let range = self.byte_range(region);
        self.text.replace_range(range, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_region_normalizes_reversed_ends() {
        let region = Region::new(7, 3);
        assert_eq!(region, Region { begin: 3, end: 7 });
        assert_eq!(region.len(), 4);
        assert!(!region.is_empty());
        assert!(Region::new(2, 2).is_empty());
    }

    #[test]
    fn test_region_shifted() {
        let region = Region::new(4, 6);
        assert_eq!(region.shifted(3), Some(Region::new(7, 9)));
        assert_eq!(region.shifted(-4), Some(Region::new(0, 2)));
        assert_eq!(region.shifted(-5), None);
    }

    #[test]
    fn test_region_parse() {
        assert_eq!("3:10".parse::<Region>(), Ok(Region::new(3, 10)));
        assert_eq!(" 10:3 ".parse::<Region>(), Ok(Region::new(3, 10)));
        assert!("3".parse::<Region>().is_err());
        assert!("a:4".parse::<Region>().unwrap_err().contains("start"));
        assert!("1:-4".parse::<Region>().unwrap_err().contains("end"));
    }

    #[test]
    fn test_region_display() {
        assert_eq!(Region::new(1, 5).to_string(), "1:5");
    }

    #[test]
    fn test_text_in_counts_chars() {
        let buffer = StringBuffer::new("añb€c");
        assert_eq!(buffer.len_chars(), 5);
        assert_eq!(buffer.text_in(Region::new(1, 4)), "ñb€");
        assert_eq!(buffer.text_in(Region::new(4, 5)), "c");
        assert_eq!(buffer.text_in(Region::new(5, 5)), "");
    }

    #[test]
    fn test_replace_multibyte() {
        let mut buffer = StringBuffer::new("añb€c");
        buffer.replace(Region::new(1, 3), "XYZ");
        assert_eq!(buffer.as_str(), "aXYZ€c");

        buffer.replace(Region::new(6, 6), "!");
        assert_eq!(buffer.as_str(), "aXYZ€c!");
    }

    #[test]
    fn test_line_span() {
        let buffer = StringBuffer::new("one\ntwo\nthree");
        // Mid-line selection covers the whole line.
        assert_eq!(buffer.line_span(Region::new(5, 6)), Region::new(4, 8));
        // Already linewise.
        assert_eq!(buffer.line_span(Region::new(0, 4)), Region::new(0, 4));
        // Spanning lines, last line without newline.
        assert_eq!(buffer.line_span(Region::new(2, 10)), Region::new(0, 13));
        // Empty region on a line.
        assert_eq!(buffer.line_span(Region::new(1, 1)), Region::new(0, 4));
        // Past the end is clamped.
        assert_eq!(buffer.line_span(Region::new(20, 30)), Region::new(8, 13));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");

        StringBuffer::new("line one\nline two\n").save(&path).unwrap();
        let loaded = StringBuffer::load(&path).unwrap();
        assert_eq!(loaded.as_str(), "line one\nline two\n");
    }

    #[test]
    fn test_load_invalid_utf8_is_lossy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.txt");
        fs::write(&path, [b'o', b'k', 0xff, b'!']).unwrap();

        let loaded = StringBuffer::load(&path).unwrap();
        assert_eq!(loaded.as_str(), "ok\u{fffd}!");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = StringBuffer::load(&dir.path().join("missing"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("Failed to read file"));
    }
}
