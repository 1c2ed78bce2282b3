//! Editing modes the host editor can be asked to switch to.

use std::str::FromStr;

/// The current editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Normal mode - navigation and commands.
    #[default]
    Normal,
    /// Characterwise visual selection.
    Visual,
    /// Linewise visual selection.
    VisualLine,
    /// Blockwise visual selection.
    VisualBlock,
}

impl Mode {
    /// Returns true for any of the visual modes.
    pub fn is_visual(&self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine | Mode::VisualBlock)
    }

    /// Returns the mode name for display.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Visual => "VISUAL",
            Mode::VisualLine => "VISUAL LINE",
            Mode::VisualBlock => "VISUAL BLOCK",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");

        match normalized.as_str() {
            "normal" | "n" => Ok(Mode::Normal),
            "visual" | "v" => Ok(Mode::Visual),
            "visual_line" | "line" => Ok(Mode::VisualLine),
            "visual_block" | "block" => Ok(Mode::VisualBlock),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_default() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn test_mode_predicates() {
        assert!(!Mode::Normal.is_visual());

        assert!(Mode::Visual.is_visual());
        assert!(Mode::VisualLine.is_visual());
        assert!(Mode::VisualBlock.is_visual());
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::Normal.label(), "NORMAL");
        assert_eq!(Mode::VisualLine.label(), "VISUAL LINE");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Visual-Line".parse::<Mode>(), Ok(Mode::VisualLine));
        assert_eq!("visual block".parse::<Mode>(), Ok(Mode::VisualBlock));
        assert_eq!(" n ".parse::<Mode>(), Ok(Mode::Normal));
        assert!("replace".parse::<Mode>().is_err());
        assert!("insert".parse::<Mode>().is_err());
    }
}
